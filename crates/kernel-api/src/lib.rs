//! In-process session facade over the trait and life engines, with async
//! catalogue loading and SQLite snapshot persistence.

mod catalogue;
mod persistence;

use std::path::Path;

use contracts::{
    Choice, ChoiceAlignment, EventRecord, LifeSummary, Question, Scenario, SessionConfig,
    SessionSnapshot, TimelineEntry, TrajectoryInsight,
};
use kernel_core::random::{from_entropy, seeded};
use kernel_core::{Assessment, LifeSimEngine, LoadFailure, SimError, TraitEngine};
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{info, warn};

pub use catalogue::{load_question_catalogue, load_scenario_catalogue};
pub use persistence::{PersistedSessionSummary, PersistenceError, SqliteSessionStore};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadFailure),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// One player's run: assessment, trait evolution and life history.
#[derive(Debug)]
pub struct LifeSession {
    config: SessionConfig,
    traits: TraitEngine,
    life: LifeSimEngine<StdRng>,
    assessment: Assessment,
    store: Option<SqliteSessionStore>,
}

impl LifeSession {
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => seeded(seed),
            None => from_entropy(),
        };
        Self {
            traits: TraitEngine::new(config.traits.clone()),
            life: LifeSimEngine::new(config.life.clone(), rng),
            assessment: Assessment::default(),
            store: None,
            config,
        }
    }

    /// Builds a session and loads both catalogues before returning.
    pub async fn bootstrap(
        config: SessionConfig,
        scenario_path: impl AsRef<Path>,
        question_path: impl AsRef<Path>,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(config);
        session.load_scenarios_from(scenario_path).await?;
        session.load_questions_from(question_path).await?;
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn traits(&self) -> &TraitEngine {
        &self.traits
    }

    pub fn life(&self) -> &LifeSimEngine<StdRng> {
        &self.life
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    /// On failure the previously loaded catalogue stays in place.
    pub async fn load_scenarios_from(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<usize, SessionError> {
        let catalogue = load_scenario_catalogue(path).await?;
        Ok(self.life.load_catalogue(catalogue))
    }

    pub async fn load_questions_from(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<usize, SessionError> {
        let catalogue = load_question_catalogue(path).await?;
        Ok(self.assessment.load_questions(catalogue))
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.assessment.current_question()
    }

    pub fn answer_question(&mut self, choice_index: usize) -> Result<(), SessionError> {
        self.assessment.answer(&mut self.traits, choice_index)?;
        Ok(())
    }

    pub fn next_scenario(&mut self) -> Option<Scenario> {
        self.life.select_next_scenario(&self.traits)
    }

    /// Resolves a choice in a scenario that is currently on offer. Played or
    /// out-of-range scenarios are rejected without touching state.
    pub fn choose(
        &mut self,
        scenario_id: &str,
        choice_id: &str,
    ) -> Result<EventRecord, SessionError> {
        let known = self.life.scenario(scenario_id).is_some();
        if known
            && !self
                .life
                .available_scenarios()
                .any(|scenario| scenario.id == scenario_id)
        {
            return Err(SimError::ScenarioUnavailable(scenario_id.to_string()).into());
        }
        let record = self
            .life
            .process_choice_by_id(&mut self.traits, scenario_id, choice_id)?;
        Ok(record)
    }

    pub fn choice_alignment(&self, choice: &Choice) -> ChoiceAlignment {
        self.life.choice_alignment(&self.traits, choice)
    }

    pub fn reflection_prompt(&mut self, scenario: &Scenario) -> Option<String> {
        self.life.reflection_prompt(scenario)
    }

    pub fn is_complete(&mut self) -> bool {
        self.life.should_end_simulation()
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.life.timeline()
    }

    pub fn summary(&self) -> LifeSummary {
        let personality = self.traits.generate_summary();
        let counts = self.traits.trajectory_counts();
        let trajectories = personality
            .dominant_trajectories
            .iter()
            .map(|tag| TrajectoryInsight {
                tag: tag.clone(),
                count: counts.get(tag).copied().unwrap_or_default(),
                description: self.life.trajectory_description(tag).map(str::to_string),
            })
            .collect();

        LifeSummary {
            personality,
            trajectories,
            final_age: self.life.age(),
            final_stage: self.life.stage(),
            events_lived: self.life.history().len(),
            timeline: self.life.timeline(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            personality: self.traits.state(),
            events: self.life.state(),
        }
    }

    pub fn restore(&mut self, snapshot: SessionSnapshot) {
        self.traits.restore_state(snapshot.personality);
        self.life.restore_state(snapshot.events);
    }

    /// Starts a new life. Catalogues and the attached store are kept.
    pub fn reset(&mut self) {
        self.traits.reset();
        self.life.reset();
        self.assessment.reset();
        info!(session_id = self.config.session_id.as_str(), "session reset");
    }

    pub fn attach_sqlite_store(&mut self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        self.store = Some(SqliteSessionStore::open(path)?);
        Ok(())
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Writes the current snapshot under this session's id, returning the
    /// stored revision.
    pub fn save(&mut self) -> Result<u64, PersistenceError> {
        let snapshot = self.snapshot();
        let store = self.store.as_mut().ok_or(PersistenceError::NotAttached)?;
        let revision = store.put_snapshot(
            &self.config.session_id,
            &self.config.schema_version,
            &snapshot,
        )?;
        info!(
            session_id = self.config.session_id.as_str(),
            revision,
            events = snapshot.events.history.len(),
            "session saved"
        );
        Ok(revision)
    }

    /// Restores the stored snapshot for this session id, if any. A snapshot
    /// written under another schema version is refused.
    pub fn resume(&mut self) -> Result<bool, PersistenceError> {
        let store = self.store.as_ref().ok_or(PersistenceError::NotAttached)?;
        let session_id = self.config.session_id.as_str();
        if let Some(stored) = store.stored_schema_version(session_id)? {
            if stored != self.config.schema_version {
                return Err(PersistenceError::SchemaMismatch {
                    session_id: session_id.to_string(),
                    stored,
                    expected: self.config.schema_version.clone(),
                });
            }
        }
        let Some(snapshot) = store.load_snapshot(session_id)? else {
            warn!(session_id, "no stored snapshot to resume");
            return Ok(false);
        };
        self.restore(snapshot);
        info!(
            session_id = self.config.session_id.as_str(),
            age = self.life.age(),
            "session resumed"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use contracts::{LifeStage, QuestionCatalogue, ScenarioCatalogue};

    use super::*;

    const SCENARIOS: &str = r#"{
        "scenarios": [
            {
                "id": "studio",
                "title": "The Studio",
                "stage": "early",
                "age_range": { "min": 18, "max": 25 },
                "tags": ["art"],
                "choices": [
                    { "id": "paint", "title": "Paint all night", "outcome": "Canvas.", "ocean_weights": { "O": 10 }, "trajectory_tags": ["artist"] },
                    { "id": "sell", "title": "Sell prints", "outcome": "Rent paid.", "ocean_weights": { "C": 5 }, "trajectory_tags": ["merchant"] }
                ],
                "reflection_prompts": ["Was it worth it?"]
            }
        ],
        "trajectory_descriptions": { "artist": "Sees the world in colour." }
    }"#;

    const QUESTIONS: &str = r#"{
        "questions": [
            { "id": "q1", "text": "Weekends are for...", "choices": [
                { "text": "friends", "ocean_weights": { "E": 6 } },
                { "text": "books", "ocean_weights": { "E": -6 } }
            ] }
        ]
    }"#;

    fn session() -> LifeSession {
        let mut session = LifeSession::new(SessionConfig {
            seed: Some(11),
            ..SessionConfig::default()
        });
        let scenarios: ScenarioCatalogue = serde_json::from_str(SCENARIOS).expect("scenarios");
        let questions: QuestionCatalogue = serde_json::from_str(QUESTIONS).expect("questions");
        session.life.load_catalogue(scenarios);
        session.assessment.load_questions(questions);
        session
    }

    #[test]
    fn choose_then_summarize() {
        let mut session = session();
        session.answer_question(1).expect("valid answer");
        assert!(session.current_question().is_none());
        assert_eq!(session.traits().ocean().extraversion, 44.0);

        let scenario = session.next_scenario().expect("studio is eligible");
        assert_eq!(scenario.id, "studio");
        assert_eq!(
            session.reflection_prompt(&scenario).as_deref(),
            Some("Was it worth it?")
        );
        let record = session.choose("studio", "paint").expect("known choice");
        assert_eq!(record.age, 18);

        let summary = session.summary();
        assert_eq!(summary.events_lived, 1);
        assert_eq!(summary.final_age, session.life().age());
        assert_eq!(summary.final_stage, LifeStage::Early);
        assert_eq!(summary.trajectories.len(), 1);
        assert_eq!(summary.trajectories[0].tag, "artist");
        assert_eq!(summary.trajectories[0].count, 1);
        assert_eq!(
            summary.trajectories[0].description.as_deref(),
            Some("Sees the world in colour.")
        );
        assert_eq!(summary.timeline, session.timeline());
    }

    #[test]
    fn unknown_ids_surface_sim_errors() {
        let mut session = session();
        let err = session.choose("studio", "sculpt").expect_err("no such choice");
        assert!(matches!(
            err,
            SessionError::Sim(SimError::UnknownChoice { .. })
        ));
        let err = session.choose("nowhere", "paint").expect_err("no such scenario");
        assert!(matches!(err, SessionError::Sim(SimError::UnknownScenario(_))));
        assert!(session.life().history().is_empty());
    }

    #[test]
    fn played_scenario_cannot_be_chosen_again() {
        let mut session = session();
        session.choose("studio", "paint").expect("first pass");
        let before = session.snapshot();

        let err = session.choose("studio", "sell").expect_err("already played");
        assert!(matches!(
            err,
            SessionError::Sim(SimError::ScenarioUnavailable(ref id)) if id == "studio"
        ));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.life().history().len(), 1);
    }

    #[test]
    fn save_without_store_is_rejected() {
        let mut session = session();
        assert!(!session.has_store());
        assert!(matches!(session.save(), Err(PersistenceError::NotAttached)));
        assert!(matches!(session.resume(), Err(PersistenceError::NotAttached)));
    }

    #[test]
    fn reset_clears_life_but_keeps_catalogues() {
        let mut session = session();
        session.answer_question(0).expect("valid answer");
        session.choose("studio", "sell").expect("known choice");
        session.reset();

        assert_eq!(session.snapshot(), LifeSession::new(SessionConfig::default()).snapshot());
        assert_eq!(session.life().scenarios().len(), 1);
        assert_eq!(session.assessment().progress(), (0, 1));
    }
}
