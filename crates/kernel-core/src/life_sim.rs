//! Scenario selection and life progression.
//!
//! `LifeSimEngine` owns the catalogue, the current age and the append-only
//! event history. All trait mutation is delegated to a [`TraitEngine`] passed
//! in by the caller; the engine never holds on to it.

use std::collections::{BTreeMap, BTreeSet};

use contracts::{
    Choice, ChoiceAlignment, EventRecord, LifeSimConfig, LifeSimState, LifeStage, Scenario,
    ScenarioCatalogue, TimelineEntry, TraitDimension,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{LoadFailure, SimError};
use crate::random::RandomSource;
use crate::trait_engine::TraitEngine;

/// Bidirectional substring containment. Deliberately loose.
pub fn tags_match(context_tag: &str, trajectory: &str) -> bool {
    context_tag.contains(trajectory) || trajectory.contains(context_tag)
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCandidate {
    pub scenario_index: usize,
    pub weight: f64,
}

#[derive(Debug)]
pub struct LifeSimEngine<R> {
    config: LifeSimConfig,
    scenarios: Vec<Scenario>,
    trajectory_descriptions: BTreeMap<String, String>,
    global_modifiers: Value,
    age: u32,
    stage: LifeStage,
    history: Vec<EventRecord>,
    available: Vec<usize>,
    rng: R,
}

impl<R: RandomSource> LifeSimEngine<R> {
    pub fn new(config: LifeSimConfig, rng: R) -> Self {
        let age = config.start_age;
        Self {
            config,
            scenarios: Vec::new(),
            trajectory_descriptions: BTreeMap::new(),
            global_modifiers: Value::Null,
            age,
            stage: LifeStage::from_age(age),
            history: Vec::new(),
            available: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &LifeSimConfig {
        &self.config
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn stage(&self) -> LifeStage {
        self.stage
    }

    pub fn history(&self) -> &[EventRecord] {
        &self.history
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn scenario(&self, scenario_id: &str) -> Option<&Scenario> {
        self.scenarios
            .iter()
            .find(|scenario| scenario.id == scenario_id)
    }

    pub fn trajectory_description(&self, tag: &str) -> Option<&str> {
        self.trajectory_descriptions.get(tag).map(String::as_str)
    }

    pub fn global_modifiers(&self) -> &Value {
        &self.global_modifiers
    }

    /// Scenarios eligible as of the last refresh, in catalogue order.
    pub fn available_scenarios(&self) -> impl Iterator<Item = &Scenario> + '_ {
        self.available.iter().map(|idx| &self.scenarios[*idx])
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Replaces the catalogue and its lookup tables wholesale.
    pub fn load_catalogue(&mut self, catalogue: ScenarioCatalogue) -> usize {
        let ScenarioCatalogue {
            scenarios,
            trajectory_descriptions,
            global_modifiers,
        } = catalogue;

        let mut seen = BTreeSet::new();
        for scenario in &scenarios {
            if !seen.insert(scenario.id.as_str()) {
                warn!(scenario_id = scenario.id.as_str(), "duplicate scenario id in catalogue");
            }
        }

        self.scenarios = scenarios;
        self.trajectory_descriptions = trajectory_descriptions;
        self.global_modifiers = global_modifiers;
        self.refresh_available_scenarios();
        info!(
            scenarios = self.scenarios.len(),
            available = self.available.len(),
            "scenario catalogue loaded"
        );
        self.scenarios.len()
    }

    /// Parses a JSON catalogue, leaving the engine untouched if it fails.
    pub fn load_catalogue_str(
        &mut self,
        source_name: &str,
        raw: &str,
    ) -> Result<usize, LoadFailure> {
        let catalogue = serde_json::from_str::<ScenarioCatalogue>(raw)
            .map_err(|err| LoadFailure::malformed(source_name, err))?;
        Ok(self.load_catalogue(catalogue))
    }

    pub fn reset(&mut self) {
        self.age = self.config.start_age;
        self.stage = LifeStage::from_age(self.age);
        self.history.clear();
        self.refresh_available_scenarios();
        debug!(age = self.age, "life simulation reset");
    }

    pub fn refresh_available_scenarios(&mut self) {
        let played = self
            .history
            .iter()
            .map(|record| record.scenario_id.as_str())
            .collect::<BTreeSet<_>>();
        let (age, stage) = (self.age, self.stage);
        self.available = self
            .scenarios
            .iter()
            .enumerate()
            .filter(|(_, scenario)| !played.contains(scenario.id.as_str()))
            .filter(|(_, scenario)| scenario.is_eligible(age, stage))
            .map(|(idx, _)| idx)
            .collect();
    }

    /// Weights every available scenario: 1.0, plus the match bonus for each
    /// context tag matching a dominant trajectory, plus jitter. Draws one
    /// jitter value per scenario in catalogue order.
    pub fn weigh_candidates(&mut self, traits: &TraitEngine) -> Vec<WeightedCandidate> {
        let dominant = traits.dominant_trajectories(self.config.dominant_trajectory_window);
        let mut weighted = Vec::with_capacity(self.available.len());
        for idx in self.available.clone() {
            let matching_tags = self.scenarios[idx]
                .tags
                .iter()
                .filter(|tag| dominant.iter().any(|trajectory| tags_match(tag, trajectory)))
                .count();
            let weight = 1.0
                + self.config.trajectory_match_bonus * matching_tags as f64
                + self.rng.next_unit() * self.config.selection_jitter;
            weighted.push(WeightedCandidate {
                scenario_index: idx,
                weight,
            });
        }
        weighted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        weighted
    }

    /// Picks the next scenario, or `None` once nothing is eligible.
    pub fn select_next_scenario(&mut self, traits: &TraitEngine) -> Option<Scenario> {
        self.refresh_available_scenarios();
        if self.available.is_empty() {
            debug!(age = self.age, stage = %self.stage, "no scenario available");
            return None;
        }

        let mut shortlist = self.weigh_candidates(traits);
        shortlist.truncate(self.config.shortlist_size.max(1));
        let pick = self.rng.pick_index(shortlist.len());
        let chosen = &self.scenarios[shortlist[pick].scenario_index];
        debug!(
            scenario_id = chosen.id.as_str(),
            shortlist = shortlist.len(),
            weight = shortlist[pick].weight,
            "scenario selected"
        );
        Some(chosen.clone())
    }

    /// Resolves a choice: mutates `traits`, records the event, ages the
    /// actor and recomputes stage and availability.
    pub fn process_choice(
        &mut self,
        traits: &mut TraitEngine,
        scenario: &Scenario,
        choice: &Choice,
    ) -> EventRecord {
        let ocean_before = *traits.ocean();
        let stress_before = traits.stress();

        if let Some(weights) = choice.ocean_weights.as_ref() {
            traits.apply_weights(weights);
        }
        if let Some(delta) = choice.stress_delta {
            traits.apply_stress(delta);
        }
        if !choice.trajectory_tags.is_empty() {
            traits.add_trajectory_tags(&choice.trajectory_tags);
        }

        let ocean_after = *traits.ocean();
        let ocean_changes = TraitDimension::ALL
            .into_iter()
            .filter_map(|dimension| {
                let delta = ocean_after.get(dimension) - ocean_before.get(dimension);
                (delta != 0.0).then_some((dimension, delta))
            })
            .collect::<BTreeMap<_, _>>();

        let record = EventRecord {
            scenario_id: scenario.id.clone(),
            scenario_title: scenario.title.clone(),
            choice_id: choice.id.clone(),
            choice_title: choice.title.clone(),
            outcome: choice.outcome.clone(),
            age: self.age,
            stage: self.stage,
            ocean_before,
            ocean_after,
            stress_before,
            stress_after: traits.stress(),
            ocean_changes,
        };
        self.history.push(record.clone());

        let base = self.config.stage_advance.for_stage(self.stage);
        let jitter = if self.config.age_jitter_span == 0 {
            0
        } else {
            self.rng.pick_index(self.config.age_jitter_span as usize) as u32
        };
        self.age = self.age.saturating_add(base + jitter);
        self.stage = LifeStage::from_age(self.age);
        self.refresh_available_scenarios();

        debug!(
            scenario_id = record.scenario_id.as_str(),
            choice_id = record.choice_id.as_str(),
            age = self.age,
            stage = %self.stage,
            "choice resolved"
        );
        record
    }

    /// Id-addressed variant of [`Self::process_choice`].
    pub fn process_choice_by_id(
        &mut self,
        traits: &mut TraitEngine,
        scenario_id: &str,
        choice_id: &str,
    ) -> Result<EventRecord, SimError> {
        let scenario = self
            .scenario(scenario_id)
            .cloned()
            .ok_or_else(|| SimError::UnknownScenario(scenario_id.to_string()))?;
        let choice = scenario
            .choice(choice_id)
            .cloned()
            .ok_or_else(|| SimError::UnknownChoice {
                scenario_id: scenario_id.to_string(),
                choice_id: choice_id.to_string(),
            })?;
        Ok(self.process_choice(traits, &scenario, &choice))
    }

    pub fn reflection_prompt(&mut self, scenario: &Scenario) -> Option<String> {
        if scenario.reflection_prompts.is_empty() {
            return None;
        }
        let idx = self.rng.pick_index(scenario.reflection_prompts.len());
        Some(scenario.reflection_prompts[idx].clone())
    }

    pub fn choice_alignment(&self, traits: &TraitEngine, choice: &Choice) -> ChoiceAlignment {
        ChoiceAlignment::from_probability(traits.calculate_choice_probability(choice))
    }

    pub fn should_end_simulation(&mut self) -> bool {
        if self.age >= self.config.max_age {
            return true;
        }
        self.refresh_available_scenarios();
        self.available.is_empty() && self.history.len() >= self.config.min_events_before_exhaustion
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.history.iter().map(TimelineEntry::from).collect()
    }

    pub fn state(&self) -> LifeSimState {
        LifeSimState {
            age: self.age,
            stage: self.stage,
            history: self.history.clone(),
        }
    }

    /// Restores age and history. Stage is re-derived from age and
    /// availability recomputed, so a stale snapshot cannot desync either.
    pub fn restore_state(&mut self, state: LifeSimState) {
        let derived = LifeStage::from_age(state.age);
        if derived != state.stage {
            warn!(
                age = state.age,
                stored = %state.stage,
                derived = %derived,
                "stored stage disagrees with age; using derived stage"
            );
        }
        self.age = state.age;
        self.stage = derived;
        self.history = state.history;
        self.refresh_available_scenarios();
    }
}
