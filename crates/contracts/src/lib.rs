//! v1 contracts shared by the personality kernel, the session facade and
//! whatever presentation layer drives them.

pub mod life;
pub mod personality;
mod serde_null_default;

use serde::{Deserialize, Serialize};

pub use life::{
    AgeRange, Choice, ChoiceAlignment, EventRecord, LifeSimState, LifeStage, LifeSummary,
    Question, QuestionCatalogue, QuestionChoice, Scenario, ScenarioCatalogue, StageAffinity,
    TimelineEntry, TrajectoryInsight,
};
pub use personality::{
    ConfidenceBands, EnneagramProfile, MbtiProfile, PersonalityState, PersonalitySummary,
    TraitDimension, TraitVector, TrajectoryCounts, WeightMap,
};

pub const SCHEMA_VERSION_V1: &str = "1.0";

/// Tunables for the trait engine. Defaults reproduce the reference behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TraitEngineConfig {
    pub initial_trait: f64,
    pub initial_confidence: f64,
    /// Amount a confidence band shrinks per piece of evidence.
    pub confidence_step: f64,
    pub confidence_floor: f64,
    pub initial_stress: f64,
    pub high_trait_threshold: f64,
    pub low_trait_threshold: f64,
    pub summary_trajectory_count: usize,
}

impl Default for TraitEngineConfig {
    fn default() -> Self {
        Self {
            initial_trait: 50.0,
            initial_confidence: 30.0,
            confidence_step: 2.0,
            confidence_floor: 5.0,
            initial_stress: 30.0,
            high_trait_threshold: 65.0,
            low_trait_threshold: 35.0,
            summary_trajectory_count: 3,
        }
    }
}

/// Base years added per resolved choice, by stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StageAdvance {
    pub early: u32,
    pub mid: u32,
    pub later: u32,
}

impl StageAdvance {
    pub fn for_stage(&self, stage: LifeStage) -> u32 {
        match stage {
            LifeStage::Early => self.early,
            LifeStage::Mid => self.mid,
            LifeStage::Later => self.later,
        }
    }
}

impl Default for StageAdvance {
    fn default() -> Self {
        Self {
            early: 2,
            mid: 3,
            later: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LifeSimConfig {
    pub start_age: u32,
    pub max_age: u32,
    /// History length required before an empty catalogue ends the run.
    pub min_events_before_exhaustion: usize,
    pub dominant_trajectory_window: usize,
    pub trajectory_match_bonus: f64,
    pub selection_jitter: f64,
    pub shortlist_size: usize,
    pub stage_advance: StageAdvance,
    /// Extra years drawn uniformly from `0..age_jitter_span`.
    pub age_jitter_span: u32,
}

impl Default for LifeSimConfig {
    fn default() -> Self {
        Self {
            start_age: 18,
            max_age: 75,
            min_events_before_exhaustion: 5,
            dominant_trajectory_window: 3,
            trajectory_match_bonus: 0.5,
            selection_jitter: 0.5,
            shortlist_size: 3,
            stage_advance: StageAdvance::default(),
            age_jitter_span: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub schema_version: String,
    pub session_id: String,
    /// Fixed seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub traits: TraitEngineConfig,
    pub life: LifeSimConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            session_id: "session_local_001".to_string(),
            seed: None,
            traits: TraitEngineConfig::default(),
            life: LifeSimConfig::default(),
        }
    }
}

/// Persisted session document. Exactly two sections, one per engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub personality: PersonalityState,
    pub events: LifeSimState,
}
