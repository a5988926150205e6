//! Life-simulation contract types: catalogue records, event history and the
//! read-only views handed back to callers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::personality::{PersonalitySummary, TraitDimension, TraitVector, WeightMap};

/// Age band governing which scenarios are eligible. Always derived from age.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    Early,
    Mid,
    Later,
}

impl LifeStage {
    pub const ALL: [LifeStage; 3] = [LifeStage::Early, LifeStage::Mid, LifeStage::Later];

    pub fn from_age(age: u32) -> Self {
        if age <= 25 {
            Self::Early
        } else if age <= 50 {
            Self::Mid
        } else {
            Self::Later
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Mid => "mid",
            Self::Later => "later",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Early => "Early Adulthood",
            Self::Mid => "Midlife",
            Self::Later => "Later Life",
        }
    }

    /// Inclusive display range of the band.
    pub fn age_range(self) -> AgeRange {
        match self {
            Self::Early => AgeRange { min: 18, max: 25 },
            Self::Mid => AgeRange { min: 26, max: 50 },
            Self::Later => AgeRange { min: 51, max: 100 },
        }
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Stage a scenario belongs to; `any` admits every stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StageAffinity {
    Any,
    Early,
    Mid,
    Later,
}

impl StageAffinity {
    pub fn admits(self, stage: LifeStage) -> bool {
        match self {
            Self::Any => true,
            Self::Early => stage == LifeStage::Early,
            Self::Mid => stage == LifeStage::Mid,
            Self::Later => stage == LifeStage::Later,
        }
    }
}

impl From<LifeStage> for StageAffinity {
    fn from(value: LifeStage) -> Self {
        match value {
            LifeStage::Early => Self::Early,
            LifeStage::Mid => Self::Mid,
            LifeStage::Later => Self::Later,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub fn contains(&self, age: u32) -> bool {
        self.min <= age && age <= self.max
    }
}

/// A selectable option inside a scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "crate::serde_null_default::deserialize")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::serde_null_default::deserialize")]
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocean_weights: Option<WeightMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_delta: Option<f64>,
    #[serde(
        default,
        deserialize_with = "crate::serde_null_default::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub trajectory_tags: Vec<String>,
}

/// Immutable catalogue entry describing one life decision point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "crate::serde_null_default::deserialize")]
    pub description: String,
    pub stage: StageAffinity,
    pub age_range: AgeRange,
    #[serde(default, deserialize_with = "crate::serde_null_default::deserialize")]
    pub tags: Vec<String>,
    pub choices: Vec<Choice>,
    #[serde(
        default,
        deserialize_with = "crate::serde_null_default::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub reflection_prompts: Vec<String>,
}

impl Scenario {
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id == choice_id)
    }

    pub fn is_eligible(&self, age: u32, stage: LifeStage) -> bool {
        self.stage.admits(stage) && self.age_range.contains(age)
    }
}

/// The scenario document as delivered by the content store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScenarioCatalogue {
    pub scenarios: Vec<Scenario>,
    #[serde(default, deserialize_with = "crate::serde_null_default::deserialize")]
    pub trajectory_descriptions: BTreeMap<String, String>,
    /// Opaque pass-through; not interpreted by the kernel.
    #[serde(default)]
    pub global_modifiers: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionChoice {
    pub text: String,
    #[serde(default, deserialize_with = "crate::serde_null_default::deserialize")]
    pub ocean_weights: WeightMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub choices: Vec<QuestionChoice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuestionCatalogue {
    pub questions: Vec<Question>,
}

/// One resolved choice. Appended to history, never edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub scenario_id: String,
    pub scenario_title: String,
    pub choice_id: String,
    pub choice_title: String,
    pub outcome: String,
    pub age: u32,
    pub stage: LifeStage,
    pub ocean_before: TraitVector,
    pub ocean_after: TraitVector,
    pub stress_before: f64,
    pub stress_after: f64,
    /// Only dimensions whose value actually moved.
    pub ocean_changes: BTreeMap<TraitDimension, f64>,
}

/// Everything the life-sim engine persists, stored under `"events"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LifeSimState {
    pub age: u32,
    pub stage: LifeStage,
    #[serde(default)]
    pub history: Vec<EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub age: u32,
    pub stage: LifeStage,
    pub title: String,
    pub choice_title: String,
    pub outcome: String,
}

impl From<&EventRecord> for TimelineEntry {
    fn from(record: &EventRecord) -> Self {
        Self {
            age: record.age,
            stage: record.stage,
            title: record.scenario_title.clone(),
            choice_title: record.choice_title.clone(),
            outcome: record.outcome.clone(),
        }
    }
}

/// Qualitative fit between a choice and the current personality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceAlignment {
    StronglyAligned,
    SomewhatAligned,
    Neutral,
    AStretch,
    AgainstNature,
}

impl ChoiceAlignment {
    /// Bucket a probability on the 10–90 scale. Check order matters at the
    /// boundaries: exactly 70 is "somewhat", exactly 30 is "a stretch".
    pub fn from_probability(probability: f64) -> Self {
        if probability > 70.0 {
            Self::StronglyAligned
        } else if probability > 55.0 {
            Self::SomewhatAligned
        } else if probability < 30.0 {
            Self::AgainstNature
        } else if probability < 45.0 {
            Self::AStretch
        } else {
            Self::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StronglyAligned => "strongly aligned",
            Self::SomewhatAligned => "somewhat aligned",
            Self::Neutral => "neutral",
            Self::AStretch => "a stretch for you",
            Self::AgainstNature => "against your nature",
        }
    }
}

impl fmt::Display for ChoiceAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrajectoryInsight {
    pub tag: String,
    pub count: u32,
    pub description: Option<String>,
}

/// Narrative wrap-up combining both engines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifeSummary {
    pub personality: PersonalitySummary,
    pub trajectories: Vec<TrajectoryInsight>,
    pub final_age: u32,
    pub final_stage: LifeStage,
    pub events_lived: usize,
    pub timeline: Vec<TimelineEntry>,
}
