//! Personality contract types.
//!
//! The OCEAN vector, its confidence bands, the persisted trait-engine state and
//! the typology summaries derived from it.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Dimension key → signed delta, as authored in catalogues (`"ocean_weights"`).
///
/// Keys stay free-form strings so partially-specified or misspelled maps still
/// load; only `O`, `C`, `E`, `A` and `N` are acted on.
pub type WeightMap = BTreeMap<String, f64>;

/// Trajectory tag → occurrence count, kept in first-observed order.
pub type TrajectoryCounts = IndexMap<String, u32>;

pub const TRAIT_MIN: f64 = 0.0;
pub const TRAIT_MAX: f64 = 100.0;
pub const TRAIT_MIDPOINT: f64 = 50.0;
pub const STRESS_MIN: f64 = 0.0;
pub const STRESS_MAX: f64 = 100.0;

/// One of the five OCEAN dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TraitDimension {
    #[serde(rename = "O")]
    Openness,
    #[serde(rename = "C")]
    Conscientiousness,
    #[serde(rename = "E")]
    Extraversion,
    #[serde(rename = "A")]
    Agreeableness,
    #[serde(rename = "N")]
    Neuroticism,
}

impl TraitDimension {
    pub const ALL: [TraitDimension; 5] = [
        TraitDimension::Openness,
        TraitDimension::Conscientiousness,
        TraitDimension::Extraversion,
        TraitDimension::Agreeableness,
        TraitDimension::Neuroticism,
    ];

    /// Single-letter key used in weight maps and snapshots.
    pub fn key(self) -> &'static str {
        match self {
            Self::Openness => "O",
            Self::Conscientiousness => "C",
            Self::Extraversion => "E",
            Self::Agreeableness => "A",
            Self::Neuroticism => "N",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "O" => Some(Self::Openness),
            "C" => Some(Self::Conscientiousness),
            "E" => Some(Self::Extraversion),
            "A" => Some(Self::Agreeableness),
            "N" => Some(Self::Neuroticism),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Openness => "Openness",
            Self::Conscientiousness => "Conscientiousness",
            Self::Extraversion => "Extraversion",
            Self::Agreeableness => "Agreeableness",
            Self::Neuroticism => "Neuroticism",
        }
    }
}

impl fmt::Display for TraitDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Big-Five trait vector, each dimension in [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TraitVector {
    #[serde(rename = "O")]
    pub openness: f64,
    #[serde(rename = "C")]
    pub conscientiousness: f64,
    #[serde(rename = "E")]
    pub extraversion: f64,
    #[serde(rename = "A")]
    pub agreeableness: f64,
    #[serde(rename = "N")]
    pub neuroticism: f64,
}

impl TraitVector {
    pub fn uniform(value: f64) -> Self {
        Self {
            openness: value,
            conscientiousness: value,
            extraversion: value,
            agreeableness: value,
            neuroticism: value,
        }
    }

    pub fn get(&self, dimension: TraitDimension) -> f64 {
        match dimension {
            TraitDimension::Openness => self.openness,
            TraitDimension::Conscientiousness => self.conscientiousness,
            TraitDimension::Extraversion => self.extraversion,
            TraitDimension::Agreeableness => self.agreeableness,
            TraitDimension::Neuroticism => self.neuroticism,
        }
    }

    pub fn get_mut(&mut self, dimension: TraitDimension) -> &mut f64 {
        match dimension {
            TraitDimension::Openness => &mut self.openness,
            TraitDimension::Conscientiousness => &mut self.conscientiousness,
            TraitDimension::Extraversion => &mut self.extraversion,
            TraitDimension::Agreeableness => &mut self.agreeableness,
            TraitDimension::Neuroticism => &mut self.neuroticism,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TraitDimension, f64)> + '_ {
        TraitDimension::ALL
            .into_iter()
            .map(move |dimension| (dimension, self.get(dimension)))
    }
}

impl Default for TraitVector {
    fn default() -> Self {
        Self::uniform(TRAIT_MIDPOINT)
    }
}

/// Per-dimension certainty. Shrinks as evidence arrives; informational only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceBands {
    #[serde(rename = "O")]
    pub openness: f64,
    #[serde(rename = "C")]
    pub conscientiousness: f64,
    #[serde(rename = "E")]
    pub extraversion: f64,
    #[serde(rename = "A")]
    pub agreeableness: f64,
    #[serde(rename = "N")]
    pub neuroticism: f64,
}

impl ConfidenceBands {
    pub fn uniform(value: f64) -> Self {
        Self {
            openness: value,
            conscientiousness: value,
            extraversion: value,
            agreeableness: value,
            neuroticism: value,
        }
    }

    pub fn get(&self, dimension: TraitDimension) -> f64 {
        match dimension {
            TraitDimension::Openness => self.openness,
            TraitDimension::Conscientiousness => self.conscientiousness,
            TraitDimension::Extraversion => self.extraversion,
            TraitDimension::Agreeableness => self.agreeableness,
            TraitDimension::Neuroticism => self.neuroticism,
        }
    }

    pub fn get_mut(&mut self, dimension: TraitDimension) -> &mut f64 {
        match dimension {
            TraitDimension::Openness => &mut self.openness,
            TraitDimension::Conscientiousness => &mut self.conscientiousness,
            TraitDimension::Extraversion => &mut self.extraversion,
            TraitDimension::Agreeableness => &mut self.agreeableness,
            TraitDimension::Neuroticism => &mut self.neuroticism,
        }
    }
}

/// Everything the trait engine owns, as persisted under `"personality"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityState {
    pub ocean: TraitVector,
    pub confidence: ConfidenceBands,
    pub stress: f64,
    #[serde(default)]
    pub trajectory_tags: TrajectoryCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MbtiProfile {
    pub code: String,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnneagramProfile {
    pub type_id: u8,
    pub name: String,
    pub description: String,
    /// Score of every type, index 0 holding type 1.
    pub scores: [f64; 9],
}

/// End-of-session personality digest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalitySummary {
    pub mbti: MbtiProfile,
    pub enneagram: EnneagramProfile,
    pub high_traits: Vec<TraitDimension>,
    pub low_traits: Vec<TraitDimension>,
    pub stress: f64,
    pub dominant_trajectories: Vec<String>,
}
