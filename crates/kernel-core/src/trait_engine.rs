//! Personality state: the OCEAN vector, confidence bands, stress and the
//! trajectory tags accumulated from choices.

use contracts::personality::{STRESS_MAX, STRESS_MIN, TRAIT_MAX, TRAIT_MIN, TRAIT_MIDPOINT};
use contracts::{
    Choice, ConfidenceBands, EnneagramProfile, MbtiProfile, PersonalityState, PersonalitySummary,
    TraitDimension, TraitEngineConfig, TraitVector, TrajectoryCounts, WeightMap,
};
use tracing::trace;

use crate::typology;

/// Returned for choices that carry no trait weights at all.
pub const NEUTRAL_PROBABILITY: f64 = 0.5;
pub const PROBABILITY_FLOOR: f64 = 10.0;
pub const PROBABILITY_CEILING: f64 = 90.0;

const WEIGHT_SCALE: f64 = 20.0;
const RELIEF_PULL: f64 = 0.2;
const DESTABILIZING_PUSH: f64 = 0.15;
const DESTABILIZING_STRESS_DELTA: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct TraitEngine {
    config: TraitEngineConfig,
    ocean: TraitVector,
    confidence: ConfidenceBands,
    stress: f64,
    trajectory_tags: TrajectoryCounts,
}

impl Default for TraitEngine {
    fn default() -> Self {
        Self::new(TraitEngineConfig::default())
    }
}

impl TraitEngine {
    pub fn new(config: TraitEngineConfig) -> Self {
        Self {
            ocean: TraitVector::uniform(config.initial_trait.clamp(TRAIT_MIN, TRAIT_MAX)),
            confidence: ConfidenceBands::uniform(config.initial_confidence),
            stress: config.initial_stress.clamp(STRESS_MIN, STRESS_MAX),
            trajectory_tags: TrajectoryCounts::new(),
            config,
        }
    }

    pub fn config(&self) -> &TraitEngineConfig {
        &self.config
    }

    pub fn reset(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
    }

    pub fn ocean(&self) -> &TraitVector {
        &self.ocean
    }

    pub fn confidence(&self) -> &ConfidenceBands {
        &self.confidence
    }

    pub fn stress(&self) -> f64 {
        self.stress
    }

    pub fn trajectory_counts(&self) -> &TrajectoryCounts {
        &self.trajectory_tags
    }

    /// Adds each recognized delta and narrows that dimension's confidence.
    /// Keys other than `O`, `C`, `E`, `A`, `N` are skipped.
    pub fn apply_weights(&mut self, weights: &WeightMap) {
        for (key, delta) in weights {
            let Some(dimension) = TraitDimension::from_key(key) else {
                trace!(key = key.as_str(), "ignoring unrecognized trait weight");
                continue;
            };
            let value = self.ocean.get_mut(dimension);
            *value = (*value + delta).clamp(TRAIT_MIN, TRAIT_MAX);

            let band = self.confidence.get_mut(dimension);
            *band = (*band - self.config.confidence_step).max(self.config.confidence_floor);
        }
    }

    pub fn apply_stress(&mut self, delta: f64) {
        self.stress = (self.stress + delta).clamp(STRESS_MIN, STRESS_MAX);
    }

    pub fn add_trajectory_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            *self
                .trajectory_tags
                .entry(tag.as_ref().to_string())
                .or_insert(0) += 1;
        }
    }

    /// Highest-count tags first; equal counts keep first-observed order.
    pub fn dominant_trajectories(&self, count: usize) -> Vec<String> {
        let mut ranked = self.trajectory_tags.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        ranked
            .into_iter()
            .take(count)
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    pub fn derive_mbti(&self) -> String {
        typology::mbti_code(&self.ocean)
    }

    pub fn mbti_profile(&self) -> MbtiProfile {
        typology::mbti_profile_for(&self.derive_mbti())
    }

    pub fn derive_enneagram(&self) -> u8 {
        typology::enneagram_type(&typology::enneagram_scores(&self.ocean))
    }

    pub fn enneagram_profile(&self) -> EnneagramProfile {
        typology::enneagram_profile(&self.ocean)
    }

    /// How likely this personality is to pick `choice`, on a 10–90 scale.
    ///
    /// Weightless choices return [`NEUTRAL_PROBABILITY`] unclamped.
    pub fn calculate_choice_probability(&self, choice: &Choice) -> f64 {
        let Some(weights) = choice.ocean_weights.as_ref() else {
            return NEUTRAL_PROBABILITY;
        };

        let mut alignment = TRAIT_MIDPOINT;
        for (key, weight) in weights {
            let Some(dimension) = TraitDimension::from_key(key) else {
                continue;
            };
            let value = self.ocean.get(dimension);
            if *weight > 0.0 {
                alignment += (value - TRAIT_MIDPOINT) * (weight / WEIGHT_SCALE);
            } else if *weight < 0.0 {
                alignment += (TRAIT_MIDPOINT - value) * (weight.abs() / WEIGHT_SCALE);
            }
        }

        if let Some(stress_delta) = choice.stress_delta {
            if stress_delta < 0.0 {
                alignment += self.stress * RELIEF_PULL;
            } else if stress_delta > DESTABILIZING_STRESS_DELTA {
                alignment -= self.stress * DESTABILIZING_PUSH;
            }
        }

        alignment.clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING)
    }

    pub fn high_traits(&self) -> Vec<TraitDimension> {
        self.ocean
            .iter()
            .filter(|(_, value)| *value >= self.config.high_trait_threshold)
            .map(|(dimension, _)| dimension)
            .collect()
    }

    pub fn low_traits(&self) -> Vec<TraitDimension> {
        self.ocean
            .iter()
            .filter(|(_, value)| *value <= self.config.low_trait_threshold)
            .map(|(dimension, _)| dimension)
            .collect()
    }

    pub fn generate_summary(&self) -> PersonalitySummary {
        PersonalitySummary {
            mbti: self.mbti_profile(),
            enneagram: self.enneagram_profile(),
            high_traits: self.high_traits(),
            low_traits: self.low_traits(),
            stress: self.stress,
            dominant_trajectories: self
                .dominant_trajectories(self.config.summary_trajectory_count),
        }
    }

    pub fn state(&self) -> PersonalityState {
        PersonalityState {
            ocean: self.ocean,
            confidence: self.confidence,
            stress: self.stress,
            trajectory_tags: self.trajectory_tags.clone(),
        }
    }

    /// Restores a snapshot. Values are clamped back into range; the shape is
    /// taken as-is.
    pub fn restore_state(&mut self, state: PersonalityState) {
        let PersonalityState {
            mut ocean,
            mut confidence,
            stress,
            trajectory_tags,
        } = state;
        for dimension in TraitDimension::ALL {
            let value = ocean.get_mut(dimension);
            *value = value.clamp(TRAIT_MIN, TRAIT_MAX);
            let band = confidence.get_mut(dimension);
            *band = band.clamp(self.config.confidence_floor, TRAIT_MAX);
        }
        self.ocean = ocean;
        self.confidence = confidence;
        self.stress = stress.clamp(STRESS_MIN, STRESS_MAX);
        self.trajectory_tags = trajectory_tags;
    }
}
