//! Deterministic personality and life-progression engines.
//!
//! [`TraitEngine`] owns the OCEAN vector and everything derived from it.
//! [`LifeSimEngine`] owns the scenario catalogue, age and history, and borrows
//! a `TraitEngine` per call to apply outcomes. Randomness is injected through
//! [`RandomSource`] so runs can be replayed.

pub mod assessment;
pub mod error;
pub mod life_sim;
pub mod random;
pub mod trait_engine;
pub mod typology;

pub use assessment::Assessment;
pub use error::{LoadFailure, SimError};
pub use life_sim::{tags_match, LifeSimEngine, WeightedCandidate};
pub use random::{RandomSource, ScriptedRandom};
pub use trait_engine::TraitEngine;
