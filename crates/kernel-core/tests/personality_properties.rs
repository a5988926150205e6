use contracts::{Choice, TraitDimension, WeightMap};
use kernel_core::TraitEngine;
use proptest::prelude::*;

fn weight_map() -> impl Strategy<Value = WeightMap> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["O", "C", "E", "A", "N", "X", "openness"]),
            -250.0_f64..250.0,
        ),
        0..7,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    })
}

fn weighted_choice(weights: WeightMap, stress_delta: Option<f64>) -> Choice {
    Choice {
        id: "probe".to_string(),
        title: "Probe".to_string(),
        description: String::new(),
        outcome: String::new(),
        ocean_weights: Some(weights),
        stress_delta,
        trajectory_tags: Vec::new(),
    }
}

proptest! {
    #[test]
    fn traits_and_confidence_stay_in_range(maps in prop::collection::vec(weight_map(), 1..40)) {
        let mut engine = TraitEngine::default();
        let mut previous = *engine.confidence();
        for map in &maps {
            engine.apply_weights(map);
            for dimension in TraitDimension::ALL {
                let value = engine.ocean().get(dimension);
                prop_assert!((0.0..=100.0).contains(&value));
                let band = engine.confidence().get(dimension);
                prop_assert!((5.0..=100.0).contains(&band));
                prop_assert!(band <= previous.get(dimension));
            }
            previous = *engine.confidence();
        }
    }

    #[test]
    fn stress_stays_in_range(deltas in prop::collection::vec(-300.0_f64..300.0, 1..40)) {
        let mut engine = TraitEngine::default();
        for delta in deltas {
            engine.apply_stress(delta);
            prop_assert!((0.0..=100.0).contains(&engine.stress()));
        }
    }

    #[test]
    fn choice_probability_is_bounded(
        shaping in weight_map(),
        stress in -100.0_f64..100.0,
        probe in weight_map(),
        stress_delta in prop::option::of(-50.0_f64..50.0),
    ) {
        let mut engine = TraitEngine::default();
        engine.apply_weights(&shaping);
        engine.apply_stress(stress);
        let probability =
            engine.calculate_choice_probability(&weighted_choice(probe, stress_delta));
        prop_assert!((10.0..=90.0).contains(&probability));
    }

    #[test]
    fn typology_is_a_pure_function_of_the_vector(shaping in weight_map()) {
        let mut first = TraitEngine::default();
        first.apply_weights(&shaping);
        let mut second = TraitEngine::default();
        second.restore_state(first.state());

        prop_assert_eq!(first.derive_mbti(), second.derive_mbti());
        prop_assert_eq!(first.derive_enneagram(), second.derive_enneagram());
        prop_assert_eq!(first.derive_mbti().len(), 4);
        prop_assert!((1..=9).contains(&first.derive_enneagram()));
    }

    #[test]
    fn state_round_trip_through_json(
        shaping in weight_map(),
        stress in -40.0_f64..40.0,
        tags in prop::collection::vec("[a-z]{1,6}", 0..8),
    ) {
        let mut engine = TraitEngine::default();
        engine.apply_weights(&shaping);
        engine.apply_stress(stress);
        engine.add_trajectory_tags(&tags);

        let encoded = serde_json::to_string(&engine.state()).expect("serialize");
        let mut restored = TraitEngine::default();
        restored.restore_state(serde_json::from_str(&encoded).expect("deserialize"));

        prop_assert_eq!(restored.state(), engine.state());
        prop_assert_eq!(restored.dominant_trajectories(3), engine.dominant_trajectories(3));
    }
}

#[test]
fn midpoint_vector_reads_as_enfj() {
    assert_eq!(TraitEngine::default().derive_mbti(), "ENFJ");
}

#[test]
fn threshold_rule_example() {
    let mut engine = TraitEngine::default();
    let shaping: WeightMap = [("O", 10.0), ("C", -10.0), ("E", 20.0), ("A", -20.0)]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    engine.apply_weights(&shaping);
    // O=60, C=40, E=70, A=30, N=50: conscientiousness below 50 reads as P.
    assert_eq!(engine.derive_mbti(), "ENTP");
}
