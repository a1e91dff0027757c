//! Property-based tests for generator and classifier invariants.

use neuroalert_core::acquisition::HistoryBuffer;
use neuroalert_core::classification::{
    classify_with_draw, decide, StateTransitionModel, TransitionWeights,
};
use neuroalert_core::hal::simulation::{EegSignalGenerator, SimulationConfig};
use neuroalert_core::hal::{BandPowers, EegSample, PhysiologicalState, PredictionLabel};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn state_strategy() -> impl Strategy<Value = PhysiologicalState> {
    prop::sample::select(PhysiologicalState::ALL.to_vec())
}

fn band_strategy() -> impl Strategy<Value = BandPowers> {
    (
        -50.0f64..150.0,
        -50.0f64..150.0,
        -50.0f64..150.0,
        -50.0f64..150.0,
        -50.0f64..150.0,
    )
        .prop_map(|(a, b, t, d, g)| BandPowers::new(a, b, t, d, g))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn generated_bands_are_non_negative_with_mean_composite(
        state in state_strategy(),
        timestamp in 0u64..4_000_000_000_000,
        seed in any::<u64>(),
        noise in 0.0f64..10.0,
    ) {
        let mut config = SimulationConfig::default();
        config.noise_amplitude = noise;
        let generator = EegSignalGenerator::new(&config);
        let mut rng = StdRng::seed_from_u64(seed);

        let sample = generator.generate_sample(state, timestamp, &mut rng);

        prop_assert_eq!(sample.timestamp(), timestamp);
        for value in sample.bands().as_array() {
            prop_assert!(value >= 0.0, "negative band {}", value);
        }
        prop_assert!((sample.composite() - sample.bands().mean()).abs() < 1e-9);
    }

    #[test]
    fn sample_construction_clamps_arbitrary_bands(bands in band_strategy()) {
        let sample = EegSample::from_bands(1, bands);

        for value in sample.bands().as_array() {
            prop_assert!(value >= 0.0);
        }
        let expected = bands.clamped_non_negative().mean();
        prop_assert!((sample.composite() - expected).abs() < 1e-9);
    }

    #[test]
    fn confidence_stays_within_branch_range(
        state in state_strategy(),
        bands in band_strategy(),
        draw in 0.0f64..=1.0,
    ) {
        let sample = EegSample::from_bands(42, bands);
        let decision = decide(state, &sample);
        let prediction = classify_with_draw(state, &sample, draw, 42);

        let (low, high) = decision.confidence_range;
        prop_assert_eq!(prediction.label(), decision.label);
        prop_assert!(prediction.confidence() >= low - 1e-12);
        prop_assert!(prediction.confidence() <= high.min(0.99) + 1e-12);
        prop_assert_eq!(prediction.explanation(), decision.explanation);
        prop_assert_eq!(prediction.timestamp(), 42);
    }

    #[test]
    fn label_depends_on_sample_only_under_stress(
        state in state_strategy(),
        bands in band_strategy(),
    ) {
        let sample = EegSample::from_bands(0, bands);
        let label = decide(state, &sample).label;

        let expected = match state {
            PhysiologicalState::Normal => PredictionLabel::Normal,
            PhysiologicalState::Stress if sample.beta() > 20.0 && sample.gamma() > 35.0 => {
                PredictionLabel::MildAnomaly
            }
            PhysiologicalState::Stress => PredictionLabel::Normal,
            PhysiologicalState::Fatigue => PredictionLabel::CognitiveFatigue,
            PhysiologicalState::Anomaly => PredictionLabel::EarlyRisk,
        };
        prop_assert_eq!(label, expected);
    }

    #[test]
    fn transition_thresholds_partition_unit_interval(r in 0.0f64..1.0) {
        let model = StateTransitionModel::new(&TransitionWeights::default());
        let expected = if r < 0.70 {
            PhysiologicalState::Normal
        } else if r < 0.85 {
            PhysiologicalState::Stress
        } else if r < 0.95 {
            PhysiologicalState::Fatigue
        } else {
            PhysiologicalState::Anomaly
        };
        prop_assert_eq!(model.next_state(r), expected);
    }

    #[test]
    fn history_keeps_most_recent_entries(
        capacity in 1usize..64,
        pushes in 0usize..256,
    ) {
        let mut buffer = HistoryBuffer::new(capacity).unwrap();
        for i in 0..pushes {
            buffer.push(i);
        }

        prop_assert_eq!(buffer.len(), pushes.min(capacity));
        let start = pushes.saturating_sub(capacity);
        prop_assert_eq!(buffer.snapshot(), (start..pushes).collect::<Vec<_>>());
    }
}
