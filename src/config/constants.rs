//! System-wide configuration constants
//!
//! Defaults and limits for the simulated feed, the classifier and the session
//! recorder. Configuration structs take their serde defaults from here.

/// Tick scheduling and history retention
pub mod simulation {
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;
    pub const MIN_TICK_INTERVAL_MS: u64 = 10;
    pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;

    pub const DEFAULT_PREDICTION_CADENCE_TICKS: u32 = 10;
    pub const MAX_PREDICTION_CADENCE_TICKS: u32 = 10_000;

    pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;
    pub const MAX_HISTORY_CAPACITY: usize = 1_000_000;

    /// Peak-to-peak width of the uniform noise added to every band
    pub const DEFAULT_NOISE_AMPLITUDE: f64 = 0.1;
    pub const MAX_NOISE_AMPLITUDE: f64 = 10.0;

    /// Default window for history queries, in minutes
    pub const DEFAULT_HISTORY_WINDOW_MINUTES: f64 = 5.0;
}

/// State re-roll probabilities
pub mod transitions {
    pub const NORMAL_WEIGHT: f64 = 0.70;
    pub const STRESS_WEIGHT: f64 = 0.15;
    pub const FATIGUE_WEIGHT: f64 = 0.10;
    pub const ANOMALY_WEIGHT: f64 = 0.05;

    pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;
}

/// Classifier thresholds and confidence ranges
pub mod classifier {
    /// Upper bound applied to every emitted confidence
    pub const CONFIDENCE_CEILING: f64 = 0.99;

    /// Beta power above which a stressed reading counts as anomalous
    pub const STRESS_BETA_THRESHOLD: f64 = 20.0;
    /// Gamma power above which a stressed reading counts as anomalous
    pub const STRESS_GAMMA_THRESHOLD: f64 = 35.0;

    pub const NORMAL_CONFIDENCE: (f64, f64) = (0.85, 0.98);
    pub const STRESS_ANOMALY_CONFIDENCE: (f64, f64) = (0.75, 0.95);
    pub const STRESS_NORMAL_CONFIDENCE: (f64, f64) = (0.65, 0.85);
    pub const FATIGUE_CONFIDENCE: (f64, f64) = (0.80, 0.95);
    pub const ANOMALY_CONFIDENCE: (f64, f64) = (0.70, 0.95);
}

/// Session recording defaults
pub mod session {
    pub const DEFAULT_SAMPLE_WINDOW: usize = 300;
    pub const DEFAULT_PREDICTION_WINDOW: usize = 50;
    pub const DEFAULT_TARGET_DURATION_SECS: u64 = 300;
    pub const MAX_TARGET_DURATION_SECS: u64 = 86_400;
    pub const DEFAULT_PATIENT_ID: &str = "patient_001";

    /// Bound for crossbeam channels handed out by the simulator
    pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
}

/// Configuration file locations and environment prefix
pub mod paths {
    pub const DEFAULT_CONFIG_FILE: &str = "neuroalert.toml";
    pub const ENV_PREFIX: &str = "NEUROALERT";
    pub const ENV_SEPARATOR: &str = "__";
}
