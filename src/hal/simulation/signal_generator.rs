//! EEG band signal generation for the synthetic feed
//! Location: src/hal/simulation/signal_generator.rs

use super::config::SimulationConfig;
use super::profiles::ProfileTable;
use crate::hal::types::{BandPowers, EegBand, EegSample, PhysiologicalState};
use rand::Rng;

/// Produces one five-band sample per call, shaped by the hidden state.
///
/// Each band is `base + sin(t / time_scale) * amplitude + noise`, so
/// consecutive samples are correlated through the sinusoid while the noise
/// term keeps every sample stochastic.
#[derive(Debug, Clone)]
pub struct EegSignalGenerator {
    profiles: ProfileTable,
    noise_amplitude: f64,
}

impl EegSignalGenerator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_profiles(ProfileTable::default(), config.noise_amplitude)
    }

    pub fn with_profiles(profiles: ProfileTable, noise_amplitude: f64) -> Self {
        Self {
            profiles,
            noise_amplitude: noise_amplitude.max(0.0),
        }
    }

    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    pub fn noise_amplitude(&self) -> f64 {
        self.noise_amplitude
    }

    pub fn generate_sample<R: Rng + ?Sized>(
        &self,
        state: PhysiologicalState,
        timestamp: u64,
        rng: &mut R,
    ) -> EegSample {
        let profile = self.profiles.get(state);
        let mut bands = BandPowers::default();

        for band in EegBand::ALL {
            let value = profile.oscillation(band).evaluate(timestamp) + self.noise(rng);
            bands.set(band, value);
        }

        EegSample::from_bands(timestamp, bands)
    }

    /// Uniform noise in `[-noise_amplitude / 2, noise_amplitude / 2)`
    fn noise<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        (rng.gen::<f64>() - 0.5) * self.noise_amplitude
    }
}
