//! Timer-driven EEG simulator
//!
//! Owns the generator, the classifier, the bounded sample history and both
//! listener lists. One tokio task per running simulator calls [`EegSimulator::tick`]
//! on a fixed interval; the same method can be driven by hand for tests.

use crate::acquisition::{HistoryBuffer, HistoryBufferError};
use crate::classification::StateClassifier;
use crate::config::constants::simulation::DEFAULT_HISTORY_WINDOW_MINUTES;
use crate::hal::listeners::{ListenerId, ListenerRegistry, PredictionListener, SampleListener};
use crate::hal::simulation::{EegSignalGenerator, SimulationConfig};
use crate::hal::traits::EegFeed;
use crate::hal::types::{EegSample, PhysiologicalState, Prediction};
use crate::utils::time::{window_cutoff_millis, SystemTimeProvider, TimeProvider};
use crate::utils::validation::ValidationError;
use crossbeam::channel::{self, Receiver, TrySendError};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

/// Simulator errors
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Invalid simulation configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("History buffer error: {0}")]
    History(#[from] HistoryBufferError),

    #[error("No tokio runtime available to drive the tick timer")]
    NoRuntime,
}

/// Values produced by a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub sample: EegSample,
    /// Present on every cadence tick
    pub prediction: Option<Prediction>,
}

/// Point-in-time counters for a simulator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatorStatus {
    pub is_active: bool,
    pub ticks: u64,
    pub samples_generated: u64,
    pub predictions_issued: u64,
    pub listener_failures: u64,
    pub history_len: usize,
    pub sample_listeners: usize,
    pub prediction_listeners: usize,
}

/// Mutable feed state, touched only under one lock from the tick path
struct FeedState {
    generator: EegSignalGenerator,
    classifier: StateClassifier,
    rng: StdRng,
    ticks_since_prediction: u32,
    history: HistoryBuffer<EegSample>,
}

struct Shared {
    config: SimulationConfig,
    running: AtomicBool,
    feed: Mutex<FeedState>,
    sample_listeners: ListenerRegistry<EegSample>,
    prediction_listeners: ListenerRegistry<Prediction>,
    time_provider: Arc<dyn TimeProvider>,

    ticks: AtomicU64,
    predictions_issued: AtomicU64,
    listener_failures: AtomicU64,
}

impl Shared {
    fn tick(&self) -> TickOutcome {
        let sample = {
            let mut guard = self.feed.lock();
            let feed = &mut *guard;
            let now = self.time_provider.now_millis();
            let sample = feed
                .generator
                .generate_sample(feed.classifier.state(), now, &mut feed.rng);
            feed.history.push(sample);
            sample
        };
        self.ticks.fetch_add(1, Ordering::Relaxed);
        trace!(timestamp = sample.timestamp(), composite = sample.composite(), "sample generated");

        self.record_failures(self.sample_listeners.dispatch(&sample));

        let prediction = {
            let mut guard = self.feed.lock();
            let feed = &mut *guard;
            feed.ticks_since_prediction += 1;
            if feed.ticks_since_prediction >= self.config.prediction_cadence_ticks {
                feed.ticks_since_prediction = 0;
                let now = self.time_provider.now_millis();
                Some(feed.classifier.reroll_and_classify(&sample, now, &mut feed.rng))
            } else {
                None
            }
        };

        if let Some(prediction) = &prediction {
            self.predictions_issued.fetch_add(1, Ordering::Relaxed);
            debug!(
                label = %prediction.label(),
                confidence = prediction.confidence(),
                "prediction issued"
            );
            self.record_failures(self.prediction_listeners.dispatch(prediction));
        }

        TickOutcome { sample, prediction }
    }

    fn record_failures(&self, failures: usize) {
        if failures > 0 {
            self.listener_failures.fetch_add(failures as u64, Ordering::Relaxed);
        }
    }
}

/// Synthetic EEG feed with a classifier attached.
///
/// Construct one per simulated patient and share it through `Arc`; there is
/// no process-wide instance. Dropping the simulator cancels its timer.
pub struct EegSimulator {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EegSimulator {
    /// Create a simulator reading the system clock
    pub fn new(config: SimulationConfig) -> Result<Self, SimulatorError> {
        Self::with_time_provider(config, Arc::new(SystemTimeProvider))
    }

    /// Create a simulator with an injected clock
    pub fn with_time_provider(
        config: SimulationConfig,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<Self, SimulatorError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let feed = FeedState {
            generator: EegSignalGenerator::new(&config),
            classifier: StateClassifier::new(&config.transition_weights),
            rng,
            ticks_since_prediction: 0,
            history: HistoryBuffer::new(config.history_capacity)?,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                running: AtomicBool::new(false),
                feed: Mutex::new(feed),
                sample_listeners: ListenerRegistry::new("samples"),
                prediction_listeners: ListenerRegistry::new("predictions"),
                time_provider,
                ticks: AtomicU64::new(0),
                predictions_issued: AtomicU64::new(0),
                listener_failures: AtomicU64::new(0),
            }),
            task: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.shared.config
    }

    /// Start the periodic tick. Calling it while running is a no-op.
    ///
    /// Must be called from within a tokio runtime. The first tick fires one
    /// interval after the call.
    pub fn start(&self) -> Result<(), SimulatorError> {
        let mut task = self.task.lock();
        if self.shared.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|_| SimulatorError::NoRuntime)?;
        let period = self.shared.config.tick_interval();
        let shared = Arc::clone(&self.shared);

        self.shared.running.store(true, Ordering::SeqCst);
        *task = Some(runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                shared.tick();
            }
        }));

        info!(tick_interval_ms = self.shared.config.tick_interval_ms, "EEG simulator started");
        Ok(())
    }

    /// Cancel the periodic tick. Calling it while idle is a no-op.
    ///
    /// History is kept. A tick already dispatching to listeners finishes.
    pub fn stop(&self) {
        let mut task = self.task.lock();
        if !self.shared.running.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = task.take() {
            handle.abort();
        }
        info!(ticks = self.shared.ticks.load(Ordering::Relaxed), "EEG simulator stopped");
    }

    pub fn is_active(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Advance the feed by one tick now, independent of the timer
    pub fn tick(&self) -> TickOutcome {
        self.shared.tick()
    }

    /// Register a sample listener
    pub fn on_data<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&EegSample) + Send + Sync + 'static,
    {
        self.add_data_listener(Arc::new(listener))
    }

    pub fn add_data_listener(&self, listener: SampleListener) -> ListenerId {
        self.shared.sample_listeners.add(listener)
    }

    /// Returns whether the listener was registered
    pub fn remove_data_listener(&self, id: ListenerId) -> bool {
        self.shared.sample_listeners.remove(id)
    }

    /// Register a prediction listener
    pub fn on_prediction<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Prediction) + Send + Sync + 'static,
    {
        self.add_prediction_listener(Arc::new(listener))
    }

    pub fn add_prediction_listener(&self, listener: PredictionListener) -> ListenerId {
        self.shared.prediction_listeners.add(listener)
    }

    pub fn remove_prediction_listener(&self, id: ListenerId) -> bool {
        self.shared.prediction_listeners.remove(id)
    }

    /// Buffered samples with `timestamp >= now - window_minutes * 60000`, oldest first
    pub fn historical_data(&self, window_minutes: f64) -> Vec<EegSample> {
        let cutoff = window_cutoff_millis(self.shared.time_provider.now_millis(), window_minutes);
        self.shared
            .feed
            .lock()
            .history
            .snapshot_where(|sample| sample.timestamp() >= cutoff)
    }

    /// Buffered samples from the last five minutes
    pub fn recent_history(&self) -> Vec<EegSample> {
        self.historical_data(DEFAULT_HISTORY_WINDOW_MINUTES)
    }

    /// Hidden physiological state, for diagnostics only
    pub fn current_state(&self) -> PhysiologicalState {
        self.shared.feed.lock().classifier.state()
    }

    pub fn status(&self) -> SimulatorStatus {
        let history_len = self.shared.feed.lock().history.len();
        let ticks = self.shared.ticks.load(Ordering::Relaxed);
        SimulatorStatus {
            is_active: self.is_active(),
            ticks,
            samples_generated: ticks,
            predictions_issued: self.shared.predictions_issued.load(Ordering::Relaxed),
            listener_failures: self.shared.listener_failures.load(Ordering::Relaxed),
            history_len,
            sample_listeners: self.shared.sample_listeners.len(),
            prediction_listeners: self.shared.prediction_listeners.len(),
        }
    }

    /// Mirror the sample stream into a bounded channel.
    ///
    /// Samples are dropped when the channel is full. The listener is removed
    /// when the returned subscription is dropped.
    pub fn subscribe_samples(&self, capacity: usize) -> ChannelSubscription<EegSample> {
        let (sender, receiver) = channel::bounded(capacity.max(1));
        let id = self.on_data(move |sample: &EegSample| {
            if let Err(TrySendError::Full(_)) = sender.try_send(*sample) {
                trace!("sample channel full, dropping sample");
            }
        });
        ChannelSubscription {
            id,
            receiver,
            shared: Arc::downgrade(&self.shared),
            detach: |shared, id| shared.sample_listeners.remove(id),
        }
    }

    /// Mirror the prediction stream into a bounded channel
    pub fn subscribe_predictions(&self, capacity: usize) -> ChannelSubscription<Prediction> {
        let (sender, receiver) = channel::bounded(capacity.max(1));
        let id = self.on_prediction(move |prediction: &Prediction| {
            if let Err(TrySendError::Full(_)) = sender.try_send(prediction.clone()) {
                trace!("prediction channel full, dropping prediction");
            }
        });
        ChannelSubscription {
            id,
            receiver,
            shared: Arc::downgrade(&self.shared),
            detach: |shared, id| shared.prediction_listeners.remove(id),
        }
    }

    #[cfg(test)]
    pub(crate) fn force_state(&self, state: PhysiologicalState) {
        self.shared.feed.lock().classifier.force_state(state);
    }
}

impl Drop for EegSimulator {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}

impl EegFeed for EegSimulator {
    type Error = SimulatorError;

    fn start(&self) -> Result<(), Self::Error> {
        EegSimulator::start(self)
    }

    fn stop(&self) {
        EegSimulator::stop(self)
    }

    fn is_active(&self) -> bool {
        EegSimulator::is_active(self)
    }

    fn on_data(&self, listener: SampleListener) -> ListenerId {
        self.add_data_listener(listener)
    }

    fn remove_data_listener(&self, id: ListenerId) -> bool {
        EegSimulator::remove_data_listener(self, id)
    }

    fn on_prediction(&self, listener: PredictionListener) -> ListenerId {
        self.add_prediction_listener(listener)
    }

    fn remove_prediction_listener(&self, id: ListenerId) -> bool {
        EegSimulator::remove_prediction_listener(self, id)
    }

    fn historical_data(&self, window_minutes: f64) -> Vec<EegSample> {
        EegSimulator::historical_data(self, window_minutes)
    }
}

/// Channel-backed view of one stream; unsubscribes on drop
pub struct ChannelSubscription<T> {
    id: ListenerId,
    receiver: Receiver<T>,
    shared: Weak<Shared>,
    detach: fn(&Shared, ListenerId) -> bool,
}

impl<T> ChannelSubscription<T> {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn receiver(&self) -> &Receiver<T> {
        &self.receiver
    }
}

impl<T> Drop for ChannelSubscription<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            (self.detach)(&shared, self.id);
        }
    }
}
