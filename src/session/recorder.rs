//! Session recording on top of an [`EegFeed`]
//!
//! The recorder subscribes to both streams once, keeps rolling windows while
//! a session is active, and drives the feed through the session lifecycle:
//! start, pause, resume, complete or terminate.

use crate::acquisition::{HistoryBuffer, HistoryBufferError};
use crate::config::SessionConfig;
use crate::hal::{EegFeed, EegSample, ListenerId, Prediction};
use crate::utils::time::{SystemTimeProvider, TimeProvider};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::interval;
use tracing::{debug, info};

/// Kind of session being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Diagnostic,
    Monitoring,
    Screening,
}

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
    Terminated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Active => "active",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
            SessionStatus::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Session recorder errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No session in progress")]
    NoSession,

    #[error("Session {id} is already {status}")]
    AlreadyInProgress { id: String, status: SessionStatus },

    #[error("Cannot {action} a session that is {status}")]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },

    #[error("Session buffer error: {0}")]
    Buffer(#[from] HistoryBufferError),

    #[error("Feed error: {0}")]
    Feed(#[source] Box<dyn Error + Send + Sync>),
}

/// Everything captured for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub patient_id: String,
    pub session_type: SessionType,
    pub status: SessionStatus,
    /// Milliseconds since the Unix epoch
    pub start_time: u64,
    pub end_time: Option<u64>,
    /// Seconds spent active; paused time is excluded
    pub duration_secs: u64,
    pub samples: Vec<EegSample>,
    pub predictions: Vec<Prediction>,
}

struct ActiveSession {
    id: String,
    patient_id: String,
    session_type: SessionType,
    status: SessionStatus,
    start_time: u64,
    active_since: Option<u64>,
    accumulated_ms: u64,
    samples: HistoryBuffer<EegSample>,
    predictions: HistoryBuffer<Prediction>,
}

impl ActiveSession {
    fn active_ms(&self, now: u64) -> u64 {
        let running = self.active_since.map_or(0, |since| now.saturating_sub(since));
        self.accumulated_ms + running
    }

    fn record(&self, now: u64) -> SessionRecord {
        SessionRecord {
            id: self.id.clone(),
            patient_id: self.patient_id.clone(),
            session_type: self.session_type,
            status: self.status,
            start_time: self.start_time,
            end_time: None,
            duration_secs: self.active_ms(now) / 1000,
            samples: self.samples.snapshot(),
            predictions: self.predictions.snapshot(),
        }
    }
}

#[derive(Default)]
struct RecorderState {
    session: Option<ActiveSession>,
}

/// Records rolling windows of a feed for one session at a time
pub struct SessionRecorder<F: EegFeed + 'static> {
    feed: Arc<F>,
    config: SessionConfig,
    time_provider: Arc<dyn TimeProvider>,
    state: Arc<Mutex<RecorderState>>,
    sample_listener: ListenerId,
    prediction_listener: ListenerId,
}

impl<F: EegFeed + 'static> SessionRecorder<F> {
    pub fn new(feed: Arc<F>, config: SessionConfig) -> Self {
        Self::with_time_provider(feed, config, Arc::new(SystemTimeProvider))
    }

    pub fn with_time_provider(
        feed: Arc<F>,
        config: SessionConfig,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        let state = Arc::new(Mutex::new(RecorderState::default()));

        let sink = Arc::clone(&state);
        let sample_listener = feed.on_data(Arc::new(move |sample: &EegSample| {
            if let Some(session) = sink.lock().session.as_mut() {
                if session.status == SessionStatus::Active {
                    session.samples.push(*sample);
                }
            }
        }));

        let sink = Arc::clone(&state);
        let prediction_listener = feed.on_prediction(Arc::new(move |prediction: &Prediction| {
            if let Some(session) = sink.lock().session.as_mut() {
                if session.status == SessionStatus::Active {
                    session.predictions.push(prediction.clone());
                }
            }
        }));

        Self {
            feed,
            config,
            time_provider,
            state,
            sample_listener,
            prediction_listener,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Open a new session and start the feed; returns the session id
    pub fn start(&self, patient_id: impl Into<String>, session_type: SessionType) -> Result<String, SessionError> {
        let now = self.time_provider.now_millis();
        let id = {
            let mut state = self.state.lock();
            if let Some(current) = &state.session {
                return Err(SessionError::AlreadyInProgress {
                    id: current.id.clone(),
                    status: current.status,
                });
            }

            let id = format!("session_{now}");
            state.session = Some(ActiveSession {
                id: id.clone(),
                patient_id: patient_id.into(),
                session_type,
                status: SessionStatus::Active,
                start_time: now,
                active_since: Some(now),
                accumulated_ms: 0,
                samples: HistoryBuffer::new(self.config.sample_window)?,
                predictions: HistoryBuffer::new(self.config.prediction_window)?,
            });
            id
        };

        if let Err(e) = self.feed.start() {
            self.state.lock().session = None;
            return Err(SessionError::Feed(Box::new(e)));
        }

        info!(session_id = %id, ?session_type, "session started");
        Ok(id)
    }

    /// Open a session for the configured default patient
    pub fn start_default(&self, session_type: SessionType) -> Result<String, SessionError> {
        let patient_id = self.config.default_patient_id.clone();
        self.start(patient_id, session_type)
    }

    pub fn pause(&self) -> Result<(), SessionError> {
        let now = self.time_provider.now_millis();
        {
            let mut state = self.state.lock();
            let session = state.session.as_mut().ok_or(SessionError::NoSession)?;
            if session.status != SessionStatus::Active {
                return Err(SessionError::InvalidTransition {
                    action: "pause",
                    status: session.status,
                });
            }
            session.accumulated_ms = session.active_ms(now);
            session.active_since = None;
            session.status = SessionStatus::Paused;
        }
        self.feed.stop();
        info!("session paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<(), SessionError> {
        let now = self.time_provider.now_millis();
        {
            let mut state = self.state.lock();
            let session = state.session.as_mut().ok_or(SessionError::NoSession)?;
            if session.status != SessionStatus::Paused {
                return Err(SessionError::InvalidTransition {
                    action: "resume",
                    status: session.status,
                });
            }
            session.active_since = Some(now);
            session.status = SessionStatus::Active;
        }

        if let Err(e) = self.feed.start() {
            if let Some(session) = self.state.lock().session.as_mut() {
                session.active_since = None;
                session.status = SessionStatus::Paused;
            }
            return Err(SessionError::Feed(Box::new(e)));
        }
        info!("session resumed");
        Ok(())
    }

    /// Stop the feed and hand back the finished session.
    ///
    /// The feed is stopped even when there is no session and `NoSession` is
    /// returned, so other consumers of a shared feed stop receiving data too.
    pub fn complete(&self) -> Result<SessionRecord, SessionError> {
        self.feed.stop();
        let now = self.time_provider.now_millis();
        let session = self.state.lock().session.take().ok_or(SessionError::NoSession)?;

        let mut record = session.record(now);
        record.status = SessionStatus::Completed;
        record.end_time = Some(now);

        info!(
            session_id = %record.id,
            duration_secs = record.duration_secs,
            predictions = record.predictions.len(),
            "session completed"
        );
        Ok(record)
    }

    /// Stop the feed and discard the session.
    ///
    /// Like [`complete`](Self::complete), the feed is stopped whether or not a
    /// session exists.
    pub fn terminate(&self) -> Result<(), SessionError> {
        self.feed.stop();
        let session = self.state.lock().session.take().ok_or(SessionError::NoSession)?;
        info!(session_id = %session.id, status = %SessionStatus::Terminated, "session terminated");
        Ok(())
    }

    pub fn status(&self) -> Option<SessionStatus> {
        self.state.lock().session.as_ref().map(|s| s.status)
    }

    /// Copy of the session in progress
    pub fn snapshot(&self) -> Option<SessionRecord> {
        let now = self.time_provider.now_millis();
        self.state.lock().session.as_ref().map(|s| s.record(now))
    }

    /// Active seconds of the current session, zero when idle
    pub fn elapsed_secs(&self) -> u64 {
        let now = self.time_provider.now_millis();
        self.state
            .lock()
            .session
            .as_ref()
            .map_or(0, |s| s.active_ms(now) / 1000)
    }

    /// Fraction of the target duration elapsed, capped at 1.0
    pub fn progress(&self) -> f64 {
        let target = self.config.target_duration_secs.max(1) as f64;
        (self.elapsed_secs() as f64 / target).min(1.0)
    }

    /// Whether the current session has reached its target duration
    pub fn is_due(&self) -> bool {
        self.status().is_some() && self.elapsed_secs() >= self.config.target_duration_secs
    }
}

impl<F: EegFeed + 'static> SessionRecorder<F> {
    /// Complete the session on its own once the target duration is reached.
    ///
    /// Checks every `poll`; paused time does not count towards the target.
    /// Returns `NoSession` if the session is completed or terminated elsewhere
    /// while waiting.
    pub async fn complete_when_due(&self, poll: Duration) -> Result<SessionRecord, SessionError> {
        let mut ticker = interval(poll.max(Duration::from_millis(1)));
        loop {
            ticker.tick().await;
            if self.status().is_none() {
                return Err(SessionError::NoSession);
            }
            if self.is_due() {
                debug!(target_secs = self.config.target_duration_secs, "target duration reached");
                return self.complete();
            }
        }
    }
}

impl<F: EegFeed + 'static> Drop for SessionRecorder<F> {
    fn drop(&mut self) {
        self.feed.remove_data_listener(self.sample_listener);
        self.feed.remove_prediction_listener(self.prediction_listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::simulation::SimulationConfig;
    use crate::hal::EegSimulator;
    use crate::utils::time::MockTimeProvider;

    const T0: u64 = 1_700_000_000_000;

    fn recorder(config: SessionConfig) -> (SessionRecorder<EegSimulator>, Arc<EegSimulator>, Arc<MockTimeProvider>) {
        let clock = Arc::new(MockTimeProvider::new(T0));
        let simulator = Arc::new(
            EegSimulator::with_time_provider(SimulationConfig::seeded(21), clock.clone()).unwrap(),
        );
        let recorder = SessionRecorder::with_time_provider(Arc::clone(&simulator), config, clock.clone());
        (recorder, simulator, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_transitions() {
        let (recorder, simulator, clock) = recorder(SessionConfig::default());

        let id = recorder.start("patient_42", SessionType::Diagnostic).unwrap();
        assert_eq!(id, format!("session_{T0}"));
        assert!(simulator.is_active());
        assert!(matches!(
            recorder.start("patient_42", SessionType::Diagnostic),
            Err(SessionError::AlreadyInProgress { .. })
        ));

        clock.advance_by(10_000);
        recorder.pause().unwrap();
        assert!(!simulator.is_active());
        assert!(matches!(recorder.pause(), Err(SessionError::InvalidTransition { .. })));

        // paused time does not count
        clock.advance_by(60_000);
        assert_eq!(recorder.elapsed_secs(), 10);

        recorder.resume().unwrap();
        assert!(simulator.is_active());
        clock.advance_by(5_000);

        let record = recorder.complete().unwrap();
        assert_eq!(record.status, SessionStatus::Completed);
        assert_eq!(record.duration_secs, 15);
        assert_eq!(record.end_time, Some(T0 + 75_000));
        assert_eq!(record.patient_id, "patient_42");
        assert!(!simulator.is_active());
        assert!(recorder.status().is_none());
    }

    #[test]
    fn test_windows_are_bounded() {
        let config = SessionConfig {
            sample_window: 5,
            prediction_window: 2,
            ..SessionConfig::default()
        };
        let (recorder, simulator, _clock) = recorder(config);

        // no runtime here, so the feed cannot start; record by ticking by hand
        assert!(matches!(
            recorder.start_default(SessionType::Monitoring),
            Err(SessionError::Feed(_))
        ));
        assert!(recorder.status().is_none());

        recorder.state.lock().session = Some(ActiveSession {
            id: "manual".to_string(),
            patient_id: "p".to_string(),
            session_type: SessionType::Monitoring,
            status: SessionStatus::Active,
            start_time: T0,
            active_since: Some(T0),
            accumulated_ms: 0,
            samples: HistoryBuffer::new(5).unwrap(),
            predictions: HistoryBuffer::new(2).unwrap(),
        });

        for _ in 0..40 {
            simulator.tick();
        }

        let snapshot = recorder.snapshot().unwrap();
        assert_eq!(snapshot.samples.len(), 5);
        assert_eq!(snapshot.predictions.len(), 2);
    }

    #[test]
    fn test_operations_without_session() {
        let (recorder, _simulator, _clock) = recorder(SessionConfig::default());

        assert!(matches!(recorder.pause(), Err(SessionError::NoSession)));
        assert!(matches!(recorder.resume(), Err(SessionError::NoSession)));
        assert!(matches!(recorder.complete(), Err(SessionError::NoSession)));
        assert!(matches!(recorder.terminate(), Err(SessionError::NoSession)));
        assert_eq!(recorder.progress(), 0.0);
        assert!(!recorder.is_due());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ending_without_session_still_stops_feed() {
        let (recorder, simulator, _clock) = recorder(SessionConfig::default());

        simulator.start().unwrap();
        assert!(matches!(recorder.complete(), Err(SessionError::NoSession)));
        assert!(!simulator.is_active());

        simulator.start().unwrap();
        assert!(matches!(recorder.terminate(), Err(SessionError::NoSession)));
        assert!(!simulator.is_active());
    }

    #[test]
    fn test_failed_resume_stays_paused() {
        let (recorder, _simulator, clock) = recorder(SessionConfig::default());

        recorder.state.lock().session = Some(ActiveSession {
            id: "manual".to_string(),
            patient_id: "p".to_string(),
            session_type: SessionType::Monitoring,
            status: SessionStatus::Paused,
            start_time: T0,
            active_since: None,
            accumulated_ms: 4_000,
            samples: HistoryBuffer::new(5).unwrap(),
            predictions: HistoryBuffer::new(2).unwrap(),
        });

        // no runtime, so the feed refuses to start
        assert!(matches!(recorder.resume(), Err(SessionError::Feed(_))));
        assert_eq!(recorder.status(), Some(SessionStatus::Paused));

        clock.advance_by(60_000);
        assert_eq!(recorder.elapsed_secs(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_when_due() {
        let config = SessionConfig {
            target_duration_secs: 2,
            ..SessionConfig::default()
        };
        let (recorder, simulator, clock) = recorder(config);
        recorder.start("p", SessionType::Screening).unwrap();

        let advance = async {
            tokio::time::sleep(Duration::from_millis(1_200)).await;
            clock.advance_by(1_000);
            tokio::time::sleep(Duration::from_millis(1_200)).await;
            clock.advance_by(1_000);
        };
        let (record, ()) = tokio::join!(recorder.complete_when_due(Duration::from_millis(500)), advance);

        let record = record.unwrap();
        assert_eq!(record.status, SessionStatus::Completed);
        assert_eq!(record.duration_secs, 2);
        assert!(recorder.status().is_none());
        assert!(!simulator.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_when_due_ends_on_terminate() {
        let (recorder, _simulator, _clock) = recorder(SessionConfig::default());
        recorder.start("p", SessionType::Screening).unwrap();

        let terminate = async {
            tokio::time::sleep(Duration::from_millis(700)).await;
            recorder.terminate().unwrap();
        };
        let (result, ()) = tokio::join!(recorder.complete_when_due(Duration::from_millis(500)), terminate);

        assert!(matches!(result, Err(SessionError::NoSession)));
    }

    #[test]
    fn test_drop_detaches_listeners() {
        let (recorder, simulator, _clock) = recorder(SessionConfig::default());
        assert_eq!(simulator.status().sample_listeners, 1);
        assert_eq!(simulator.status().prediction_listeners, 1);

        drop(recorder);
        assert_eq!(simulator.status().sample_listeners, 0);
        assert_eq!(simulator.status().prediction_listeners, 0);
    }
}
