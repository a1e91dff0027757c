//! Session recording and reporting
//!
//! Consumers of the feed that capture what happened during one monitoring
//! session and summarize it afterwards.

pub mod recorder;
pub mod report;

pub use recorder::{SessionError, SessionRecord, SessionRecorder, SessionStatus, SessionType};
pub use report::{recommendations_for, Assessment, SessionReport, SessionSummary};
