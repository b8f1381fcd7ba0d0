pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::SessionReport;

/// Status of the parent interview record, owned by the scheduling side of
/// the application but transitioned by this engine.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Upcoming,
    Completed,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Upcoming => "upcoming",
            InterviewStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upcoming" => Some(InterviewStatus::Upcoming),
            "completed" => Some(InterviewStatus::Completed),
            _ => None,
        }
    }
}

/// The interview record as the engine sees it: status plus the
/// back-reference to the session report that completed it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Interview {
    pub id: String,
    pub candidate_id: String,
    pub status: InterviewStatus,
    pub session_id: Option<String>,
}

/// Document-store boundary for completed sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create the session report and transition the interview to
    /// `completed` with a back-reference to it, as one logical
    /// transaction: both writes land or neither does. Returns the id of
    /// the new report.
    async fn complete_session(&self, interview_id: &str, report: &SessionReport) -> Result<String>;

    async fn get_interview(&self, interview_id: &str) -> Result<Interview>;

    async fn get_report(&self, report_id: &str) -> Result<SessionReport>;
}
