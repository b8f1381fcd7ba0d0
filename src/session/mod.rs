pub mod engine;
pub mod report;

pub use engine::{InterviewSession, SubmitOutcome};
pub use report::{build_report, CategorySummary, EmotionalSummary, SessionReport};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capture::EmotionSample;
use crate::grading::Grade;

/// Explicit session state machine. A session never returns to `Waiting`
/// once left, and `Completed` is terminal.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Waiting,
    InProgress,
    Completed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Waiting => "waiting",
            SessionPhase::InProgress => "inProgress",
            SessionPhase::Completed => "completed",
        }
    }
}

/// One captured answer, unscored. Immutable after creation; owned by the
/// in-progress session until grading.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawResponse {
    pub question: String,
    pub category: String,
    pub difficulty: String,
    pub answer: String,
    pub emotion: EmotionSample,
    pub answered_at: DateTime<Utc>,
}

/// A raw response with its reference answer, score and letter grade
/// attached. Never mutated after grading.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GradedResponse {
    #[serde(flatten)]
    pub response: RawResponse,
    pub reference_answer: String,
    pub score: u8,
    pub grade: Grade,
}
