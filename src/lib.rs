//! HireView interview-session engine: question sampling, answer capture,
//! emotion sampling, grading and report persistence for one candidate
//! interview attempt.
//!
//! The surrounding application (scheduling, auth, UI) talks to this crate
//! through the provider traits at each boundary: `SpeechRecognizer`,
//! `ExpressionClassifier`, `EmbeddingProvider` and `SessionStore`.

pub mod bank;
pub mod capture;
pub mod config;
pub mod error;
pub mod grading;
pub mod session;
pub mod store;

pub use bank::{select_session_questions, Question, QuestionBank};
pub use capture::{
    listen_for_answer, EmotionMonitor, EmotionSample, ExpressionClassifier, ExpressionScores,
    FrameSource, SpeechEvent, SpeechRecognizer, StreamRecognizer, TranscriptAccumulator, VideoFrame,
};
pub use config::{GradingConfig, GradingMode};
pub use error::{EngineError, Result};
pub use grading::{
    grader_for, EmbeddingGrader, EmbeddingProvider, FallbackGrader, Grade, Grader, LexicalGrader,
    OpenAiEmbeddings, Scored,
};
pub use session::{
    build_report, CategorySummary, EmotionalSummary, GradedResponse, InterviewSession, RawResponse,
    SessionPhase, SessionReport, SubmitOutcome,
};
pub use store::{Interview, InterviewStatus, MemoryStore, PostgresStore, SessionStore};
