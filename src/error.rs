use thiserror::Error;

/// Engine-level error taxonomy.
///
/// Only `NoQuestionsAvailable` and `Persistence` block a session from the
/// candidate's perspective. Everything else is recovered locally by the
/// component that hits it.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No questions available for the selected category")]
    NoQuestionsAvailable,

    #[error("No answer captured. Please try again.")]
    NoAnswerCaptured,

    #[error("Speech recognition error: {0}")]
    Recognition(String),

    #[error("Emotion detection error: {0}")]
    EmotionDetection(String),

    #[error("Grading provider error: {0}")]
    GradingProvider(String),

    #[error("Failed to save interview session: {0}")]
    Persistence(String),

    #[error("Question bank load failed: {0}")]
    BankLoad(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid session phase: expected {expected}, found {found}")]
    InvalidPhase {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
