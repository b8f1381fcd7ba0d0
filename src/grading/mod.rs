pub mod embedding;
pub mod fallback;
pub mod lexical;

pub use embedding::{EmbeddingGrader, EmbeddingProvider, OpenAiEmbeddings};
pub use fallback::FallbackGrader;
pub use lexical::LexicalGrader;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{GradingConfig, GradingMode};
use crate::error::Result;

/// Letter grade with fixed, inclusive lower-bound thresholds.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Grade::A,
            60..=79 => Grade::B,
            40..=59 => Grade::C,
            _ => Grade::F,
        }
    }
}

/// Result of grading one answer against its reference answer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Scored {
    pub score: u8,
    pub grade: Grade,
}

impl Scored {
    /// Map a similarity in (nominally) [0, 1] onto a 0-100 score. Clamped
    /// defensively, since cosine similarity can go negative.
    pub fn from_similarity(similarity: f64) -> Self {
        let score = (similarity * 100.0).round().clamp(0.0, 100.0) as u8;
        Self {
            score,
            grade: Grade::from_score(score),
        }
    }
}

/// A grading strategy. Each call is a pure function of one
/// (answer, reference) pair, so a response set may be graded concurrently.
#[async_trait]
pub trait Grader: Send + Sync {
    async fn grade(&self, answer: &str, reference: &str) -> Result<Scored>;
}

/// Build the grader for a session from its grading configuration.
///
/// Lexical mode (including embedding mode without an API key) grades
/// locally; embedding mode wraps the provider-backed grader so a provider
/// failure on one answer falls back to lexical for that answer only.
pub fn grader_for(config: &GradingConfig) -> Arc<dyn Grader> {
    match config.effective_mode() {
        GradingMode::Lexical => Arc::new(LexicalGrader),
        GradingMode::Embedding => {
            // effective_mode() guarantees the key is present here.
            let api_key = config.api_key.clone().unwrap_or_default();
            let provider = Arc::new(OpenAiEmbeddings::new(api_key));
            Arc::new(FallbackGrader::new(
                EmbeddingGrader::new(provider),
                LexicalGrader,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_thresholds_are_inclusive_lower_bounds() {
        let cases = [
            (0, Grade::F),
            (39, Grade::F),
            (40, Grade::C),
            (59, Grade::C),
            (60, Grade::B),
            (79, Grade::B),
            (80, Grade::A),
            (100, Grade::A),
        ];
        for (score, expected) in cases {
            assert_eq!(Grade::from_score(score), expected, "score {score}");
        }
    }

    #[test]
    fn negative_similarity_clamps_to_zero() {
        let scored = Scored::from_similarity(-0.8);
        assert_eq!(scored.score, 0);
        assert_eq!(scored.grade, Grade::F);
    }

    #[test]
    fn perfect_similarity_is_one_hundred() {
        let scored = Scored::from_similarity(1.0);
        assert_eq!(scored.score, 100);
        assert_eq!(scored.grade, Grade::A);
    }

    #[test]
    fn lexical_config_builds_a_grader() {
        let config = GradingConfig::default();
        // Smoke check that the factory wires up without a provider.
        let _grader = grader_for(&config);
    }
}
