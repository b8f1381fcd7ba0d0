use async_trait::async_trait;
use log::warn;

use super::{EmbeddingGrader, Grader, LexicalGrader, Scored};
use crate::error::Result;

/// Composite grader for embedding mode: try the embedding grader first and
/// recover a provider failure with lexical grading. The fallback applies to
/// the single failing answer only; other answers are unaffected.
pub struct FallbackGrader {
    primary: EmbeddingGrader,
    fallback: LexicalGrader,
}

impl FallbackGrader {
    pub fn new(primary: EmbeddingGrader, fallback: LexicalGrader) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl Grader for FallbackGrader {
    async fn grade(&self, answer: &str, reference: &str) -> Result<Scored> {
        match self.primary.grade(answer, reference).await {
            Ok(scored) => Ok(scored),
            Err(e) => {
                warn!("Embedding grading failed, falling back to lexical: {}", e);
                self.fallback.grade(answer, reference).await
            }
        }
    }
}
