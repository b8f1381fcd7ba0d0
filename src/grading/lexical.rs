use async_trait::async_trait;
use strsim::sorensen_dice;

use super::{Grader, Scored};
use crate::error::Result;

/// Bigram Dice-coefficient grading over lowercased, trimmed strings.
/// Deterministic and provider-free; the sole strategy in lexical mode and
/// the per-answer fallback in embedding mode.
pub struct LexicalGrader;

impl LexicalGrader {
    pub fn similarity(answer: &str, reference: &str) -> f64 {
        sorensen_dice(
            &answer.trim().to_lowercase(),
            &reference.trim().to_lowercase(),
        )
    }
}

#[async_trait]
impl Grader for LexicalGrader {
    async fn grade(&self, answer: &str, reference: &str) -> Result<Scored> {
        Ok(Scored::from_similarity(Self::similarity(answer, reference)))
    }
}
