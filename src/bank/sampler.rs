use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{Question, QuestionBank};
use crate::error::{EngineError, Result};

/// Category filter value that keeps the whole bank.
pub const ALL_CATEGORIES: &str = "All";

/// Select and randomly order the questions for one session.
///
/// Filters the bank case-insensitively by `category` (`"All"` keeps every
/// row), shuffles the filtered pool uniformly, and takes the first
/// `min(count, pool_len)` questions. An empty pool or a zero count means
/// there is nothing to ask and the session must not start.
pub fn select_session_questions<R: Rng>(
    bank: &QuestionBank,
    category: &str,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>> {
    let mut pool: Vec<Question> = bank
        .questions()
        .iter()
        .filter(|q| {
            category.eq_ignore_ascii_case(ALL_CATEGORIES)
                || q.category.eq_ignore_ascii_case(category)
        })
        .cloned()
        .collect();

    if pool.is_empty() || count == 0 {
        return Err(EngineError::NoQuestionsAvailable);
    }

    pool.shuffle(rng);
    pool.truncate(count);

    info!(
        "Selected {} questions for category '{}'",
        pool.len(),
        category
    );

    Ok(pool)
}
