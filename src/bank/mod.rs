pub mod sampler;

pub use sampler::select_session_questions;

use std::io::Read;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One interview question, immutable once loaded from the bank.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Question {
    pub text: String,
    pub reference_answer: String,
    pub category: String,
    pub difficulty: String,
}

/// Row shape of the question bank CSV: `Question,Answer,Category,Difficulty`.
#[derive(Deserialize)]
struct BankRow {
    #[serde(rename = "Question", default)]
    question: String,
    #[serde(rename = "Answer", default)]
    answer: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Difficulty", default)]
    difficulty: String,
}

impl BankRow {
    fn is_blank(&self) -> bool {
        self.question.trim().is_empty()
            && self.answer.trim().is_empty()
            && self.category.trim().is_empty()
            && self.difficulty.trim().is_empty()
    }
}

/// The full question bank for one session. Loaded fresh at session start,
/// never cached across sessions.
#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Parse the bank from any CSV source. Blank rows are skipped silently;
    /// malformed rows are collected and reported as one batch error, in
    /// which case no bank is returned at all.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut questions = Vec::new();
        let mut row_errors = Vec::new();

        for (index, record) in csv_reader.deserialize::<BankRow>().enumerate() {
            match record {
                Ok(row) if row.is_blank() => continue,
                Ok(row) => questions.push(Question {
                    text: row.question,
                    reference_answer: row.answer,
                    category: row.category,
                    difficulty: row.difficulty,
                }),
                // Row numbers are 1-based and exclude the header line.
                Err(e) => row_errors.push(format!("row {}: {}", index + 1, e)),
            }
        }

        if !row_errors.is_empty() {
            return Err(EngineError::BankLoad(row_errors.join(", ")));
        }

        info!("Loaded {} interview questions", questions.len());

        Ok(Self { questions })
    }

    pub fn from_csv_str(csv: &str) -> Result<Self> {
        Self::from_csv_reader(csv.as_bytes())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Distinct categories present in the bank, in first-seen order. Used to
    /// populate the topic selector in the waiting area.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for q in &self.questions {
            let cat = q.category.trim();
            if cat.is_empty() {
                continue;
            }
            if !seen.iter().any(|c: &String| c.eq_ignore_ascii_case(cat)) {
                seen.push(cat.to_string());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_CSV: &str = "\
Question,Answer,Category,Difficulty
What is Rust?,A systems programming language,Technical,Easy
Tell me about a conflict,I resolved it by talking,Behavioral,Medium
";

    #[test]
    fn loads_well_formed_rows() {
        let bank = QuestionBank::from_csv_str(GOOD_CSV).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.questions()[0].text, "What is Rust?");
        assert_eq!(bank.questions()[0].reference_answer, "A systems programming language");
        assert_eq!(bank.questions()[1].category, "Behavioral");
    }

    #[test]
    fn skips_blank_rows_silently() {
        let csv = "\
Question,Answer,Category,Difficulty
What is Rust?,A language,Technical,Easy
,,,
Tell me about testing,Write tests first,Technical,Medium
";
        let bank = QuestionBank::from_csv_str(csv).unwrap();
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn malformed_rows_become_one_batch_error() {
        let csv = "\
Question,Answer,Category,Difficulty
What is Rust?,A language,Technical,Easy
\"unterminated,quote,Technical,Easy
";
        let err = QuestionBank::from_csv_str(csv).unwrap_err();
        match err {
            EngineError::BankLoad(msg) => assert!(msg.contains("row")),
            other => panic!("expected BankLoad, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_yields_empty_bank() {
        let bank = QuestionBank::from_csv_str("Question,Answer,Category,Difficulty\n").unwrap();
        assert!(bank.is_empty());
    }

    #[test]
    fn categories_are_distinct_and_case_insensitive() {
        let csv = "\
Question,Answer,Category,Difficulty
Q1,A1,Technical,Easy
Q2,A2,technical,Easy
Q3,A3,Behavioral,Easy
Q4,A4,,Easy
";
        let bank = QuestionBank::from_csv_str(csv).unwrap();
        assert_eq!(bank.categories(), vec!["Technical", "Behavioral"]);
    }
}
