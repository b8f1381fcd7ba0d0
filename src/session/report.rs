use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GradedResponse;

const UNCATEGORIZED: &str = "Uncategorized";
const UNKNOWN_MOOD: &str = "Unknown";

/// Per-category score rollup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CategorySummary {
    pub average_score: f64,
    pub count: usize,
}

/// Anxiety average and mood histogram across the whole session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct EmotionalSummary {
    pub average_anxiety: f64,
    pub mood_counts: BTreeMap<String, usize>,
}

/// The completed-session record. Computed once, written once; treated as
/// append-only history and never mutated afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub interview_id: String,
    pub candidate_id: String,
    pub category: String,
    pub question_count: usize,
    pub responses: Vec<GradedResponse>,
    pub completed_at: DateTime<Utc>,
    pub category_summary: BTreeMap<String, CategorySummary>,
    pub emotional_summary: EmotionalSummary,
    pub total_score_percent: f64,
}

/// Merge graded responses into the session report.
pub fn build_report(
    interview_id: &str,
    candidate_id: &str,
    category: &str,
    responses: Vec<GradedResponse>,
    completed_at: DateTime<Utc>,
) -> SessionReport {
    SessionReport {
        interview_id: interview_id.to_string(),
        candidate_id: candidate_id.to_string(),
        category: category.to_string(),
        question_count: responses.len(),
        category_summary: category_summary(&responses),
        emotional_summary: emotional_summary(&responses),
        total_score_percent: total_score_percent(&responses),
        responses,
        completed_at,
    }
}

fn category_summary(responses: &[GradedResponse]) -> BTreeMap<String, CategorySummary> {
    let mut sums: BTreeMap<String, (u32, usize)> = BTreeMap::new();
    for graded in responses {
        let cat = match graded.response.category.trim() {
            "" => UNCATEGORIZED,
            cat => cat,
        };
        let entry = sums.entry(cat.to_string()).or_insert((0, 0));
        entry.0 += graded.score as u32;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(cat, (sum, count))| {
            (
                cat,
                CategorySummary {
                    average_score: sum as f64 / count as f64,
                    count,
                },
            )
        })
        .collect()
}

fn emotional_summary(responses: &[GradedResponse]) -> EmotionalSummary {
    let mut summary = EmotionalSummary::default();
    if responses.is_empty() {
        return summary;
    }

    let mut anxiety_sum = 0u32;
    for graded in responses {
        anxiety_sum += graded.response.emotion.anxiety_score as u32;
        let mood = match graded.response.emotion.mood.trim() {
            "" => UNKNOWN_MOOD,
            mood => mood,
        };
        *summary.mood_counts.entry(mood.to_string()).or_insert(0) += 1;
    }
    summary.average_anxiety = anxiety_sum as f64 / responses.len() as f64;
    summary
}

fn total_score_percent(responses: &[GradedResponse]) -> f64 {
    let sum: u32 = responses.iter().map(|g| g.score as u32).sum();
    let mean = sum as f64 / responses.len().max(1) as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::EmotionSample;
    use crate::grading::Grade;
    use crate::session::RawResponse;

    fn graded(category: &str, score: u8, mood: &str, anxiety: u8) -> GradedResponse {
        GradedResponse {
            response: RawResponse {
                question: "Q".to_string(),
                category: category.to_string(),
                difficulty: "Easy".to_string(),
                answer: "A".to_string(),
                emotion: EmotionSample {
                    mood: mood.to_string(),
                    anxiety_score: anxiety,
                },
                answered_at: Utc::now(),
            },
            reference_answer: "A".to_string(),
            score,
            grade: Grade::from_score(score),
        }
    }

    #[test]
    fn category_summary_averages_per_category() {
        let responses = vec![
            graded("X", 90, "happy", 2),
            graded("X", 50, "neutral", 4),
            graded("X", 10, "sad", 6),
        ];
        let report = build_report("iv-1", "cand-1", "X", responses, Utc::now());

        let summary = &report.category_summary["X"];
        assert_eq!(summary.average_score, 50.0);
        assert_eq!(summary.count, 3);
        assert_eq!(report.total_score_percent, 50.0);
    }

    #[test]
    fn mixed_categories_are_grouped() {
        let responses = vec![
            graded("Technical", 80, "neutral", 1),
            graded("Behavioral", 40, "neutral", 3),
            graded("Technical", 60, "neutral", 5),
        ];
        let report = build_report("iv-1", "cand-1", "All", responses, Utc::now());

        assert_eq!(report.category_summary["Technical"].average_score, 70.0);
        assert_eq!(report.category_summary["Technical"].count, 2);
        assert_eq!(report.category_summary["Behavioral"].count, 1);
        assert_eq!(report.total_score_percent, 60.0);
    }

    #[test]
    fn missing_category_and_mood_use_defaults() {
        let responses = vec![graded("", 70, "", 3)];
        let report = build_report("iv-1", "cand-1", "All", responses, Utc::now());

        assert!(report.category_summary.contains_key("Uncategorized"));
        assert_eq!(report.emotional_summary.mood_counts["Unknown"], 1);
    }

    #[test]
    fn emotional_summary_averages_anxiety_and_counts_moods() {
        let responses = vec![
            graded("X", 50, "happy", 2),
            graded("X", 50, "happy", 4),
            graded("X", 50, "fearful", 9),
        ];
        let report = build_report("iv-1", "cand-1", "X", responses, Utc::now());

        assert_eq!(report.emotional_summary.average_anxiety, 5.0);
        assert_eq!(report.emotional_summary.mood_counts["happy"], 2);
        assert_eq!(report.emotional_summary.mood_counts["fearful"], 1);
    }

    #[test]
    fn empty_session_aggregates_to_zero() {
        let report = build_report("iv-1", "cand-1", "All", vec![], Utc::now());
        assert_eq!(report.question_count, 0);
        assert_eq!(report.total_score_percent, 0.0);
        assert_eq!(report.emotional_summary.average_anxiety, 0.0);
        assert!(report.category_summary.is_empty());
    }

    #[test]
    fn total_score_rounds_to_one_decimal() {
        let responses = vec![graded("X", 85, "neutral", 0), graded("X", 90, "neutral", 0)];
        let report = build_report("iv-1", "cand-1", "X", responses, Utc::now());
        assert_eq!(report.total_score_percent, 87.5);
    }
}
