use chrono::Utc;
use log::{error, info};
use rand::Rng;

use super::{build_report, GradedResponse, RawResponse, SessionPhase, SessionReport};
use crate::bank::{select_session_questions, Question, QuestionBank};
use crate::capture::EmotionSample;
use crate::error::{EngineError, Result};
use crate::grading::Grader;
use crate::store::SessionStore;

/// Outcome of a successful answer submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Advanced to the next question.
    NextQuestion,
    /// The last question was answered; the session is ready to complete.
    AllAnswered,
}

/// One end-to-end interview attempt, from question selection to report
/// persistence. Drives the `Waiting -> InProgress -> Completed` state
/// machine; there is no path back to `Waiting`, and only a successful
/// persisted completion reaches `Completed`.
pub struct InterviewSession {
    interview_id: String,
    candidate_id: String,
    category: String,
    phase: SessionPhase,
    questions: Vec<Question>,
    responses: Vec<RawResponse>,
    current_index: usize,
}

impl InterviewSession {
    pub fn new(interview_id: impl Into<String>, candidate_id: impl Into<String>) -> Self {
        Self {
            interview_id: interview_id.into(),
            candidate_id: candidate_id.into(),
            category: String::new(),
            phase: SessionPhase::Waiting,
            questions: Vec::new(),
            responses: Vec::new(),
            current_index: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn interview_id(&self) -> &str {
        &self.interview_id
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question currently being answered, if the session is running and
    /// questions remain.
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        self.questions.get(self.current_index)
    }

    fn expect_phase(&self, expected: SessionPhase) -> Result<()> {
        if self.phase != expected {
            return Err(EngineError::InvalidPhase {
                expected: expected.as_str(),
                found: self.phase.as_str(),
            });
        }
        Ok(())
    }

    /// Leave the waiting area: sample the question set and start the run.
    /// `NoQuestionsAvailable` blocks the transition and the session stays
    /// in `Waiting`, so the caller can change filters and retry.
    pub fn begin<R: Rng>(
        &mut self,
        bank: &QuestionBank,
        category: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<()> {
        self.expect_phase(SessionPhase::Waiting)?;

        let questions = select_session_questions(bank, category, count, rng)?;

        info!(
            "🎬 Interview session started for interview {} ({} questions, category '{}')",
            self.interview_id,
            questions.len(),
            category
        );

        self.category = category.to_string();
        self.questions = questions;
        self.responses.clear();
        self.current_index = 0;
        self.phase = SessionPhase::InProgress;
        Ok(())
    }

    /// Record the finalized transcript for the current question, stamped
    /// with the latest emotion sample. An empty or whitespace-only
    /// transcript is rejected without recording anything and without
    /// advancing, so the candidate can retry the same question.
    pub fn submit_answer(
        &mut self,
        transcript: &str,
        emotion: EmotionSample,
    ) -> Result<SubmitOutcome> {
        self.expect_phase(SessionPhase::InProgress)?;

        let answer = transcript.trim();
        if answer.is_empty() {
            return Err(EngineError::NoAnswerCaptured);
        }

        let question = self
            .questions
            .get(self.current_index)
            .ok_or(EngineError::InvalidPhase {
                expected: "inProgress",
                found: "allAnswered",
            })?;

        self.responses.push(RawResponse {
            question: question.text.clone(),
            category: question.category.clone(),
            difficulty: question.difficulty.clone(),
            answer: answer.to_string(),
            emotion,
            answered_at: Utc::now(),
        });
        self.current_index += 1;

        info!(
            "Answer recorded for question {}/{}",
            self.current_index,
            self.questions.len()
        );

        if self.current_index < self.questions.len() {
            Ok(SubmitOutcome::NextQuestion)
        } else {
            Ok(SubmitOutcome::AllAnswered)
        }
    }

    /// Grade every response, build the report, and persist it together with
    /// the interview status transition. Per-answer grading runs
    /// concurrently; results are joined in question order. On a persistence
    /// failure the session stays `InProgress` and `complete` may be retried.
    pub async fn complete(
        &mut self,
        grader: &dyn Grader,
        store: &dyn SessionStore,
    ) -> Result<SessionReport> {
        self.expect_phase(SessionPhase::InProgress)?;
        if self.responses.len() != self.questions.len() {
            return Err(EngineError::InvalidPhase {
                expected: "allAnswered",
                found: "inProgress",
            });
        }

        let graded = self.grade_all(grader).await?;
        let report = build_report(
            &self.interview_id,
            &self.candidate_id,
            &self.category,
            graded,
            Utc::now(),
        );

        match store.complete_session(&self.interview_id, &report).await {
            Ok(report_id) => {
                self.phase = SessionPhase::Completed;
                info!(
                    "✅ Interview session saved as report {} (total score {})",
                    report_id, report.total_score_percent
                );
                Ok(report)
            }
            Err(e) => {
                error!("Failed to save interview session: {}", e);
                Err(e)
            }
        }
    }

    async fn grade_all(&self, grader: &dyn Grader) -> Result<Vec<GradedResponse>> {
        let grading = self.responses.iter().zip(&self.questions).map(|(response, question)| {
            async move {
                let scored = grader.grade(&response.answer, &question.reference_answer).await?;
                Ok(GradedResponse {
                    response: response.clone(),
                    reference_answer: question.reference_answer.clone(),
                    score: scored.score,
                    grade: scored.grade,
                })
            }
        });
        // join preserves question order regardless of completion order
        futures::future::try_join_all(grading).await
    }
}
