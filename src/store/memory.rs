use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use super::{Interview, InterviewStatus, SessionStore};
use crate::error::{EngineError, Result};
use crate::session::SessionReport;

#[derive(Default)]
struct Inner {
    interviews: HashMap<String, Interview>,
    reports: HashMap<String, SessionReport>,
    fail_next_commit: bool,
}

/// In-memory session store used by the demo runner and tests. Commits are
/// all-or-nothing: a failure injected between the two writes rolls the
/// first one back, so no partial state is ever observable.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_interview(&self, interview: Interview) {
        self.inner.lock().interviews.insert(interview.id.clone(), interview);
    }

    pub fn seed_upcoming_interview(&self, interview_id: &str, candidate_id: &str) {
        self.seed_interview(Interview {
            id: interview_id.to_string(),
            candidate_id: candidate_id.to_string(),
            status: InterviewStatus::Upcoming,
            session_id: None,
        });
    }

    /// Make the next commit fail after its first write, simulating a
    /// mid-transaction persistence failure.
    pub fn fail_next_commit(&self) {
        self.inner.lock().fail_next_commit = true;
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn complete_session(&self, interview_id: &str, report: &SessionReport) -> Result<String> {
        let mut inner = self.inner.lock();

        if !inner.interviews.contains_key(interview_id) {
            return Err(EngineError::NotFound(format!("Interview {interview_id}")));
        }

        // First write: the report document.
        let report_id = Uuid::new_v4().to_string();
        inner.reports.insert(report_id.clone(), report.clone());

        // Second write: the interview status transition.
        if inner.fail_next_commit {
            inner.fail_next_commit = false;
            inner.reports.remove(&report_id);
            return Err(EngineError::Persistence(
                "interview status update failed".to_string(),
            ));
        }

        let interview = inner
            .interviews
            .get_mut(interview_id)
            .expect("checked above");
        interview.status = InterviewStatus::Completed;
        interview.session_id = Some(report_id.clone());

        Ok(report_id)
    }

    async fn get_interview(&self, interview_id: &str) -> Result<Interview> {
        self.inner
            .lock()
            .interviews
            .get(interview_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("Interview {interview_id}")))
    }

    async fn get_report(&self, report_id: &str) -> Result<SessionReport> {
        self.inner
            .lock()
            .reports
            .get(report_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("Session report {report_id}")))
    }
}
