use std::str::FromStr;

use async_trait::async_trait;
use deadpool_postgres::{Config, Pool, Runtime};
use log::{error, info};
use tokio_postgres::NoTls;
use uuid::Uuid;

use super::{Interview, InterviewStatus, SessionStore};
use crate::error::{EngineError, Result};
use crate::session::SessionReport;

/// Postgres-backed session store.
///
/// Expected schema (owned by the scheduling application):
///
/// ```sql
/// CREATE TABLE interviews (
///     id           UUID PRIMARY KEY,
///     candidate_id UUID NOT NULL,
///     status       TEXT NOT NULL,  -- 'upcoming' | 'completed'
///     session_id   UUID
/// );
/// CREATE TABLE interview_sessions (
///     id                  UUID PRIMARY KEY,
///     interview_id        UUID NOT NULL REFERENCES interviews (id),
///     candidate_id        UUID NOT NULL,
///     category            TEXT NOT NULL,
///     question_count      INT NOT NULL,
///     total_score_percent FLOAT8 NOT NULL,
///     completed_at        TIMESTAMPTZ NOT NULL,
///     report              JSONB NOT NULL
/// );
/// ```
#[derive(Debug)]
pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    /// Build the pool from `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER` and
    /// `DB_PASSWORD`, and verify a connection can be established.
    pub async fn connect() -> Result<Self> {
        let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = std::env::var("DB_PORT")
            .unwrap_or_else(|_| "5432".to_string())
            .parse()
            .unwrap_or(5432);
        let dbname = std::env::var("DB_NAME").unwrap_or_else(|_| "hireview_db".to_string());
        let user = std::env::var("DB_USER").unwrap_or_else(|_| "hireview_user".to_string());
        let password = std::env::var("DB_PASSWORD").unwrap_or_default();

        let database_url = format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, dbname);

        info!("Connecting to database: {}@{}:{}/{}", user, host, port, dbname);

        let mut cfg = Config::new();
        cfg.url = Some(database_url);
        cfg.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| EngineError::Persistence(format!("Pool creation failed: {}", e)))?;

        let _client = pool
            .get()
            .await
            .map_err(|e| EngineError::Persistence(format!("Connection test failed: {}", e)))?;

        info!("Database connection established");

        Ok(PostgresStore { pool })
    }

    fn parse_id(id: &str, what: &str) -> Result<Uuid> {
        Uuid::from_str(id)
            .map_err(|_| EngineError::Persistence(format!("Invalid {} ID format: {}", what, id)))
    }
}

#[async_trait]
impl SessionStore for PostgresStore {
    async fn complete_session(&self, interview_id: &str, report: &SessionReport) -> Result<String> {
        let interview_uuid = Self::parse_id(interview_id, "interview")?;
        let candidate_uuid = Self::parse_id(&report.candidate_id, "candidate")?;

        let mut client = self
            .pool
            .get()
            .await
            .map_err(|e| EngineError::Persistence(e.to_string()))?;

        let transaction = client
            .transaction()
            .await
            .map_err(|e| EngineError::Persistence(format!("Transaction error: {}", e)))?;

        let report_id = Uuid::new_v4();
        let report_json = serde_json::to_value(report)
            .map_err(|e| EngineError::Persistence(format!("Report serialization failed: {}", e)))?;

        transaction
            .execute(
                r#"
                INSERT INTO interview_sessions
                    (id, interview_id, candidate_id, category, question_count,
                     total_score_percent, completed_at, report)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
                &[
                    &report_id,
                    &interview_uuid,
                    &candidate_uuid,
                    &report.category,
                    &(report.question_count as i32),
                    &report.total_score_percent,
                    &report.completed_at,
                    &report_json,
                ],
            )
            .await
            .map_err(|e| {
                error!("Failed to insert session report: {}", e);
                EngineError::Persistence(format!("Failed to insert session report: {}", e))
            })?;

        let rows_affected = transaction
            .execute(
                r#"
                UPDATE interviews
                SET status = 'completed', session_id = $1
                WHERE id = $2 AND status = 'upcoming'
                "#,
                &[&report_id, &interview_uuid],
            )
            .await
            .map_err(|e| {
                error!("Failed to update interview {}: {}", interview_id, e);
                EngineError::Persistence(format!("Failed to update interview: {}", e))
            })?;

        if rows_affected != 1 {
            // Dropping the transaction rolls back the report insert.
            return Err(EngineError::Persistence(format!(
                "Interview {} is not in 'upcoming' status",
                interview_id
            )));
        }

        transaction
            .commit()
            .await
            .map_err(|e| EngineError::Persistence(format!("Commit failed: {}", e)))?;

        Ok(report_id.to_string())
    }

    async fn get_interview(&self, interview_id: &str) -> Result<Interview> {
        let interview_uuid = Self::parse_id(interview_id, "interview")?;

        let client = self
            .pool
            .get()
            .await
            .map_err(|e| EngineError::Persistence(e.to_string()))?;

        let row = client
            .query_one(
                "SELECT id, candidate_id, status, session_id FROM interviews WHERE id = $1",
                &[&interview_uuid],
            )
            .await
            .map_err(|_| EngineError::NotFound(format!("Interview {interview_id}")))?;

        let id: Uuid = row.get(0);
        let candidate_id: Uuid = row.get(1);
        let status: String = row.get(2);
        let session_id: Option<Uuid> = row.get(3);

        Ok(Interview {
            id: id.to_string(),
            candidate_id: candidate_id.to_string(),
            status: InterviewStatus::parse(&status).ok_or_else(|| {
                EngineError::Persistence(format!("Unknown interview status: {}", status))
            })?,
            session_id: session_id.map(|id| id.to_string()),
        })
    }

    async fn get_report(&self, report_id: &str) -> Result<SessionReport> {
        let report_uuid = Self::parse_id(report_id, "report")?;

        let client = self
            .pool
            .get()
            .await
            .map_err(|e| EngineError::Persistence(e.to_string()))?;

        let row = client
            .query_one(
                "SELECT report FROM interview_sessions WHERE id = $1",
                &[&report_uuid],
            )
            .await
            .map_err(|_| EngineError::NotFound(format!("Session report {report_id}")))?;

        let report_json: serde_json::Value = row.get(0);
        serde_json::from_value(report_json)
            .map_err(|e| EngineError::Persistence(format!("Report deserialization failed: {}", e)))
    }
}
