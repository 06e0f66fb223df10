use crate::row_factories::SessionRecordRowFactory;
use crate::session_record::{SessionRecord, SessionStatus, SessionSummary};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, params};

const SELECT_COLUMNS: &str = "SELECT id, mode, created_at, completed_at, status, total_questions,
            correct_answers, incorrect_answers, total_time_seconds,
            average_time_seconds, accuracy_percentage, best_streak
     FROM sessions";

pub struct SessionsRepository<'a> {
    conn: &'a Connection,
    get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
}

impl<'a> SessionsRepository<'a> {
    pub fn new(
        conn: &'a Connection,
        get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
    ) -> Self {
        SessionsRepository {
            conn,
            get_current_time,
        }
    }

    pub fn create(&self, mode: &str) -> Result<i64> {
        let now_utc = (self.get_current_time)().to_rfc3339();
        self.conn.execute(
            "INSERT INTO sessions (mode, created_at, status) VALUES (?1, ?2, ?3)",
            params![mode, now_utc, SessionStatus::InProgress.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, session_id: i64) -> Result<Option<SessionRecord>> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                [session_id],
                SessionRecordRowFactory::from_row,
            )
            .optional()
    }

    pub fn update_summary(&self, session_id: i64, summary: &SessionSummary) -> Result<()> {
        self.conn.execute(
            "UPDATE sessions SET
                total_questions = ?1,
                correct_answers = ?2,
                incorrect_answers = ?3,
                total_time_seconds = ?4,
                average_time_seconds = ?5,
                accuracy_percentage = ?6,
                best_streak = ?7
             WHERE id = ?8",
            params![
                summary.total_questions,
                summary.correct_answers,
                summary.incorrect_answers,
                summary.total_time_seconds,
                summary.average_time_seconds,
                summary.accuracy_percentage,
                summary.best_streak,
                session_id
            ],
        )?;
        Ok(())
    }

    pub fn complete(&self, session_id: i64) -> Result<()> {
        let now_utc = (self.get_current_time)().to_rfc3339();
        self.conn.execute(
            "UPDATE sessions SET status = ?1, completed_at = ?2 WHERE id = ?3",
            params![SessionStatus::Completed.as_str(), now_utc, session_id],
        )?;
        Ok(())
    }

    pub fn abandon(&self, session_id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE sessions SET status = ?1 WHERE id = ?2",
            params![SessionStatus::Abandoned.as_str(), session_id],
        )?;
        Ok(())
    }

    pub fn get_recent(&self, limit: i32) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY created_at DESC, id DESC LIMIT ?1",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map([limit], SessionRecordRowFactory::from_row)?;

        let mut sessions = Vec::new();
        for session in rows {
            sessions.push(session?);
        }
        Ok(sessions)
    }

    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
    }
}
