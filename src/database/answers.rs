use crate::session::AnswerOutcome;
use rusqlite::{Connection, OptionalExtension, Result, params};

#[derive(Debug, PartialEq)]
pub struct AnswerRecord {
    pub id: i64,
    pub session_id: Option<i64>,
    pub item_code: String,
    pub category: String,
    pub given_answer: String,
    pub is_correct: bool,
    pub is_retry: bool,
    pub time_spent_seconds: Option<f64>,
    pub ease_factor: f32,
    pub interval: u32,
}

pub struct AnswersRepository<'a> {
    conn: &'a Connection,
}

impl<'a> AnswersRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        AnswersRepository { conn }
    }

    pub fn insert(&self, session_id: Option<i64>, outcome: &AnswerOutcome) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO answers (session_id, item_code, category, given_answer, is_correct,
                                  is_retry, time_spent_seconds, ease_factor, interval)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                session_id,
                outcome.item_code,
                outcome.category,
                outcome.given_answer,
                outcome.was_correct,
                outcome.is_retry,
                outcome.elapsed_secs,
                outcome.new_ease_factor,
                outcome.new_interval
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, answer_id: i64) -> Result<Option<AnswerRecord>> {
        self.conn
            .query_row(
                "SELECT id, session_id, item_code, category, given_answer, is_correct,
                        is_retry, time_spent_seconds, ease_factor, interval
                 FROM answers WHERE id = ?1",
                [answer_id],
                |row| {
                    Ok(AnswerRecord {
                        id: row.get(0)?,
                        session_id: row.get(1)?,
                        item_code: row.get(2)?,
                        category: row.get(3)?,
                        given_answer: row.get(4)?,
                        is_correct: row.get(5)?,
                        is_retry: row.get(6)?,
                        time_spent_seconds: row.get(7)?,
                        ease_factor: row.get(8)?,
                        interval: row.get(9)?,
                    })
                },
            )
            .optional()
    }

    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM answers", [], |row| row.get(0))
    }

    pub fn count_for_session(&self, session_id: i64) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM answers WHERE session_id = ?1",
            [session_id],
            |row| row.get(0),
        )
    }
}
