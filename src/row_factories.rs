use crate::session_record::{SessionRecord, SessionStatus};
use crate::spaced_repetition::ReviewCard;
use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

fn parse_timestamp(index: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Factory for creating SessionRecord objects from database rows
pub struct SessionRecordRowFactory;

impl SessionRecordRowFactory {
    /// Expected columns: id, mode, created_at, completed_at, status, total_questions,
    ///                   correct_answers, incorrect_answers, total_time_seconds,
    ///                   average_time_seconds, accuracy_percentage, best_streak
    pub fn from_row(row: &Row) -> rusqlite::Result<SessionRecord> {
        let created_at = parse_timestamp(2, &row.get::<_, String>(2)?)?;
        let completed_at = match row.get::<_, Option<String>>(3)? {
            Some(value) => Some(parse_timestamp(3, &value)?),
            None => None,
        };

        Ok(SessionRecord {
            id: row.get(0)?,
            mode: row.get(1)?,
            created_at,
            completed_at,
            status: SessionStatus::from(&row.get::<_, String>(4)?)
                .unwrap_or(SessionStatus::InProgress),
            total_questions: row.get(5)?,
            correct_answers: row.get(6)?,
            incorrect_answers: row.get(7)?,
            total_time_seconds: row.get(8)?,
            average_time_seconds: row.get(9)?,
            accuracy_percentage: row.get(10)?,
            best_streak: row.get(11)?,
        })
    }
}

/// Factory for creating review cards from database rows
pub struct ReviewCardRowFactory;

impl ReviewCardRowFactory {
    /// Expected columns: item_code, ease_factor, interval, repetitions,
    ///                   next_review_date, lapses, last_reviewed_date
    pub fn from_row(row: &Row) -> rusqlite::Result<(String, ReviewCard)> {
        Ok((
            row.get(0)?,
            ReviewCard {
                ease_factor: row.get(1)?,
                interval: row.get(2)?,
                repetitions: row.get(3)?,
                next_review_date: row.get(4)?,
                lapses: row.get(5)?,
                last_reviewed_date: row.get(6)?,
            },
        ))
    }
}
