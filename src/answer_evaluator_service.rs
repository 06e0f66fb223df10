use crate::database::analytics::TimeStatisticsRepository;
use crate::spaced_repetition::ResponseTimeStats;
use rusqlite::Connection;
use std::collections::HashMap;

/// Looks up historical response times used to grade correct answers
pub struct AnswerEvaluatorService<'a> {
    conn: &'a Connection,
}

impl<'a> AnswerEvaluatorService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Response-time stats for one category
    ///
    /// Falls back to 3.0s average and 2.0s deviation when the category has
    /// no history or the lookup fails.
    pub fn stats_for(&self, category: &str) -> ResponseTimeStats {
        TimeStatisticsRepository::new(self.conn)
            .for_category(category)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Stats for each category that has history; missing categories use the fallback
    pub fn all_stats(&self) -> HashMap<String, ResponseTimeStats> {
        TimeStatisticsRepository::new(self.conn)
            .all_categories()
            .map(|stats| stats.into_iter().collect())
            .unwrap_or_default()
    }
}
