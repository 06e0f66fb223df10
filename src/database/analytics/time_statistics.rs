use crate::spaced_repetition::ResponseTimeStats;
use rusqlite::Connection;
use rusqlite::Result;
use std::collections::BTreeMap;

const TIME_AGGREGATES: &str = "COUNT(a.time_spent_seconds) as count,
                AVG(a.time_spent_seconds) as average,
                SUM(a.time_spent_seconds * a.time_spent_seconds) as sum_squares,
                SUM(a.time_spent_seconds) as total_sum";

const CORRECT_FIRST_ATTEMPTS: &str = "FROM answers a
            INNER JOIN sessions s ON a.session_id = s.id
            WHERE a.is_correct = 1
            AND a.is_retry = 0
            AND a.time_spent_seconds IS NOT NULL
            AND s.status = 'completed'";

pub struct TimeStatisticsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> TimeStatisticsRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        TimeStatisticsRepository { conn }
    }

    /// Population standard deviation: sqrt(sum(x²)/n - (sum(x)/n)²)
    fn stats_from_sums(count: i64, average: f64, sum_squares: f64, total_sum: f64) -> ResponseTimeStats {
        let n = count as f64;
        let variance = (sum_squares / n) - (total_sum / n).powi(2);
        ResponseTimeStats::new(average, variance.max(0.0).sqrt())
    }

    /// Response times of correct first attempts in one category
    ///
    /// `None` until the category has at least one timed correct answer
    /// in a completed session.
    pub fn for_category(&self, category: &str) -> Result<Option<ResponseTimeStats>> {
        let query = format!(
            "SELECT {} {} AND a.category = ?1",
            TIME_AGGREGATES, CORRECT_FIRST_ATTEMPTS
        );
        self.conn.query_row(&query, [category], |row| {
            let count: i64 = row.get(0)?;
            if count == 0 {
                return Ok(None);
            }
            Ok(Some(Self::stats_from_sums(
                count,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
            )))
        })
    }

    pub fn all_categories(&self) -> Result<BTreeMap<String, ResponseTimeStats>> {
        let query = format!(
            "SELECT a.category, {} {} GROUP BY a.category",
            TIME_AGGREGATES, CORRECT_FIRST_ATTEMPTS
        );
        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            let category: String = row.get(0)?;
            let stats = Self::stats_from_sums(row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?);
            Ok((category, stats))
        })?;

        let mut result = BTreeMap::new();
        for row in rows {
            let (category, stats) = row?;
            result.insert(category, stats);
        }
        Ok(result)
    }
}
