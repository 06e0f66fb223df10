use rusqlite::Connection;
use rusqlite::Result;
use std::collections::BTreeMap;

const LAST_10_SESSIONS_WHERE: &str = r#"s.id IN (
    SELECT id FROM sessions
    WHERE status = 'completed'
    ORDER BY completed_at DESC, id DESC
    LIMIT 10
)"#;

/// (correct_count, total_count, accuracy_percentage)
pub type AccuracyStats = (i64, i64, f64);

pub struct AccuracyRepository<'a> {
    conn: &'a Connection,
}

impl<'a> AccuracyRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        AccuracyRepository { conn }
    }

    fn per_category_template(&self, additional_where: &str) -> Result<BTreeMap<String, AccuracyStats>> {
        let mut query = r#"SELECT
                a.category,
                COUNT(CASE WHEN a.is_correct = 1 THEN 1 END) as correct_count,
                COUNT(a.id) as total_count,
                CAST(COUNT(CASE WHEN a.is_correct = 1 THEN 1 END) AS FLOAT) /
                COUNT(a.id) * 100.0 as accuracy_percentage
            FROM answers a
            INNER JOIN sessions s ON a.session_id = s.id
            WHERE s.status = 'completed'"#
            .to_string();

        if !additional_where.is_empty() {
            query.push_str("\n            AND ");
            query.push_str(additional_where);
        }
        query.push_str("\n            GROUP BY a.category");

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            let category: String = row.get(0)?;
            let stats: AccuracyStats = (row.get(1)?, row.get(2)?, row.get(3)?);
            Ok((category, stats))
        })?;

        let mut result = BTreeMap::new();
        for row in rows {
            let (category, stats) = row?;
            result.insert(category, stats);
        }
        Ok(result)
    }

    fn total_template(&self, additional_where: &str) -> Result<AccuracyStats> {
        let mut query = r#"SELECT
                COUNT(CASE WHEN a.is_correct = 1 THEN 1 END) as correct_count,
                COUNT(a.id) as total_count,
                CASE WHEN COUNT(a.id) = 0 THEN 0.0 ELSE
                    CAST(COUNT(CASE WHEN a.is_correct = 1 THEN 1 END) AS FLOAT) /
                    COUNT(a.id) * 100.0
                END as accuracy_percentage
            FROM answers a
            INNER JOIN sessions s ON a.session_id = s.id
            WHERE s.status = 'completed'"#
            .to_string();

        if !additional_where.is_empty() {
            query.push_str("\n            AND ");
            query.push_str(additional_where);
        }

        self.conn.query_row(&query, [], |row| {
            let stats: AccuracyStats = (row.get(0)?, row.get(1)?, row.get(2)?);
            Ok(stats)
        })
    }

    /// Accuracy per category over every completed session, sorted by category
    pub fn per_category(&self) -> Result<BTreeMap<String, AccuracyStats>> {
        self.per_category_template("")
    }

    pub fn per_category_last_10_sessions(&self) -> Result<BTreeMap<String, AccuracyStats>> {
        self.per_category_template(LAST_10_SESSIONS_WHERE)
    }

    pub fn total(&self) -> Result<AccuracyStats> {
        self.total_template("")
    }

    pub fn total_last_10_sessions(&self) -> Result<AccuracyStats> {
        self.total_template(LAST_10_SESSIONS_WHERE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::answers::AnswersRepository;
    use crate::database::connection::init_connection;
    use crate::database::sessions::SessionsRepository;
    use crate::session::AnswerOutcome;

    fn create_test_db() -> Connection {
        init_connection(":memory:").expect("Failed to create test database")
    }

    fn outcome(category: &str, correct: bool) -> AnswerOutcome {
        AnswerOutcome {
            item_code: "xx".to_string(),
            category: category.to_string(),
            was_correct: correct,
            new_ease_factor: 2.5,
            new_interval: 1,
            given_answer: String::new(),
            is_retry: false,
            tick: 1,
            elapsed_secs: Some(2.0),
        }
    }

    #[test]
    fn test_empty_database() {
        let conn = create_test_db();
        let repo = AccuracyRepository::new(&conn);
        assert!(repo.per_category().unwrap().is_empty());
        assert_eq!(repo.total().unwrap(), (0, 0, 0.0));
    }

    #[test]
    fn test_accuracy_grouped_by_category() {
        let conn = create_test_db();
        let sessions = SessionsRepository::new(&conn, Box::new(chrono::Utc::now));
        let answers = AnswersRepository::new(&conn);
        let accuracy = AccuracyRepository::new(&conn);

        let session_id = sessions.create("practice").unwrap();
        answers.insert(Some(session_id), &outcome("Europe", true)).unwrap();
        answers.insert(Some(session_id), &outcome("Europe", true)).unwrap();
        answers.insert(Some(session_id), &outcome("Asia", true)).unwrap();
        answers.insert(Some(session_id), &outcome("Asia", false)).unwrap();
        sessions.complete(session_id).unwrap();

        let result = accuracy.per_category().unwrap();
        assert_eq!(result.len(), 2);
        let (correct, total, pct) = result["Europe"];
        assert_eq!((correct, total), (2, 2));
        assert!((pct - 100.0).abs() < 0.001);
        let (correct, total, pct) = result["Asia"];
        assert_eq!((correct, total), (1, 2));
        assert!((pct - 50.0).abs() < 0.001);

        let (correct, total, pct) = accuracy.total().unwrap();
        assert_eq!((correct, total), (3, 4));
        assert!((pct - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_unfinished_sessions_are_ignored() {
        let conn = create_test_db();
        let sessions = SessionsRepository::new(&conn, Box::new(chrono::Utc::now));
        let answers = AnswersRepository::new(&conn);

        let open = sessions.create("practice").unwrap();
        answers.insert(Some(open), &outcome("Europe", true)).unwrap();
        let abandoned = sessions.create("practice").unwrap();
        answers.insert(Some(abandoned), &outcome("Europe", false)).unwrap();
        sessions.abandon(abandoned).unwrap();

        let accuracy = AccuracyRepository::new(&conn);
        assert!(accuracy.per_category().unwrap().is_empty());
    }

    #[test]
    fn test_last_10_sessions_window() {
        let conn = create_test_db();
        let sessions = SessionsRepository::new(&conn, Box::new(chrono::Utc::now));
        let answers = AnswersRepository::new(&conn);

        let oldest = sessions.create("practice").unwrap();
        answers.insert(Some(oldest), &outcome("Africa", false)).unwrap();
        sessions.complete(oldest).unwrap();
        for _ in 0..10 {
            let id = sessions.create("practice").unwrap();
            answers.insert(Some(id), &outcome("Africa", true)).unwrap();
            sessions.complete(id).unwrap();
        }

        let accuracy = AccuracyRepository::new(&conn);
        assert_eq!(accuracy.per_category().unwrap()["Africa"].1, 11);
        let (correct, total, _) = accuracy.per_category_last_10_sessions().unwrap()["Africa"];
        assert_eq!((correct, total), (10, 10));
        assert_eq!(accuracy.total_last_10_sessions().unwrap().1, 10);
    }
}
