pub mod analytics;
pub mod answers;
pub mod connection;
pub mod review_cards;
pub mod sessions;

use crate::card_store::{CardMap, CardStore};
use crate::date_provider::{DateProvider, SystemDateProvider};
use crate::error::Result;
use crate::session::AnswerOutcome;
use crate::session_record::{SessionRecord, SessionSummary};
use crate::spaced_repetition::{ResponseTimeStats, ReviewCard};
use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::sync::Arc;

pub use analytics::{AccuracyStats, Analytics};
pub use answers::{AnswerRecord, AnswersRepository};
pub use review_cards::ReviewCardsRepository;
pub use sessions::SessionsRepository;

/// Main Database struct providing access to all repositories
pub struct Database {
    pub conn: Connection,
    date_provider: Arc<dyn DateProvider>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        Self::init(db_path, Arc::new(SystemDateProvider))
    }

    pub fn with_date_provider(db_path: &str, date_provider: Arc<dyn DateProvider>) -> Result<Self> {
        Self::init(db_path, date_provider)
    }

    fn init(db_path: &str, date_provider: Arc<dyn DateProvider>) -> Result<Self> {
        let conn = connection::init_connection(db_path)?;
        Ok(Database {
            conn,
            date_provider,
        })
    }

    pub fn date_provider(&self) -> Arc<dyn DateProvider> {
        Arc::clone(&self.date_provider)
    }

    fn get_current_time(&self) -> DateTime<Utc> {
        self.date_provider.get_current_time()
    }

    fn sessions(&self) -> SessionsRepository<'_> {
        SessionsRepository::new(&self.conn, Box::new(|| self.get_current_time()))
    }

    // ===== Review Cards =====

    pub fn save_review_card(&self, code: &str, card: &ReviewCard) -> Result<()> {
        Ok(ReviewCardsRepository::new(&self.conn).upsert(code, card)?)
    }

    pub fn get_review_card(&self, code: &str) -> Result<Option<ReviewCard>> {
        Ok(ReviewCardsRepository::new(&self.conn).get(code)?)
    }

    pub fn load_review_cards(&self) -> Result<CardMap> {
        Ok(ReviewCardsRepository::new(&self.conn).load_all()?)
    }

    pub fn count_review_cards(&self) -> Result<i64> {
        Ok(ReviewCardsRepository::new(&self.conn).count()?)
    }

    pub fn count_due_reviews(&self, today: NaiveDate) -> Result<i64> {
        Ok(ReviewCardsRepository::new(&self.conn).count_due(today)?)
    }

    // ===== Answers =====

    pub fn insert_answer(&self, session_id: Option<i64>, outcome: &AnswerOutcome) -> Result<i64> {
        Ok(AnswersRepository::new(&self.conn).insert(session_id, outcome)?)
    }

    pub fn get_answer(&self, answer_id: i64) -> Result<Option<AnswerRecord>> {
        Ok(AnswersRepository::new(&self.conn).get(answer_id)?)
    }

    pub fn count_answers(&self) -> Result<i64> {
        Ok(AnswersRepository::new(&self.conn).count()?)
    }

    // ===== Sessions =====

    pub fn create_session(&self, mode: &str) -> Result<i64> {
        Ok(self.sessions().create(mode)?)
    }

    pub fn get_session(&self, session_id: i64) -> Result<Option<SessionRecord>> {
        Ok(self.sessions().get(session_id)?)
    }

    pub fn update_session_summary(&self, session_id: i64, summary: &SessionSummary) -> Result<()> {
        Ok(self.sessions().update_summary(session_id, summary)?)
    }

    pub fn complete_session(&self, session_id: i64) -> Result<()> {
        Ok(self.sessions().complete(session_id)?)
    }

    pub fn abandon_session(&self, session_id: i64) -> Result<()> {
        Ok(self.sessions().abandon(session_id)?)
    }

    pub fn get_recent_sessions(&self, limit: i32) -> Result<Vec<SessionRecord>> {
        Ok(self.sessions().get_recent(limit)?)
    }

    pub fn count_sessions(&self) -> Result<i64> {
        Ok(self.sessions().count()?)
    }

    // ===== Analytics =====

    pub fn accuracy_per_category(&self) -> Result<BTreeMap<String, AccuracyStats>> {
        Ok(Analytics::new(&self.conn).accuracy().per_category()?)
    }

    pub fn accuracy_per_category_last_10_sessions(&self) -> Result<BTreeMap<String, AccuracyStats>> {
        Ok(Analytics::new(&self.conn)
            .accuracy()
            .per_category_last_10_sessions()?)
    }

    pub fn response_times_per_category(&self) -> Result<BTreeMap<String, ResponseTimeStats>> {
        Ok(Analytics::new(&self.conn).time_statistics().all_categories()?)
    }
}

impl CardStore for Database {
    fn load_cards(&self) -> CardMap {
        match self.load_review_cards() {
            Ok(cards) => cards,
            Err(e) => {
                warn!("Could not read saved review cards, starting fresh: {}", e);
                CardMap::new()
            }
        }
    }

    fn save_cards(&self, cards: &CardMap) -> Result<()> {
        Ok(ReviewCardsRepository::new(&self.conn).upsert_all(cards)?)
    }

    fn save_card(&self, code: &str, card: &ReviewCard) -> Result<()> {
        self.save_review_card(code, card)
    }
}
