use crate::card_store::CardMap;
use crate::row_factories::ReviewCardRowFactory;
use crate::spaced_repetition::ReviewCard;
use chrono::NaiveDate;
use log::{debug, warn};
use rusqlite::{Connection, OptionalExtension, Result, params};

const UPSERT_SQL: &str = "INSERT INTO review_cards
        (item_code, ease_factor, interval, repetitions, next_review_date, lapses, last_reviewed_date)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
     ON CONFLICT(item_code) DO UPDATE SET
        ease_factor = excluded.ease_factor,
        interval = excluded.interval,
        repetitions = excluded.repetitions,
        next_review_date = excluded.next_review_date,
        lapses = excluded.lapses,
        last_reviewed_date = excluded.last_reviewed_date";

pub struct ReviewCardsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> ReviewCardsRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        ReviewCardsRepository { conn }
    }

    pub fn upsert(&self, code: &str, card: &ReviewCard) -> Result<()> {
        debug!(
            "Saving review card {}: reps={}, interval={} days, ease={:.2}, lapses={}",
            code, card.repetitions, card.interval, card.ease_factor, card.lapses
        );
        self.conn.execute(
            UPSERT_SQL,
            params![
                code,
                card.ease_factor,
                card.interval,
                card.repetitions,
                card.next_review_date,
                card.lapses,
                card.last_reviewed_date
            ],
        )?;
        Ok(())
    }

    /// Writes every card in one transaction
    pub fn upsert_all(&self, cards: &CardMap) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT_SQL)?;
            for (code, card) in cards {
                stmt.execute(params![
                    code,
                    card.ease_factor,
                    card.interval,
                    card.repetitions,
                    card.next_review_date,
                    card.lapses,
                    card.last_reviewed_date
                ])?;
            }
        }
        tx.commit()?;
        debug!("Saved {} review card(s)", cards.len());
        Ok(())
    }

    pub fn get(&self, code: &str) -> Result<Option<ReviewCard>> {
        self.conn
            .query_row(
                "SELECT item_code, ease_factor, interval, repetitions,
                        next_review_date, lapses, last_reviewed_date
                 FROM review_cards WHERE item_code = ?1",
                [code],
                ReviewCardRowFactory::from_row,
            )
            .optional()
            .map(|row| row.map(|(_, card)| card))
    }

    /// Rows that fail to decode are skipped with a warning
    pub fn load_all(&self) -> Result<CardMap> {
        let mut stmt = self.conn.prepare(
            "SELECT item_code, ease_factor, interval, repetitions,
                    next_review_date, lapses, last_reviewed_date
             FROM review_cards",
        )?;
        let rows = stmt.query_map([], ReviewCardRowFactory::from_row)?;

        let mut cards = CardMap::new();
        for row in rows {
            match row {
                Ok((code, card)) => {
                    cards.insert(code, card);
                }
                Err(e) => warn!("Skipping unreadable review card row: {}", e),
            }
        }
        Ok(cards)
    }

    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM review_cards", [], |row| row.get(0))
    }

    /// Reviewed cards whose date has arrived
    pub fn count_due(&self, today: NaiveDate) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM review_cards
             WHERE repetitions > 0
             AND (next_review_date IS NULL OR next_review_date <= ?1)",
            params![today],
            |row| row.get(0),
        )
    }
}
