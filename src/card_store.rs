use crate::error::Result;
use crate::spaced_repetition::ReviewCard;
use std::cell::RefCell;
use std::collections::HashMap;

pub type CardMap = HashMap<String, ReviewCard>;

/// Load/save contract for the scheduler's per-item state
pub trait CardStore {
    /// Every persisted card; unreadable state yields an empty map
    fn load_cards(&self) -> CardMap;

    fn save_cards(&self, cards: &CardMap) -> Result<()>;

    fn save_card(&self, code: &str, card: &ReviewCard) -> Result<()>;
}

/// Non-persistent store, handy for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct InMemoryCardStore {
    cards: RefCell<CardMap>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: CardMap) -> Self {
        Self {
            cards: RefCell::new(cards),
        }
    }

    pub fn snapshot(&self) -> CardMap {
        self.cards.borrow().clone()
    }
}

impl CardStore for InMemoryCardStore {
    fn load_cards(&self) -> CardMap {
        self.snapshot()
    }

    fn save_cards(&self, cards: &CardMap) -> Result<()> {
        self.cards.borrow_mut().clone_from(cards);
        Ok(())
    }

    fn save_card(&self, code: &str, card: &ReviewCard) -> Result<()> {
        self.cards
            .borrow_mut()
            .insert(code.to_string(), card.clone());
        Ok(())
    }
}
