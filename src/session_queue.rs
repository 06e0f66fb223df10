use crate::catalog::{Catalog, Item};
use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::spaced_repetition::ReviewScheduler;
use chrono::NaiveDate;
use log::info;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizMode {
    /// Whole catalog, shuffled, regenerated forever
    Endless,
    /// Like endless, but the caller stops the session when time runs out
    Timed,
    /// SRS blend over the whole catalog
    Practice,
    /// SRS blend over the whole catalog with look-alike answer options
    Hard,
    /// SRS blend restricted to one category
    Category(String),
}

impl QuizMode {
    /// Parses a mode name; `category` is required for, and only used by, category mode
    pub fn from_parts(name: &str, category: Option<&str>) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "endless" => Ok(QuizMode::Endless),
            "timed" => Ok(QuizMode::Timed),
            "practice" | "default" => Ok(QuizMode::Practice),
            "hard" => Ok(QuizMode::Hard),
            "category" | "continent" => match category.map(str::trim) {
                Some(category) if !category.is_empty() => {
                    Ok(QuizMode::Category(category.to_string()))
                }
                _ => Err(QuizError::InvalidMode(
                    "category mode requires a category".to_string(),
                )),
            },
            other => Err(QuizError::InvalidMode(format!("unknown mode '{}'", other))),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            QuizMode::Endless => "endless",
            QuizMode::Timed => "timed",
            QuizMode::Practice => "practice",
            QuizMode::Hard => "hard",
            QuizMode::Category(_) => "category",
        }
    }

    /// Looping modes rebuild their queue instead of ending
    pub fn loops(&self) -> bool {
        matches!(self, QuizMode::Endless | QuizMode::Timed)
    }

    pub fn is_multiple_choice(&self) -> bool {
        matches!(self, QuizMode::Endless | QuizMode::Timed | QuizMode::Hard)
    }

    pub fn uses_srs(&self) -> bool {
        !self.loops()
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Category(category) => write!(f, "category:{}", category),
            other => f.write_str(other.name()),
        }
    }
}

/// Items prepared for a session, consumed front to back
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionQueue {
    items: VecDeque<Item>,
}

impl SessionQueue {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn pop_front(&mut self) -> Option<Item> {
        self.items.pop_front()
    }

    pub fn peek(&self) -> Option<&Item> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.code.as_str()).collect()
    }

    /// Moves the front item back so `code` does not come up twice in a row
    fn avoid_leading(&mut self, code: &str) {
        if self.items.len() > 1 && self.items.front().is_some_and(|i| i.code == code) {
            self.items.swap(0, 1);
        }
    }
}

/// Builds session queues from the catalog and the scheduler's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueBuilder {
    new_per_session: usize,
    new_per_category_session: usize,
    max_reviews_per_session: Option<usize>,
}

impl QueueBuilder {
    pub fn new(config: &QuizConfig) -> Self {
        Self {
            new_per_session: config.new_per_session,
            new_per_category_session: config.new_per_category_session,
            max_reviews_per_session: config.max_reviews_per_session,
        }
    }

    pub fn build<R: Rng + ?Sized>(
        &self,
        mode: &QuizMode,
        catalog: &Catalog,
        scheduler: &ReviewScheduler,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<SessionQueue> {
        if catalog.is_empty() {
            return Err(QuizError::NoItemsAvailable("catalog is empty".to_string()));
        }

        let queue = match mode {
            QuizMode::Endless | QuizMode::Timed => {
                let mut items = catalog.items().to_vec();
                items.shuffle(rng);
                SessionQueue::new(items)
            }
            QuizMode::Practice | QuizMode::Hard => {
                let pool: Vec<&Item> = catalog.items().iter().collect();
                self.srs_blend(&pool, scheduler, today, self.new_per_session, rng)
            }
            QuizMode::Category(category) => {
                let pool = catalog.in_category(category);
                if pool.is_empty() {
                    return Err(QuizError::NoItemsAvailable(format!(
                        "no items in category '{}'",
                        category
                    )));
                }
                self.srs_blend(&pool, scheduler, today, self.new_per_category_session, rng)
            }
        };

        info!("Built {} queue with {} item(s)", mode, queue.len());
        Ok(queue)
    }

    /// Rebuilds a looping queue without repeating `last_code` back to back
    pub fn rebuild<R: Rng + ?Sized>(
        &self,
        mode: &QuizMode,
        catalog: &Catalog,
        scheduler: &ReviewScheduler,
        today: NaiveDate,
        last_code: Option<&str>,
        rng: &mut R,
    ) -> Result<SessionQueue> {
        let mut queue = self.build(mode, catalog, scheduler, today, rng)?;
        if let Some(code) = last_code {
            queue.avoid_leading(code);
        }
        Ok(queue)
    }

    /// Due items first, then up to `new_limit` new items, each group shuffled
    fn srs_blend<R: Rng + ?Sized>(
        &self,
        pool: &[&Item],
        scheduler: &ReviewScheduler,
        today: NaiveDate,
        new_limit: usize,
        rng: &mut R,
    ) -> SessionQueue {
        let mut due = Vec::new();
        let mut fresh = Vec::new();

        for &item in pool {
            if scheduler.is_due(&item.code, today) {
                due.push(item);
            } else if scheduler.is_new(&item.code) {
                fresh.push(item);
            }
        }

        due.shuffle(rng);
        fresh.shuffle(rng);
        if let Some(limit) = self.max_reviews_per_session {
            due.truncate(limit);
        }
        fresh.truncate(new_limit);

        info!(
            "SRS blend: {} due, {} new (limit {})",
            due.len(),
            fresh.len(),
            new_limit
        );

        SessionQueue::new(due.into_iter().chain(fresh).cloned().collect())
    }
}
