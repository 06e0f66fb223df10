use chrono::{Days, NaiveDate};
use log::debug;
use sra::sm_2::Quality;
use std::collections::HashMap;

/// Floor for the ease factor; repeated lapses never push a card below it
pub const MIN_EASE_FACTOR: f32 = 1.3;
pub const DEFAULT_EASE_FACTOR: f32 = 2.5;
const LAPSE_EASE_PENALTY: f32 = 0.2;

/// Statistics about answer times used to grade correct answers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseTimeStats {
    /// Average time spent on correct answers (in seconds)
    pub average: f64,
    /// Standard deviation of time spent on correct answers (in seconds)
    pub standard_deviation: f64,
}

impl ResponseTimeStats {
    pub fn new(average: f64, standard_deviation: f64) -> Self {
        Self {
            average,
            standard_deviation,
        }
    }

    /// Answers at or above this time are no longer Grade5: average + 1σ
    pub fn threshold_grade4(&self) -> f64 {
        self.average + self.standard_deviation
    }

    /// Answers at or above this time are Grade3: average + 2σ
    pub fn threshold_grade3(&self) -> f64 {
        self.average + (2.0 * self.standard_deviation)
    }

    pub fn evaluate_performance(&self, is_correct: bool, time_spent: f64) -> Quality {
        performance_to_quality(is_correct, time_spent, self)
    }
}

impl Default for ResponseTimeStats {
    fn default() -> Self {
        Self::new(3.0, 2.0)
    }
}

/// Maps correctness and speed to an SM-2 quality grade
///
/// - Grade0: incorrect
/// - Grade3: correct but slow (>= average + 2σ)
/// - Grade4: correct after hesitation (>= average + 1σ)
/// - Grade5: correct and fast
pub fn performance_to_quality(
    is_correct: bool,
    time_spent: f64,
    stats: &ResponseTimeStats,
) -> Quality {
    if !is_correct {
        Quality::Grade0
    } else if time_spent >= stats.threshold_grade3() {
        Quality::Grade3
    } else if time_spent >= stats.threshold_grade4() {
        Quality::Grade4
    } else {
        Quality::Grade5
    }
}

/// Human-readable grade label
pub fn quality_to_string(quality: Quality) -> String {
    match quality {
        Quality::Grade0 => "Grade0 (Incorrect)".to_string(),
        Quality::Grade3 => "Grade3 (Hard)".to_string(),
        Quality::Grade4 => "Grade4 (Good)".to_string(),
        Quality::Grade5 => "Grade5 (Easy)".to_string(),
        _ => "N/A".to_string(),
    }
}

/// Passing grades only; anything below Grade3 counts as Grade3
fn passing_grade_value(quality: Quality) -> f32 {
    match quality {
        Quality::Grade5 => 5.0,
        Quality::Grade4 => 4.0,
        _ => 3.0,
    }
}

fn round_ease(ease_factor: f32) -> f32 {
    (ease_factor * 100.0).round() / 100.0
}

/// Whether cards that were never successfully reviewed can be "due"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuePolicy {
    /// Zero-repetition cards are new, never due; they enter sessions
    /// through the new-item allotment.
    #[default]
    ExcludeNew,
    /// Zero-repetition cards are due once their review date is unset or reached
    IncludeNew,
}

/// Per-item spaced repetition state
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCard {
    pub ease_factor: f32,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review_date: Option<NaiveDate>,
    pub lapses: u32,
    pub last_reviewed_date: Option<NaiveDate>,
}

impl Default for ReviewCard {
    fn default() -> Self {
        ReviewCard {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
            next_review_date: None,
            lapses: 0,
            last_reviewed_date: None,
        }
    }
}

impl ReviewCard {
    pub fn is_new(&self) -> bool {
        self.repetitions == 0
    }

    pub fn is_due(&self, today: NaiveDate, policy: DuePolicy) -> bool {
        if self.repetitions == 0 && policy == DuePolicy::ExcludeNew {
            return false;
        }
        match self.next_review_date {
            None => true,
            Some(date) => date <= today,
        }
    }
}

fn days_after(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(days as u64))
        .unwrap_or(NaiveDate::MAX)
}

/// Owns every item's review card and applies the SM-2 update rules
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    cards: HashMap<String, ReviewCard>,
    due_policy: DuePolicy,
}

impl ReviewScheduler {
    pub fn new(due_policy: DuePolicy) -> Self {
        Self {
            cards: HashMap::new(),
            due_policy,
        }
    }

    /// Starts from previously persisted cards
    pub fn with_cards(cards: HashMap<String, ReviewCard>, due_policy: DuePolicy) -> Self {
        Self { cards, due_policy }
    }

    pub fn due_policy(&self) -> DuePolicy {
        self.due_policy
    }

    pub fn cards(&self) -> &HashMap<String, ReviewCard> {
        &self.cards
    }

    pub fn get(&self, code: &str) -> Option<&ReviewCard> {
        self.cards.get(code)
    }

    /// Card for `code`, created with defaults on first access
    pub fn get_or_create(&mut self, code: &str) -> &ReviewCard {
        self.card_mut(code)
    }

    fn card_mut(&mut self, code: &str) -> &mut ReviewCard {
        self.cards.entry(code.to_string()).or_default()
    }

    /// Applies a successful review graded 3 (hard), 4 (good) or 5 (easy)
    pub fn record_correct(&mut self, code: &str, quality: Quality, today: NaiveDate) -> ReviewCard {
        let q = passing_grade_value(quality);
        let card = self.card_mut(code);

        let penalty = 5.0 - q;
        let new_ease = (card.ease_factor + (0.1 - penalty * (0.08 + penalty * 0.02)))
            .max(MIN_EASE_FACTOR);
        card.ease_factor = round_ease(new_ease);

        card.interval = match card.repetitions {
            0 => 1,
            1 => 6,
            _ => (card.interval as f32 * card.ease_factor).round() as u32,
        };
        card.repetitions += 1;
        card.next_review_date = Some(days_after(today, card.interval));
        card.last_reviewed_date = Some(today);

        debug!(
            "Correct review of {}: reps={}, interval={} days, ease={:.2}, next review {:?}",
            code, card.repetitions, card.interval, card.ease_factor, card.next_review_date
        );
        card.clone()
    }

    /// Applies a lapse: progress resets, ease drops but stays above the floor
    pub fn record_incorrect(&mut self, code: &str, today: NaiveDate) -> ReviewCard {
        let card = self.card_mut(code);

        card.repetitions = 0;
        card.interval = 1;
        card.lapses += 1;
        card.ease_factor = round_ease((card.ease_factor - LAPSE_EASE_PENALTY).max(MIN_EASE_FACTOR));
        card.next_review_date = Some(days_after(today, 1));
        card.last_reviewed_date = Some(today);

        debug!(
            "Missed review of {}: lapses={}, ease={:.2}, next review {:?}",
            code, card.lapses, card.ease_factor, card.next_review_date
        );
        card.clone()
    }

    /// Notes a same-day recall that must not move the long-term schedule
    ///
    /// Only `last_reviewed_date` changes; a card missed earlier today stays
    /// due tomorrow with its lapse intact.
    pub fn record_relearned(&mut self, code: &str, today: NaiveDate) -> ReviewCard {
        let card = self.card_mut(code);
        card.last_reviewed_date = Some(today);

        debug!(
            "Relearned {} in session: reps={}, interval={} days, next review {:?}",
            code, card.repetitions, card.interval, card.next_review_date
        );
        card.clone()
    }

    /// Unknown codes are treated as fresh cards without creating them
    pub fn is_due(&self, code: &str, today: NaiveDate) -> bool {
        match self.cards.get(code) {
            Some(card) => card.is_due(today, self.due_policy),
            None => ReviewCard::default().is_due(today, self.due_policy),
        }
    }

    pub fn is_new(&self, code: &str) -> bool {
        self.cards.get(code).is_none_or(ReviewCard::is_new)
    }
}
