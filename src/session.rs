use crate::answer_matcher::judge_answer;
use crate::card_store::CardStore;
use crate::catalog::{Catalog, Item};
use crate::config::QuizConfig;
use crate::database::Database;
use crate::date_provider::DateProvider;
use crate::distractors::{DistractorSelector, answer_options};
use crate::error::{QuizError, Result};
use crate::retry_queue::RetryQueue;
use crate::session_queue::{QueueBuilder, QuizMode, SessionQueue};
use crate::session_record::SessionSummary;
use crate::spaced_repetition::{ResponseTimeStats, ReviewScheduler, quality_to_string};
use crate::time_format::format_due;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sra::sm_2::Quality;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingAnswer,
    Scoring,
    Advancing,
    Complete,
}

/// One question handed to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub item: Item,
    /// Target plus decoys in display order; empty for typed-answer modes
    pub options: Vec<Item>,
    pub is_retry: bool,
    pub tick: u64,
}

/// What happened when a question was answered
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub item_code: String,
    pub category: String,
    pub was_correct: bool,
    pub new_ease_factor: f32,
    pub new_interval: u32,
    pub given_answer: String,
    pub is_retry: bool,
    pub tick: u64,
    pub elapsed_secs: Option<f64>,
}

/// Running counters for the current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub question_counter: u64,
    pub answered: u32,
}

/// One-way notification of answer outcomes
pub trait OutcomeListener {
    fn on_outcome(&self, outcome: &AnswerOutcome);
}

/// Writes every outcome to the answers table
pub struct AnswerLog {
    db: Arc<Database>,
    session_id: Option<i64>,
}

impl AnswerLog {
    pub fn new(db: Arc<Database>, session_id: Option<i64>) -> Self {
        Self { db, session_id }
    }
}

impl OutcomeListener for AnswerLog {
    fn on_outcome(&self, outcome: &AnswerOutcome) {
        if let Err(e) = self.db.insert_answer(self.session_id, outcome) {
            warn!("Failed to log answer for {}: {}", outcome.item_code, e);
        }
    }
}

/// Hands out one question at a time and absorbs the answers
pub struct SessionController<R: Rng = StdRng> {
    catalog: Arc<Catalog>,
    store: Arc<dyn CardStore>,
    date_provider: Arc<dyn DateProvider>,
    config: QuizConfig,
    mode: QuizMode,
    scheduler: ReviewScheduler,
    builder: QueueBuilder,
    selector: DistractorSelector,
    queue: SessionQueue,
    retry: RetryQueue,
    response_times: HashMap<String, ResponseTimeStats>,
    listeners: Vec<Box<dyn OutcomeListener>>,
    rng: R,
    phase: SessionPhase,
    current: Option<Question>,
    state: SessionState,
    results: Vec<(bool, f64)>,
    last_code: Option<String>,
}

impl SessionController<StdRng> {
    pub fn start(
        catalog: Arc<Catalog>,
        store: Arc<dyn CardStore>,
        date_provider: Arc<dyn DateProvider>,
        config: QuizConfig,
        mode: QuizMode,
    ) -> Result<Self> {
        Self::start_with_rng(
            catalog,
            store,
            date_provider,
            config,
            mode,
            StdRng::from_entropy(),
        )
    }
}

impl<R: Rng> SessionController<R> {
    /// Loads saved cards and builds the first queue
    ///
    /// Fails with `NoItemsAvailable` when the mode's pool is empty. A blend
    /// with nothing due and nothing new is not an error; the first call to
    /// [`advance`](Self::advance) simply reports completion.
    pub fn start_with_rng(
        catalog: Arc<Catalog>,
        store: Arc<dyn CardStore>,
        date_provider: Arc<dyn DateProvider>,
        config: QuizConfig,
        mode: QuizMode,
        mut rng: R,
    ) -> Result<Self> {
        let scheduler = ReviewScheduler::with_cards(store.load_cards(), config.due_policy);
        let builder = QueueBuilder::new(&config);
        let queue = builder.build(&mode, &catalog, &scheduler, date_provider.today(), &mut rng)?;

        info!(
            "Starting {} session: {} queued, {} known card(s)",
            mode,
            queue.len(),
            scheduler.cards().len()
        );

        Ok(Self {
            selector: DistractorSelector::from_config(&config),
            retry: RetryQueue::new(config.retry_gaps.clone()),
            catalog,
            store,
            date_provider,
            config,
            mode,
            scheduler,
            builder,
            queue,
            response_times: HashMap::new(),
            listeners: Vec::new(),
            rng,
            phase: SessionPhase::Advancing,
            current: None,
            state: SessionState::default(),
            results: Vec::new(),
            last_code: None,
        })
    }

    /// Per-category response times used to grade correct answers
    pub fn with_response_times(mut self, stats: HashMap<String, ResponseTimeStats>) -> Self {
        self.response_times = stats;
        self
    }

    pub fn add_listener(&mut self, listener: Box<dyn OutcomeListener>) {
        self.listeners.push(listener);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn mode(&self) -> &QuizMode {
        &self.mode
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn scheduler(&self) -> &ReviewScheduler {
        &self.scheduler
    }

    pub fn retry_queue(&self) -> &RetryQueue {
        &self.retry
    }

    pub fn remaining_in_queue(&self) -> usize {
        self.queue.len()
    }

    /// Moves to the next question, or to `Complete` when nothing is left
    ///
    /// Order: a due retry, then the main queue, then a regenerated queue in
    /// looping modes, then a forced retry in finite modes. Calling this while
    /// a question is still unanswered returns that question again.
    pub fn advance(&mut self) -> Result<Option<&Question>> {
        match self.phase {
            SessionPhase::Complete => return Ok(None),
            SessionPhase::AwaitingAnswer if self.current.is_some() => {
                return Ok(self.current.as_ref());
            }
            _ => {}
        }

        self.phase = SessionPhase::Advancing;
        let tick = self.state.question_counter + 1;

        let Some((item, is_retry)) = self.next_item(tick)? else {
            info!("Session complete after {} question(s)", self.state.question_counter);
            self.phase = SessionPhase::Complete;
            self.current = None;
            return Ok(None);
        };

        let options = if self.mode.is_multiple_choice() {
            let decoys = self.selector.select(
                &item,
                self.catalog.items(),
                self.config.distractor_count,
                &mut self.rng,
            );
            answer_options(&item, decoys, &mut self.rng)
        } else {
            Vec::new()
        };

        debug!(
            "Tick {}: {}{}",
            tick,
            item.code,
            if is_retry { " (retry)" } else { "" }
        );

        self.state.question_counter = tick;
        self.last_code = Some(item.code.clone());
        self.current = Some(Question {
            item,
            options,
            is_retry,
            tick,
        });
        self.phase = SessionPhase::AwaitingAnswer;
        Ok(self.current.as_ref())
    }

    fn next_item(&mut self, tick: u64) -> Result<Option<(Item, bool)>> {
        if let Some(item) = self.retry.pop_due(tick) {
            return Ok(Some((item, true)));
        }
        if let Some(item) = self.queue.pop_front() {
            return Ok(Some((item, false)));
        }
        if self.mode.loops() {
            self.queue = self.builder.rebuild(
                &self.mode,
                &self.catalog,
                &self.scheduler,
                self.date_provider.today(),
                self.last_code.as_deref(),
                &mut self.rng,
            )?;
            if let Some(item) = self.queue.pop_front() {
                return Ok(Some((item, false)));
            }
        }
        Ok(self.retry.force_pop(tick).map(|item| (item, true)))
    }

    /// Scores `input` against the current question
    ///
    /// The updated card is saved right away. A miss on a main-queue question
    /// starts a retry cycle; a miss on a retry question leaves the running
    /// cycle's spacing alone. Recalling a retry does not advance the card's
    /// long-term schedule.
    pub fn submit_answer(&mut self, input: &str, elapsed_secs: Option<f64>) -> Result<AnswerOutcome> {
        if self.phase != SessionPhase::AwaitingAnswer {
            return Err(QuizError::NoActiveQuestion);
        }
        let question = self.current.take().ok_or(QuizError::NoActiveQuestion)?;
        self.phase = SessionPhase::Scoring;

        let item = &question.item;
        let today = self.date_provider.today();
        let was_correct = judge_answer(input, item, &self.catalog, self.config.min_prefix_len);

        let card = if was_correct && question.is_retry {
            let card = self.scheduler.record_relearned(&item.code, today);
            info!(
                "Retry recalled: {} | Next review: {} | Reps: {}, Interval: {} days",
                item.code,
                format_due(today, card.next_review_date),
                card.repetitions,
                card.interval
            );
            card
        } else if was_correct {
            let quality = match elapsed_secs {
                Some(secs) => self.stats_for(&item.category).evaluate_performance(true, secs),
                None => Quality::Grade4,
            };
            let card = self.scheduler.record_correct(&item.code, quality, today);
            info!(
                "Correct: {} | Quality: {} | Next review: {} | Reps: {}, Interval: {} days, Ease: {:.2}",
                item.code,
                quality_to_string(quality),
                format_due(today, card.next_review_date),
                card.repetitions,
                card.interval,
                card.ease_factor
            );
            card
        } else {
            if !question.is_retry {
                self.retry.schedule(item, question.tick);
            }
            let card = self.scheduler.record_incorrect(&item.code, today);
            info!(
                "Missed: {} (answered {:?}) | Lapses: {}, Ease: {:.2}",
                item.code, input, card.lapses, card.ease_factor
            );
            card
        };

        if let Err(e) = self.store.save_card(&item.code, &card) {
            warn!("Failed to save review card for {}: {}", item.code, e);
        }

        self.state.answered += 1;
        if was_correct {
            self.state.score += 1;
            self.state.streak += 1;
            self.state.best_streak = self.state.best_streak.max(self.state.streak);
        } else {
            self.state.streak = 0;
        }
        self.results.push((was_correct, elapsed_secs.unwrap_or(0.0)));

        let outcome = AnswerOutcome {
            item_code: item.code.clone(),
            category: item.category.clone(),
            was_correct,
            new_ease_factor: card.ease_factor,
            new_interval: card.interval,
            given_answer: input.to_string(),
            is_retry: question.is_retry,
            tick: question.tick,
            elapsed_secs,
        };
        for listener in &self.listeners {
            listener.on_outcome(&outcome);
        }

        self.phase = SessionPhase::Advancing;
        Ok(outcome)
    }

    /// Stops the session early or at its natural end
    ///
    /// Pending retries and any unanswered question are dropped. Scored answers
    /// stay committed.
    pub fn end_session(&mut self) -> SessionSummary {
        self.retry.clear();
        self.current = None;
        self.phase = SessionPhase::Complete;

        if let Err(e) = self.store.save_cards(self.scheduler.cards()) {
            warn!("Failed to save review cards at session end: {}", e);
        }

        let summary = SessionSummary::from_results(&self.results);
        info!(
            "Session ended: {}/{} correct, best streak {}",
            summary.correct_answers, summary.total_questions, summary.best_streak
        );
        summary
    }

    fn stats_for(&self, category: &str) -> ResponseTimeStats {
        self.response_times
            .get(category)
            .copied()
            .unwrap_or_default()
    }
}
