use crate::error::{QuizError, Result};
use crate::spaced_repetition::DuePolicy;

pub const DEFAULT_NEW_PER_SESSION: usize = 10;
pub const DEFAULT_NEW_PER_CATEGORY_SESSION: usize = 5;
pub const DEFAULT_RETRY_GAPS: [u64; 3] = [2, 5, 9];
pub const DEFAULT_DISTRACTOR_COUNT: usize = 3;
pub const DEFAULT_SIMILARITY_THRESHOLD: u32 = 5;
pub const DEFAULT_FALLBACK_POOL_SIZE: usize = 25;
pub const DEFAULT_MIN_PREFIX_LEN: usize = 4;

/// Tunables for queue building, retries, distractors and answer matching
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    /// New items introduced per full-catalog SRS session
    pub new_per_session: usize,
    /// New items introduced per category-restricted session
    pub new_per_category_session: usize,
    /// Cap on due reviews per session; `None` takes every due item
    pub max_reviews_per_session: Option<usize>,
    /// Question-count gaps between in-session re-exposures of a missed item
    pub retry_gaps: Vec<u64>,
    pub distractor_count: usize,
    pub similarity_threshold: u32,
    pub fallback_pool_size: usize,
    pub due_policy: DuePolicy,
    pub min_prefix_len: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        QuizConfig {
            new_per_session: DEFAULT_NEW_PER_SESSION,
            new_per_category_session: DEFAULT_NEW_PER_CATEGORY_SESSION,
            max_reviews_per_session: None,
            retry_gaps: DEFAULT_RETRY_GAPS.to_vec(),
            distractor_count: DEFAULT_DISTRACTOR_COUNT,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            fallback_pool_size: DEFAULT_FALLBACK_POOL_SIZE,
            due_policy: DuePolicy::default(),
            min_prefix_len: DEFAULT_MIN_PREFIX_LEN,
        }
    }
}

impl QuizConfig {
    pub fn builder() -> QuizConfigBuilder {
        QuizConfigBuilder {
            config: QuizConfig::default(),
        }
    }
}

/// Builder for [`QuizConfig`]; `build` validates the result
pub struct QuizConfigBuilder {
    config: QuizConfig,
}

impl QuizConfigBuilder {
    pub fn new_per_session(mut self, count: usize) -> Self {
        self.config.new_per_session = count;
        self
    }

    pub fn new_per_category_session(mut self, count: usize) -> Self {
        self.config.new_per_category_session = count;
        self
    }

    pub fn max_reviews_per_session(mut self, limit: usize) -> Self {
        self.config.max_reviews_per_session = Some(limit);
        self
    }

    pub fn retry_gaps(mut self, gaps: &[u64]) -> Self {
        self.config.retry_gaps = gaps.to_vec();
        self
    }

    pub fn distractor_count(mut self, count: usize) -> Self {
        self.config.distractor_count = count;
        self
    }

    pub fn similarity_threshold(mut self, threshold: u32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    pub fn fallback_pool_size(mut self, size: usize) -> Self {
        self.config.fallback_pool_size = size;
        self
    }

    pub fn due_policy(mut self, policy: DuePolicy) -> Self {
        self.config.due_policy = policy;
        self
    }

    pub fn min_prefix_len(mut self, len: usize) -> Self {
        self.config.min_prefix_len = len;
        self
    }

    pub fn build(self) -> Result<QuizConfig> {
        let config = self.config;
        if config.retry_gaps.is_empty() {
            return Err(QuizError::InvalidConfig(
                "retry_gaps must contain at least one gap".to_string(),
            ));
        }
        if config.distractor_count == 0 {
            return Err(QuizError::InvalidConfig(
                "distractor_count must be greater than zero".to_string(),
            ));
        }
        if config.fallback_pool_size < config.distractor_count {
            return Err(QuizError::InvalidConfig(format!(
                "fallback_pool_size ({}) must be at least distractor_count ({})",
                config.fallback_pool_size, config.distractor_count
            )));
        }
        Ok(config)
    }
}
