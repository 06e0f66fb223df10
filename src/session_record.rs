use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        }
    }

    pub fn from(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(SessionStatus::InProgress),
            "completed" => Some(SessionStatus::Completed),
            "abandoned" => Some(SessionStatus::Abandoned),
            _ => None,
        }
    }
}

/// A practice session as stored in the session log
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: i64,
    pub mode: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub incorrect_answers: i32,
    pub total_time_seconds: f64,
    pub average_time_seconds: Option<f64>,
    pub accuracy_percentage: Option<f64>,
    pub best_streak: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub total_questions: i32,
    pub correct_answers: i32,
    pub incorrect_answers: i32,
    pub total_time_seconds: f64,
    pub average_time_seconds: f64,
    pub accuracy_percentage: f64,
    /// Longest run of consecutive correct answers
    pub best_streak: i32,
}

impl SessionSummary {
    /// Summarises `(is_correct, time_spent)` pairs in answer order
    pub fn from_results(results: &[(bool, f64)]) -> Self {
        let total_questions = results.len() as i32;
        let correct_answers = results.iter().filter(|(correct, _)| *correct).count() as i32;
        let incorrect_answers = total_questions - correct_answers;
        let total_time_seconds: f64 = results.iter().map(|(_, time)| time).sum();
        let average_time_seconds = if total_questions > 0 {
            total_time_seconds / total_questions as f64
        } else {
            0.0
        };
        let accuracy_percentage = if total_questions > 0 {
            (correct_answers as f64 / total_questions as f64) * 100.0
        } else {
            0.0
        };

        let mut best_streak = 0;
        let mut streak = 0;
        for (correct, _) in results {
            if *correct {
                streak += 1;
                best_streak = best_streak.max(streak);
            } else {
                streak = 0;
            }
        }

        SessionSummary {
            total_questions,
            correct_answers,
            incorrect_answers,
            total_time_seconds,
            average_time_seconds,
            accuracy_percentage,
            best_streak,
        }
    }
}
