use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single graded review, as classified by the exercise layer.
/// This crate never grades answers, it only applies the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum ReviewOutcome {
    /// Recalled without help.
    Perfect,
    /// Recalled only after a hint was shown.
    Hinted,
    /// Not recalled.
    Wrong,
}

/// Scheduling configuration shared by every word model of one learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Interval assigned to fresh and failed words. Also the floor below
    /// which no interval may fall.
    pub initial_duration: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            initial_duration: Duration::seconds(5),
        }
    }
}

/// When a word or sentence next becomes eligible for review. `Now` orders
/// before any timestamp, so the derived `Ord` picks never-reviewed material
/// first when taking minima.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DueDate {
    Now,
    At(DateTime<Utc>),
}

impl DueDate {
    pub fn is_due(self, now: DateTime<Utc>) -> bool {
        match self {
            DueDate::Now => true,
            DueDate::At(due) => due <= now,
        }
    }
}

/// Per-learner memory state for one lexeme. The due date is always derived,
/// never stored: `last_success + duration`, or due immediately while the
/// word has no successful review yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordModel {
    last_success: Option<DateTime<Utc>>,
    duration: Duration,
}

impl WordModel {
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            last_success: None,
            duration: config.initial_duration,
        }
    }

    pub fn due_date(&self) -> DueDate {
        match self.last_success {
            Some(at) => DueDate::At(at + self.duration),
            None => DueDate::Now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date().is_due(now)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    /// Apply one graded review. Total over any current state; every branch
    /// is a normal control path.
    ///
    /// * `Perfect` within the planned window grows the interval by 10%;
    ///   recalling a word that was already overdue grows it by 400%.
    ///   A word with no prior success counts as within its window.
    /// * `Hinted` leaves both the interval and the due date untouched.
    /// * `Wrong` restarts from the initial interval.
    pub fn record_review(&mut self, outcome: ReviewOutcome, at: DateTime<Utc>, config: &MemoryConfig) {
        match outcome {
            ReviewOutcome::Perfect => {
                let overdue = match self.due_date() {
                    DueDate::At(due) => at > due,
                    DueDate::Now => false,
                };
                self.duration = if overdue {
                    self.duration * 5
                } else {
                    self.duration + self.duration / 10
                };
                self.last_success = Some(at);
            }
            ReviewOutcome::Hinted => {}
            ReviewOutcome::Wrong => {
                self.duration = config.initial_duration;
                self.last_success = Some(at);
            }
        }
        // Invariant: the interval never falls below the configured floor.
        if self.duration < config.initial_duration {
            self.duration = config.initial_duration;
        }
    }
}
