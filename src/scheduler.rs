use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::corpus::Sentence;
use crate::lexeme::Lexeme;
use crate::memory::{DueDate, MemoryConfig, ReviewOutcome, WordModel};
use crate::sequencer::FrequencyList;

/// One learner's complete scheduling state: a word model per lexeme ever
/// reviewed, plus the scheduling configuration. The caller owns one value
/// per learner and serializes it before/after sessions; durable storage is
/// an external collaborator.
///
/// Reviews for the same learner are expected to arrive one at a time; no
/// operation here blocks or touches I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerState {
    config: MemoryConfig,
    words: HashMap<String, WordModel>,
}

/// Snapshot of how far a learner has come against a target vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerProgress {
    /// Unique words on the frequency list.
    pub total_words: usize,
    /// List words reviewed and not yet due again.
    pub known_words: usize,
    /// List words reviewed and due for repetition.
    pub words_to_review: usize,
    /// Sentences containing at least one list word whose every word has
    /// been reviewed at least once.
    pub unlocked_sentences: usize,
}

impl LearnerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            config,
            words: HashMap::new(),
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Whether the learner has ever reviewed this word.
    pub fn seen(&self, lexeme: &Lexeme) -> bool {
        self.words.contains_key(lexeme.key())
    }

    pub fn word_model(&self, lexeme: &Lexeme) -> Option<&WordModel> {
        self.words.get(lexeme.key())
    }

    /// A lexeme the learner has not encountered is due immediately.
    pub fn word_due_date(&self, lexeme: &Lexeme) -> DueDate {
        self.words
            .get(lexeme.key())
            .map(WordModel::due_date)
            .unwrap_or(DueDate::Now)
    }

    pub fn is_due(&self, lexeme: &Lexeme, now: DateTime<Utc>) -> bool {
        self.word_due_date(lexeme).is_due(now)
    }

    /// Apply one graded review. An unknown lexeme is treated as a
    /// first-ever review, never an error.
    pub fn record_review(&mut self, lexeme: &Lexeme, outcome: ReviewOutcome, at: DateTime<Utc>) {
        let config = &self.config;
        let model = self
            .words
            .entry(lexeme.key().to_string())
            .or_insert_with(|| WordModel::new(config));
        model.record_review(outcome, at, config);
        debug!(
            "review of {}: {outcome}, next interval {}s",
            lexeme.key(),
            model.duration().num_seconds()
        );
    }

    /// Weakest-link aggregation: a sentence is only as known as its least
    /// known word, so its due date is the minimum over its word models.
    /// Read-only; words the learner has never seen contribute `Now`
    /// without materializing a model.
    pub fn sentence_due_date(&self, sentence: &Sentence) -> DueDate {
        sentence
            .words()
            .map(|word| self.word_due_date(word))
            .min()
            .unwrap_or(DueDate::Now)
    }

    /// The most urgent sentence: minimum due date, ties broken by corpus
    /// order. `None` only for an empty slice.
    pub fn next_due_sentence<'a>(&self, sentences: &'a [Sentence]) -> Option<&'a Sentence> {
        sentences
            .iter()
            .min_by_key(|sentence| self.sentence_due_date(sentence))
    }

    pub fn progress(
        &self,
        sentences: &[Sentence],
        list: &FrequencyList,
        now: DateTime<Utc>,
    ) -> LearnerProgress {
        let known_words = list
            .iter()
            .filter(|word| self.seen(word) && !self.is_due(word, now))
            .count();
        let words_to_review = list
            .iter()
            .filter(|word| self.seen(word) && self.is_due(word, now))
            .count();
        let unlocked_sentences = sentences
            .iter()
            .filter(|sentence| sentence.words().any(|word| list.contains(word)))
            .filter(|sentence| sentence.words().all(|word| self.seen(word)))
            .count();
        LearnerProgress {
            total_words: list.len(),
            known_words,
            words_to_review,
            unlocked_sentences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn lex(token: &str) -> Lexeme {
        Lexeme::normalize(token)
    }

    fn list(words: &[&str]) -> FrequencyList {
        FrequencyList::new(words.iter().map(|w| lex(w)).collect()).unwrap()
    }

    #[test]
    fn unknown_lexeme_is_a_first_review() {
        let mut learner = LearnerState::new();
        assert!(learner.is_due(&lex("māo"), now()));

        learner.record_review(&lex("māo"), ReviewOutcome::Perfect, now());
        let model = learner.word_model(&lex("māo")).unwrap();
        assert_eq!(model.duration(), Duration::milliseconds(5500));
        assert!(!learner.is_due(&lex("māo"), now()));
    }

    #[test]
    fn review_reaches_the_model_through_a_sandhi_variant() {
        let mut learner = LearnerState::new();
        learner.record_review(&lex("bú"), ReviewOutcome::Perfect, now());
        assert!(learner.seen(&lex("bù")));
        assert!(!learner.is_due(&lex("bù"), now()));
    }

    #[test]
    fn sentence_due_date_is_the_minimum_over_words() {
        let mut learner = LearnerState::new();
        let sentence = Sentence::from_tokens(["wǒ", "shì", "xuéshēng"]);

        // Never reviewing any word keeps the sentence perpetually due.
        assert_eq!(learner.sentence_due_date(&sentence), DueDate::Now);

        learner.record_review(&lex("wǒ"), ReviewOutcome::Perfect, now());
        learner.record_review(&lex("shì"), ReviewOutcome::Perfect, now());
        assert_eq!(learner.sentence_due_date(&sentence), DueDate::Now);

        // The last word reviewed has the shortest interval and governs.
        learner.record_review(&lex("xuéshēng"), ReviewOutcome::Wrong, now());
        assert_eq!(
            learner.sentence_due_date(&sentence),
            DueDate::At(now() + Duration::seconds(5))
        );
    }

    #[test]
    fn aggregation_is_read_only() {
        let learner = LearnerState::new();
        let sentence = Sentence::from_tokens(["wǒ", "shì"]);
        learner.sentence_due_date(&sentence);
        assert!(!learner.seen(&lex("wǒ")));
    }

    #[test]
    fn next_due_sentence_breaks_ties_by_corpus_order() {
        let learner = LearnerState::new();
        let sentences = vec![
            Sentence::from_tokens(["wǒ", "shì"]),
            Sentence::from_tokens(["nǐ", "hǎo"]),
        ];
        // Both sentences are equally due (all words unseen); the first wins.
        assert_eq!(
            learner.next_due_sentence(&sentences),
            Some(&sentences[0])
        );
        assert_eq!(learner.next_due_sentence(&[]), None);
    }

    #[test]
    fn next_due_sentence_prefers_the_overdue_one() {
        let mut learner = LearnerState::new();
        let sentences = vec![
            Sentence::from_tokens(["wǒ", "shì"]),
            Sentence::from_tokens(["nǐ", "hǎo"]),
        ];
        for token in ["wǒ", "shì", "nǐ", "hǎo"] {
            learner.record_review(&lex(token), ReviewOutcome::Perfect, now());
        }
        // Push the first sentence's words far into the future.
        for token in ["wǒ", "shì"] {
            learner.record_review(&lex(token), ReviewOutcome::Perfect, now() + Duration::hours(1));
        }
        assert_eq!(
            learner.next_due_sentence(&sentences),
            Some(&sentences[1])
        );
    }

    #[test]
    fn progress_counts() {
        let mut learner = LearnerState::new();
        let sentences = vec![
            Sentence::from_tokens(["wǒ", "shì"]),
            Sentence::from_tokens(["māo", "hǎo"]),
            Sentence::from_tokens(["gǒu", "pǎo"]),
        ];
        let list = list(&["wǒ", "shì", "māo"]);

        learner.record_review(&lex("wǒ"), ReviewOutcome::Perfect, now());
        learner.record_review(&lex("shì"), ReviewOutcome::Wrong, now() - Duration::hours(1));

        let progress = learner.progress(&sentences, &list, now());
        assert_eq!(progress.total_words, 3);
        assert_eq!(progress.known_words, 1); // wǒ, due in the future
        assert_eq!(progress.words_to_review, 1); // shì, overdue
        assert_eq!(progress.unlocked_sentences, 1); // wǒ shì, both seen
    }

    #[test]
    fn learner_state_round_trips_through_serde() {
        let mut learner = LearnerState::new();
        learner.record_review(&lex("wǒ"), ReviewOutcome::Perfect, now());
        learner.record_review(&lex("māo"), ReviewOutcome::Wrong, now());

        let json = serde_json::to_string(&learner).unwrap();
        let loaded: LearnerState = serde_json::from_str(&json).unwrap();
        assert_eq!(learner, loaded);
    }
}
