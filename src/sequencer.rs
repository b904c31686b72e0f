use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::corpus::{CorpusIndex, Sentence, SentenceId};
use crate::error::{ErudifyError, Result};
use crate::lexeme::Lexeme;

/// Target vocabulary, most to least frequent. Externally supplied and
/// immutable; each lexeme may appear at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyList {
    words: Vec<Lexeme>,
    ranks: HashMap<String, usize>,
}

impl FrequencyList {
    pub fn new(words: Vec<Lexeme>) -> Result<Self> {
        let mut ranks = HashMap::with_capacity(words.len());
        for (rank, word) in words.iter().enumerate() {
            if ranks.insert(word.key().to_string(), rank).is_some() {
                return Err(ErudifyError::DuplicateFrequencyEntry {
                    key: word.key().to_string(),
                });
            }
        }
        Ok(Self { words, ranks })
    }

    /// Position in frequency order, 0 = most frequent. `None` for words
    /// outside the target vocabulary.
    pub fn rank(&self, lexeme: &Lexeme) -> Option<usize> {
        self.ranks.get(lexeme.key()).copied()
    }

    pub fn contains(&self, lexeme: &Lexeme) -> bool {
        self.ranks.contains_key(lexeme.key())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lexeme> {
        self.words.iter()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// The words a planning run considers already covered. Seeded from a
/// caller-supplied baseline, grows monotonically while the sequencer runs,
/// and is scoped to that run; the caller re-seeds for the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownWords {
    keys: HashSet<String>,
}

impl KnownWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed<'a, I>(baseline: I) -> Self
    where
        I: IntoIterator<Item = &'a Lexeme>,
    {
        Self {
            keys: baseline
                .into_iter()
                .map(|lexeme| lexeme.key().to_string())
                .collect(),
        }
    }

    pub fn contains(&self, lexeme: &Lexeme) -> bool {
        self.keys.contains(lexeme.key())
    }

    /// Returns true if the word was not already known.
    pub fn insert(&mut self, lexeme: &Lexeme) -> bool {
        self.keys.insert(lexeme.key().to_string())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// How well timed the chosen sentence is for its target word. Ordered from
/// best to last resort; candidate selection minimizes this tag, so the
/// diagnostics and the ordering logic share one source of truth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
pub enum Introduction {
    /// Every other word of the sentence is already known.
    Ideal,
    /// The sentence drags in words from the frequency list before their
    /// turn; the learner needs them anyway.
    Early,
    /// At least one word of the sentence is outside the target vocabulary.
    OffList,
}

/// One step of the plan: the sentence chosen to introduce a target word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub target: Lexeme,
    pub sentence: SentenceId,
    pub introduction: Introduction,
}

/// Ordered exercise plan plus the diagnostics a reporting layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePlan {
    pub entries: Vec<PlanEntry>,
    /// Frequency-list words pulled in by a chosen sentence before their
    /// own turn came up.
    pub introduced_too_soon: BTreeSet<Lexeme>,
    /// Words outside the frequency list that a chosen sentence could not
    /// avoid introducing.
    pub introduced_needlessly: BTreeSet<Lexeme>,
    /// Frequency-list words contained in no corpus sentence at all.
    pub unresolved: Vec<Lexeme>,
}

/// Greedy single pass over the frequency list: for each target word not yet
/// known, pick the sentence introducing it with the fewest mis-timed extra
/// words. Deterministic in its three inputs; an empty corpus or frequency
/// list yields an empty plan.
///
/// Every word of a chosen sentence joins `known` the moment the sentence is
/// recorded: reviewing a sentence introduces all of its words, not just the
/// target.
pub fn sequence(
    index: &CorpusIndex,
    list: &FrequencyList,
    known: &mut KnownWords,
) -> SequencePlan {
    let mut plan = SequencePlan::default();
    for (position, target) in list.iter().enumerate() {
        if known.contains(target) {
            continue;
        }
        let candidate = index
            .containing_sentences(target)
            .map(|(id, sentence)| (classify(sentence, target, known, list), sentence.len(), id))
            .min_by_key(|&(introduction, len, id)| (introduction, len, id));
        let Some((introduction, _, id)) = candidate else {
            debug!("no sentence contains {:?}", target.key());
            plan.unresolved.push(target.clone());
            continue;
        };
        for word in index.sentence(id).words() {
            if known.insert(word) && word != target {
                match list.rank(word) {
                    Some(rank) if rank > position => {
                        plan.introduced_too_soon.insert(word.clone());
                    }
                    Some(_) => {}
                    None => {
                        plan.introduced_needlessly.insert(word.clone());
                    }
                }
            }
        }
        debug!(
            "introduce {:?} with sentence {id} ({introduction})",
            target.key()
        );
        plan.entries.push(PlanEntry {
            target: target.clone(),
            sentence: id,
            introduction,
        });
    }
    info!(
        "sequenced {}/{} words: {} introduced too soon, {} off-list, {} unresolved",
        plan.entries.len(),
        list.len(),
        plan.introduced_too_soon.len(),
        plan.introduced_needlessly.len(),
        plan.unresolved.len()
    );
    plan
}

/// Rank a candidate sentence by its extra-new words: the words that are
/// neither known nor the target itself.
fn classify(
    sentence: &Sentence,
    target: &Lexeme,
    known: &KnownWords,
    list: &FrequencyList,
) -> Introduction {
    let mut introduction = Introduction::Ideal;
    for word in sentence.words() {
        if word == target || known.contains(word) {
            continue;
        }
        if !list.contains(word) {
            return Introduction::OffList;
        }
        introduction = Introduction::Early;
    }
    introduction
}
