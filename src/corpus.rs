use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::lexeme::Lexeme;

/// Position of a sentence in corpus order. Corpus order is the tie-break
/// order everywhere in this crate.
pub type SentenceId = usize;

/// An ordered sequence of lexemes as parsed from source text. Word order
/// matters for display only; due-date computation and sequencing work on
/// the word set. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sentence {
    lexemes: Vec<Lexeme>,
}

impl Sentence {
    /// Tokenization seam: sentence splitting happens outside this crate,
    /// the raw tokens of one sentence come in here.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lexemes: tokens
                .into_iter()
                .map(|token| Lexeme::normalize(token.as_ref()))
                .collect(),
        }
    }

    pub fn lexemes(&self) -> &[Lexeme] {
        &self.lexemes
    }

    /// The distinct words of the sentence, first occurrence order.
    pub fn words(&self) -> impl Iterator<Item = &Lexeme> {
        self.lexemes.iter().unique()
    }

    pub fn contains(&self, lexeme: &Lexeme) -> bool {
        self.lexemes.contains(lexeme)
    }

    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }
}

impl std::fmt::Display for Sentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lexemes.iter().map(Lexeme::display).join(" "))
    }
}

/// Ordered sequence of sentences as parsed from source text; static for
/// the lifetime of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    sentences: Vec<Sentence>,
}

impl Corpus {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

impl FromIterator<Sentence> for Corpus {
    fn from_iter<T: IntoIterator<Item = Sentence>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Build-once lookup from word to the sentences containing it. Pure lookup
/// structure, immutable after construction; used by the sequencer and the
/// live-session queries.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    corpus: Corpus,
    containing: HashMap<String, Vec<SentenceId>>,
}

impl CorpusIndex {
    pub fn new(corpus: Corpus) -> Self {
        let mut containing: HashMap<String, Vec<SentenceId>> = HashMap::new();
        for (id, sentence) in corpus.sentences().iter().enumerate() {
            for word in sentence.words() {
                containing.entry(word.key().to_string()).or_default().push(id);
            }
        }
        Self { corpus, containing }
    }

    /// Sentences containing the given word, in corpus order.
    pub fn containing_sentences(
        &self,
        lexeme: &Lexeme,
    ) -> impl Iterator<Item = (SentenceId, &Sentence)> {
        self.containing
            .get(lexeme.key())
            .into_iter()
            .flatten()
            .map(|&id| (id, &self.corpus.sentences()[id]))
    }

    pub fn sentence(&self, id: SentenceId) -> &Sentence {
        &self.corpus.sentences()[id]
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }
}
