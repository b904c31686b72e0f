use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Surface pronunciation forms mapped to their dictionary form. Covers the
/// regular Mandarin sandhi cases: 不 read `bú` before a fourth tone, 一 read
/// `yí`/`yì` depending on the following tone, and common third-tone pairs
/// whose first syllable surfaces as a second tone.
static SANDHI_VARIANTS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("bú", "bù"),
        ("yí", "yī"),
        ("yì", "yī"),
        ("ní hǎo", "nǐ hǎo"),
        ("níhǎo", "nǐhǎo"),
        ("hén hǎo", "hěn hǎo"),
        ("hénhǎo", "hěnhǎo"),
        ("ké yǐ", "kě yǐ"),
        ("kéyǐ", "kěyǐ"),
        ("suó yǐ", "suǒ yǐ"),
        ("suóyǐ", "suǒyǐ"),
        ("wó xiǎng", "wǒ xiǎng"),
        ("wóxiǎng", "wǒxiǎng"),
    ])
});

/// Canonical identity of a word: a normalized key plus the surface form it
/// was first seen with. Identity (equality, hashing, ordering) is the key
/// alone, so two sandhi variants of the same word compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexeme {
    key: String,
    display: String,
}

impl Lexeme {
    /// Canonicalize a surface token. Pure: the same token always yields the
    /// same key. Unmapped tokens normalize to themselves.
    pub fn normalize(token: &str) -> Self {
        let display = token.trim().to_string();
        Self {
            key: canonical_key(&display),
            display,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

fn canonical_key(token: &str) -> String {
    let cleaned = token.to_lowercase().replace(['\'', '’'], "");
    if let Some(&dict) = SANDHI_VARIANTS.get(cleaned.as_str()) {
        return dict.to_string();
    }
    if cleaned.contains(char::is_whitespace) {
        cleaned
            .split_whitespace()
            .map(|syllable| SANDHI_VARIANTS.get(syllable).copied().unwrap_or(syllable))
            .join(" ")
    } else {
        cleaned
    }
}

impl PartialEq for Lexeme {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Lexeme {}

impl Hash for Lexeme {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Lexeme {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Lexeme {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl std::fmt::Display for Lexeme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}
