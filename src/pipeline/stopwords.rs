//! Stopword filtering.
//!
//! Tokens are maximal whitespace-delimited substrings; punctuation stays
//! attached, so `"the,"` is *not* the stopword `"the"`. A token is dropped when
//! its lowercase form is in the exclusion set, and survivors are re-joined
//! with single spaces. Line breaks and runs of whitespace are not preserved.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// The classic English word-cloud stopword list.
const BASELINE: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't", "having",
    "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself", "him",
    "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm", "i've", "if",
    "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k", "let's", "like", "me",
    "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't",
    "since", "so", "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
    "themselves", "then", "there", "there's", "therefore", "these", "they", "they'd", "they'll",
    "they're", "they've", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's",
    "when", "when's", "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's",
    "with", "won't", "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've",
    "your", "yours", "yourself", "yourselves",
];

/// Frequent low-value words clients can offer as optional extra stopwords.
pub const SUGGESTED_EXTRA_STOPWORDS: &[&str] = &[
    "said", "mr", "mrs", "one", "two", "three", "also", "say", "would", "could", "us", "may",
    "might", "shall", "must", "need", "know", "go", "get", "like", "see", "tell", "think", "come",
    "take",
];

static BASELINE_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| BASELINE.iter().copied().collect());

/// Returns `true` if `word` (already lowercase) is in the baseline list.
pub fn is_baseline_stopword(word: &str) -> bool {
    BASELINE_SET.contains(word)
}

/// An immutable set of lowercase words to exclude.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// The baseline list only.
    pub fn standard() -> Self {
        Self {
            words: BASELINE.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// No stopwords at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Baseline ∪ `extra` when `use_standard` is set, otherwise just `extra`.
    pub fn build<I, S>(use_standard: bool, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = if use_standard {
            Self::standard()
        } else {
            Self::empty()
        };
        base.with_extra(extra)
    }

    /// Add extra words; they are lowercased and trimmed, blanks are ignored.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in extra {
            let w = word.as_ref().trim().to_lowercase();
            if !w.is_empty() {
                self.words.insert(w);
            }
        }
        self
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Drop every token whose lowercase form is in the set.
    pub fn filter(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|token| !self.contains(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Remove baseline stopwords plus `extra_words` from `text`.
pub fn filter_stopwords<I, S>(text: &str, extra_words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    StopwordSet::standard().with_extra(extra_words).filter(text)
}
