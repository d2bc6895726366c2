//! Word-frequency counting.
//!
//! Counting uses the same whitespace tokenisation as the stopword filter but
//! compares tokens exactly: `"Cat"` and `"cat"` are separate rows even though
//! the filter treats them alike.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the word table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRow {
    pub word: String,
    pub count: usize,
}

/// Word → count, kept in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordCount {
    rows: Vec<WordRow>,
}

impl WordCount {
    /// Count every whitespace-delimited token of `text`.
    pub fn from_text(text: &str) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut rows: Vec<WordRow> = Vec::new();

        for token in text.split_whitespace() {
            match index.get(token) {
                Some(&i) => rows[i].count += 1,
                None => {
                    index.insert(token, rows.len());
                    rows.push(WordRow {
                        word: token.to_string(),
                        count: 1,
                    });
                }
            }
        }

        Self { rows }
    }

    /// Rows in order of first occurrence.
    pub fn rows(&self) -> &[WordRow] {
        &self.rows
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.rows.iter().find(|r| r.word == word).map(|r| r.count)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all counts, i.e. the number of tokens counted.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// The `n` most frequent words; ties keep first-occurrence order.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut sorted: Vec<&WordRow> = self.rows.iter().collect();
        // stable sort keeps first-occurrence order among equal counts
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
            .into_iter()
            .take(n)
            .map(|r| (r.word.clone(), r.count))
            .collect()
    }

    pub fn into_map(self) -> HashMap<String, usize> {
        self.rows.into_iter().map(|r| (r.word, r.count)).collect()
    }
}

/// Count the words of `text`.
pub fn count(text: &str) -> WordCount {
    WordCount::from_text(text)
}
