// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A natural-log probability.
pub type LogProb = f64;

/// One position in a character context: either a real character or the
/// start/end-of-term sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Boundary,
    Char(char),
}

/// How a candidate query was derived from the raw query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPath {
    /// The raw query, every term already in the vocabulary.
    Unchanged,
    /// One term rewritten by one primitive edit.
    SingleEdit,
    /// Two different terms rewritten by one edit each.
    DoubleEdit,
    /// Two adjacent terms joined, undoing a stray space.
    Merge,
    /// A merge followed by one edit on a still-unknown term.
    MergeThenEdit,
    /// The raw query kept so the result set is never empty. Not a hypothesis.
    Fallback,
}

/// A full query hypothesis produced during candidate search.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub query: String,
    /// log P(raw query | this candidate), summed over its terms.
    pub channel_logp: LogProb,
    pub path: EditPath,
}

/// A de-duplicated candidate with its final ranking value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub query: String,
    pub channel_logp: LogProb,
    /// `None` if the prior could not score the query.
    pub prior_logp: Option<LogProb>,
    pub score: LogProb,
    pub path: EditPath,
}

/// Collapses runs of whitespace to single spaces and trims the ends.
pub fn normalize_query(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
