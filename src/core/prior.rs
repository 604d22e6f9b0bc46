// File: src/core/prior.rs
use crate::core::types::LogProb;
use crate::error::{Result, SpellError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unigram/bigram word statistics with interpolated bigram smoothing.
///
/// Vocabulary membership is presence in the unigram table. Unigram
/// estimates are deliberately unsmoothed, so callers must only score terms
/// already known to be in the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorModel {
    unigram_counts: HashMap<String, u64>,
    /// Maps w1 -> (w2 -> count(w1 w2)).
    bigram_counts: HashMap<String, HashMap<String, u64>>,
    total_tokens: u64,
    lambda: f64,
}

impl PriorModel {
    /// Returns the same counts with a different interpolation weight.
    pub fn with_lambda(self, lambda: f64) -> Self {
        Self { lambda, ..self }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.unigram_counts.contains_key(term)
    }

    pub fn unigram_count(&self, term: &str) -> u64 {
        self.unigram_counts.get(term).copied().unwrap_or(0)
    }

    pub fn bigram_count(&self, first: &str, second: &str) -> u64 {
        self.bigram_counts
            .get(first)
            .and_then(|followers| followers.get(second))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn vocabulary_size(&self) -> usize {
        self.unigram_counts.len()
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    fn unigram_prob(&self, term: &str) -> Result<f64> {
        match self.unigram_count(term) {
            0 => Err(SpellError::UnknownTerm(term.to_string())),
            count => Ok(count as f64 / self.total_tokens as f64),
        }
    }

    /// log(count(w) / total). Fails for unseen terms.
    pub fn unigram_log_prob(&self, term: &str) -> Result<LogProb> {
        Ok(self.unigram_prob(term)?.ln())
    }

    /// log(lambda * P(w2) + (1 - lambda) * count(w1 w2) / count(w1)).
    ///
    /// Fails if either word is unseen: an unseen `w1` has no conditional
    /// estimate, an unseen `w2` would give log 0.
    pub fn bigram_log_prob(&self, first: &str, second: &str) -> Result<LogProb> {
        let first_count = match self.unigram_count(first) {
            0 => return Err(SpellError::UnknownTerm(first.to_string())),
            count => count as f64,
        };
        let unigram = self.unigram_prob(second)?;
        let conditional = self.bigram_count(first, second) as f64 / first_count;
        Ok((self.lambda * unigram + (1.0 - self.lambda) * conditional).ln())
    }

    /// Unigram log-prob of the first term plus bigram log-probs of each
    /// consecutive pair.
    pub fn query_log_prob(&self, query: &str) -> Result<LogProb> {
        let terms: Vec<&str> = query.split_whitespace().collect();
        let first = terms.first().ok_or(SpellError::EmptyQuery)?;
        let mut logp = self.unigram_log_prob(first)?;
        for pair in terms.windows(2) {
            logp += self.bigram_log_prob(pair[0], pair[1])?;
        }
        Ok(logp)
    }
}

/// Accumulates word counts in one pass over a corpus, then freezes them
/// into a [`PriorModel`].
#[derive(Debug, Default)]
pub struct PriorModelBuilder {
    unigram_counts: HashMap<String, u64>,
    bigram_counts: HashMap<String, HashMap<String, u64>>,
    total_tokens: u64,
    last_token: Option<String>,
}

impl PriorModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the whitespace-separated tokens of one document. Bigrams chain
    /// across document boundaries within a single build.
    pub fn add_document(&mut self, text: &str) {
        for token in text.split_whitespace() {
            *self.unigram_counts.entry(token.to_string()).or_insert(0) += 1;
            self.total_tokens += 1;
            if let Some(prev) = self.last_token.take() {
                *self
                    .bigram_counts
                    .entry(prev)
                    .or_default()
                    .entry(token.to_string())
                    .or_insert(0) += 1;
            }
            self.last_token = Some(token.to_string());
        }
    }

    pub fn build(self, lambda: f64) -> PriorModel {
        PriorModel {
            unigram_counts: self.unigram_counts,
            bigram_counts: self.bigram_counts,
            total_tokens: self.total_tokens,
            lambda,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAMBDA: f64 = 0.05;

    fn model() -> PriorModel {
        let mut builder = PriorModelBuilder::new();
        builder.add_document("the cat sat");
        builder.add_document("the cat ran");
        builder.build(LAMBDA)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn counts_tokens_and_chains_bigrams_across_documents() {
        let model = model();
        assert_eq!(model.total_tokens(), 6);
        assert_eq!(model.vocabulary_size(), 4);
        assert_eq!(model.unigram_count("the"), 2);
        assert_eq!(model.bigram_count("the", "cat"), 2);
        assert_eq!(model.bigram_count("sat", "the"), 1);
        assert_eq!(model.bigram_count("cat", "the"), 0);
        assert!(model.contains("ran"));
        assert!(!model.contains("dog"));
    }

    #[test]
    fn unigram_log_prob_is_relative_frequency() {
        assert_close(model().unigram_log_prob("the").unwrap(), (2.0f64 / 6.0).ln());
    }

    #[test]
    fn unigram_of_unseen_term_fails() {
        match model().unigram_log_prob("dog") {
            Err(SpellError::UnknownTerm(term)) => assert_eq!(term, "dog"),
            other => panic!("expected UnknownTerm, got {other:?}"),
        }
    }

    #[test]
    fn bigram_log_prob_interpolates() {
        let model = model();
        let seen = LAMBDA * 2.0 / 6.0 + (1.0 - LAMBDA) * 2.0 / 2.0;
        assert_close(model.bigram_log_prob("the", "cat").unwrap(), seen.ln());

        let unseen_pair = LAMBDA * 2.0 / 6.0;
        assert_close(model.bigram_log_prob("cat", "the").unwrap(), unseen_pair.ln());

        assert!(model.bigram_log_prob("dog", "cat").is_err());
        assert!(model.bigram_log_prob("cat", "dog").is_err());
    }

    #[test]
    fn query_log_prob_sums_unigram_and_bigrams() {
        let model = model();
        let expected = (2.0f64 / 6.0).ln()
            + (LAMBDA * 2.0 / 6.0 + (1.0 - LAMBDA) * 2.0 / 2.0).ln()
            + (LAMBDA * 1.0 / 6.0 + (1.0 - LAMBDA) * 1.0 / 2.0).ln();
        assert_close(model.query_log_prob("the  cat sat").unwrap(), expected);
    }

    #[test]
    fn empty_query_is_rejected() {
        assert!(matches!(model().query_log_prob("   "), Err(SpellError::EmptyQuery)));
    }

    #[test]
    fn with_lambda_keeps_counts() {
        let model = model().with_lambda(0.5);
        assert_eq!(model.lambda(), 0.5);
        assert_eq!(model.total_tokens(), 6);
    }
}
