// File: src/core/channel.rs
use crate::core::edit::{classify_edit, EditKind, EditRecord};
use crate::core::types::{LogProb, Symbol};
use crate::error::{Result, SpellError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Estimates log P(edited | original) for two terms at most one edit apart.
///
/// Arguments read like an assignment, `edited := EDIT(original)`. During
/// correction `edited` is what the user typed and `original` the hypothesis.
pub trait ChannelModel: Send + Sync {
    fn edit_log_prob(&self, edited: &str, original: &str) -> LogProb;
}

/// Character statistics gathered from a labeled typo corpus. Immutable once
/// built; see [`ChannelModelBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditStatistics {
    /// Per-character counts over all originals. The start sentinel is
    /// counted once per original so edits at position 0 have a context.
    unigram_counts: HashMap<Symbol, u64>,
    /// Adjacent pairs over all originals, padded with the sentinel at both ends.
    bigram_counts: HashMap<(Symbol, Symbol), u64>,
    edit_counts: HashMap<EditRecord, u64>,
    /// Distinct real characters seen in originals.
    alphabet_size: usize,
}

impl EditStatistics {
    pub fn unigram_count(&self, symbol: Symbol) -> u64 {
        self.unigram_counts.get(&symbol).copied().unwrap_or(0)
    }

    pub fn bigram_count(&self, first: Symbol, second: Symbol) -> u64 {
        self.bigram_counts.get(&(first, second)).copied().unwrap_or(0)
    }

    pub fn edit_count(&self, edit: &EditRecord) -> u64 {
        self.edit_counts.get(edit).copied().unwrap_or(0)
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Total number of classified edits seen in training.
    pub fn total_edits(&self) -> u64 {
        self.edit_counts.values().sum()
    }
}

/// Accumulates [`EditStatistics`] in one pass over (edited, original) pairs.
#[derive(Debug, Default)]
pub struct ChannelModelBuilder {
    stats: EditStatistics,
    alphabet: HashSet<char>,
}

impl ChannelModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one labeled pair. `edited` must be at most one edit from `original`.
    pub fn add_pair(&mut self, edited: &str, original: &str) {
        if let Some(edit) = classify_edit(edited, original) {
            *self.stats.edit_counts.entry(edit).or_insert(0) += 1;
        }

        *self.stats.unigram_counts.entry(Symbol::Boundary).or_insert(0) += 1;
        let mut prev = Symbol::Boundary;
        for c in original.chars() {
            let current = Symbol::Char(c);
            *self.stats.unigram_counts.entry(current).or_insert(0) += 1;
            *self.stats.bigram_counts.entry((prev, current)).or_insert(0) += 1;
            self.alphabet.insert(c);
            prev = current;
        }
        *self
            .stats
            .bigram_counts
            .entry((prev, Symbol::Boundary))
            .or_insert(0) += 1;
    }

    /// Parses and counts one `edited<TAB>original` training line.
    ///
    /// `line_no` is only used for the error report.
    pub fn add_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields = line.split('\t');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(edited), Some(original), None) => {
                self.add_pair(edited.trim(), original.trim());
                Ok(())
            }
            _ => Err(SpellError::MalformedTrainingLine {
                line_no,
                line: line.to_string(),
            }),
        }
    }

    pub fn build(mut self) -> EditStatistics {
        self.stats.alphabet_size = self.alphabet.len();
        self.stats
    }
}

/// Channel model backed by corpus counts with add-one smoothing.
#[derive(Debug, Clone)]
pub struct EmpiricalChannelModel {
    stats: EditStatistics,
    no_edit_logp: LogProb,
}

impl EmpiricalChannelModel {
    /// `no_edit_prob` must lie strictly between 0 and 1; see
    /// [`CorrectorConfig::validate`](crate::config::CorrectorConfig::validate).
    pub fn new(stats: EditStatistics, no_edit_prob: f64) -> Self {
        Self {
            stats,
            no_edit_logp: no_edit_prob.ln(),
        }
    }

    pub fn statistics(&self) -> &EditStatistics {
        &self.stats
    }
}

impl ChannelModel for EmpiricalChannelModel {
    fn edit_log_prob(&self, edited: &str, original: &str) -> LogProb {
        let Some(edit) = classify_edit(edited, original) else {
            return self.no_edit_logp;
        };

        // An empty training set still has to give finite scores.
        let alphabet = self.stats.alphabet_size.max(1) as f64;
        let count = self.stats.edit_count(&edit) as f64;
        let normalizer = match edit.kind {
            EditKind::Insertion | EditKind::Substitution => {
                self.stats.unigram_count(edit.context) as f64 + alphabet
            }
            EditKind::Deletion | EditKind::Transposition => {
                self.stats.bigram_count(edit.context, Symbol::Char(edit.target)) as f64
                    + alphabet * alphabet
            }
        };
        ((count + 1.0) / (normalizer + alphabet)).ln()
    }
}

/// Ignores character identity: every edit costs the same.
#[derive(Debug, Clone, Copy)]
pub struct UniformChannelModel {
    edit_logp: LogProb,
    no_edit_logp: LogProb,
}

impl UniformChannelModel {
    /// `edit_prob` must lie strictly between 0 and 1.
    pub fn new(edit_prob: f64) -> Self {
        Self {
            edit_logp: edit_prob.ln(),
            no_edit_logp: (1.0 - edit_prob).ln(),
        }
    }
}

impl ChannelModel for UniformChannelModel {
    fn edit_log_prob(&self, edited: &str, original: &str) -> LogProb {
        if edited == original {
            self.no_edit_logp
        } else {
            self.edit_logp
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_EDIT_PROB: f64 = 0.92;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn trained(pairs: &[(&str, &str)]) -> EmpiricalChannelModel {
        let mut builder = ChannelModelBuilder::new();
        for (edited, original) in pairs {
            builder.add_pair(edited, original);
        }
        EmpiricalChannelModel::new(builder.build(), NO_EDIT_PROB)
    }

    #[test]
    fn builder_counts_chars_and_sentinels() {
        let model = trained(&[("speling", "spelling")]);
        let stats = model.statistics();

        assert_eq!(stats.alphabet_size(), 7);
        assert_eq!(stats.unigram_count(Symbol::Boundary), 1);
        assert_eq!(stats.unigram_count(Symbol::Char('l')), 2);
        assert_eq!(stats.bigram_count(Symbol::Boundary, Symbol::Char('s')), 1);
        assert_eq!(stats.bigram_count(Symbol::Char('g'), Symbol::Boundary), 1);
        assert_eq!(stats.total_edits(), 1);
    }

    #[test]
    fn no_edit_uses_the_fixed_constant() {
        let model = trained(&[("speling", "spelling")]);
        for term in ["spelling", "hotdog", "", "zzz"] {
            assert_close(model.edit_log_prob(term, term), NO_EDIT_PROB.ln());
        }
    }

    #[test]
    fn seen_deletion_uses_bigram_normalizer() {
        let model = trained(&[("speling", "spelling")]);
        // count 1, bigram (l, l) = 1, alphabet 7: (1 + 1) / (1 + 49 + 7)
        assert_close(
            model.edit_log_prob("speling", "spelling"),
            (2.0f64 / 57.0).ln(),
        );
    }

    #[test]
    fn unseen_substitution_is_smoothed() {
        let model = trained(&[("speling", "spelling")]);
        // count 0, unigram k = 0, alphabet 7: 1 / (0 + 7 + 7)
        let logp = model.edit_log_prob("spelking", "spelling");
        assert!(logp.is_finite());
        assert_close(logp, (1.0f64 / 14.0).ln());
    }

    #[test]
    fn insertion_at_start_uses_sentinel_unigram() {
        let model = trained(&[("xab", "ab"), ("cd", "cd")]);
        assert_eq!(model.statistics().unigram_count(Symbol::Boundary), 2);
        // count 1, unigram(start) = 2, alphabet 4: (1 + 1) / (2 + 4 + 4)
        assert_close(model.edit_log_prob("xab", "ab"), (2.0f64 / 10.0).ln());
    }

    #[test]
    fn transposition_uses_bigram_normalizer() {
        let model = trained(&[("hte", "the"), ("ht", "ht")]);
        assert_eq!(
            model.statistics().bigram_count(Symbol::Char('h'), Symbol::Char('t')),
            1
        );
        // count 1, bigram (h, t) = 1, alphabet 3: (1 + 1) / (1 + 9 + 3)
        assert_close(model.edit_log_prob("hte", "the"), (2.0f64 / 13.0).ln());
    }

    #[test]
    fn unseen_edits_stay_finite_even_without_training() {
        let model = trained(&[]);
        for (edited, original) in [("ab", "ba"), ("abc", "ab"), ("a", "ab"), ("x", "y")] {
            assert!(model.edit_log_prob(edited, original).is_finite());
        }
    }

    #[test]
    fn frequent_edits_outscore_rare_ones() {
        let model = trained(&[
            ("teh", "the"),
            ("teh", "the"),
            ("teh", "the"),
            ("hte", "the"),
        ]);
        assert!(model.edit_log_prob("teh", "the") > model.edit_log_prob("hte", "the"));
    }

    #[test]
    fn add_line_requires_two_fields() {
        let mut builder = ChannelModelBuilder::new();
        builder.add_line(1, "speling\tspelling\n").unwrap();

        for (line_no, line) in [(2, "speling"), (3, "a\tb\tc"), (4, "")] {
            match builder.add_line(line_no, line) {
                Err(SpellError::MalformedTrainingLine { line_no: n, .. }) => assert_eq!(n, line_no),
                other => panic!("expected a malformed line error, got {other:?}"),
            }
        }
        assert_eq!(builder.build().total_edits(), 1);
    }

    #[test]
    fn uniform_model_ignores_characters() {
        let model = UniformChannelModel::new(0.05);
        assert_close(model.edit_log_prob("teh", "the"), 0.05f64.ln());
        assert_close(model.edit_log_prob("qqq", "the"), 0.05f64.ln());
        assert_close(model.edit_log_prob("the", "the"), 0.95f64.ln());
    }
}
