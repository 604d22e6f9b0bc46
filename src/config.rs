// File: src/config.rs
use crate::error::{Result, SpellError};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const DEFAULT_MU: f64 = 1.0;
const DEFAULT_LAMBDA: f64 = 0.05;
const DEFAULT_NO_EDIT_PROB: f64 = 0.92;
const DEFAULT_UNIFORM_EDIT_PROB: f64 = 0.05;

/// Symbols tried for insertion and substitution during candidate search.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789 ,.-'";

/// Which edit-probability strategy the corrector scores with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Character-level counts from a labeled typo corpus.
    Empirical,
    /// Fixed probability for any edit; used for ablation.
    Uniform,
}

/// Fixed tuning parameters. Set once when the corrector is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    /// Exponent on the prior, P(Q)^mu.
    pub mu: f64,
    /// Weight of the unigram estimate in bigram interpolation.
    pub lambda: f64,
    /// Probability that a term was typed without any edit.
    pub no_edit_prob: f64,
    /// Probability of any single edit under the uniform channel.
    pub uniform_edit_prob: f64,
    pub alphabet: String,
    pub channel: ChannelKind,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            mu: DEFAULT_MU,
            lambda: DEFAULT_LAMBDA,
            no_edit_prob: DEFAULT_NO_EDIT_PROB,
            uniform_edit_prob: DEFAULT_UNIFORM_EDIT_PROB,
            alphabet: DEFAULT_ALPHABET.to_string(),
            channel: ChannelKind::Empirical,
        }
    }
}

impl CorrectorConfig {
    /// Reads a JSON config. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects parameters that would make a log-probability infinite or NaN.
    ///
    /// Both channel probabilities must lie strictly between 0 and 1, lambda
    /// in (0, 1] and mu must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        check_open_unit("no_edit_prob", self.no_edit_prob)?;
        check_open_unit("uniform_edit_prob", self.uniform_edit_prob)?;
        if !(self.lambda > 0.0 && self.lambda <= 1.0) {
            return Err(SpellError::InvalidConfig(format!(
                "lambda must be in (0, 1], got {}",
                self.lambda
            )));
        }
        if !(self.mu.is_finite() && self.mu >= 0.0) {
            return Err(SpellError::InvalidConfig(format!(
                "mu must be finite and non-negative, got {}",
                self.mu
            )));
        }
        Ok(())
    }

    /// The alphabet as a de-duplicated list of symbols, in declaration order.
    pub fn alphabet_symbols(&self) -> Vec<char> {
        self.alphabet
            .chars()
            .collect::<IndexSet<char>>()
            .into_iter()
            .collect()
    }
}

fn check_open_unit(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(SpellError::InvalidConfig(format!(
            "{name} must be strictly between 0 and 1, got {value}"
        )))
    }
}
