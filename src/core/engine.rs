use crate::config::{ChannelKind, CorrectorConfig};
use crate::core::candidates::CandidateGenerator;
use crate::core::channel::{ChannelModel, EditStatistics, EmpiricalChannelModel, UniformChannelModel};
use crate::core::prior::PriorModel;
use crate::core::scorer::CandidateScorer;
use crate::core::types::{Candidate, ScoredCandidate};
use crate::error::Result;
use crate::persistence::ModelBundle;

/// Noisy-channel query corrector: picks the in-vocabulary query Q that
/// maximises P(R|Q) * P(Q)^mu for a raw query R.
///
/// Both models are read-only after construction, so a corrector can be
/// shared across threads and queried concurrently.
pub struct SpellCorrector {
    prior: PriorModel,
    channel: Box<dyn ChannelModel>,
    alphabet: Vec<char>,
    config: CorrectorConfig,
}

impl SpellCorrector {
    /// Builds a corrector with the channel strategy named in `config`.
    /// `statistics` are ignored by the uniform channel.
    pub fn new(
        prior: PriorModel,
        statistics: EditStatistics,
        config: CorrectorConfig,
    ) -> Result<Self> {
        let channel: Box<dyn ChannelModel> = match config.channel {
            ChannelKind::Empirical => {
                Box::new(EmpiricalChannelModel::new(statistics, config.no_edit_prob))
            }
            ChannelKind::Uniform => Box::new(UniformChannelModel::new(config.uniform_edit_prob)),
        };
        log::debug!("using the {:?} channel", config.channel);
        Self::with_channel(prior, channel, config)
    }

    /// Builds a corrector around any channel strategy. `config.channel` and
    /// the channel probabilities are not consulted, but must still be valid.
    pub fn with_channel(
        prior: PriorModel,
        channel: Box<dyn ChannelModel>,
        config: CorrectorConfig,
    ) -> Result<Self> {
        config.validate()?;
        log::info!(
            "corrector ready: {} vocabulary terms, mu = {}",
            prior.vocabulary_size(),
            config.mu
        );
        Ok(Self {
            prior: prior.with_lambda(config.lambda),
            channel,
            alphabet: config.alphabet_symbols(),
            config,
        })
    }

    pub fn from_bundle(bundle: ModelBundle, config: CorrectorConfig) -> Result<Self> {
        Self::new(bundle.prior, bundle.statistics, config)
    }

    pub fn prior(&self) -> &PriorModel {
        &self.prior
    }

    pub fn channel(&self) -> &dyn ChannelModel {
        self.channel.as_ref()
    }

    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    fn generator(&self) -> CandidateGenerator<'_> {
        CandidateGenerator::new(&self.prior, self.channel.as_ref(), &self.alphabet)
    }

    fn scorer(&self) -> CandidateScorer<'_> {
        CandidateScorer::new(&self.prior, self.config.mu)
    }

    /// Raw hypotheses for `raw`, before de-duplication and scoring.
    pub fn candidates(&self, raw: &str) -> Vec<Candidate> {
        self.generator().get_candidates(raw)
    }

    /// The `count` best distinct hypotheses, best first.
    pub fn ranked(&self, raw: &str, count: usize) -> Vec<ScoredCandidate> {
        let mut ranked = self.scorer().rank(self.candidates(raw));
        ranked.truncate(count);
        ranked
    }

    /// The most likely intended query, or `raw` verbatim if no in-vocabulary
    /// hypothesis exists. Never fails.
    pub fn correct(&self, raw: &str) -> String {
        self.scorer().select(raw, self.candidates(raw))
    }
}
