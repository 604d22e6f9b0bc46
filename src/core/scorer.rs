// File: src/core/scorer.rs
use crate::core::prior::PriorModel;
use crate::core::types::{normalize_query, Candidate, EditPath, LogProb, ScoredCandidate};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Combines channel and prior log-probabilities: channel + mu * prior.
pub struct CandidateScorer<'a> {
    prior: &'a PriorModel,
    mu: f64,
}

impl<'a> CandidateScorer<'a> {
    pub fn new(prior: &'a PriorModel, mu: f64) -> Self {
        Self { prior, mu }
    }

    /// Final ranking value. Falls back to the channel term alone if the
    /// prior cannot score `query`.
    pub fn score(&self, query: &str, channel_logp: LogProb) -> LogProb {
        self.score_parts(query, channel_logp).1
    }

    fn score_parts(&self, query: &str, channel_logp: LogProb) -> (Option<LogProb>, LogProb) {
        match self.prior.query_log_prob(query) {
            Ok(prior_logp) => (Some(prior_logp), channel_logp + self.mu * prior_logp),
            Err(err) => {
                log::debug!("prior cannot score {query:?}: {err}");
                (None, channel_logp)
            }
        }
    }

    /// De-duplicates hypotheses by normalised text and scores them, sorted
    /// best first. Ties keep generation order.
    ///
    /// For a repeated text the record with the higher channel log-probability
    /// wins; on equal values the first one seen is kept. Fallback entries and
    /// texts that normalise to nothing are dropped.
    pub fn rank(&self, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        let mut best: IndexMap<String, Candidate> = IndexMap::new();
        for candidate in candidates {
            if candidate.path == EditPath::Fallback {
                continue;
            }
            let key = normalize_query(&candidate.query);
            if key.is_empty() {
                continue;
            }
            match best.entry(key) {
                Entry::Occupied(mut known) => {
                    if candidate.channel_logp > known.get().channel_logp {
                        known.insert(candidate);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
            }
        }

        let mut scored: Vec<ScoredCandidate> = best
            .into_iter()
            .map(|(query, candidate)| {
                let (prior_logp, score) = self.score_parts(&query, candidate.channel_logp);
                ScoredCandidate {
                    query,
                    channel_logp: candidate.channel_logp,
                    prior_logp,
                    score,
                    path: candidate.path,
                }
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// The best-scoring hypothesis, or `raw` unchanged if there is none.
    pub fn select(&self, raw: &str, candidates: Vec<Candidate>) -> String {
        match self.rank(candidates).into_iter().next() {
            Some(best) => {
                log::debug!(
                    "corrected {raw:?} -> {:?} via {:?} (score {:.4})",
                    best.query,
                    best.path,
                    best.score
                );
                best.query
            }
            None => {
                if !raw.trim().is_empty() {
                    log::warn!("no in-vocabulary candidate for {raw:?}; keeping it unchanged");
                }
                raw.to_string()
            }
        }
    }
}
