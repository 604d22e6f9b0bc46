// File: src/core/candidates.rs
use crate::core::channel::ChannelModel;
use crate::core::prior::PriorModel;
use crate::core::types::{Candidate, EditPath, LogProb};
use indexmap::IndexSet;

/// One term of a hypothesis together with the channel log-probability of
/// the raw text it stands in for.
#[derive(Debug, Clone)]
struct Slot {
    text: String,
    logp: LogProb,
}

impl Slot {
    fn new(text: impl Into<String>, logp: LogProb) -> Self {
        Self {
            text: text.into(),
            logp,
        }
    }
}

/// Enumerates vocabulary-resident hypotheses within two edits of a raw query.
///
/// Each hypothesis is built by replacing slots of a cloned term sequence;
/// its channel log-probability is the sum of its slots. Branching to a second
/// edit only happens on the first term that is still out of vocabulary,
/// which keeps the search linear in query length times alphabet size.
pub struct CandidateGenerator<'a> {
    prior: &'a PriorModel,
    channel: &'a dyn ChannelModel,
    alphabet: &'a [char],
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(prior: &'a PriorModel, channel: &'a dyn ChannelModel, alphabet: &'a [char]) -> Self {
        Self {
            prior,
            channel,
            alphabet,
        }
    }

    /// All hypotheses for `raw`, in generation order, plus the raw query as
    /// a [`EditPath::Fallback`] entry when it is not itself a hypothesis.
    ///
    /// The same text may appear more than once through different edit
    /// paths; de-duplication is left to the scorer.
    pub fn get_candidates(&self, raw: &str) -> Vec<Candidate> {
        let terms: Vec<&str> = raw.split_whitespace().collect();
        let unchanged: Vec<Slot> = terms
            .iter()
            .map(|term| Slot::new(*term, self.channel.edit_log_prob(term, term)))
            .collect();
        let term_edits: Vec<Vec<(String, LogProb)>> =
            terms.iter().map(|term| self.vocabulary_edits(term)).collect();

        let mut candidates = Vec::new();

        if !terms.is_empty() && self.first_oov(&unchanged).is_none() {
            candidates.push(assemble(&unchanged, EditPath::Unchanged));
        }

        for (i, edits) in term_edits.iter().enumerate() {
            for (edit, logp) in edits {
                let mut slots = unchanged.clone();
                slots[i] = Slot::new(edit.as_str(), *logp);
                match self.first_oov(&slots) {
                    None => candidates.push(assemble(&slots, EditPath::SingleEdit)),
                    Some(j) => {
                        for (second, second_logp) in &term_edits[j] {
                            let mut twice = slots.clone();
                            twice[j] = Slot::new(second.as_str(), *second_logp);
                            if self.first_oov(&twice).is_none() {
                                candidates.push(assemble(&twice, EditPath::DoubleEdit));
                            }
                        }
                    }
                }
            }
        }

        for i in 1..terms.len() {
            self.push_merges(&terms, &unchanged, &term_edits, i, &mut candidates);
        }

        if !candidates
            .iter()
            .any(|candidate| candidate.path == EditPath::Unchanged)
        {
            candidates.push(Candidate {
                query: raw.to_string(),
                channel_logp: unchanged.iter().map(|slot| slot.logp).sum(),
                path: EditPath::Fallback,
            });
        }

        log::debug!(
            "generated {} candidates for {:?} ({} terms)",
            candidates.len(),
            raw,
            terms.len()
        );
        candidates
    }

    /// Joins terms `i - 1` and `i`, then repairs the first unknown term left
    /// over, if any. Numbers are never joined to a neighbour.
    fn push_merges(
        &self,
        terms: &[&str],
        unchanged: &[Slot],
        term_edits: &[Vec<(String, LogProb)>],
        i: usize,
        candidates: &mut Vec<Candidate>,
    ) {
        if is_number(terms[i - 1]) || is_number(terms[i]) {
            return;
        }
        let merged = format!("{}{}", terms[i - 1], terms[i]);
        let spaced = format!("{} {}", terms[i - 1], terms[i]);
        let merge_logp = self.channel.edit_log_prob(&spaced, &merged);
        let merged_at = i - 1;

        let mut slots: Vec<Slot> = Vec::with_capacity(unchanged.len() - 1);
        slots.extend_from_slice(&unchanged[..merged_at]);
        slots.push(Slot::new(merged.as_str(), merge_logp));
        slots.extend_from_slice(&unchanged[i + 1..]);

        let Some(j) = self.first_oov(&slots) else {
            candidates.push(assemble(&slots, EditPath::Merge));
            return;
        };

        let repairs: Vec<Slot> = if j == merged_at {
            self.vocabulary_edits(&merged)
                .into_iter()
                .map(|(edit, logp)| Slot::new(edit, merge_logp + logp))
                .collect()
        } else {
            // Slots after the merge sit one position left of their raw term.
            let raw_index = if j < merged_at { j } else { j + 1 };
            term_edits[raw_index]
                .iter()
                .map(|(edit, logp)| Slot::new(edit.as_str(), *logp))
                .collect()
        };

        for repair in repairs {
            let mut repaired = slots.clone();
            repaired[j] = repair;
            if self.first_oov(&repaired).is_none() {
                candidates.push(assemble(&repaired, EditPath::MergeThenEdit));
            }
        }
    }

    /// Vocabulary strings one edit away from `term`, each with
    /// log P(term | edit). Numbers have none: they are kept as typed.
    fn vocabulary_edits(&self, term: &str) -> Vec<(String, LogProb)> {
        if is_number(term) {
            return Vec::new();
        }
        self.one_edit_variants(term)
            .into_iter()
            .filter(|variant| self.is_vocabulary_phrase(variant))
            .map(|variant| {
                let logp = self.channel.edit_log_prob(term, &variant);
                (variant, logp)
            })
            .collect()
    }

    /// Every distinct string one primitive edit from `term`, excluding the
    /// term itself.
    fn one_edit_variants(&self, term: &str) -> IndexSet<String> {
        let chars: Vec<char> = term.chars().collect();
        let mut variants = IndexSet::new();

        // Deletions. A single character is never deleted outright.
        if chars.len() > 1 {
            for i in 0..chars.len() {
                let mut edited = chars.clone();
                edited.remove(i);
                variants.insert(edited.into_iter().collect::<String>());
            }
        }

        // Substitutions.
        for i in 0..chars.len() {
            for &c in self.alphabet {
                if c != chars[i] {
                    let mut edited = chars.clone();
                    edited[i] = c;
                    variants.insert(edited.into_iter().collect::<String>());
                }
            }
        }

        // Insertions.
        for i in 0..=chars.len() {
            for &c in self.alphabet {
                let mut edited = chars.clone();
                edited.insert(i, c);
                variants.insert(edited.into_iter().collect::<String>());
            }
        }

        // Transpositions.
        for i in 1..chars.len() {
            if chars[i] != chars[i - 1] {
                let mut edited = chars.clone();
                edited.swap(i - 1, i);
                variants.insert(edited.into_iter().collect::<String>());
            }
        }

        variants.shift_remove(term);
        variants
    }

    /// True if `text` is one or more vocabulary terms separated by single
    /// spaces, with no empty pieces.
    fn is_vocabulary_phrase(&self, text: &str) -> bool {
        text.split(' ')
            .all(|piece| !piece.is_empty() && self.prior.contains(piece))
    }

    fn first_oov(&self, slots: &[Slot]) -> Option<usize> {
        slots
            .iter()
            .position(|slot| !self.is_vocabulary_phrase(&slot.text))
    }
}

fn is_number(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| c.is_ascii_digit())
}

fn assemble(slots: &[Slot], path: EditPath) -> Candidate {
    Candidate {
        query: slots
            .iter()
            .map(|slot| slot.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        channel_logp: slots.iter().map(|slot| slot.logp).sum(),
        path,
    }
}
