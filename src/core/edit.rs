// src/core/edit.rs
use crate::core::types::Symbol;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    Insertion,
    Deletion,
    Substitution,
    Transposition,
}

/// A single primitive edit turning an original term into an edited one,
/// with the character pair used to look up its count.
///
/// Pairing conventions:
/// - substitution / transposition: (new char, old char) at the first
///   differing position;
/// - insertion: (char before the insertion point, inserted char);
/// - deletion: (char before the deleted position, deleted char).
///
/// The context side is [`Symbol::Boundary`] when the edit touches position 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditRecord {
    pub kind: EditKind,
    pub context: Symbol,
    pub target: char,
}

impl EditRecord {
    fn new(kind: EditKind, context: Symbol, target: char) -> Self {
        Self { kind, context, target }
    }
}

/// Finds the edit that transforms `original` into `edited`.
///
/// Returns `None` when the strings are equal. The inputs must be at most one
/// Damerau-Levenshtein edit apart; anything farther gets a best-effort
/// answer keyed on the first difference.
pub fn classify_edit(edited: &str, original: &str) -> Option<EditRecord> {
    let edited: Vec<char> = edited.chars().collect();
    let original: Vec<char> = original.chars().collect();

    let context_before = |i: usize| {
        if i == 0 {
            Symbol::Boundary
        } else {
            Symbol::Char(original[i - 1])
        }
    };

    if edited.len() == original.len() {
        let mut diffs = (0..original.len()).filter(|&i| edited[i] != original[i]);
        let first = diffs.next()?;
        let second = diffs.next();
        let swapped = match second {
            Some(next) => {
                next == first + 1
                    && diffs.next().is_none()
                    && edited[first] == original[next]
                    && edited[next] == original[first]
            }
            None => false,
        };
        let kind = if swapped {
            EditKind::Transposition
        } else {
            EditKind::Substitution
        };
        return Some(EditRecord::new(
            kind,
            Symbol::Char(edited[first]),
            original[first],
        ));
    }

    let mismatch = original
        .iter()
        .zip(edited.iter())
        .position(|(o, e)| o != e);

    if edited.len() > original.len() {
        let record = match mismatch {
            Some(i) => EditRecord::new(EditKind::Insertion, context_before(i), edited[i]),
            // Appended at the end.
            None => EditRecord::new(
                EditKind::Insertion,
                context_before(original.len()),
                *edited.last()?,
            ),
        };
        Some(record)
    } else {
        let record = match mismatch {
            Some(i) => EditRecord::new(EditKind::Deletion, context_before(i), original[i]),
            None => EditRecord::new(
                EditKind::Deletion,
                context_before(original.len() - 1),
                *original.last()?,
            ),
        };
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Symbol::{Boundary, Char};

    /// Optimal string alignment distance, used to check the classifier's
    /// precondition on test inputs.
    fn osa_distance(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let mut d = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for (i, row) in d.iter_mut().enumerate() {
            row[0] = i;
        }
        for j in 0..=b.len() {
            d[0][j] = j;
        }
        for i in 1..=a.len() {
            for j in 1..=b.len() {
                let cost = usize::from(a[i - 1] != b[j - 1]);
                d[i][j] = (d[i - 1][j] + 1)
                    .min(d[i][j - 1] + 1)
                    .min(d[i - 1][j - 1] + cost);
                if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                    d[i][j] = d[i][j].min(d[i - 2][j - 2] + 1);
                }
            }
        }
        d[a.len()][b.len()]
    }

    fn classify(edited: &str, original: &str) -> Option<EditRecord> {
        assert!(
            osa_distance(edited, original) <= 1,
            "{edited:?} and {original:?} are more than one edit apart"
        );
        classify_edit(edited, original)
    }

    #[test]
    fn identical_strings_have_no_edit() {
        assert_eq!(classify("spelling", "spelling"), None);
        assert_eq!(classify("", ""), None);
    }

    #[test]
    fn substitution_pairs_new_with_old() {
        let edit = classify("spelking", "spelling").unwrap();
        assert_eq!(edit, EditRecord::new(EditKind::Substitution, Char('k'), 'l'));
    }

    #[test]
    fn transposition_of_adjacent_chars() {
        let edit = classify("teh", "the").unwrap();
        assert_eq!(edit, EditRecord::new(EditKind::Transposition, Char('e'), 'h'));
    }

    #[test]
    fn insertion_in_the_middle_and_at_the_edges() {
        assert_eq!(
            classify("helllo", "hello").unwrap(),
            EditRecord::new(EditKind::Insertion, Char('l'), 'l')
        );
        assert_eq!(
            classify("xhello", "hello").unwrap(),
            EditRecord::new(EditKind::Insertion, Boundary, 'x')
        );
        assert_eq!(
            classify("hellos", "hello").unwrap(),
            EditRecord::new(EditKind::Insertion, Char('o'), 's')
        );
        assert_eq!(
            classify("a", "").unwrap(),
            EditRecord::new(EditKind::Insertion, Boundary, 'a')
        );
    }

    #[test]
    fn inserted_space_is_an_insertion() {
        assert_eq!(
            classify("hot dog", "hotdog").unwrap(),
            EditRecord::new(EditKind::Insertion, Char('t'), ' ')
        );
    }

    #[test]
    fn deletion_in_the_middle_and_at_the_edges() {
        assert_eq!(
            classify("speling", "spelling").unwrap(),
            EditRecord::new(EditKind::Deletion, Char('l'), 'l')
        );
        assert_eq!(
            classify("pelling", "spelling").unwrap(),
            EditRecord::new(EditKind::Deletion, Boundary, 's')
        );
        assert_eq!(
            classify("spellin", "spelling").unwrap(),
            EditRecord::new(EditKind::Deletion, Char('n'), 'g')
        );
        assert_eq!(
            classify("", "a").unwrap(),
            EditRecord::new(EditKind::Deletion, Boundary, 'a')
        );
    }

    #[test]
    fn multibyte_chars_are_classified_by_char() {
        assert_eq!(
            classify("café", "cafe").unwrap(),
            EditRecord::new(EditKind::Substitution, Char('é'), 'e')
        );
    }
}
