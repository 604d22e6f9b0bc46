// File: src/training.rs
//! Builds the models from on-disk corpora: a directory of plain-text
//! documents for the prior and a tab-separated typo file for the channel.
use crate::core::channel::{ChannelModelBuilder, EditStatistics};
use crate::core::prior::{PriorModel, PriorModelBuilder};
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const PROGRESS_EVERY: usize = 100_000;

/// Counts every regular file in `dir`, in file-name order.
pub fn train_prior_from_dir(dir: &Path, lambda: f64) -> Result<PriorModel> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut builder = PriorModelBuilder::new();
    for path in &files {
        let text = fs::read_to_string(path)?;
        builder.add_document(&text);
    }
    let model = builder.build(lambda);
    log::info!(
        "trained prior on {} documents from {}: {} tokens, {} terms",
        files.len(),
        dir.display(),
        model.total_tokens(),
        model.vocabulary_size()
    );
    Ok(model)
}

pub fn train_prior_from_documents<I, S>(documents: I, lambda: f64) -> PriorModel
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = PriorModelBuilder::new();
    for document in documents {
        builder.add_document(document.as_ref());
    }
    builder.build(lambda)
}

/// Reads `edited<TAB>original` lines. The first malformed line aborts
/// training. Line numbers in errors are 1-based.
pub fn train_channel_from_reader<R: BufRead>(reader: R) -> Result<EditStatistics> {
    let mut builder = ChannelModelBuilder::new();
    let mut lines = 0;
    for (index, line) in reader.lines().enumerate() {
        builder.add_line(index + 1, &line?)?;
        lines += 1;
        if lines % PROGRESS_EVERY == 0 {
            log::info!("counted {lines} edit pairs");
        }
    }
    let stats = builder.build();
    log::info!(
        "trained channel on {lines} edit pairs: {} edits, alphabet of {}",
        stats.total_edits(),
        stats.alphabet_size()
    );
    Ok(stats)
}

pub fn train_channel_from_file(path: &Path) -> Result<EditStatistics> {
    train_channel_from_reader(BufReader::new(File::open(path)?))
}

pub fn train_channel_from_pairs<'a, I>(pairs: I) -> EditStatistics
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut builder = ChannelModelBuilder::new();
    for (edited, original) in pairs {
        builder.add_pair(edited, original);
    }
    builder.build()
}
