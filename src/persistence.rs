// File: src/persistence.rs
use crate::core::channel::EditStatistics;
use crate::core::prior::PriorModel;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The trained tables, everything a corrector needs apart from its config.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelBundle {
    pub prior: PriorModel,
    pub statistics: EditStatistics,
}

/// Writes the bundle next to `path` and atomically renames it into place.
pub fn save_models(bundle: &ModelBundle, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, bundle)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    log::info!("saved trained models to {}", path.display());
    Ok(())
}

pub fn load_models(path: &Path) -> Result<ModelBundle> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let bundle: ModelBundle = bincode::deserialize_from(reader)?;
    log::info!(
        "loaded trained models from {} ({} vocabulary terms)",
        path.display(),
        bundle.prior.vocabulary_size()
    );
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::channel::ChannelModelBuilder;
    use crate::core::prior::PriorModelBuilder;
    use crate::error::SpellError;

    fn bundle() -> ModelBundle {
        let mut prior = PriorModelBuilder::new();
        prior.add_document("hello world");
        let mut edits = ChannelModelBuilder::new();
        edits.add_pair("helo", "hello");
        ModelBundle {
            prior: prior.build(0.05),
            statistics: edits.build(),
        }
    }

    #[test]
    fn saved_models_load_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("models.bin");

        let original = bundle();
        save_models(&original, &path).unwrap();
        let loaded = load_models(&path).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn saving_over_an_existing_file_replaces_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.bin");
        fs::write(&path, b"stale").unwrap();

        save_models(&bundle(), &path).unwrap();
        assert_eq!(load_models(&path).unwrap(), bundle());
    }

    #[test]
    fn loading_garbage_is_an_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.bin");
        fs::write(&path, [0xffu8; 3]).unwrap();

        assert!(matches!(load_models(&path), Err(SpellError::Encode(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_models(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, SpellError::Io(_)));
    }
}
