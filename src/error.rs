// File: src/error.rs

/// Result type alias using [`SpellError`].
pub type Result<T> = std::result::Result<T, SpellError>;

/// Errors raised while training, persisting or querying the models.
///
/// Correction itself never fails; these only surface from the training
/// collaborators, from configuration checks and from direct calls into the
/// prior model.
#[derive(Debug, thiserror::Error)]
pub enum SpellError {
    /// A training line did not split into exactly two tab-separated fields.
    #[error("malformed training line {line_no}: {line:?}")]
    MalformedTrainingLine { line_no: usize, line: String },

    /// The prior was asked about a term with a zero count.
    #[error("term {0:?} is not in the vocabulary")]
    UnknownTerm(String),

    #[error("cannot score an empty query")]
    EmptyQuery,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("model encoding error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A tuning parameter is outside the range the models can score with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
