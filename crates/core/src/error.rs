use medrec_store::StoreError;
use medrec_terminology::{TerminologyError, Vocabulary};

/// Errors surfaced by the record services.
///
/// Each variant maps to one HTTP status in `api-rest`; the lower-level crate errors are
/// folded into this taxonomy by the `From` impls below.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// A record refers to another record that does not exist.
    #[error("referenced {resource} does not exist: {id}")]
    ReferenceNotFound { resource: &'static str, id: String },

    #[error("no {vocabulary} match for '{term}'")]
    LookupFailed {
        vocabulary: Vocabulary,
        term: String,
    },

    #[error("terminology service unavailable: {0}")]
    Transport(#[source] TerminologyError),

    #[error("terminology service timed out: {0}")]
    Timeout(#[source] TerminologyError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{resource} already exists: {id}")]
    Conflict { resource: &'static str, id: String },

    #[error("store error: {0}")]
    Store(#[source] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { resource, id } => CoreError::NotFound { resource, id },
            StoreError::AlreadyExists { resource, id } => CoreError::Conflict { resource, id },
            StoreError::InvalidRecord(msg) => CoreError::InvalidInput(msg),
            other => CoreError::Store(other),
        }
    }
}

impl From<TerminologyError> for CoreError {
    fn from(err: TerminologyError) -> Self {
        match err {
            TerminologyError::InvalidInput(msg) => CoreError::InvalidInput(msg),
            TerminologyError::Timeout(_) => CoreError::Timeout(err),
            TerminologyError::ClientBuild(msg) => CoreError::Config(msg),
            // An undecodable answer is an upstream fault, like an unreachable one.
            TerminologyError::Transport(_) | TerminologyError::Decode(_) => {
                CoreError::Transport(err)
            }
        }
    }
}

impl From<fhir::FhirError> for CoreError {
    fn from(err: fhir::FhirError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}
