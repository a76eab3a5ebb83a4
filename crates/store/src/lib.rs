//! medrec file storage
//!
//! This crate persists every resource type in its own flat JSON file.
//!
//! ## Storage Model
//!
//! - One file per resource type, all under a single data directory
//! - Each file holds a JSON object mapping record id to record
//! - Every operation is a whole-file read-modify-write under that file's lock
//! - Writes land in a sibling temp file first and are renamed into place
//! - Missing files are created holding `{}` on first use
//!
//! ```text
//! <data_dir>/
//! ├── patients.json
//! ├── conditions.json
//! ├── observations.json
//! ├── medications.json
//! └── encounters.json
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use medrec_store::RecordStore;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RecordStore::open(Path::new("data"))?;
//! let patients = store.patients().read_all()?;
//! println!("{} patients", patients.len());
//! # Ok(())
//! # }
//! ```

mod constants;
mod file;
mod store;

pub use constants::{
    CONDITIONS_FILENAME, ENCOUNTERS_FILENAME, MEDICATIONS_FILENAME, OBSERVATIONS_FILENAME,
    PATIENTS_FILENAME,
};
pub use file::ResourceFile;
pub use store::RecordStore;

use std::path::PathBuf;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with this id exists in the resource file
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// A record with this id already exists (ids are unique per file)
    #[error("{resource} already exists: {id}")]
    AlreadyExists { resource: &'static str, id: String },

    /// The record cannot be stored as given (for example it has no id)
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Data directory does not exist and could not be created, or is not a directory
    #[error("Invalid data directory: {0}")]
    InvalidDataDirectory(String),

    /// I/O error on a resource file
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content does not match the resource schema
    #[error("malformed store file: {0}")]
    Parse(#[from] fhir::FhirError),

    /// Records could not be rendered as JSON
    #[error("failed to serialise {}: {source}", .path.display())]
    Serialise {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Type alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
