//! Constants used throughout the medrec core crate.
//!
//! Defaults applied when the corresponding environment variable is unset, and the names of
//! those variables.

/// Default directory holding the resource files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default file holding the UMLS API key when `UMLS_API_KEY` is unset.
pub const DEFAULT_UMLS_API_KEY_FILE: &str = "key.txt";

/// Default UMLS request timeout, in seconds.
pub const DEFAULT_UMLS_TIMEOUT_SECS: u64 = 10;

pub const ENV_REST_ADDR: &str = "MEDREC_REST_ADDR";
pub const ENV_DATA_DIR: &str = "MEDREC_DATA_DIR";
pub const ENV_UMLS_API_KEY: &str = "UMLS_API_KEY";
pub const ENV_UMLS_API_KEY_FILE: &str = "UMLS_API_KEY_FILE";
pub const ENV_UMLS_BASE_URL: &str = "UMLS_BASE_URL";
pub const ENV_UMLS_TIMEOUT_SECS: &str = "UMLS_TIMEOUT_SECS";
