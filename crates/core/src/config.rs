//! Core runtime configuration.
//!
//! Configuration is resolved once at process start-up and then passed into the services and
//! the REST layer. Nothing reads environment variables during request handling.
//!
//! The `*_from_env_value` helpers take the raw (optional) variable value so they can be tested
//! without touching the process environment; [`CoreConfig::from_env`] wires them to the real
//! variables.

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_REST_ADDR, DEFAULT_UMLS_API_KEY_FILE, DEFAULT_UMLS_TIMEOUT_SECS,
    ENV_DATA_DIR, ENV_REST_ADDR, ENV_UMLS_API_KEY, ENV_UMLS_API_KEY_FILE, ENV_UMLS_BASE_URL,
    ENV_UMLS_TIMEOUT_SECS,
};
use crate::{CoreError, CoreResult};
use fhir::NonEmptyText;
use medrec_terminology::{UmlsConfig, DEFAULT_UMLS_BASE_URL};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    rest_addr: SocketAddr,
    data_dir: PathBuf,
    umls: UmlsConfig,
}

impl CoreConfig {
    pub fn new(rest_addr: SocketAddr, data_dir: PathBuf, umls: UmlsConfig) -> CoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(CoreError::Config("data directory cannot be empty".into()));
        }

        Ok(Self {
            rest_addr,
            data_dir,
            umls,
        })
    }

    /// Resolve the full configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if any variable is malformed or no UMLS API key can be
    /// found.
    pub fn from_env() -> CoreResult<Self> {
        let rest_addr = rest_addr_from_env_value(env_value(ENV_REST_ADDR))?;
        let data_dir = data_dir_from_env_value(env_value(ENV_DATA_DIR));
        let umls = UmlsConfig {
            base_url: umls_base_url_from_env_value(env_value(ENV_UMLS_BASE_URL))?,
            api_key: umls_api_key_from_env_values(
                env_value(ENV_UMLS_API_KEY),
                env_value(ENV_UMLS_API_KEY_FILE),
            )?,
            timeout: umls_timeout_from_env_value(env_value(ENV_UMLS_TIMEOUT_SECS))?,
        };

        Self::new(rest_addr, data_dir, umls)
    }

    pub fn rest_addr(&self) -> SocketAddr {
        self.rest_addr
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn umls(&self) -> &UmlsConfig {
        &self.umls
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn rest_addr_from_env_value(value: Option<String>) -> CoreResult<SocketAddr> {
    let value = trimmed(value).unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());
    value.parse().map_err(|e| {
        CoreError::Config(format!(
            "{ENV_REST_ADDR} '{value}' is not a socket address: {e}"
        ))
    })
}

/// The data directory; falls back to `data` relative to the working directory.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    PathBuf::from(trimmed(value).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()))
}

pub fn umls_base_url_from_env_value(value: Option<String>) -> CoreResult<NonEmptyText> {
    let value = trimmed(value).unwrap_or_else(|| DEFAULT_UMLS_BASE_URL.to_string());
    NonEmptyText::new(value).map_err(|e| CoreError::Config(format!("{ENV_UMLS_BASE_URL}: {e}")))
}

/// Whole seconds, strictly positive.
pub fn umls_timeout_from_env_value(value: Option<String>) -> CoreResult<Duration> {
    let Some(value) = trimmed(value) else {
        return Ok(Duration::from_secs(DEFAULT_UMLS_TIMEOUT_SECS));
    };

    match value.parse::<u64>() {
        Ok(0) => Err(CoreError::Config(format!(
            "{ENV_UMLS_TIMEOUT_SECS} must be greater than zero"
        ))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(CoreError::Config(format!(
            "{ENV_UMLS_TIMEOUT_SECS} '{value}' is not a number of seconds: {e}"
        ))),
    }
}

/// The UMLS API key: `key` if set, otherwise the first line of `key_file` (default
/// `key.txt`).
///
/// # Errors
///
/// Returns [`CoreError::Config`] if neither source yields a non-blank key.
pub fn umls_api_key_from_env_values(
    key: Option<String>,
    key_file: Option<String>,
) -> CoreResult<NonEmptyText> {
    if let Some(key) = trimmed(key) {
        return NonEmptyText::new(key)
            .map_err(|e| CoreError::Config(format!("{ENV_UMLS_API_KEY}: {e}")));
    }

    let key_file = trimmed(key_file).unwrap_or_else(|| DEFAULT_UMLS_API_KEY_FILE.to_string());
    let contents = std::fs::read_to_string(&key_file).map_err(|e| {
        CoreError::Config(format!(
            "no UMLS API key: {ENV_UMLS_API_KEY} is unset and {key_file} cannot be read: {e}"
        ))
    })?;

    let first_line = contents.lines().next().unwrap_or_default();
    NonEmptyText::new(first_line)
        .map_err(|_| CoreError::Config(format!("UMLS API key file {key_file} is empty")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        assert_eq!(
            rest_addr_from_env_value(None).unwrap(),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(data_dir_from_env_value(Some("  ".into())), PathBuf::from("data"));
        assert_eq!(
            umls_base_url_from_env_value(None).unwrap().as_str(),
            DEFAULT_UMLS_BASE_URL
        );
        assert_eq!(umls_timeout_from_env_value(None).unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            rest_addr_from_env_value(Some("localhost".into())),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            umls_timeout_from_env_value(Some("0".into())),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            umls_timeout_from_env_value(Some("ten".into())),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn api_key_prefers_variable_over_file() {
        let key = umls_api_key_from_env_values(
            Some(" abc123 ".into()),
            Some("/definitely/not/here".into()),
        )
        .expect("key from variable");
        assert_eq!(key.as_str(), "abc123");
    }

    #[test]
    fn api_key_read_from_file_without_newline() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let key_path = temp_dir.path().join("key.txt");
        fs::write(&key_path, "file-key\n").expect("write key");

        let key = umls_api_key_from_env_values(None, Some(key_path.display().to_string()))
            .expect("key from file");
        assert_eq!(key.as_str(), "file-key");
    }

    #[test]
    fn missing_or_empty_key_file_is_config_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing.txt");
        assert!(matches!(
            umls_api_key_from_env_values(None, Some(missing.display().to_string())),
            Err(CoreError::Config(_))
        ));

        let empty = temp_dir.path().join("empty.txt");
        fs::write(&empty, "\n").expect("write key");
        assert!(matches!(
            umls_api_key_from_env_values(None, Some(empty.display().to_string())),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn config_rejects_empty_data_dir() {
        let umls = UmlsConfig {
            base_url: NonEmptyText::new(DEFAULT_UMLS_BASE_URL).unwrap(),
            api_key: NonEmptyText::new("k").unwrap(),
            timeout: Duration::from_secs(1),
        };
        let addr = "127.0.0.1:0".parse().unwrap();
        assert!(matches!(
            CoreConfig::new(addr, PathBuf::new(), umls.clone()),
            Err(CoreError::Config(_))
        ));

        let cfg = CoreConfig::new(addr, PathBuf::from("records"), umls).expect("valid config");
        assert_eq!(cfg.data_dir(), Path::new("records"));
        assert_eq!(cfg.umls().api_key.as_str(), "k");
    }
}
