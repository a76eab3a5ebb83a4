//! UMLS REST API client.
//!
//! Request shapes (relative to the configured base URL):
//!
//! | Vocabulary | Request |
//! |---|---|
//! | ICD-10-CM | `GET search/current?string=<text>&sab=ICD10CM&returnIdType=code&apiKey=<key>` |
//! | LOINC | `GET content/current/source/LNC/<code>?apiKey=<key>` |
//! | RxNorm | `GET content/current/source/RXNORM/<code>?apiKey=<key>` |
//!
//! Search takes the first entry of `result.results`; code resolution reads `result` directly.
//! Non-2xx responses and empty result lists are "no match". UMLS signals an empty search with a
//! single `{"ui": "NONE"}` entry, which is also treated as no match.

use crate::{
    lookup_term, CodeLookup, ConceptMatch, LookupMode, TerminologyError, TerminologyResult,
    Vocabulary,
};
use async_trait::async_trait;
use fhir::NonEmptyText;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

/// Default UMLS REST base URL.
pub const DEFAULT_UMLS_BASE_URL: &str = "https://uts-ws.nlm.nih.gov/rest/";

/// UMLS placeholder `ui` for "no results".
const NO_RESULTS_UI: &str = "NONE";

/// Upper bound on the TCP/TLS connect phase; the total timeout still applies.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for [`UmlsClient`].
#[derive(Clone, Debug)]
pub struct UmlsConfig {
    pub base_url: NonEmptyText,
    pub api_key: NonEmptyText,
    /// Total time allowed for one lookup, connect to last byte.
    pub timeout: Duration,
}

/// Client for the UMLS terminology service.
///
/// Built once at start-up; the inner `reqwest::Client` pools connections across lookups.
#[derive(Clone, Debug)]
pub struct UmlsClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: NonEmptyText,
}

impl UmlsClient {
    /// # Errors
    ///
    /// Returns [`TerminologyError::InvalidInput`] if the base URL is not an http(s) URL or
    /// the timeout is zero, and [`TerminologyError::ClientBuild`] if the HTTP client cannot
    /// be constructed.
    pub fn new(config: UmlsConfig) -> TerminologyResult<Self> {
        let mut base = config.base_url.into_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            TerminologyError::InvalidInput(format!("invalid UMLS base URL '{base}': {e}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(TerminologyError::InvalidInput(format!(
                "UMLS base URL must use http or https, got: {}",
                base_url.scheme()
            )));
        }
        if config.timeout.is_zero() {
            return Err(TerminologyError::InvalidInput(
                "UMLS timeout must be greater than zero".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout))
            .timeout(config.timeout)
            .build()
            .map_err(|e| TerminologyError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn search(
        &self,
        vocabulary: Vocabulary,
        term: &NonEmptyText,
    ) -> TerminologyResult<Option<ConceptMatch>> {
        let url = self.endpoint(&["search", "current"])?;
        let request = self.http.get(url).query(&[
            ("string", term.as_str()),
            ("sab", vocabulary.source_abbreviation()),
            ("returnIdType", "code"),
            ("apiKey", self.api_key.as_str()),
        ]);

        let Some(body) = self.fetch(vocabulary, term, request).await? else {
            return Ok(None);
        };
        let response: SearchResponse = serde_json::from_slice(&body)?;

        Ok(response
            .result
            .results
            .into_iter()
            .next()
            .filter(|hit| hit.ui != NO_RESULTS_UI && !hit.ui.trim().is_empty())
            .map(|hit| ConceptMatch::new(hit.ui, hit.name)))
    }

    async fn resolve(
        &self,
        vocabulary: Vocabulary,
        code: &NonEmptyText,
    ) -> TerminologyResult<Option<ConceptMatch>> {
        let url = self.endpoint(&[
            "content",
            "current",
            "source",
            vocabulary.source_abbreviation(),
            code.as_str(),
        ])?;
        let request = self
            .http
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())]);

        let Some(body) = self.fetch(vocabulary, code, request).await? else {
            return Ok(None);
        };
        let response: ContentResponse = serde_json::from_slice(&body)?;

        let concept = response.result;
        if concept.ui.trim().is_empty() || concept.ui == NO_RESULTS_UI {
            return Ok(None);
        }
        Ok(Some(ConceptMatch::new(concept.ui, concept.name)))
    }

    /// Send `request`; `None` for a non-2xx answer, otherwise the body bytes.
    async fn fetch(
        &self,
        vocabulary: Vocabulary,
        term: &NonEmptyText,
        request: reqwest::RequestBuilder,
    ) -> TerminologyResult<Option<Vec<u8>>> {
        tracing::debug!("UMLS {} lookup for '{}'", vocabulary, term);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                "UMLS {} lookup for '{}' returned {}",
                vocabulary,
                term,
                status
            );
            return Ok(None);
        }

        Ok(Some(response.bytes().await?.to_vec()))
    }

    fn endpoint(&self, segments: &[&str]) -> TerminologyResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TerminologyError::InvalidInput(format!(
                    "UMLS base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl CodeLookup for UmlsClient {
    async fn lookup_code(
        &self,
        vocabulary: Vocabulary,
        term: &str,
    ) -> TerminologyResult<Option<ConceptMatch>> {
        let term = lookup_term(term)?;
        match vocabulary.lookup_mode() {
            LookupMode::Search => self.search(vocabulary, &term).await,
            LookupMode::Code => self.resolve(vocabulary, &term).await,
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    ui: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    result: ContentResult,
}

#[derive(Debug, Deserialize)]
struct ContentResult {
    ui: String,
    #[serde(default)]
    name: String,
}
