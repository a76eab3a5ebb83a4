//! # medrec terminology
//!
//! Resolves free text or codes to standard vocabulary concepts.
//!
//! - [`CodeLookup`] is the seam the record services depend on.
//! - [`UmlsClient`] implements it against the UMLS REST API (one GET per lookup, bounded
//!   timeout, no retry).
//! - [`FixedLookup`] implements it from an in-memory table.
//!
//! A lookup that finds nothing is `Ok(None)`. Callers decide whether that is an error.

mod fixed;
mod umls;

pub use fixed::FixedLookup;
pub use umls::{UmlsClient, UmlsConfig, DEFAULT_UMLS_BASE_URL};

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// Errors returned by terminology lookups.
#[derive(Debug, thiserror::Error)]
pub enum TerminologyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("terminology service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("terminology service timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("unexpected terminology response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to build terminology client: {0}")]
    ClientBuild(String),
}

impl From<reqwest::Error> for TerminologyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TerminologyError::Timeout(err)
        } else {
            TerminologyError::Transport(err)
        }
    }
}

pub type TerminologyResult<T> = Result<T, TerminologyError>;

/// How a vocabulary is queried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupMode {
    /// Free-text search; the best match wins.
    Search,
    /// The input is already a code in the vocabulary; resolve its display name.
    Code,
}

/// Target vocabularies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    Icd10Cm,
    Loinc,
    RxNorm,
}

impl Vocabulary {
    /// UMLS source abbreviation (`sab`).
    pub fn source_abbreviation(self) -> &'static str {
        match self {
            Vocabulary::Icd10Cm => "ICD10CM",
            Vocabulary::Loinc => "LNC",
            Vocabulary::RxNorm => "RXNORM",
        }
    }

    /// Coding system URI written into records.
    pub fn system_uri(self) -> &'static str {
        match self {
            Vocabulary::Icd10Cm => "http://hl7.org/fhir/sid/icd-10-cm",
            Vocabulary::Loinc => "http://loinc.org",
            Vocabulary::RxNorm => "http://www.nlm.nih.gov/research/umls/rxnorm",
        }
    }

    pub fn lookup_mode(self) -> LookupMode {
        match self {
            Vocabulary::Icd10Cm => LookupMode::Search,
            Vocabulary::Loinc | Vocabulary::RxNorm => LookupMode::Code,
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Vocabulary::Icd10Cm => "ICD-10-CM",
            Vocabulary::Loinc => "LOINC",
            Vocabulary::RxNorm => "RxNorm",
        })
    }
}

impl FromStr for Vocabulary {
    type Err = TerminologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icd10cm" | "icd-10-cm" | "icd10" => Ok(Vocabulary::Icd10Cm),
            "loinc" | "lnc" => Ok(Vocabulary::Loinc),
            "rxnorm" => Ok(Vocabulary::RxNorm),
            other => Err(TerminologyError::InvalidInput(format!(
                "unknown vocabulary '{other}' (expected icd10cm, loinc or rxnorm)"
            ))),
        }
    }
}

/// A resolved concept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptMatch {
    pub code: String,
    pub display: String,
}

impl ConceptMatch {
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
        }
    }

    pub fn to_coding(&self, vocabulary: Vocabulary) -> fhir::Coding {
        fhir::Coding::new(
            vocabulary.system_uri(),
            self.code.clone(),
            Some(self.display.clone()),
        )
    }
}

/// Resolves `term` in `vocabulary`.
#[async_trait]
pub trait CodeLookup: Send + Sync {
    /// Returns `Ok(None)` when the vocabulary has no match for `term`.
    ///
    /// # Errors
    ///
    /// - [`TerminologyError::InvalidInput`] if `term` is blank,
    /// - [`TerminologyError::Transport`] / [`TerminologyError::Timeout`] if the service
    ///   could not be reached in time,
    /// - [`TerminologyError::Decode`] if the service answered with an unexpected body.
    async fn lookup_code(
        &self,
        vocabulary: Vocabulary,
        term: &str,
    ) -> TerminologyResult<Option<ConceptMatch>>;
}

pub(crate) fn lookup_term(term: &str) -> TerminologyResult<fhir::NonEmptyText> {
    fhir::NonEmptyText::new(term)
        .map_err(|_| TerminologyError::InvalidInput("lookup term cannot be empty".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_parses_cli_spellings() {
        assert_eq!("ICD10CM".parse::<Vocabulary>().unwrap(), Vocabulary::Icd10Cm);
        assert_eq!("icd-10-cm".parse::<Vocabulary>().unwrap(), Vocabulary::Icd10Cm);
        assert_eq!(" loinc ".parse::<Vocabulary>().unwrap(), Vocabulary::Loinc);
        assert_eq!("RxNorm".parse::<Vocabulary>().unwrap(), Vocabulary::RxNorm);
        assert!(matches!(
            "snomed".parse::<Vocabulary>(),
            Err(TerminologyError::InvalidInput(_))
        ));
    }

    #[test]
    fn only_icd10_is_searched() {
        assert_eq!(Vocabulary::Icd10Cm.lookup_mode(), LookupMode::Search);
        assert_eq!(Vocabulary::Loinc.lookup_mode(), LookupMode::Code);
        assert_eq!(Vocabulary::RxNorm.lookup_mode(), LookupMode::Code);
    }

    #[test]
    fn concept_match_to_coding() {
        let coding = ConceptMatch::new("8867-4", "Heart rate").to_coding(Vocabulary::Loinc);
        assert_eq!(coding.system, "http://loinc.org");
        assert_eq!(coding.code.as_deref(), Some("8867-4"));
        assert_eq!(coding.display.as_deref(), Some("Heart rate"));
    }
}
