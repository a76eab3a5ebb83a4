//! FHIR-aligned record schemas for medrec.
//!
//! This crate provides the **wire models** for every resource the API stores:
//! - [`Patient`], [`Condition`], [`Observation`], [`MedicationRequest`], [`Encounter`]
//! - the nested value types they share ([`Identifier`], [`HumanName`], [`Coding`],
//!   [`CodeableConcept`], [`Quantity`], [`Period`])
//!
//! The structs serialise with FHIR key names (`resourceType`, `birthDate`, ...) so the JSON
//! that lands in the store files is the same JSON the REST API accepts and returns.
//!
//! There is no behaviour here beyond identity helpers ([`Resource`]) and strict JSON parsing
//! ([`parse_json`]). Storage and enrichment live in `medrec-store` and `medrec-core`.

pub mod condition;
pub mod datatypes;
pub mod encounter;
pub mod medication_request;
pub mod observation;
pub mod patient;
pub mod text;

pub use condition::Condition;
pub use datatypes::{
    CodeableConcept, Coding, Gender, HumanName, Identifier, NameUse, Period, Quantity,
};
pub use encounter::Encounter;
pub use medication_request::MedicationRequest;
pub use observation::{Observation, ObservationValue};
pub use patient::Patient;
pub use text::{NonEmptyText, TextError};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors returned by the `fhir` schema crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{what} schema mismatch at {path}: {source}")]
    SchemaMismatch {
        what: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;

/// Behaviour shared by every stored resource.
///
/// The store keys records by [`Resource::id`]; services use [`Resource::subject`] to check
/// that a record belongs to the patient named in the request path.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Value of the `resourceType` key.
    const RESOURCE_TYPE: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn resource_type(&self) -> &str;

    /// Owning patient id, for resources that have one.
    fn subject(&self) -> Option<&str> {
        None
    }

    /// Reject a body whose `resourceType` names a different resource.
    fn check_resource_type(&self) -> FhirResult<()> {
        if self.resource_type() == Self::RESOURCE_TYPE {
            Ok(())
        } else {
            Err(FhirError::InvalidInput(format!(
                "Expected resourceType '{}', got '{}'",
                Self::RESOURCE_TYPE,
                self.resource_type()
            )))
        }
    }

    /// Trim the record's id, or assign a fresh one if it has none.
    ///
    /// Returns `true` when an id was generated.
    fn ensure_id(&mut self) -> bool {
        let trimmed = self.id().trim();
        if trimmed.is_empty() {
            self.set_id(new_id());
            true
        } else {
            if trimmed.len() != self.id().len() {
                let trimmed = trimmed.to_string();
                self.set_id(trimmed);
            }
            false
        }
    }
}

/// Generate a new record id: 32 lowercase hex characters.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Parse JSON text, reporting the path of the first field that does not match the schema.
///
/// `what` names the thing being parsed (for example a file name) and is echoed in the error.
pub fn parse_json<T: DeserializeOwned>(what: &str, json_text: &str) -> FhirResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        FhirError::SchemaMismatch {
            what: what.to_string(),
            path,
            source: err.into_inner(),
        }
    })
}

pub(crate) fn default_resource_type<T: Resource>() -> String {
    T::RESOURCE_TYPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_simple_hex() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn parse_json_reports_field_path() {
        let input = r#"{"id": "p1", "name": [{"family": "Chalmers", "given": "Peter"}],
            "gender": "male", "birthDate": "1974-12-25"}"#;

        let err = parse_json::<Patient>("patients.json", input).expect_err("should fail");
        match err {
            FhirError::SchemaMismatch { what, path, .. } => {
                assert_eq!(what, "patients.json");
                assert_eq!(path, "name[0].given");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn ensure_id_only_fills_blank_ids() {
        let mut patient = Patient::example();
        assert!(!patient.ensure_id());
        assert_eq!(patient.id, "example");

        patient.id = "  ".into();
        assert!(patient.ensure_id());
        assert_eq!(patient.id.len(), 32);
    }

    #[test]
    fn ensure_id_trims_surrounding_whitespace() {
        let mut patient = Patient::example();
        patient.id = " p1 \t".into();
        assert!(!patient.ensure_id());
        assert_eq!(patient.id, "p1");
    }

    #[test]
    fn check_resource_type_rejects_other_resources() {
        let mut patient = Patient::example();
        assert!(patient.check_resource_type().is_ok());

        patient.resource_type = "Observation".into();
        let err = patient.check_resource_type().expect_err("should reject");
        match err {
            FhirError::InvalidInput(msg) => {
                assert!(msg.contains("Patient"));
                assert!(msg.contains("Observation"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
