//! MedicationRequest (prescription) resource.

use crate::{default_resource_type, CodeableConcept, Resource};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An order for a medication.
///
/// The RxNorm code arrives in the request path; enrichment writes the resolved coding into
/// `medication`, so clients may omit that field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MedicationRequest {
    #[serde(
        rename = "resourceType",
        default = "default_resource_type::<MedicationRequest>"
    )]
    pub resource_type: String,

    #[serde(default)]
    pub id: String,

    /// Free text; FHIR documents `active | on-hold | cancelled | completed | ...`.
    pub status: String,

    /// Free text; FHIR documents `proposal | plan | order | ...`.
    pub intent: String,

    #[serde(default)]
    pub medication: CodeableConcept,

    /// Owning patient id, stamped from the request path.
    #[serde(default)]
    pub subject: String,

    pub dosage: String,
}

impl Resource for MedicationRequest {
    const RESOURCE_TYPE: &'static str = "MedicationRequest";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn subject(&self) -> Option<&str> {
        Some(&self.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medication_is_optional_on_input() {
        let input = r#"{"status": "active", "intent": "order", "dosage": "500 mg twice daily"}"#;
        let request: MedicationRequest = serde_json::from_str(input).expect("parse json");

        assert_eq!(request.resource_type, "MedicationRequest");
        assert!(request.medication.coding.is_empty());
        assert_eq!(request.dosage, "500 mg twice daily");
    }
}
