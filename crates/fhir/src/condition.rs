//! Condition (diagnosis) resource.

use crate::{default_resource_type, CodeableConcept, Resource};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A diagnosis recorded against a patient.
///
/// `code.text` carries the free-text diagnosis; the first `code.coding` entry is the
/// ICD-10-CM code it resolved to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Condition {
    #[serde(rename = "resourceType", default = "default_resource_type::<Condition>")]
    pub resource_type: String,

    #[serde(default)]
    pub id: String,

    /// Owning patient id, stamped from the request path.
    #[serde(default)]
    pub subject: String,

    pub code: CodeableConcept,

    /// Free text; FHIR documents `active | recurrence | relapse | inactive | remission | resolved`.
    #[serde(
        rename = "clinicalStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub clinical_status: Option<String>,
}

impl Resource for Condition {
    const RESOURCE_TYPE: &'static str = "Condition";

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
