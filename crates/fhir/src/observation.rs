//! Observation (lab result / vital sign) resource.
//!
//! FHIR encodes the result as one of several mutually exclusive `value[x]` keys. This module
//! models that as [`ObservationValue`], flattened into the observation so the wire keys stay
//! `valueQuantity`, `valueString`, ...

use crate::{default_resource_type, CodeableConcept, Quantity, Resource};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The result carried by an observation. Exactly one variant is present on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub enum ObservationValue {
    #[serde(rename = "valueQuantity")]
    Quantity(Quantity),

    #[serde(rename = "valueString")]
    String(String),

    #[serde(rename = "valueCodeableConcept")]
    CodeableConcept(CodeableConcept),

    #[serde(rename = "valueBoolean")]
    Boolean(bool),
}

/// A measurement or finding about a patient.
///
/// `code.text` carries the LOINC code supplied by the client; enrichment writes the resolved
/// LOINC coding into the first `code.coding` slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Observation {
    #[serde(rename = "resourceType", default = "default_resource_type::<Observation>")]
    pub resource_type: String,

    #[serde(default)]
    pub id: String,

    /// Free text; FHIR documents `registered | preliminary | final | amended | ...`.
    pub status: String,

    pub code: CodeableConcept,

    /// Owning patient id, stamped from the request path.
    #[serde(default)]
    pub subject: String,

    #[serde(flatten)]
    pub value: ObservationValue,

    #[serde(rename = "effectiveDateTime")]
    pub effective_date_time: String,

    /// Filled with the server time when the client leaves it empty.
    #[serde(default)]
    pub issued: String,
}

impl Resource for Observation {
    const RESOURCE_TYPE: &'static str = "Observation";

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
