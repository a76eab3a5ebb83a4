//! Encounter resource.
//!
//! An encounter ties a visit to the records produced during it. The links are plain id lists,
//! checked against the store when the encounter is written and not enforced afterwards.

use crate::{default_resource_type, Period, Resource};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Encounter {
    #[serde(rename = "resourceType", default = "default_resource_type::<Encounter>")]
    pub resource_type: String,

    /// Assigned by the server when omitted.
    #[serde(default)]
    pub id: String,

    /// Free text; FHIR documents `planned | in-progress | finished | cancelled | ...`.
    pub status: String,

    pub patient_id: String,

    #[serde(default)]
    pub condition_ids: Vec<String>,

    #[serde(default)]
    pub observation_ids: Vec<String>,

    #[serde(default)]
    pub medication_request_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl Resource for Encounter {
    const RESOURCE_TYPE: &'static str = "Encounter";

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
        Some(&self.patient_id)
    }
}
