//! FHIR-aligned patient resource.
//!
//! Notes:
//! - The patient is the root entity; other resources point at it by id only
//! - The record is mutable and overwriteable (PUT replaces it wholesale)

use crate::{default_resource_type, Gender, HumanName, Identifier, Resource};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Patient demographics and identification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "resourceType": "Patient",
    "id": "example",
    "identifier": [{"system": "urn:oid:1.2.36.146.595.217.0.1", "value": "12345"}],
    "name": [{"use": "official", "family": "Chalmers", "given": ["Peter", "James"]}],
    "gender": "male",
    "birthDate": "1974-12-25"
}))]
pub struct Patient {
    #[serde(rename = "resourceType", default = "default_resource_type::<Patient>")]
    pub resource_type: String,

    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub identifier: Vec<Identifier>,

    pub name: Vec<HumanName>,

    pub gender: Gender,

    /// Date of birth (YYYY-MM-DD).
    #[serde(rename = "birthDate")]
    pub birth_date: String,
}

impl Patient {
    /// The reference patient used in documentation and tests.
    pub fn example() -> Self {
        Self {
            resource_type: Self::RESOURCE_TYPE.to_string(),
            id: "example".into(),
            identifier: vec![Identifier {
                system: "urn:oid:1.2.36.146.595.217.0.1".into(),
                value: "12345".into(),
            }],
            name: vec![HumanName {
                use_type: Some(crate::NameUse::Official),
                family: "Chalmers".into(),
                given: vec!["Peter".into(), "James".into()],
            }],
            gender: Gender::Male,
            birth_date: "1974-12-25".into(),
        }
    }
}

impl Resource for Patient {
    const RESOURCE_TYPE: &'static str = "Patient";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn resource_type(&self) -> &str {
        &self.resource_type
    }
}
