//! Value types shared by several resources.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// External-system identifier pair, e.g. a hospital MRN.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

/// Purpose of a human name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NameUse {
    /// Usual/preferred name.
    Usual,
    /// Official name.
    Official,
    /// Temporary name.
    Temp,
    /// Nickname or informal name.
    Nickname,
    /// Anonymous name.
    Anonymous,
    /// Old name (no longer in use).
    Old,
    /// Maiden name.
    Maiden,
}

/// A person's name. `given` keeps the order the names were supplied in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HumanName {
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_type: Option<NameUse>,

    pub family: String,

    pub given: Vec<String>,
}

/// Administrative gender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

/// A code in an external vocabulary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Coding {
    pub system: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: impl Into<String>, code: impl Into<String>, display: Option<String>) -> Self {
        Self {
            system: system.into(),
            code: Some(code.into()),
            display,
        }
    }
}

/// Free text plus the standard codes it resolves to.
///
/// Clients send `text`; the lookup step fills the first `coding` slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CodeableConcept {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub coding: Vec<Coding>,
}

impl CodeableConcept {
    /// Replace the first coding (or insert one when the list is empty).
    pub fn set_primary_coding(&mut self, coding: Coding) {
        match self.coding.first_mut() {
            Some(first) => *first = coding,
            None => self.coding.push(coding),
        }
    }

    pub fn primary_code(&self) -> Option<&str> {
        self.coding.first().and_then(|c| c.code.as_deref())
    }
}

/// A measured amount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Quantity {
    pub value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Time range with optional bounds (ISO 8601 strings).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}
