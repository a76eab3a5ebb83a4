//! Conditions (diagnoses), coded against ICD-10-CM.
//!
//! The client sends the diagnosis as free text in `code.text`. Before anything is written,
//! the text is searched in ICD-10-CM and the best match becomes the first `code.coding`.
//! A diagnosis with no match is rejected.

use super::helpers::{enrich, read_owned, require_patient, required_text};
use crate::CoreResult;
use fhir::{Condition, Resource};
use medrec_store::RecordStore;
use medrec_terminology::{CodeLookup, Vocabulary};
use std::sync::Arc;

#[derive(Clone)]
pub struct ConditionService {
    store: Arc<RecordStore>,
    lookup: Arc<dyn CodeLookup>,
}

impl ConditionService {
    pub fn new(store: Arc<RecordStore>, lookup: Arc<dyn CodeLookup>) -> Self {
        Self { store, lookup }
    }

    /// Enrich and store a new condition for `patient_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the patient does not exist (checked before the lookup),
    /// - `InvalidInput` if `code.text` is blank,
    /// - `LookupFailed` if ICD-10-CM has no match, or a transport error from the lookup,
    /// - `Conflict` if the body carries an id that is already taken.
    pub async fn create(&self, patient_id: &str, mut condition: Condition) -> CoreResult<Condition> {
        condition.check_resource_type()?;
        let patient_id = required_text("patient id", patient_id)?;
        require_patient(&self.store, patient_id.as_str())?;

        condition.subject = patient_id.into_string();
        self.code(&mut condition).await?;
        condition.ensure_id();

        let stored = self.store.conditions().append(condition)?;
        tracing::info!("created condition {} for patient {}", stored.id, stored.subject);
        Ok(stored)
    }

    /// Re-enrich and replace condition `condition_id` of `patient_id`.
    ///
    /// A condition belonging to another patient is reported as `NotFound`.
    pub async fn update(
        &self,
        patient_id: &str,
        condition_id: &str,
        mut condition: Condition,
    ) -> CoreResult<Condition> {
        condition.check_resource_type()?;
        read_owned(self.store.conditions(), condition_id, patient_id)?;

        condition.id = condition_id.to_string();
        condition.subject = patient_id.to_string();
        self.code(&mut condition).await?;

        let stored = self.store.conditions().replace(condition_id, condition)?;
        tracing::info!("updated condition {} for patient {}", stored.id, stored.subject);
        Ok(stored)
    }

    pub fn read(&self, patient_id: &str, condition_id: &str) -> CoreResult<Condition> {
        read_owned(self.store.conditions(), condition_id, patient_id)
    }


    async fn code(&self, condition: &mut Condition) -> CoreResult<()> {
        let diagnosis = required_text("code.text", &condition.code.text)?;
        enrich(
            self.lookup.as_ref(),
            Vocabulary::Icd10Cm,
            diagnosis.as_str(),
            &mut condition.code,
        )
        .await
    }
}
