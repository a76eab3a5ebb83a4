//! Observations, coded against LOINC.
//!
//! `code.text` carries a LOINC code; it is resolved (not searched) and the resolved concept
//! becomes the first `code.coding`. Reads select a patient's observations by that code.

use super::helpers::{enrich, read_owned, require_patient, required_text};
use crate::CoreResult;
use chrono::{SecondsFormat, Utc};
use fhir::{Observation, Resource};
use medrec_store::RecordStore;
use medrec_terminology::{CodeLookup, Vocabulary};
use std::sync::Arc;

#[derive(Clone)]
pub struct ObservationService {
    store: Arc<RecordStore>,
    lookup: Arc<dyn CodeLookup>,
}

impl ObservationService {
    pub fn new(store: Arc<RecordStore>, lookup: Arc<dyn CodeLookup>) -> Self {
        Self { store, lookup }
    }

    /// Enrich and store a new observation for `patient_id`.
    ///
    /// An empty `issued` is set to the current time.
    pub async fn create(
        &self,
        patient_id: &str,
        mut observation: Observation,
    ) -> CoreResult<Observation> {
        observation.check_resource_type()?;
        let patient_id = required_text("patient id", patient_id)?;
        require_patient(&self.store, patient_id.as_str())?;

        observation.subject = patient_id.into_string();
        self.code(&mut observation).await?;
        stamp_issued(&mut observation);
        observation.ensure_id();

        let stored = self.store.observations().append(observation)?;
        tracing::info!(
            "created observation {} for patient {}",
            stored.id,
            stored.subject
        );
        Ok(stored)
    }

    pub async fn update(
        &self,
        patient_id: &str,
        observation_id: &str,
        mut observation: Observation,
    ) -> CoreResult<Observation> {
        observation.check_resource_type()?;
        let existing = read_owned(self.store.observations(), observation_id, patient_id)?;

        observation.id = observation_id.to_string();
        observation.subject = patient_id.to_string();
        self.code(&mut observation).await?;
        if observation.issued.trim().is_empty() {
            observation.issued = existing.issued;
        }
        stamp_issued(&mut observation);

        let stored = self
            .store
            .observations()
            .replace(observation_id, observation)?;
        tracing::info!(
            "updated observation {} for patient {}",
            stored.id,
            stored.subject
        );
        Ok(stored)
    }

    /// Observations of `patient_id` whose primary code is `loinc_code`, ordered by id.
    pub fn find_by_code(&self, patient_id: &str, loinc_code: &str) -> CoreResult<Vec<Observation>> {
        Ok(self.store.observations().find(|o| {
            o.subject == patient_id && o.code.primary_code() == Some(loinc_code)
        })?)
    }


    async fn code(&self, observation: &mut Observation) -> CoreResult<()> {
        let loinc = required_text("code.text", &observation.code.text)?;
        enrich(
            self.lookup.as_ref(),
            Vocabulary::Loinc,
            loinc.as_str(),
            &mut observation.code,
        )
        .await
    }
}

fn stamp_issued(observation: &mut Observation) {
    if observation.issued.trim().is_empty() {
        observation.issued = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    }
}
