//! Medication requests, coded against RxNorm.
//!
//! On create the RxNorm code comes from the request path. On update it is taken from the body
//! (first `medication.coding` code, then `medication.text`) and falls back to the code the
//! stored request already carries.

use super::helpers::{enrich, read_owned, require_patient, required_text};
use crate::{CoreError, CoreResult};
use fhir::{MedicationRequest, Resource};
use medrec_store::RecordStore;
use medrec_terminology::{CodeLookup, Vocabulary};
use std::sync::Arc;

#[derive(Clone)]
pub struct MedicationRequestService {
    store: Arc<RecordStore>,
    lookup: Arc<dyn CodeLookup>,
}

impl MedicationRequestService {
    pub fn new(store: Arc<RecordStore>, lookup: Arc<dyn CodeLookup>) -> Self {
        Self { store, lookup }
    }

    pub async fn create(
        &self,
        patient_id: &str,
        rxnorm_code: &str,
        mut request: MedicationRequest,
    ) -> CoreResult<MedicationRequest> {
        request.check_resource_type()?;
        let patient_id = required_text("patient id", patient_id)?;
        let rxnorm_code = required_text("rxnorm code", rxnorm_code)?;
        require_patient(&self.store, patient_id.as_str())?;

        request.subject = patient_id.into_string();
        self.code(rxnorm_code.as_str(), &mut request).await?;
        request.ensure_id();

        let stored = self.store.medication_requests().append(request)?;
        tracing::info!(
            "created medication request {} for patient {}",
            stored.id,
            stored.subject
        );
        Ok(stored)
    }

    pub async fn update(
        &self,
        patient_id: &str,
        request_id: &str,
        mut request: MedicationRequest,
    ) -> CoreResult<MedicationRequest> {
        request.check_resource_type()?;
        let existing = read_owned(self.store.medication_requests(), request_id, patient_id)?;

        let rxnorm_code = [
            request.medication.primary_code(),
            Some(request.medication.text.as_str()),
            existing.medication.primary_code(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|code| !code.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CoreError::InvalidInput("medication request carries no RxNorm code".into())
        })?;

        request.id = request_id.to_string();
        request.subject = patient_id.to_string();
        self.code(&rxnorm_code, &mut request).await?;

        let stored = self
            .store
            .medication_requests()
            .replace(request_id, request)?;
        tracing::info!(
            "updated medication request {} for patient {}",
            stored.id,
            stored.subject
        );
        Ok(stored)
    }

    /// Requests of `patient_id` whose primary medication code is `rxnorm_code`.
    pub fn find_by_code(
        &self,
        patient_id: &str,
        rxnorm_code: &str,
    ) -> CoreResult<Vec<MedicationRequest>> {
        Ok(self.store.medication_requests().find(|r| {
            r.subject == patient_id && r.medication.primary_code() == Some(rxnorm_code)
        })?)
    }


    async fn code(&self, rxnorm_code: &str, request: &mut MedicationRequest) -> CoreResult<()> {
        enrich(
            self.lookup.as_ref(),
            Vocabulary::RxNorm,
            rxnorm_code,
            &mut request.medication,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{lookup, store_with_patient};
    use fhir::{CodeableConcept, Coding};
    use tempfile::TempDir;

    fn prescription() -> MedicationRequest {
        MedicationRequest {
            resource_type: MedicationRequest::RESOURCE_TYPE.into(),
            id: String::new(),
            status: "active".into(),
            intent: "order".into(),
            medication: CodeableConcept::default(),
            subject: String::new(),
            dosage: "5 mg once daily".into(),
        }
    }

    #[tokio::test]
    async fn create_codes_medication_from_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let requests = MedicationRequestService::new(store_with_patient(&temp_dir), lookup());

        let created = requests
            .create("example", "197361", prescription())
            .await
            .expect("create");

        assert_eq!(created.subject, "example");
        assert_eq!(
            created.medication.coding,
            vec![Coding::new(
                "http://www.nlm.nih.gov/research/umls/rxnorm",
                "197361",
                Some("amlodipine 5 MG Oral Tablet".into())
            )]
        );

        let found = requests.find_by_code("example", "197361").expect("find");
        assert_eq!(found, vec![created]);
    }

    #[tokio::test]
    async fn unknown_rxnorm_code_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_with_patient(&temp_dir);
        let requests = MedicationRequestService::new(store.clone(), lookup());

        let err = requests
            .create("example", "999999", prescription())
            .await
            .expect_err("no match");
        assert!(matches!(
            err,
            CoreError::LookupFailed {
                vocabulary: Vocabulary::RxNorm,
                ..
            }
        ));
        assert!(store
            .medication_requests()
            .read_all()
            .expect("read")
            .is_empty());
    }

    #[tokio::test]
    async fn update_falls_back_to_stored_code() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let requests = MedicationRequestService::new(store_with_patient(&temp_dir), lookup());
        let created = requests
            .create("example", "197361", prescription())
            .await
            .expect("create");

        let mut changed = prescription();
        changed.status = "on-hold".into();
        let updated = requests
            .update("example", &created.id, changed)
            .await
            .expect("update");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, "on-hold");
        assert_eq!(updated.medication.primary_code(), Some("197361"));
    }

    #[tokio::test]
    async fn find_by_code_ignores_other_patients() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let requests = MedicationRequestService::new(store_with_patient(&temp_dir), lookup());
        requests
            .create("example", "197361", prescription())
            .await
            .expect("create");

        assert!(requests
            .find_by_code("someone-else", "197361")
            .expect("find")
            .is_empty());
    }
}
