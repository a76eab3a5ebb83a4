//! Encounters.
//!
//! An encounter links a patient to conditions, observations and medication requests by id.
//! Every link is checked against its resource file when the encounter is written; a dangling
//! link rejects the whole write. Links are not re-checked afterwards.

use super::helpers::required_text;
use crate::{CoreError, CoreResult};
use fhir::{Encounter, Resource};
use medrec_store::{RecordStore, ResourceFile};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct EncounterService {
    store: Arc<RecordStore>,
}

impl EncounterService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Validate the references of `encounter` and store it.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceNotFound` naming the first missing patient, condition, observation
    /// or medication request. `encounters.json` is not written in that case.
    pub fn create(&self, mut encounter: Encounter) -> CoreResult<Encounter> {
        encounter.check_resource_type()?;
        self.check_references(&encounter)?;
        encounter.ensure_id();

        let stored = self.store.encounters().append(encounter)?;
        tracing::info!(
            "created encounter {} for patient {}",
            stored.id,
            stored.patient_id
        );
        Ok(stored)
    }

    /// Replace encounter `id`, re-validating its references.
    pub fn update(&self, id: &str, mut encounter: Encounter) -> CoreResult<Encounter> {
        encounter.check_resource_type()?;
        let id = required_text("encounter id", id)?.into_string();
        if !self.store.encounters().contains(&id)? {
            return Err(CoreError::NotFound {
                resource: Encounter::RESOURCE_TYPE,
                id,
            });
        }
        encounter.id = id.clone();
        self.check_references(&encounter)?;

        let stored = self.store.encounters().replace(&id, encounter)?;
        tracing::info!("updated encounter {}", stored.id);
        Ok(stored)
    }

    pub fn read(&self, id: &str) -> CoreResult<Encounter> {
        Ok(self.store.encounters().read_one(id)?)
    }

    pub fn list(&self) -> CoreResult<Vec<Encounter>> {
        Ok(self.store.encounters().read_all()?)
    }

    fn check_references(&self, encounter: &Encounter) -> CoreResult<()> {
        let patient_id = required_text("patient_id", &encounter.patient_id)?;
        require_all(self.store.patients(), [patient_id.as_str()])?;
        require_all(
            self.store.conditions(),
            encounter.condition_ids.iter().map(String::as_str),
        )?;
        require_all(
            self.store.observations(),
            encounter.observation_ids.iter().map(String::as_str),
        )?;
        require_all(
            self.store.medication_requests(),
            encounter.medication_request_ids.iter().map(String::as_str),
        )
    }
}

/// Every id in `ids` must be present in `file`. The file is read once.
fn require_all<'a, T: Resource>(
    file: &ResourceFile<T>,
    ids: impl IntoIterator<Item = &'a str>,
) -> CoreResult<()> {
    let ids: Vec<&str> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(());
    }

    let present = file.ids()?;
    match ids.iter().find(|id| !present.contains(id.trim())) {
        Some(missing) => Err(CoreError::ReferenceNotFound {
            resource: T::RESOURCE_TYPE,
            id: (*missing).to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::conditions::ConditionService;
    use crate::repositories::test_support::{lookup, store_with_patient};
    use fhir::{CodeableConcept, Condition};
    use std::fs;
    use tempfile::TempDir;

    fn visit(patient_id: &str) -> Encounter {
        Encounter {
            resource_type: Encounter::RESOURCE_TYPE.into(),
            id: String::new(),
            status: "finished".into(),
            patient_id: patient_id.into(),
            condition_ids: Vec::new(),
            observation_ids: Vec::new(),
            medication_request_ids: Vec::new(),
            period: None,
        }
    }

    async fn stored_condition(store: &Arc<RecordStore>) -> String {
        let conditions = ConditionService::new(store.clone(), lookup());
        let condition = Condition {
            resource_type: Condition::RESOURCE_TYPE.into(),
            id: String::new(),
            subject: String::new(),
            code: CodeableConcept {
                text: "asthma".into(),
                coding: Vec::new(),
            },
            clinical_status: None,
        };
        conditions
            .create("example", condition)
            .await
            .expect("create condition")
            .id
    }

    #[tokio::test]
    async fn create_with_valid_references() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_with_patient(&temp_dir);
        let condition_id = stored_condition(&store).await;
        let encounters = EncounterService::new(store);

        let mut encounter = visit("example");
        encounter.condition_ids.push(condition_id);
        let created = encounters.create(encounter).expect("create");

        assert!(!created.id.is_empty());
        assert_eq!(encounters.read(&created.id).expect("read"), created);
        assert_eq!(encounters.list().expect("list"), vec![created]);
    }

    #[test]
    fn missing_condition_rejects_and_writes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_with_patient(&temp_dir);
        let path = store.encounters().path().to_path_buf();
        let before = fs::read(&path).expect("read file");
        let encounters = EncounterService::new(store);

        let mut encounter = visit("example");
        encounter.condition_ids.push("no-such-condition".into());
        let err = encounters.create(encounter).expect_err("dangling reference");

        match err {
            CoreError::ReferenceNotFound { resource, id } => {
                assert_eq!(resource, "Condition");
                assert_eq!(id, "no-such-condition");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read(&path).expect("read file"), before);
    }

    #[test]
    fn missing_patient_is_reference_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let encounters = EncounterService::new(store_with_patient(&temp_dir));

        let err = encounters.create(visit("nobody")).expect_err("no patient");
        assert!(matches!(
            err,
            CoreError::ReferenceNotFound { resource: "Patient", .. }
        ));
    }

    #[test]
    fn observation_and_medication_links_are_checked() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let encounters = EncounterService::new(store_with_patient(&temp_dir));

        let mut with_observation = visit("example");
        with_observation.observation_ids.push("obs-1".into());
        assert!(matches!(
            encounters.create(with_observation),
            Err(CoreError::ReferenceNotFound { resource: "Observation", .. })
        ));

        let mut with_medication = visit("example");
        with_medication.medication_request_ids.push("med-1".into());
        assert!(matches!(
            encounters.create(with_medication),
            Err(CoreError::ReferenceNotFound { resource: "MedicationRequest", .. })
        ));
    }

    #[tokio::test]
    async fn update_survives_reopening_the_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let created = {
            let encounters = EncounterService::new(store_with_patient(&temp_dir));
            encounters.create(visit("example")).expect("create")
        };

        let reopened = Arc::new(RecordStore::open(temp_dir.path()).expect("reopen"));
        let condition_id = stored_condition(&reopened).await;
        let encounters = EncounterService::new(reopened);

        let mut changed = visit("example");
        changed.status = "in-progress".into();
        changed.condition_ids.push(condition_id);
        let updated = encounters.update(&created.id, changed).expect("update");

        assert_eq!(updated.id, created.id);
        assert_eq!(encounters.read(&created.id).expect("read").status, "in-progress");
    }

    #[tokio::test]
    async fn links_resolve_to_records_created_with_padded_ids() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_with_patient(&temp_dir);
        let conditions = ConditionService::new(store.clone(), lookup());
        let mut condition = Condition {
            resource_type: Condition::RESOURCE_TYPE.into(),
            id: " c1 ".into(),
            subject: String::new(),
            code: CodeableConcept {
                text: "asthma".into(),
                coding: Vec::new(),
            },
            clinical_status: None,
        };
        condition = conditions.create("example", condition).await.expect("create condition");
        assert_eq!(condition.id, "c1");
        assert_eq!(conditions.read("example", "c1").expect("read").id, "c1");

        let encounters = EncounterService::new(store);
        let mut encounter = visit("example");
        encounter.id = " e1 ".into();
        encounter.condition_ids.push("c1".into());
        let created = encounters.create(encounter).expect("create encounter");
        assert_eq!(created.id, "e1");

        let mut changed = visit("example");
        changed.status = "in-progress".into();
        changed.condition_ids.push("c1".into());
        let updated = encounters.update(" e1 ", changed).expect("update");
        assert_eq!(updated.id, "e1");
        assert_eq!(encounters.read("e1").expect("read").status, "in-progress");
    }

    #[test]
    fn update_of_unknown_encounter_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let encounters = EncounterService::new(store_with_patient(&temp_dir));

        assert!(matches!(
            encounters.update("missing", visit("example")),
            Err(CoreError::NotFound { resource: "Encounter", .. })
        ));
    }
}
