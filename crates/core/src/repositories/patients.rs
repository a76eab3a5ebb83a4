//! Patient records.
//!
//! Patients are stored as given: no enrichment, no references to check. Every other resource
//! names its owning patient, and the other services refuse to write for a patient id that is
//! not in `patients.json`.

use super::helpers::required_text;
use crate::CoreResult;
use fhir::{Patient, Resource};
use medrec_store::RecordStore;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct PatientService {
    store: Arc<RecordStore>,
}

impl PatientService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Store a new patient.
    ///
    /// `id` (from `POST /patients/{id}`) takes precedence over any id in the body; with
    /// neither, a fresh id is generated.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the body names another `resourceType` or `id` is blank,
    /// - `Conflict` if a patient with the id already exists.
    pub fn create(&self, id: Option<&str>, mut patient: Patient) -> CoreResult<Patient> {
        patient.check_resource_type()?;
        if let Some(id) = id {
            patient.id = required_text("patient id", id)?.into_string();
        }
        patient.ensure_id();

        let stored = self.store.patients().append(patient)?;
        tracing::info!("created patient {}", stored.id);
        Ok(stored)
    }

    /// Replace the patient stored under `id`. The path id wins over the body id.
    pub fn update(&self, id: &str, mut patient: Patient) -> CoreResult<Patient> {
        patient.check_resource_type()?;
        let id = required_text("patient id", id)?.into_string();
        patient.id = id.clone();

        let stored = self.store.patients().replace(&id, patient)?;
        tracing::info!("updated patient {}", stored.id);
        Ok(stored)
    }

    pub fn read(&self, id: &str) -> CoreResult<Patient> {
        Ok(self.store.patients().read_one(id)?)
    }

    pub fn list(&self) -> CoreResult<Vec<Patient>> {
        Ok(self.store.patients().read_all()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use std::fs;
    use tempfile::TempDir;

    fn service(temp_dir: &TempDir) -> PatientService {
        let store = RecordStore::open(temp_dir.path()).expect("open store");
        PatientService::new(Arc::new(store))
    }

    #[test]
    fn create_then_read_returns_same_patient() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = service(&temp_dir);

        let mut input = Patient::example();
        input.id.clear();
        let created = patients.create(None, input.clone()).expect("create");

        assert_eq!(created.id.len(), 32);
        assert!(created.id.chars().all(|c| c.is_ascii_hexdigit()));

        let read = patients.read(&created.id).expect("read");
        input.id = created.id.clone();
        assert_eq!(read, input);
    }

    #[test]
    fn path_id_wins_over_body_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = service(&temp_dir);

        let created = patients
            .create(Some("from-path"), Patient::example())
            .expect("create");
        assert_eq!(created.id, "from-path");
        assert!(matches!(
            patients.read("example"),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn duplicate_create_is_conflict() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = service(&temp_dir);

        patients.create(None, Patient::example()).expect("create");
        let err = patients
            .create(None, Patient::example())
            .expect_err("duplicate id");
        assert!(matches!(err, CoreError::Conflict { .. }));
        assert_eq!(patients.list().expect("list").len(), 1);
    }

    #[test]
    fn update_missing_patient_leaves_file_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = service(&temp_dir);
        patients.create(None, Patient::example()).expect("create");

        let path = temp_dir.path().join(medrec_store::PATIENTS_FILENAME);
        let before = fs::read(&path).expect("read file");

        let err = patients
            .update("nobody", Patient::example())
            .expect_err("missing id");
        assert!(matches!(err, CoreError::NotFound { resource: "Patient", .. }));
        assert_eq!(fs::read(&path).expect("read file"), before);
    }

    #[test]
    fn update_replaces_whole_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = service(&temp_dir);
        patients.create(None, Patient::example()).expect("create");

        let mut changed = Patient::example();
        changed.id = "ignored".into();
        changed.birth_date = "1975-01-01".into();
        changed.identifier.clear();

        let updated = patients.update("example", changed).expect("update");
        assert_eq!(updated.id, "example");

        let read = patients.read("example").expect("read");
        assert_eq!(read.birth_date, "1975-01-01");
        assert!(read.identifier.is_empty());
    }

    #[test]
    fn padded_ids_are_stored_trimmed() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = service(&temp_dir);

        let mut padded = Patient::example();
        padded.id = " p1 ".into();
        assert_eq!(patients.create(None, padded).expect("create").id, "p1");
        assert_eq!(patients.read("p1").expect("read").id, "p1");

        let updated = patients
            .update(" p1 ", Patient::example())
            .expect("update with padded path id");
        assert_eq!(updated.id, "p1");
        assert_eq!(patients.list().expect("list").len(), 1);
    }

    #[test]
    fn rejects_other_resource_type() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = service(&temp_dir);

        let mut wrong = Patient::example();
        wrong.resource_type = "Observation".into();
        assert!(matches!(
            patients.create(None, wrong),
            Err(CoreError::InvalidInput(_))
        ));
    }
}
