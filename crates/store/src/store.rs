//! The authoritative record store.
//!
//! [`RecordStore`] is opened once at process start-up and shared (behind an `Arc`) by every
//! request handler. It owns one [`ResourceFile`] per resource type, so each file has exactly
//! one lock in the process.

use crate::constants::{
    CONDITIONS_FILENAME, ENCOUNTERS_FILENAME, MEDICATIONS_FILENAME, OBSERVATIONS_FILENAME,
    PATIENTS_FILENAME,
};
use crate::{ResourceFile, StoreError, StoreResult};
use fhir::{Condition, Encounter, MedicationRequest, Observation, Patient};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct RecordStore {
    data_dir: PathBuf,
    patients: ResourceFile<Patient>,
    conditions: ResourceFile<Condition>,
    observations: ResourceFile<Observation>,
    medication_requests: ResourceFile<MedicationRequest>,
    encounters: ResourceFile<Encounter>,
}

impl RecordStore {
    /// Open the store rooted at `data_dir`.
    ///
    /// Creates the directory if needed, and every resource file that does not exist yet
    /// (each holding an empty collection). Existing files are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if:
    /// - `data_dir` exists but is not a directory,
    /// - the directory or a missing file cannot be created.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        if data_dir.exists() && !data_dir.is_dir() {
            return Err(StoreError::InvalidDataDirectory(format!(
                "Path is not a directory: {}",
                data_dir.display()
            )));
        }

        fs::create_dir_all(data_dir).map_err(|e| {
            StoreError::InvalidDataDirectory(format!(
                "Cannot create directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;

        let store = Self {
            data_dir: data_dir.to_path_buf(),
            patients: ResourceFile::new(data_dir.join(PATIENTS_FILENAME)),
            conditions: ResourceFile::new(data_dir.join(CONDITIONS_FILENAME)),
            observations: ResourceFile::new(data_dir.join(OBSERVATIONS_FILENAME)),
            medication_requests: ResourceFile::new(data_dir.join(MEDICATIONS_FILENAME)),
            encounters: ResourceFile::new(data_dir.join(ENCOUNTERS_FILENAME)),
        };

        store.patients.ensure_exists()?;
        store.conditions.ensure_exists()?;
        store.observations.ensure_exists()?;
        store.medication_requests.ensure_exists()?;
        store.encounters.ensure_exists()?;

        tracing::info!("opened record store at {}", data_dir.display());
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn patients(&self) -> &ResourceFile<Patient> {
        &self.patients
    }

    pub fn conditions(&self) -> &ResourceFile<Condition> {
        &self.conditions
    }

    pub fn observations(&self) -> &ResourceFile<Observation> {
        &self.observations
    }

    pub fn medication_requests(&self) -> &ResourceFile<MedicationRequest> {
        &self.medication_requests
    }

    pub fn encounters(&self) -> &ResourceFile<Encounter> {
        &self.encounters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_every_resource_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");

        let store = RecordStore::open(&data_dir).expect("open should succeed");
        assert_eq!(store.data_dir(), data_dir.as_path());

        for name in [
            PATIENTS_FILENAME,
            CONDITIONS_FILENAME,
            OBSERVATIONS_FILENAME,
            MEDICATIONS_FILENAME,
            ENCOUNTERS_FILENAME,
        ] {
            let path = data_dir.join(name);
            assert!(path.is_file(), "{name} should exist");
            assert_eq!(fs::read_to_string(&path).expect("read file").trim(), "{}");
        }
    }

    #[test]
    fn open_keeps_existing_records() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        {
            let store = RecordStore::open(temp_dir.path()).expect("open should succeed");
            store.patients().append(Patient::example()).expect("append");
        }

        let reopened = RecordStore::open(temp_dir.path()).expect("reopen should succeed");
        let patients = reopened.patients().read_all().expect("read_all");
        assert_eq!(patients, vec![Patient::example()]);
    }

    #[test]
    fn open_rejects_file_as_data_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("not_a_dir");
        fs::write(&file_path, "x").expect("write file");

        let err = RecordStore::open(&file_path).expect_err("should reject a file");
        assert!(matches!(err, StoreError::InvalidDataDirectory(_)));
    }

    #[test]
    fn resource_files_are_independent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::open(temp_dir.path()).expect("open should succeed");
        store.patients().append(Patient::example()).expect("append");

        assert!(store.conditions().read_all().expect("read_all").is_empty());
        assert!(!store.encounters().contains("example").expect("contains"));
    }
}
