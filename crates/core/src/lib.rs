//! # medrec core
//!
//! Record services for the medrec API.
//!
//! This crate composes the store and the terminology lookup into one service per resource:
//! - patients and encounters are stored as given (encounters after a reference check)
//! - conditions, observations and medication requests are coded against ICD-10-CM, LOINC and
//!   RxNorm before they are written
//!
//! **No API concerns**: routing, status codes and OpenAPI belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod repositories;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use repositories::{
    conditions::ConditionService, encounters::EncounterService,
    medication_requests::MedicationRequestService, observations::ObservationService,
    patients::PatientService,
};

use medrec_store::RecordStore;
use medrec_terminology::{CodeLookup, UmlsClient};
use std::sync::Arc;

/// Every record service, sharing one store and one lookup client.
#[derive(Clone)]
pub struct RecordServices {
    pub patients: PatientService,
    pub conditions: ConditionService,
    pub observations: ObservationService,
    pub medication_requests: MedicationRequestService,
    pub encounters: EncounterService,
}

impl RecordServices {
    pub fn new(store: Arc<RecordStore>, lookup: Arc<dyn CodeLookup>) -> Self {
        Self {
            patients: PatientService::new(store.clone()),
            conditions: ConditionService::new(store.clone(), lookup.clone()),
            observations: ObservationService::new(store.clone(), lookup.clone()),
            medication_requests: MedicationRequestService::new(store.clone(), lookup),
            encounters: EncounterService::new(store),
        }
    }

    /// Open the store under the configured data directory and connect the UMLS client.
    pub fn open(cfg: &CoreConfig) -> CoreResult<Self> {
        let store = Arc::new(RecordStore::open(cfg.data_dir())?);
        let lookup = Arc::new(UmlsClient::new(cfg.umls().clone())?);
        tracing::info!("using UMLS at {}", lookup.base_url());
        Ok(Self::new(store, lookup))
    }
}
