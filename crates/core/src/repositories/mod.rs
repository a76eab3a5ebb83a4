pub mod conditions;
pub mod encounters;
pub(crate) mod helpers;
pub mod medication_requests;
pub mod observations;
pub mod patients;

#[cfg(test)]
pub(crate) mod test_support {
    use fhir::Patient;
    use medrec_store::RecordStore;
    use medrec_terminology::{CodeLookup, FixedLookup, Vocabulary};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// A store holding `Patient::example()` (id `example`).
    pub(crate) fn store_with_patient(temp_dir: &TempDir) -> Arc<RecordStore> {
        let store = RecordStore::open(temp_dir.path()).expect("open store");
        store
            .patients()
            .append(Patient::example())
            .expect("append patient");
        Arc::new(store)
    }

    pub(crate) fn lookup() -> Arc<dyn CodeLookup> {
        Arc::new(
            FixedLookup::new()
                .with(
                    Vocabulary::Icd10Cm,
                    "type 2 diabetes",
                    "E11.9",
                    "Type 2 diabetes mellitus without complications",
                )
                .with(Vocabulary::Icd10Cm, "asthma", "J45.909", "Unspecified asthma")
                .with(Vocabulary::Loinc, "8867-4", "8867-4", "Heart rate")
                .with(Vocabulary::Loinc, "2339-0", "2339-0", "Glucose [Mass/volume] in Blood")
                .with(
                    Vocabulary::RxNorm,
                    "197361",
                    "197361",
                    "amlodipine 5 MG Oral Tablet",
                ),
        )
    }
}
