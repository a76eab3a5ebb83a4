//! Steps shared by the record services.

use crate::{CoreError, CoreResult};
use fhir::{CodeableConcept, NonEmptyText, Patient, Resource};
use medrec_store::{RecordStore, ResourceFile};
use medrec_terminology::{CodeLookup, Vocabulary};

/// Reject a blank id or term before it reaches the store or the lookup.
pub(crate) fn required_text(what: &str, value: &str) -> CoreResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| CoreError::InvalidInput(format!("{what} cannot be empty")))
}

/// The owning patient must exist before anything is written for them.
pub(crate) fn require_patient(store: &RecordStore, patient_id: &str) -> CoreResult<()> {
    if store.patients().contains(patient_id)? {
        Ok(())
    } else {
        Err(CoreError::NotFound {
            resource: Patient::RESOURCE_TYPE,
            id: patient_id.to_string(),
        })
    }
}

/// Read `id` from `file`, treating a record owned by another patient as absent.
pub(crate) fn read_owned<T: Resource>(
    file: &ResourceFile<T>,
    id: &str,
    patient_id: &str,
) -> CoreResult<T> {
    let record = file.read_one(id)?;
    if record.subject() == Some(patient_id) {
        Ok(record)
    } else {
        Err(CoreError::NotFound {
            resource: T::RESOURCE_TYPE,
            id: id.to_string(),
        })
    }
}

/// Resolve `term` in `vocabulary` and write the match into the first coding of `concept`.
///
/// No match is [`CoreError::LookupFailed`]; `concept` is untouched in that case.
pub(crate) async fn enrich(
    lookup: &dyn CodeLookup,
    vocabulary: Vocabulary,
    term: &str,
    concept: &mut CodeableConcept,
) -> CoreResult<()> {
    let term = required_text("lookup term", term)?;
    match lookup.lookup_code(vocabulary, term.as_str()).await? {
        Some(found) => {
            tracing::debug!("{} '{}' resolved to {}", vocabulary, term, found.code);
            concept.set_primary_coding(found.to_coding(vocabulary));
            Ok(())
        }
        None => {
            tracing::warn!("no {} match for '{}'", vocabulary, term);
            Err(CoreError::LookupFailed {
                vocabulary,
                term: term.into_string(),
            })
        }
    }
}
