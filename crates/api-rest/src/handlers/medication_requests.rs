use crate::{ApiJson, ApiResult, AppState, OperationOutcome};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fhir::MedicationRequest;

#[utoipa::path(
    post,
    path = "/medication-request/{patient_id}/{rxnorm_code}",
    params(
        ("patient_id" = String, Path, description = "Owning patient id"),
        ("rxnorm_code" = String, Path, description = "RxNorm code of the medication")
    ),
    request_body = MedicationRequest,
    responses(
        (status = 201, description = "Medication request coded and stored", body = MedicationRequest),
        (status = 400, description = "Unknown RxNorm code", body = OperationOutcome),
        (status = 404, description = "Patient not found", body = OperationOutcome),
        (status = 502, description = "Terminology service unreachable", body = OperationOutcome),
        (status = 504, description = "Terminology service timed out", body = OperationOutcome)
    )
)]
/// Create a medication request for the RxNorm code in the path.
#[axum::debug_handler]
pub async fn create_medication_request(
    State(state): State<AppState>,
    Path((patient_id, rxnorm_code)): Path<(String, String)>,
    ApiJson(request): ApiJson<MedicationRequest>,
) -> ApiResult<(StatusCode, Json<MedicationRequest>)> {
    let created = state
        .services()
        .medication_requests
        .create(&patient_id, &rxnorm_code, request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/medication-request/{patient_id}/{medication_request_id}",
    params(
        ("patient_id" = String, Path, description = "Owning patient id"),
        ("medication_request_id" = String, Path, description = "Medication request id")
    ),
    request_body = MedicationRequest,
    responses(
        (status = 200, description = "Medication request re-coded and replaced", body = MedicationRequest),
        (status = 400, description = "Unknown RxNorm code", body = OperationOutcome),
        (status = 404, description = "Medication request not found for this patient", body = OperationOutcome)
    )
)]
/// Replace a medication request. The RxNorm code is taken from the body, or kept from the
/// stored request.
#[axum::debug_handler]
pub async fn update_medication_request(
    State(state): State<AppState>,
    Path((patient_id, request_id)): Path<(String, String)>,
    ApiJson(request): ApiJson<MedicationRequest>,
) -> ApiResult<Json<MedicationRequest>> {
    let updated = state
        .services()
        .medication_requests
        .update(&patient_id, &request_id, request)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/medication-requests/{patient_id}/{rxnorm_code}",
    params(
        ("patient_id" = String, Path, description = "Owning patient id"),
        ("rxnorm_code" = String, Path, description = "RxNorm code to match")
    ),
    responses(
        (status = 200, description = "The patient's medication requests for this code", body = [MedicationRequest])
    )
)]
#[axum::debug_handler]
pub async fn find_medication_requests(
    State(state): State<AppState>,
    Path((patient_id, rxnorm_code)): Path<(String, String)>,
) -> ApiResult<Json<Vec<MedicationRequest>>> {
    Ok(Json(
        state
            .services()
            .medication_requests
            .find_by_code(&patient_id, &rxnorm_code)?,
    ))
}
