use crate::{ApiJson, ApiResult, AppState, OperationOutcome};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fhir::Condition;

#[utoipa::path(
    post,
    path = "/condition/{patient_id}",
    params(("patient_id" = String, Path, description = "Owning patient id")),
    request_body(content = Condition, description = "`code.text` holds the diagnosis to search in ICD-10-CM"),
    responses(
        (status = 201, description = "Condition coded and stored", body = Condition),
        (status = 400, description = "Diagnosis has no ICD-10-CM match", body = OperationOutcome),
        (status = 404, description = "Patient not found", body = OperationOutcome),
        (status = 502, description = "Terminology service unreachable", body = OperationOutcome),
        (status = 504, description = "Terminology service timed out", body = OperationOutcome)
    )
)]
/// Create a condition, coding its diagnosis text against ICD-10-CM.
#[axum::debug_handler]
pub async fn create_condition(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    ApiJson(condition): ApiJson<Condition>,
) -> ApiResult<(StatusCode, Json<Condition>)> {
    let created = state
        .services()
        .conditions
        .create(&patient_id, condition)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/condition/{patient_id}/{condition_id}",
    params(
        ("patient_id" = String, Path, description = "Owning patient id"),
        ("condition_id" = String, Path, description = "Condition id")
    ),
    request_body = Condition,
    responses(
        (status = 200, description = "Condition re-coded and replaced", body = Condition),
        (status = 400, description = "Diagnosis has no ICD-10-CM match", body = OperationOutcome),
        (status = 404, description = "Condition not found for this patient", body = OperationOutcome)
    )
)]
#[axum::debug_handler]
pub async fn update_condition(
    State(state): State<AppState>,
    Path((patient_id, condition_id)): Path<(String, String)>,
    ApiJson(condition): ApiJson<Condition>,
) -> ApiResult<Json<Condition>> {
    let updated = state
        .services()
        .conditions
        .update(&patient_id, &condition_id, condition)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/condition/{patient_id}/{condition_id}",
    params(
        ("patient_id" = String, Path, description = "Owning patient id"),
        ("condition_id" = String, Path, description = "Condition id")
    ),
    responses(
        (status = 200, description = "The condition", body = Condition),
        (status = 404, description = "Condition not found for this patient", body = OperationOutcome)
    )
)]
#[axum::debug_handler]
pub async fn read_condition(
    State(state): State<AppState>,
    Path((patient_id, condition_id)): Path<(String, String)>,
) -> ApiResult<Json<Condition>> {
    Ok(Json(
        state
            .services()
            .conditions
            .read(&patient_id, &condition_id)?,
    ))
}
