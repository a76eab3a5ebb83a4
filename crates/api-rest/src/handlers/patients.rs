use super::IdQuery;
use crate::{ApiJson, ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fhir::Patient;

#[utoipa::path(
    get,
    path = "/patients",
    params(IdQuery),
    responses(
        (status = 200, description = "All patients, or the one selected by `id`", body = [Patient]),
        (status = 404, description = "No patient with this id", body = crate::OperationOutcome),
        (status = 500, description = "Internal server error", body = crate::OperationOutcome)
    )
)]
/// List all patients, or read one with `?id=`.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Response> {
    let patients = &state.services().patients;
    match query.id {
        Some(id) => Ok(Json(patients.read(&id)?).into_response()),
        None => Ok(Json(patients.list()?).into_response()),
    }
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = Patient,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Bad request", body = crate::OperationOutcome),
        (status = 409, description = "A patient with this id already exists", body = crate::OperationOutcome)
    )
)]
/// Create a patient. A missing `id` is generated.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    ApiJson(patient): ApiJson<Patient>,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    let created = state.services().patients.create(None, patient)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id; overrides any id in the body")),
    request_body = Patient,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Bad request", body = crate::OperationOutcome),
        (status = 409, description = "A patient with this id already exists", body = crate::OperationOutcome)
    )
)]
/// Create a patient under a caller-chosen id.
#[axum::debug_handler]
pub async fn create_patient_with_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patient): ApiJson<Patient>,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    let created = state.services().patients.create(Some(&id), patient)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    request_body = Patient,
    responses(
        (status = 200, description = "Patient replaced", body = Patient),
        (status = 404, description = "No patient with this id", body = crate::OperationOutcome)
    )
)]
/// Replace a patient.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patient): ApiJson<Patient>,
) -> ApiResult<Json<Patient>> {
    Ok(Json(state.services().patients.update(&id, patient)?))
}
