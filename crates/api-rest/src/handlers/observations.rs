use crate::{ApiJson, ApiResult, AppState, OperationOutcome};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fhir::Observation;

#[utoipa::path(
    post,
    path = "/observation/{patient_id}",
    params(("patient_id" = String, Path, description = "Owning patient id")),
    request_body(content = Observation, description = "`code.text` holds the LOINC code"),
    responses(
        (status = 201, description = "Observation coded and stored", body = Observation),
        (status = 400, description = "Unknown LOINC code", body = OperationOutcome),
        (status = 404, description = "Patient not found", body = OperationOutcome),
        (status = 502, description = "Terminology service unreachable", body = OperationOutcome),
        (status = 504, description = "Terminology service timed out", body = OperationOutcome)
    )
)]
/// Create an observation, resolving its LOINC code.
#[axum::debug_handler]
pub async fn create_observation(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    ApiJson(observation): ApiJson<Observation>,
) -> ApiResult<(StatusCode, Json<Observation>)> {
    let created = state
        .services()
        .observations
        .create(&patient_id, observation)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/observation/{patient_id}/{observation_id}",
    params(
        ("patient_id" = String, Path, description = "Owning patient id"),
        ("observation_id" = String, Path, description = "Observation id")
    ),
    request_body = Observation,
    responses(
        (status = 200, description = "Observation re-coded and replaced", body = Observation),
        (status = 400, description = "Unknown LOINC code", body = OperationOutcome),
        (status = 404, description = "Observation not found for this patient", body = OperationOutcome)
    )
)]
#[axum::debug_handler]
pub async fn update_observation(
    State(state): State<AppState>,
    Path((patient_id, observation_id)): Path<(String, String)>,
    ApiJson(observation): ApiJson<Observation>,
) -> ApiResult<Json<Observation>> {
    let updated = state
        .services()
        .observations
        .update(&patient_id, &observation_id, observation)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/observations/{patient_id}/{loinc_code}",
    params(
        ("patient_id" = String, Path, description = "Owning patient id"),
        ("loinc_code" = String, Path, description = "LOINC code to match")
    ),
    responses(
        (status = 200, description = "The patient's observations with this code", body = [Observation])
    )
)]
/// Observations of a patient whose primary code matches `loinc_code`.
#[axum::debug_handler]
pub async fn find_observations(
    State(state): State<AppState>,
    Path((patient_id, loinc_code)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Observation>>> {
    Ok(Json(
        state
            .services()
            .observations
            .find_by_code(&patient_id, &loinc_code)?,
    ))
}
