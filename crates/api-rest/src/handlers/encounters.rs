use super::IdQuery;
use crate::{ApiJson, ApiResult, AppState, OperationOutcome};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fhir::Encounter;

#[utoipa::path(
    post,
    path = "/encounter",
    request_body = Encounter,
    responses(
        (status = 201, description = "Encounter stored", body = Encounter),
        (status = 404, description = "A referenced record does not exist", body = OperationOutcome),
        (status = 409, description = "An encounter with this id already exists", body = OperationOutcome)
    )
)]
/// Create an encounter after checking that every referenced record exists.
#[axum::debug_handler]
pub async fn create_encounter(
    State(state): State<AppState>,
    ApiJson(encounter): ApiJson<Encounter>,
) -> ApiResult<(StatusCode, Json<Encounter>)> {
    let created = state.services().encounters.create(encounter)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/encounter/{id}",
    params(("id" = String, Path, description = "Encounter id")),
    request_body = Encounter,
    responses(
        (status = 200, description = "Encounter replaced", body = Encounter),
        (status = 404, description = "Encounter or a referenced record not found", body = OperationOutcome)
    )
)]
#[axum::debug_handler]
pub async fn update_encounter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(encounter): ApiJson<Encounter>,
) -> ApiResult<Json<Encounter>> {
    Ok(Json(state.services().encounters.update(&id, encounter)?))
}

#[utoipa::path(
    get,
    path = "/encounters",
    params(IdQuery),
    responses(
        (status = 200, description = "All encounters, or the one selected by `id`", body = [Encounter]),
        (status = 404, description = "No encounter with this id", body = OperationOutcome)
    )
)]
#[axum::debug_handler]
pub async fn list_encounters(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Response> {
    let encounters = &state.services().encounters;
    match query.id {
        Some(id) => Ok(Json(encounters.read(&id)?).into_response()),
        None => Ok(Json(encounters.list()?).into_response()),
    }
}
