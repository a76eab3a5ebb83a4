//! # API REST
//!
//! REST API for medrec.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (status codes, `OperationOutcome` errors, CORS, request tracing)
//!
//! Record semantics live in `medrec-core`; handlers only translate between HTTP and the
//! record services.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiResult, OperationOutcome};

use axum::{
    extract::FromRequest,
    routing::{get, post, put},
    Router,
};
use medrec_core::RecordServices;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    services: Arc<RecordServices>,
}

impl AppState {
    pub fn new(services: RecordServices) -> Self {
        Self {
            services: Arc::new(services),
        }
    }

    pub fn services(&self) -> &RecordServices {
        &self.services
    }
}

/// `Json` extractor whose rejection is rendered as an `OperationOutcome`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::patients::list_patients,
        handlers::patients::create_patient,
        handlers::patients::create_patient_with_id,
        handlers::patients::update_patient,
        handlers::conditions::create_condition,
        handlers::conditions::update_condition,
        handlers::conditions::read_condition,
        handlers::observations::create_observation,
        handlers::observations::update_observation,
        handlers::observations::find_observations,
        handlers::medication_requests::create_medication_request,
        handlers::medication_requests::update_medication_request,
        handlers::medication_requests::find_medication_requests,
        handlers::encounters::list_encounters,
        handlers::encounters::create_encounter,
        handlers::encounters::update_encounter,
    ),
    components(schemas(
        handlers::health::HealthRes,
        error::OperationOutcome,
        error::OperationOutcomeIssue,
        fhir::Patient,
        fhir::Condition,
        fhir::Observation,
        fhir::ObservationValue,
        fhir::MedicationRequest,
        fhir::Encounter,
        fhir::Identifier,
        fhir::HumanName,
        fhir::NameUse,
        fhir::Gender,
        fhir::Coding,
        fhir::CodeableConcept,
        fhir::Quantity,
        fhir::Period,
    )),
    tags((name = "medrec", description = "Patient records with terminology coding"))
)]
pub struct ApiDoc;

/// Build the REST router, including Swagger UI at `/swagger-ui` and the OpenAPI document at
/// `/api-docs/openapi.json`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/patients",
            get(handlers::patients::list_patients).post(handlers::patients::create_patient),
        )
        .route(
            "/patients/:id",
            post(handlers::patients::create_patient_with_id)
                .put(handlers::patients::update_patient),
        )
        .route(
            "/condition/:patient_id",
            post(handlers::conditions::create_condition),
        )
        .route(
            "/condition/:patient_id/:condition_id",
            get(handlers::conditions::read_condition)
                .put(handlers::conditions::update_condition),
        )
        .route(
            "/observation/:patient_id",
            post(handlers::observations::create_observation),
        )
        .route(
            "/observation/:patient_id/:observation_id",
            put(handlers::observations::update_observation),
        )
        .route(
            "/observations/:patient_id/:loinc_code",
            get(handlers::observations::find_observations),
        )
        // POST takes an RxNorm code as the second segment, PUT a medication request id.
        .route(
            "/medication-request/:patient_id/:code_or_id",
            post(handlers::medication_requests::create_medication_request)
                .put(handlers::medication_requests::update_medication_request),
        )
        .route(
            "/medication-requests/:patient_id/:rxnorm_code",
            get(handlers::medication_requests::find_medication_requests),
        )
        .route("/encounter", post(handlers::encounters::create_encounter))
        .route("/encounter/:id", put(handlers::encounters::update_encounter))
        .route("/encounters", get(handlers::encounters::list_encounters))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
