//! Request handlers, one module per resource.

pub mod conditions;
pub mod encounters;
pub mod health;
pub mod medication_requests;
pub mod observations;
pub mod patients;

use serde::Deserialize;
use utoipa::IntoParams;

/// `?id=` selector on the collection GETs.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Return only the record with this id.
    pub id: Option<String>,
}
