//! Handler for pinning a project location on the map.

use axum::extract::State;
use axum::Json;
use qtrace_core::address::GeoPoint;
use qtrace_core::forms::ProjectDraft;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /geocode/pin`.
#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub lat: f64,
    pub lng: f64,
    /// The form being edited. A blank draft is used when absent.
    #[serde(default)]
    pub draft: Option<ProjectDraft>,
}

#[derive(Debug, Serialize)]
pub struct PinResponse {
    /// Whether the geocoder suggested an address. When it did not, the
    /// draft's address fields are left as they were.
    pub resolved: bool,
    pub draft: ProjectDraft,
}

/// POST /api/v1/geocode/pin
///
/// Record a map click on the draft and fill in the address the geocoder
/// suggests for it.
pub async fn pin(
    State(state): State<AppState>,
    Json(input): Json<PinRequest>,
) -> AppResult<Json<DataResponse<PinResponse>>> {
    let point = GeoPoint::new(input.lat, input.lng)?;
    let suggestion = state.geocoder.resolve(point).await;
    let resolved = suggestion.is_some();

    let mut draft = input.draft.unwrap_or_default();
    draft.apply_pin(point, suggestion);

    Ok(Json(DataResponse {
        data: PinResponse { resolved, draft },
    }))
}
