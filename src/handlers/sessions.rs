use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::BlobSummary;
use crate::utils::timing::RequestTimer;

/// Lists stored input images as `{id, name}` pairs. `name` comes from the
/// blob's `file_name` metadata and may be null.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlobSummary>>, ApiError> {
    let _timer = RequestTimer::start("sessions/list");
    let sessions = state
        .store
        .list_with_metadata(&state.config.input_container)
        .await?;
    Ok(Json(sessions))
}
