use axum::{extract::State, http::StatusCode, Json};
use fyyur_db::{genres, AppState, Choice};
use std::sync::Arc;

use super::error_status;

/// GET /genres
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Choice>>, (StatusCode, String)> {
    genres::choices(&state.db)
        .await
        .map(Json)
        .map_err(error_status)
}
