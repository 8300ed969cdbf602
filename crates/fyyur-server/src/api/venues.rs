use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::Form;
use fyyur_db::search::SearchResults;
use fyyur_db::venues::{self, Area, VenueDetail, VenueInput, VenueRecord};
use fyyur_db::{genres, AppState, Choice, Parent};
use serde::Serialize;
use std::sync::Arc;

use super::flash::Flash;
use super::forms::{SearchForm, VenueForm};
use super::{error_status, now, transact};

#[derive(Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub results: SearchResults,
    pub search_term: String,
}

/// What the venue form needs to render: current values when editing, the
/// ids to pre-select and every genre on offer.
#[derive(Serialize)]
pub struct VenueFormData {
    pub venue: Option<VenueRecord>,
    pub selected_genres: Vec<String>,
    pub genre_choices: Vec<Choice>,
}

/// GET /venues
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Area>>, (StatusCode, String)> {
    venues::areas(&state.db, now())
        .await
        .map(Json)
        .map_err(error_status)
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let results = venues::search(&state.db, &form.search_term, now())
        .await
        .map_err(error_status)?;
    Ok(Json(SearchResponse {
        results,
        search_term: form.search_term,
    }))
}

/// GET /venues/{id}
pub async fn show_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<VenueDetail>, (StatusCode, String)> {
    venues::detail(&state.db, id, now())
        .await
        .map(Json)
        .map_err(error_status)
}

/// GET /venues/create
pub async fn create_venue_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VenueFormData>, (StatusCode, String)> {
    let genre_choices = genres::choices(&state.db).await.map_err(error_status)?;
    Ok(Json(VenueFormData {
        venue: None,
        selected_genres: Vec::new(),
        genre_choices,
    }))
}

/// POST /venues/create
pub async fn create_venue_submission(
    State(state): State<Arc<AppState>>,
    Form(form): Form<VenueForm>,
) -> (StatusCode, Json<Flash>) {
    let name = form.name.trim().to_string();
    let input = VenueInput::from(form);

    match transact(&state.db, |txn| {
        Box::pin(async move { venues::create(txn, input).await })
    })
    .await
    {
        Ok(venue) => (
            StatusCode::CREATED,
            Json(Flash::success(format!(
                "Venue {} was successfully listed!",
                venue.name
            ))),
        ),
        Err(e) => {
            tracing::error!(error = %e, name = %name, "venue could not be listed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(Flash::error(format!(
                    "An error occurred. Venue {name} could not be listed."
                ))),
            )
        }
    }
}

/// GET /venues/{id}/edit
pub async fn edit_venue_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<VenueFormData>, (StatusCode, String)> {
    let venue = venues::record(&state.db, id).await.map_err(error_status)?;
    let selected_genres = genres::genre_ids(&state.db, Parent::Venue(id))
        .await
        .map_err(error_status)?;
    let genre_choices = genres::choices(&state.db).await.map_err(error_status)?;

    Ok(Json(VenueFormData {
        venue: Some(venue),
        selected_genres,
        genre_choices,
    }))
}

/// POST /venues/{id}/edit
pub async fn edit_venue_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<VenueForm>,
) -> Response {
    let input = VenueInput::from(form);

    match transact(&state.db, move |txn| {
        Box::pin(async move { venues::update(txn, id, input).await })
    })
    .await
    {
        Ok(_) => Redirect::to(&format!("/venues/{id}")).into_response(),
        Err(e) if e.is_not_found() => error_status(e).into_response(),
        Err(e) => {
            tracing::error!(error = %e, venue_id = id, "venue could not be updated");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(Flash::error(format!(
                    "An error occurred. Venue {id} could not be updated."
                ))),
            )
                .into_response()
        }
    }
}

/// DELETE /venues/{id}
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, (StatusCode, String)> {
    transact(&state.db, move |txn| {
        Box::pin(async move { venues::delete(txn, id).await })
    })
    .await
    .map_err(error_status)?;
    Ok(StatusCode::NO_CONTENT)
}
