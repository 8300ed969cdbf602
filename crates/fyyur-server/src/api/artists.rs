use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::Form;
use fyyur_db::artists::{self, ArtistDetail, ArtistInput, ArtistRecord};
use fyyur_db::{genres, AppState, Choice, Parent};
use serde::Serialize;
use std::sync::Arc;

use super::flash::Flash;
use super::forms::{ArtistForm, SearchForm};
use super::venues::SearchResponse;
use super::{error_status, now, transact};

#[derive(Serialize)]
pub struct ArtistFormData {
    pub artist: Option<ArtistRecord>,
    pub selected_genres: Vec<String>,
    pub genre_choices: Vec<Choice>,
}

/// GET /artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Choice>>, (StatusCode, String)> {
    artists::choices(&state.db)
        .await
        .map(Json)
        .map_err(error_status)
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let results = artists::search(&state.db, &form.search_term, now())
        .await
        .map_err(error_status)?;
    Ok(Json(SearchResponse {
        results,
        search_term: form.search_term,
    }))
}

/// GET /artists/{id}
pub async fn show_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistDetail>, (StatusCode, String)> {
    artists::detail(&state.db, id, now())
        .await
        .map(Json)
        .map_err(error_status)
}

/// GET /artists/create
pub async fn create_artist_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ArtistFormData>, (StatusCode, String)> {
    let genre_choices = genres::choices(&state.db).await.map_err(error_status)?;
    Ok(Json(ArtistFormData {
        artist: None,
        selected_genres: Vec::new(),
        genre_choices,
    }))
}

/// POST /artists/create
pub async fn create_artist_submission(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ArtistForm>,
) -> (StatusCode, Json<Flash>) {
    let name = form.name.trim().to_string();
    let input = ArtistInput::from(form);

    match transact(&state.db, |txn| {
        Box::pin(async move { artists::create(txn, input).await })
    })
    .await
    {
        Ok(artist) => (
            StatusCode::CREATED,
            Json(Flash::success(format!(
                "Artist {} was successfully listed!",
                artist.name
            ))),
        ),
        Err(e) => {
            tracing::error!(error = %e, name = %name, "artist could not be listed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(Flash::error(format!(
                    "An error occurred. Artist {name} could not be listed."
                ))),
            )
        }
    }
}

/// GET /artists/{id}/edit
pub async fn edit_artist_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistFormData>, (StatusCode, String)> {
    let artist = artists::record(&state.db, id).await.map_err(error_status)?;
    let selected_genres = genres::genre_ids(&state.db, Parent::Artist(id))
        .await
        .map_err(error_status)?;
    let genre_choices = genres::choices(&state.db).await.map_err(error_status)?;

    Ok(Json(ArtistFormData {
        artist: Some(artist),
        selected_genres,
        genre_choices,
    }))
}

/// POST /artists/{id}/edit
pub async fn edit_artist_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<ArtistForm>,
) -> Response {
    let input = ArtistInput::from(form);

    match transact(&state.db, move |txn| {
        Box::pin(async move { artists::update(txn, id, input).await })
    })
    .await
    {
        Ok(_) => Redirect::to(&format!("/artists/{id}")).into_response(),
        Err(e) if e.is_not_found() => error_status(e).into_response(),
        Err(e) => {
            tracing::error!(error = %e, artist_id = id, "artist could not be updated");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(Flash::error(format!(
                    "An error occurred. Artist {id} could not be updated."
                ))),
            )
                .into_response()
        }
    }
}
