use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::Form;
use fyyur_db::shows::{self, ShowDetails};
use fyyur_db::{artists, venues, AppState, BookingError, Choice};
use serde::Serialize;
use std::sync::Arc;

use super::flash::Flash;
use super::forms::ShowForm;
use super::{error_status, transact};

#[derive(Serialize)]
pub struct ShowFormData {
    pub artists: Vec<Choice>,
    pub venues: Vec<Choice>,
}

fn parse_id(field: &str, raw: &str) -> Result<i32, BookingError> {
    raw.trim()
        .parse()
        .map_err(|_| BookingError::Validation(format!("{field} must be a number, got {raw:?}")))
}

/// GET /shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowDetails>>, (StatusCode, String)> {
    shows::list_all(&state.db)
        .await
        .map(Json)
        .map_err(error_status)
}

/// GET /shows/create
pub async fn create_show_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ShowFormData>, (StatusCode, String)> {
    let artists = artists::choices(&state.db).await.map_err(error_status)?;
    let venues = venues::choices(&state.db).await.map_err(error_status)?;
    Ok(Json(ShowFormData { artists, venues }))
}

/// POST /shows/create
pub async fn create_show_submission(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ShowForm>,
) -> (StatusCode, Json<Flash>) {
    let parsed = parse_id("artist_id", &form.artist_id).and_then(|artist_id| {
        let venue_id = parse_id("venue_id", &form.venue_id)?;
        let start_time = shows::parse_start_time(&form.start_time)?;
        Ok((artist_id, venue_id, start_time))
    });

    let result = match parsed {
        Ok((artist_id, venue_id, start_time)) => {
            transact(&state.db, move |txn| {
                Box::pin(async move { shows::create(txn, artist_id, venue_id, start_time).await })
            })
            .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => (
            StatusCode::CREATED,
            Json(Flash::success("Show was successfully listed!")),
        ),
        Err(e) => {
            tracing::error!(
                error = %e,
                artist_id = %form.artist_id,
                venue_id = %form.venue_id,
                "show could not be listed"
            );
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(Flash::error("An error occurred. Show could not be listed.")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("venue_id", " 12 ").unwrap(), 12);
        assert!(matches!(
            parse_id("venue_id", "twelve"),
            Err(BookingError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_shows_ordering() {
        let app = seeded_app().await;
        let body = json(get(&app, "/shows").await).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 5);
        // Park Square (venue 3) first, earliest show first
        assert_eq!(rows[0]["venue_id"], 3);
        assert_eq!(rows[0]["start_time"], "06/15/2019, 23:00");
        assert_eq!(rows[1]["start_time"], "04/01/2035, 20:00");
        assert_eq!(rows[4]["venue_name"], "The Musical Hop");
    }

    #[tokio::test]
    async fn test_create_show_form_choices() {
        let app = seeded_app().await;
        let body = json(get(&app, "/shows/create").await).await;
        assert_eq!(body["artists"].as_array().unwrap().len(), 3);
        assert_eq!(body["venues"].as_array().unwrap().len(), 3);
        assert_eq!(body["venues"][0]["name"], "Park Square Live Music & Coffee");
    }

    #[tokio::test]
    async fn test_create_show_success() {
        let app = seeded_app().await;
        let resp = post_form(
            &app,
            "/shows/create",
            "artist_id=2&venue_id=2&start_time=2040-01-01+19%3A30%3A00",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(json(resp).await["category"], "success");

        let venue = json(get(&app, "/venues/2").await).await;
        assert_eq!(venue["upcoming_shows_count"], 1);
        assert_eq!(venue["upcoming_shows"][0]["artist_name"], "Matt Quevedo");
        assert_eq!(venue["upcoming_shows"][0]["start_time"], "01/01/2040, 19:30");
    }

    #[tokio::test]
    async fn test_create_show_rejects_bad_input() {
        let app = seeded_app().await;
        for body in [
            "artist_id=x&venue_id=1&start_time=2040-01-01+19%3A30",
            "artist_id=1&venue_id=1&start_time=soon",
            "artist_id=1&venue_id=99&start_time=2040-01-01+19%3A30",
        ] {
            let resp = post_form(&app, "/shows/create", body).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
            let flash = json(resp).await;
            assert_eq!(flash["message"], "An error occurred. Show could not be listed.");
        }

        let rows = json(get(&app, "/shows").await).await;
        assert_eq!(rows.as_array().unwrap().len(), 5);
    }
}
