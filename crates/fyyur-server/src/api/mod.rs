pub mod artists;
pub mod flash;
pub mod forms;
pub mod genres;
pub mod shows;
pub mod venues;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use fyyur_db::{AppState, BookingError};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Every route the booking site serves, with state attached.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/genres", get(genres::list_genres))
        .route("/venues", get(venues::list_venues))
        .route("/venues/search", post(venues::search_venues))
        .route(
            "/venues/create",
            get(venues::create_venue_form).post(venues::create_venue_submission),
        )
        .route(
            "/venues/{id}",
            get(venues::show_venue).delete(venues::delete_venue),
        )
        .route(
            "/venues/{id}/edit",
            get(venues::edit_venue_form).post(venues::edit_venue_submission),
        )
        .route("/artists", get(artists::list_artists))
        .route("/artists/search", post(artists::search_artists))
        .route(
            "/artists/create",
            get(artists::create_artist_form).post(artists::create_artist_submission),
        )
        .route("/artists/{id}", get(artists::show_artist))
        .route(
            "/artists/{id}/edit",
            get(artists::edit_artist_form).post(artists::edit_artist_submission),
        )
        .route("/shows", get(shows::list_shows))
        .route(
            "/shows/create",
            get(shows::create_show_form).post(shows::create_show_submission),
        )
        .with_state(state)
}

#[derive(Serialize)]
struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

async fn index() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "Fyyur is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Wall-clock time the past/upcoming split is computed against.
pub(crate) fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Status and body for a failed read.
pub(crate) fn error_status(e: BookingError) -> (StatusCode, String) {
    match e {
        BookingError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        BookingError::Database(ref err) => {
            tracing::error!(error = %err, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
        _ => (StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// Run `f` inside one transaction: committed when it returns `Ok`, rolled
/// back otherwise.
pub(crate) async fn transact<T, F>(db: &DatabaseConnection, f: F) -> Result<T, BookingError>
where
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, BookingError>> + Send + 'c>>
        + Send,
    T: Send,
{
    db.transaction(f).await.map_err(|e| match e {
        TransactionError::Connection(err) => BookingError::Database(err),
        TransactionError::Transaction(err) => err,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use sea_orm::{ConnectOptions, ConnectionTrait};
    use sea_orm_migration::MigratorTrait;
    use tower::ServiceExt;

    /// In-memory SQLite with the schema and demo data loaded.
    pub async fn seeded_app() -> Router {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = sea_orm::Database::connect(opt).await.unwrap();
        // sqlx already enables foreign keys for SQLite; venue deletion relies on it
        db.execute_unprepared("PRAGMA foreign_keys = ON").await.unwrap();
        fyyur_migration::Migrator::up(&db, None).await.unwrap();
        fyyur_db::seed::seed_demo(&db).await.unwrap();
        router(Arc::new(AppState { db }))
    }

    pub async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
        app.clone()
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn delete(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::delete(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::error_status;
    use super::test_support::*;
    use axum::http::StatusCode;
    use fyyur_db::BookingError;

    #[test]
    fn test_error_status_mapping() {
        let (status, body) = error_status(BookingError::NotFound {
            entity: "venue",
            id: 9,
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "venue 9 not found");

        let (status, _) = error_status(BookingError::InvalidGenreId("x".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = error_status(BookingError::Database(sea_orm::DbErr::Custom(
            "connection reset".into(),
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_index_and_healthz() {
        let app = seeded_app().await;
        let resp = get(&app, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = get(&app, "/healthz").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = seeded_app().await;
        let resp = get(&app, "/nowhere").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
