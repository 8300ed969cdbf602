mod common;

use fyyur_db::entities::{genre, venue_genre};
use fyyur_db::genres;
use fyyur_db::sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use fyyur_db::venues::{self, VenueInput};
use fyyur_db::{BookingError, Parent};
use std::collections::BTreeSet;

async fn genre_ids(db: &fyyur_db::sea_orm::DatabaseConnection) -> Vec<String> {
    let ids = genres::ensure_named(db, &["Jazz", "Folk", "Blues", "Punk"])
        .await
        .unwrap();
    ["Jazz", "Folk", "Blues", "Punk"]
        .iter()
        .map(|n| ids[*n].to_string())
        .collect()
}

async fn make_venue(db: &fyyur_db::sea_orm::DatabaseConnection, name: &str) -> i32 {
    venues::create(
        db,
        VenueInput {
            name: name.into(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn synchronize_last_write_wins() {
    let db = common::test_db().await;
    let ids = genre_ids(&db).await;
    let venue_id = make_venue(&db, "The Musical Hop").await;
    let parent = Parent::Venue(venue_id);

    genres::synchronize(&db, parent, &[&ids[0], &ids[1]]).await.unwrap();
    let diff = genres::synchronize(&db, parent, &[&ids[1], &ids[2], &ids[3]])
        .await
        .unwrap();

    assert_eq!(diff.to_delete.len(), 1);
    assert_eq!(diff.to_insert.len(), 2);

    let stored: BTreeSet<String> = genres::genre_ids(&db, parent).await.unwrap().into_iter().collect();
    let expected: BTreeSet<String> = ids[1..].iter().cloned().collect();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn synchronize_same_set_twice_is_noop() {
    let db = common::test_db().await;
    let ids = genre_ids(&db).await;
    let venue_id = make_venue(&db, "Park Square Live Music & Coffee").await;
    let parent = Parent::Venue(venue_id);

    genres::synchronize(&db, parent, &ids[..2]).await.unwrap();
    let diff = genres::synchronize(&db, parent, &ids[..2]).await.unwrap();
    assert!(diff.is_empty());
    assert_eq!(genres::genre_ids(&db, parent).await.unwrap().len(), 2);
}

#[tokio::test]
async fn synchronize_empty_set_clears_all_links() {
    let db = common::test_db().await;
    let ids = genre_ids(&db).await;
    let venue_id = make_venue(&db, "The Dueling Pianos Bar").await;
    let other_id = make_venue(&db, "Another Bar").await;

    genres::synchronize(&db, Parent::Venue(venue_id), &ids[..]).await.unwrap();
    genres::synchronize(&db, Parent::Venue(other_id), &ids[..1]).await.unwrap();

    let empty: [&str; 0] = [];
    genres::synchronize(&db, Parent::Venue(venue_id), &empty).await.unwrap();

    let left = venue_genre::Entity::find()
        .filter(venue_genre::Column::VenueId.eq(venue_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(left, 0);

    // Other venues keep their links
    assert_eq!(
        genres::genre_ids(&db, Parent::Venue(other_id)).await.unwrap(),
        vec![ids[0].clone()]
    );
}

#[tokio::test]
async fn synchronize_rejects_unknown_genre_without_writing() {
    let db = common::test_db().await;
    let ids = genre_ids(&db).await;
    let venue_id = make_venue(&db, "The Musical Hop").await;

    let err = genres::synchronize(&db, Parent::Venue(venue_id), &[ids[0].as_str(), "9999"])
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidGenreId(ref s) if s == "9999"));
    assert!(genres::genre_ids(&db, Parent::Venue(venue_id))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn synchronize_rejects_non_numeric_ids() {
    let db = common::test_db().await;
    let venue_id = make_venue(&db, "The Musical Hop").await;

    let err = genres::synchronize(&db, Parent::Venue(venue_id), &["Jazz"])
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidGenreId(_)));
}

#[tokio::test]
async fn artist_and_venue_links_are_independent() {
    let db = common::test_db().await;
    let ids = genre_ids(&db).await;
    let venue_id = make_venue(&db, "The Musical Hop").await;
    let artist = fyyur_db::artists::create(
        &db,
        fyyur_db::artists::ArtistInput {
            name: "Guns N Petals".into(),
            genres: vec![ids[3].clone()],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    genres::synchronize(&db, Parent::Venue(venue_id), &ids[..2]).await.unwrap();

    assert_eq!(
        genres::genre_names(&db, Parent::Artist(artist.id)).await.unwrap(),
        vec!["Punk"]
    );
    assert_eq!(
        genres::genre_names(&db, Parent::Venue(venue_id)).await.unwrap(),
        vec!["Folk", "Jazz"]
    );
}

#[tokio::test]
async fn ensure_named_is_idempotent() {
    let db = common::test_db().await;
    let first = genres::ensure_named(&db, &["Jazz", "Soul"]).await.unwrap();
    let second = genres::ensure_named(&db, &["Soul", "Jazz", "Funk"]).await.unwrap();

    assert_eq!(first["Jazz"], second["Jazz"]);
    assert_eq!(first["Soul"], second["Soul"]);
    assert_eq!(genre::Entity::find().count(&db).await.unwrap(), 3);

    let choices = genres::choices(&db).await.unwrap();
    let names: Vec<&str> = choices.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Funk", "Jazz", "Soul"]);
}
