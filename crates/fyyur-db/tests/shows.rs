mod common;

use chrono::Duration;
use fyyur_db::artists::{self, ArtistInput};
use fyyur_db::shows;
use fyyur_db::venues::{self, VenueInput};
use fyyur_db::{BookingError, Parent};

struct Fixture {
    db: fyyur_db::sea_orm::DatabaseConnection,
    venue_id: i32,
    artist_id: i32,
}

async fn fixture() -> Fixture {
    let db = common::test_db().await;
    let venue_id = venues::create(
        &db,
        VenueInput {
            name: "Park Square Live Music & Coffee".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id;
    let artist_id = artists::create(
        &db,
        ArtistInput {
            name: "The Wild Sax Band".into(),
            image_link: Some("https://img.example.com/sax.jpg".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id;
    Fixture {
        db,
        venue_id,
        artist_id,
    }
}

#[tokio::test]
async fn show_at_now_is_neither_past_nor_upcoming() {
    let f = fixture().await;
    let now = common::now();
    shows::create(&f.db, f.artist_id, f.venue_id, now).await.unwrap();

    let parent = Parent::Venue(f.venue_id);
    assert!(shows::list_past(&f.db, parent, now).await.unwrap().is_empty());
    assert!(shows::list_upcoming(&f.db, parent, now).await.unwrap().is_empty());
    assert_eq!(shows::count_past(&f.db, parent, now).await.unwrap(), 0);
    assert_eq!(shows::count_upcoming(&f.db, parent, now).await.unwrap(), 0);

    let split = shows::partition(&f.db, parent, now).await.unwrap();
    assert!(split.past.is_empty());
    assert!(split.upcoming.is_empty());

    // Still listed among all shows
    assert_eq!(shows::list_all(&f.db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn shows_split_around_now() {
    let f = fixture().await;
    let now = common::now();
    shows::create(&f.db, f.artist_id, f.venue_id, now - Duration::days(30)).await.unwrap();
    shows::create(&f.db, f.artist_id, f.venue_id, now + Duration::minutes(1)).await.unwrap();
    shows::create(&f.db, f.artist_id, f.venue_id, now + Duration::days(7)).await.unwrap();

    for parent in [Parent::Venue(f.venue_id), Parent::Artist(f.artist_id)] {
        let past = shows::list_past(&f.db, parent, now).await.unwrap();
        let upcoming = shows::list_upcoming(&f.db, parent, now).await.unwrap();
        assert_eq!(past.len(), 1);
        assert_eq!(upcoming.len(), 2);
        assert_eq!(shows::count_past(&f.db, parent, now).await.unwrap(), 1);
        assert_eq!(shows::count_upcoming(&f.db, parent, now).await.unwrap(), 2);

        let split = shows::partition(&f.db, parent, now).await.unwrap();
        assert_eq!(split.past, past);
        assert_eq!(split.upcoming, upcoming);
    }
}

#[tokio::test]
async fn show_details_are_denormalized() {
    let f = fixture().await;
    let start = common::at(2035, 4, 1, 20, 0);
    shows::create(&f.db, f.artist_id, f.venue_id, start).await.unwrap();

    let upcoming = shows::list_upcoming(&f.db, Parent::Venue(f.venue_id), common::now())
        .await
        .unwrap();
    let show = &upcoming[0];
    assert_eq!(show.venue_name, "Park Square Live Music & Coffee");
    assert_eq!(show.artist_name, "The Wild Sax Band");
    assert_eq!(
        show.artist_image_link.as_deref(),
        Some("https://img.example.com/sax.jpg")
    );
    assert_eq!(show.start_time, "04/01/2035, 20:00");
}

#[tokio::test]
async fn upcoming_counts_group_by_parent() {
    let f = fixture().await;
    let now = common::now();
    let quiet_venue = venues::create(
        &f.db,
        VenueInput {
            name: "The Dueling Pianos Bar".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id;
    shows::create(&f.db, f.artist_id, f.venue_id, now + Duration::days(1)).await.unwrap();
    shows::create(&f.db, f.artist_id, f.venue_id, now + Duration::days(2)).await.unwrap();
    shows::create(&f.db, f.artist_id, quiet_venue, now - Duration::days(2)).await.unwrap();

    let counts = shows::upcoming_counts_for_venues(&f.db, &[f.venue_id, quiet_venue], now)
        .await
        .unwrap();
    assert_eq!(counts.get(&f.venue_id), Some(&2));
    assert_eq!(counts.get(&quiet_venue), None);

    let by_artist = shows::upcoming_counts_for_artists(&f.db, &[f.artist_id], now)
        .await
        .unwrap();
    assert_eq!(by_artist.get(&f.artist_id), Some(&2));

    assert!(shows::upcoming_counts_for_venues(&f.db, &[], now)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn list_all_orders_by_venue_descending() {
    let f = fixture().await;
    let second_venue = venues::create(
        &f.db,
        VenueInput {
            name: "The Musical Hop".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id;
    shows::create(&f.db, f.artist_id, f.venue_id, common::at(2019, 6, 15, 23, 0)).await.unwrap();
    shows::create(&f.db, f.artist_id, second_venue, common::at(2019, 5, 21, 21, 30)).await.unwrap();

    let all = shows::list_all(&f.db).await.unwrap();
    let venue_ids: Vec<i32> = all.iter().map(|s| s.venue_id).collect();
    assert_eq!(venue_ids, vec![second_venue, f.venue_id]);
}

#[tokio::test]
async fn create_rejects_unknown_artist_or_venue() {
    let f = fixture().await;
    let err = shows::create(&f.db, 999, f.venue_id, common::now()).await.unwrap_err();
    assert!(matches!(err, BookingError::NotFound { entity: "artist", id: 999 }));

    let err = shows::create(&f.db, f.artist_id, 999, common::now()).await.unwrap_err();
    assert!(matches!(err, BookingError::NotFound { entity: "venue", id: 999 }));
}
