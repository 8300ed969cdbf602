//! Show listings and the past/upcoming partition.
//!
//! A show is past when `start_time < now` and upcoming when
//! `start_time > now`. A show starting exactly at `now` is neither. The
//! classification is never stored; every query takes `now` explicitly.

use chrono::NaiveDateTime;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::entities::{artist, show, venue};
use crate::{BookingError, Parent};

/// Display pattern for show start times.
pub const START_TIME_FORMAT: &str = "%m/%d/%Y, %H:%M";

/// Formats accepted from the show form, tried in order.
const START_TIME_INPUT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Past,
    Upcoming,
}

/// `None` when the show starts exactly at `now`.
pub fn classify(start_time: NaiveDateTime, now: NaiveDateTime) -> Option<Timing> {
    match start_time.cmp(&now) {
        Ordering::Less => Some(Timing::Past),
        Ordering::Greater => Some(Timing::Upcoming),
        Ordering::Equal => None,
    }
}

pub fn format_start_time(start_time: &NaiveDateTime) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

pub fn parse_start_time(raw: &str) -> Result<NaiveDateTime, BookingError> {
    let trimmed = raw.trim();
    START_TIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| BookingError::InvalidStartTime(trimmed.to_string()))
}

/// A show with the artist and venue fields a listing needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowDetails {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShowPartition {
    pub past: Vec<ShowDetails>,
    pub upcoming: Vec<ShowDetails>,
}

fn belongs_to(parent: Parent) -> SimpleExpr {
    match parent {
        Parent::Venue(id) => show::Column::VenueId.eq(id),
        Parent::Artist(id) => show::Column::ArtistId.eq(id),
    }
}

pub async fn list_past<C: ConnectionTrait>(
    db: &C,
    parent: Parent,
    now: NaiveDateTime,
) -> Result<Vec<ShowDetails>, BookingError> {
    let shows = show::Entity::find()
        .filter(belongs_to(parent))
        .filter(show::Column::StartTime.lt(now))
        .order_by_asc(show::Column::StartTime)
        .all(db)
        .await?;
    with_details(db, shows).await
}

pub async fn list_upcoming<C: ConnectionTrait>(
    db: &C,
    parent: Parent,
    now: NaiveDateTime,
) -> Result<Vec<ShowDetails>, BookingError> {
    let shows = show::Entity::find()
        .filter(belongs_to(parent))
        .filter(show::Column::StartTime.gt(now))
        .order_by_asc(show::Column::StartTime)
        .all(db)
        .await?;
    with_details(db, shows).await
}

pub async fn count_past<C: ConnectionTrait>(
    db: &C,
    parent: Parent,
    now: NaiveDateTime,
) -> Result<u64, BookingError> {
    Ok(show::Entity::find()
        .filter(belongs_to(parent))
        .filter(show::Column::StartTime.lt(now))
        .count(db)
        .await?)
}

pub async fn count_upcoming<C: ConnectionTrait>(
    db: &C,
    parent: Parent,
    now: NaiveDateTime,
) -> Result<u64, BookingError> {
    Ok(show::Entity::find()
        .filter(belongs_to(parent))
        .filter(show::Column::StartTime.gt(now))
        .count(db)
        .await?)
}

/// Both lists for one parent from a single query.
pub async fn partition<C: ConnectionTrait>(
    db: &C,
    parent: Parent,
    now: NaiveDateTime,
) -> Result<ShowPartition, BookingError> {
    let shows = show::Entity::find()
        .filter(belongs_to(parent))
        .order_by_asc(show::Column::StartTime)
        .all(db)
        .await?;

    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for s in shows {
        match classify(s.start_time, now) {
            Some(Timing::Past) => past.push(s),
            Some(Timing::Upcoming) => upcoming.push(s),
            None => {}
        }
    }

    Ok(ShowPartition {
        past: with_details(db, past).await?,
        upcoming: with_details(db, upcoming).await?,
    })
}

/// Upcoming show count per venue, for the given venue ids. Venues without
/// upcoming shows are absent from the map.
pub async fn upcoming_counts_for_venues<C: ConnectionTrait>(
    db: &C,
    venue_ids: &[i32],
    now: NaiveDateTime,
) -> Result<HashMap<i32, u64>, BookingError> {
    upcoming_counts_by(db, show::Column::VenueId, venue_ids, now).await
}

/// Upcoming show count per artist, for the given artist ids.
pub async fn upcoming_counts_for_artists<C: ConnectionTrait>(
    db: &C,
    artist_ids: &[i32],
    now: NaiveDateTime,
) -> Result<HashMap<i32, u64>, BookingError> {
    upcoming_counts_by(db, show::Column::ArtistId, artist_ids, now).await
}

async fn upcoming_counts_by<C: ConnectionTrait>(
    db: &C,
    key: show::Column,
    ids: &[i32],
    now: NaiveDateTime,
) -> Result<HashMap<i32, u64>, BookingError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i64)> = show::Entity::find()
        .select_only()
        .column(key)
        .column_as(Expr::col(show::Column::Id).count(), "upcoming")
        .filter(key.is_in(ids.iter().copied()))
        .filter(show::Column::StartTime.gt(now))
        .group_by(key)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect())
}

/// Every show, newest venue first.
pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<ShowDetails>, BookingError> {
    let shows = show::Entity::find()
        .order_by_desc(show::Column::VenueId)
        .order_by_asc(show::Column::StartTime)
        .all(db)
        .await?;
    with_details(db, shows).await
}

/// Book `artist_id` at `venue_id`. Both must exist.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
    venue_id: i32,
    start_time: NaiveDateTime,
) -> Result<show::Model, BookingError> {
    if artist::Entity::find_by_id(artist_id).one(db).await?.is_none() {
        return Err(BookingError::NotFound {
            entity: "artist",
            id: artist_id,
        });
    }
    if venue::Entity::find_by_id(venue_id).one(db).await?.is_none() {
        return Err(BookingError::NotFound {
            entity: "venue",
            id: venue_id,
        });
    }

    let created = show::ActiveModel {
        artist_id: Set(artist_id),
        venue_id: Set(venue_id),
        start_time: Set(start_time),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(
        show_id = created.id,
        artist_id,
        venue_id,
        start_time = %created.start_time,
        "show listed"
    );
    Ok(created)
}

async fn with_details<C: ConnectionTrait>(
    db: &C,
    shows: Vec<show::Model>,
) -> Result<Vec<ShowDetails>, BookingError> {
    if shows.is_empty() {
        return Ok(Vec::new());
    }

    // Batch-fetch artist and venue rows
    let artist_ids: HashSet<i32> = shows.iter().map(|s| s.artist_id).collect();
    let venue_ids: HashSet<i32> = shows.iter().map(|s| s.venue_id).collect();

    let artists: HashMap<i32, artist::Model> = artist::Entity::find()
        .filter(artist::Column::Id.is_in(artist_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();
    let venues: HashMap<i32, String> = venue::Entity::find()
        .filter(venue::Column::Id.is_in(venue_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, v.name))
        .collect();

    Ok(shows
        .into_iter()
        .map(|s| {
            let artist = artists.get(&s.artist_id);
            ShowDetails {
                id: s.id,
                venue_id: s.venue_id,
                venue_name: venues.get(&s.venue_id).cloned().unwrap_or_default(),
                artist_id: s.artist_id,
                artist_name: artist.map(|a| a.name.clone()).unwrap_or_default(),
                artist_image_link: artist.and_then(|a| a.image_link.clone()),
                start_time: format_start_time(&s.start_time),
            }
        })
        .collect())
}
