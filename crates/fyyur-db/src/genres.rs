//! Genre tagging for venues and artists.
//!
//! Join rows are never updated in place: an edit computes the difference
//! between the stored genre ids and the submitted ones, inserts what is new
//! and deletes what is gone.

use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use sea_orm::sea_query::JoinType;
use std::collections::{BTreeSet, HashMap};

use crate::entities::{artist_genre, genre, venue_genre};
use crate::{BookingError, Choice, Parent};

/// Rows to add and rows to remove so that storage matches a submitted set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreDiff {
    pub to_insert: BTreeSet<i32>,
    pub to_delete: BTreeSet<i32>,
}

impl GenreDiff {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}

/// `to_insert = desired - current`, `to_delete = current - desired`.
pub fn reconcile(current: &BTreeSet<i32>, desired: &BTreeSet<i32>) -> GenreDiff {
    GenreDiff {
        to_insert: desired.difference(current).copied().collect(),
        to_delete: current.difference(desired).copied().collect(),
    }
}

/// Parse genre ids as submitted by a multi-select. Blank entries are ignored.
pub fn parse_genre_ids<S: AsRef<str>>(raw: &[S]) -> Result<BTreeSet<i32>, BookingError> {
    raw.iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| BookingError::InvalidGenreId(s.to_string()))
        })
        .collect()
}

/// Genre ids currently linked to `parent`.
pub async fn current_ids<C: ConnectionTrait>(
    db: &C,
    parent: Parent,
) -> Result<BTreeSet<i32>, BookingError> {
    let ids = match parent {
        Parent::Venue(id) => venue_genre::Entity::find()
            .filter(venue_genre::Column::VenueId.eq(id))
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.genre_id)
            .collect(),
        Parent::Artist(id) => artist_genre::Entity::find()
            .filter(artist_genre::Column::ArtistId.eq(id))
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.genre_id)
            .collect(),
    };
    Ok(ids)
}

/// Linked genre ids rendered as strings, ready to pre-select a form field.
pub async fn genre_ids<C: ConnectionTrait>(
    db: &C,
    parent: Parent,
) -> Result<Vec<String>, BookingError> {
    Ok(current_ids(db, parent)
        .await?
        .into_iter()
        .map(|id| id.to_string())
        .collect())
}

/// Names of the genres linked to `parent`, alphabetically.
pub async fn genre_names<C: ConnectionTrait>(
    db: &C,
    parent: Parent,
) -> Result<Vec<String>, BookingError> {
    let query = match parent {
        Parent::Venue(id) => genre::Entity::find()
            .join(JoinType::InnerJoin, genre::Relation::VenueGenre.def())
            .filter(venue_genre::Column::VenueId.eq(id)),
        Parent::Artist(id) => genre::Entity::find()
            .join(JoinType::InnerJoin, genre::Relation::ArtistGenre.def())
            .filter(artist_genre::Column::ArtistId.eq(id)),
    };

    Ok(query
        .order_by_asc(genre::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect())
}

/// Make the stored genre set of `parent` equal to `desired`.
///
/// Runs on whatever handle it is given and never commits; callers wrap it in
/// a transaction together with the parent's own write.
pub async fn synchronize<C: ConnectionTrait, S: AsRef<str>>(
    db: &C,
    parent: Parent,
    desired: &[S],
) -> Result<GenreDiff, BookingError> {
    let desired = parse_genre_ids(desired)?;
    let current = current_ids(db, parent).await?;
    let diff = reconcile(&current, &desired);

    if !diff.to_insert.is_empty() {
        ensure_genres_exist(db, &diff.to_insert).await?;
    }

    match parent {
        Parent::Venue(venue_id) => {
            if !diff.to_insert.is_empty() {
                venue_genre::Entity::insert_many(diff.to_insert.iter().map(|&genre_id| {
                    venue_genre::ActiveModel {
                        genre_id: Set(genre_id),
                        venue_id: Set(venue_id),
                    }
                }))
                .exec_without_returning(db)
                .await?;
            }
            if !diff.to_delete.is_empty() {
                venue_genre::Entity::delete_many()
                    .filter(venue_genre::Column::VenueId.eq(venue_id))
                    .filter(venue_genre::Column::GenreId.is_in(diff.to_delete.iter().copied()))
                    .exec(db)
                    .await?;
            }
        }
        Parent::Artist(artist_id) => {
            if !diff.to_insert.is_empty() {
                artist_genre::Entity::insert_many(diff.to_insert.iter().map(|&genre_id| {
                    artist_genre::ActiveModel {
                        genre_id: Set(genre_id),
                        artist_id: Set(artist_id),
                    }
                }))
                .exec_without_returning(db)
                .await?;
            }
            if !diff.to_delete.is_empty() {
                artist_genre::Entity::delete_many()
                    .filter(artist_genre::Column::ArtistId.eq(artist_id))
                    .filter(artist_genre::Column::GenreId.is_in(diff.to_delete.iter().copied()))
                    .exec(db)
                    .await?;
            }
        }
    }

    tracing::debug!(
        parent = parent.entity_name(),
        id = parent.id(),
        inserted = diff.to_insert.len(),
        deleted = diff.to_delete.len(),
        "genres synchronized"
    );

    Ok(diff)
}

async fn ensure_genres_exist<C: ConnectionTrait>(
    db: &C,
    ids: &BTreeSet<i32>,
) -> Result<(), BookingError> {
    let known: BTreeSet<i32> = genre::Entity::find()
        .filter(genre::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();
    match ids.difference(&known).next() {
        Some(missing) => Err(BookingError::InvalidGenreId(missing.to_string())),
        None => Ok(()),
    }
}

/// Every genre as a select option, alphabetically.
pub async fn choices<C: ConnectionTrait>(db: &C) -> Result<Vec<Choice>, BookingError> {
    Ok(genre::Entity::find()
        .order_by_asc(genre::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|g| Choice {
            id: g.id,
            name: g.name,
        })
        .collect())
}

/// Look up genres by name, creating the missing ones. Returns name -> id.
pub async fn ensure_named<C: ConnectionTrait>(
    db: &C,
    names: &[&str],
) -> Result<HashMap<String, i32>, BookingError> {
    let mut ids: HashMap<String, i32> = genre::Entity::find()
        .filter(genre::Column::Name.is_in(names.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|g| (g.name, g.id))
        .collect();

    for name in names {
        if ids.contains_key(*name) {
            continue;
        }
        let inserted = genre::Entity::insert(genre::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        })
        .exec(db)
        .await?;
        ids.insert(name.to_string(), inserted.last_insert_id);
    }

    Ok(ids)
}
