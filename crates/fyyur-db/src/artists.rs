//! Artist queries and writes.

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;

use crate::entities::artist;
use crate::search::{self, SearchHit, SearchResults};
use crate::shows::{self, ShowDetails};
use crate::{genres, non_blank, BookingError, Choice, Parent};

/// Fields submitted by the artist create and edit forms.
#[derive(Debug, Clone, Default)]
pub struct ArtistInput {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub genres: Vec<String>,
}

impl ArtistInput {
    fn validated_name(&self) -> Result<String, BookingError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BookingError::Validation("artist name is required".into()));
        }
        Ok(name.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistRecord {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

impl ArtistRecord {
    fn new(a: artist::Model, genres: Vec<String>) -> Self {
        Self {
            id: a.id,
            name: a.name,
            genres,
            city: a.city,
            state: a.state,
            phone: a.phone,
            website: a.website,
            facebook_link: a.facebook_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
            image_link: a.image_link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: ArtistRecord,
    pub past_shows: Vec<ShowDetails>,
    pub upcoming_shows: Vec<ShowDetails>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<artist::Model, BookingError> {
    artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(BookingError::NotFound {
            entity: "artist",
            id,
        })
}

pub async fn record<C: ConnectionTrait>(db: &C, id: i32) -> Result<ArtistRecord, BookingError> {
    let a = find(db, id).await?;
    let genre_names = genres::genre_names(db, Parent::Artist(id)).await?;
    Ok(ArtistRecord::new(a, genre_names))
}

pub async fn detail<C: ConnectionTrait>(
    db: &C,
    id: i32,
    now: NaiveDateTime,
) -> Result<ArtistDetail, BookingError> {
    let artist = record(db, id).await?;
    let shows = shows::partition(db, Parent::Artist(id), now).await?;

    Ok(ArtistDetail {
        artist,
        past_shows_count: shows.past.len(),
        upcoming_shows_count: shows.upcoming.len(),
        past_shows: shows.past,
        upcoming_shows: shows.upcoming,
    })
}

pub async fn search<C: ConnectionTrait>(
    db: &C,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults, BookingError> {
    let matches = artist::Entity::find()
        .filter(search::name_contains(artist::Column::Name, term))
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?;

    let ids: Vec<i32> = matches.iter().map(|a| a.id).collect();
    let counts = shows::upcoming_counts_for_artists(db, &ids, now).await?;

    Ok(matches
        .into_iter()
        .map(|a| SearchHit {
            id: a.id,
            num_upcoming_shows: counts.get(&a.id).copied().unwrap_or(0),
            name: a.name,
        })
        .collect::<Vec<_>>()
        .into())
}

pub async fn exists<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> Result<bool, BookingError> {
    let mut query = artist::Entity::find().filter(search::name_equals(artist::Column::Name, name));
    if let Some(id) = except {
        query = query.filter(artist::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// `(id, name)` for every artist, alphabetically. Backs both the artist
/// listing and the show form's artist select.
pub async fn choices<C: ConnectionTrait>(db: &C) -> Result<Vec<Choice>, BookingError> {
    Ok(artist::Entity::find()
        .select_only()
        .column(artist::Column::Id)
        .column(artist::Column::Name)
        .order_by_asc(artist::Column::Name)
        .into_model::<Choice>()
        .all(db)
        .await?)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    input: ArtistInput,
) -> Result<artist::Model, BookingError> {
    let name = input.validated_name()?;
    if exists(db, &name, None).await? {
        return Err(BookingError::DuplicateName {
            entity: "artist",
            name,
        });
    }

    let created = artist::ActiveModel {
        name: Set(name),
        city: Set(non_blank(input.city)),
        state: Set(non_blank(input.state)),
        phone: Set(non_blank(input.phone)),
        image_link: Set(non_blank(input.image_link)),
        facebook_link: Set(non_blank(input.facebook_link)),
        website: Set(non_blank(input.website)),
        seeking_venue: Set(input.seeking_venue),
        seeking_description: Set(non_blank(input.seeking_description)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    genres::synchronize(db, Parent::Artist(created.id), &input.genres).await?;

    tracing::info!(artist_id = created.id, name = %created.name, "artist listed");
    Ok(created)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: ArtistInput,
) -> Result<artist::Model, BookingError> {
    let existing = find(db, id).await?;
    let name = input.validated_name()?;
    if exists(db, &name, Some(id)).await? {
        return Err(BookingError::DuplicateName {
            entity: "artist",
            name,
        });
    }

    let mut active: artist::ActiveModel = existing.into();
    active.name = Set(name);
    active.city = Set(non_blank(input.city));
    active.state = Set(non_blank(input.state));
    active.phone = Set(non_blank(input.phone));
    active.image_link = Set(non_blank(input.image_link));
    active.facebook_link = Set(non_blank(input.facebook_link));
    active.website = Set(non_blank(input.website));
    active.seeking_venue = Set(input.seeking_venue);
    active.seeking_description = Set(non_blank(input.seeking_description));
    let updated = active.update(db).await?;

    let diff = genres::synchronize(db, Parent::Artist(id), &input.genres).await?;

    tracing::info!(
        artist_id = id,
        genres_added = diff.to_insert.len(),
        genres_removed = diff.to_delete.len(),
        "artist updated"
    );
    Ok(updated)
}
