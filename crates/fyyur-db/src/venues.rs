//! Venue queries and writes.

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::entities::venue;
use crate::search::{self, SearchHit, SearchResults};
use crate::shows::{self, ShowDetails};
use crate::{genres, non_blank, BookingError, Choice, Parent};

/// Fields submitted by the venue create and edit forms.
#[derive(Debug, Clone, Default)]
pub struct VenueInput {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    /// Genre ids as the form sent them.
    pub genres: Vec<String>,
}

impl VenueInput {
    fn validated_name(&self) -> Result<String, BookingError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BookingError::Validation("venue name is required".into()));
        }
        Ok(name.to_string())
    }
}

/// A venue with its genre names, as shown on its page and in its edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueRecord {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

impl VenueRecord {
    fn new(v: venue::Model, genres: Vec<String>) -> Self {
        Self {
            id: v.id,
            name: v.name,
            genres,
            city: v.city,
            state: v.state,
            address: v.address,
            phone: v.phone,
            website: v.website,
            facebook_link: v.facebook_link,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
            image_link: v.image_link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: VenueRecord,
    pub past_shows: Vec<ShowDetails>,
    pub upcoming_shows: Vec<ShowDetails>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Venues sharing a city and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub city: Option<String>,
    pub state: Option<String>,
    pub venues: Vec<SearchHit>,
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<venue::Model, BookingError> {
    venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(BookingError::NotFound { entity: "venue", id })
}

pub async fn record<C: ConnectionTrait>(db: &C, id: i32) -> Result<VenueRecord, BookingError> {
    let v = find(db, id).await?;
    let genre_names = genres::genre_names(db, Parent::Venue(id)).await?;
    Ok(VenueRecord::new(v, genre_names))
}

/// Core fields, genres and both show lists for one venue.
pub async fn detail<C: ConnectionTrait>(
    db: &C,
    id: i32,
    now: NaiveDateTime,
) -> Result<VenueDetail, BookingError> {
    let venue = record(db, id).await?;
    let shows = shows::partition(db, Parent::Venue(id), now).await?;

    Ok(VenueDetail {
        venue,
        past_shows_count: shows.past.len(),
        upcoming_shows_count: shows.upcoming.len(),
        past_shows: shows.past,
        upcoming_shows: shows.upcoming,
    })
}

/// Venues grouped by (city, state), each with its upcoming show count.
pub async fn areas<C: ConnectionTrait>(
    db: &C,
    now: NaiveDateTime,
) -> Result<Vec<Area>, BookingError> {
    let all = venue::Entity::find()
        .order_by_asc(venue::Column::State)
        .order_by_asc(venue::Column::City)
        .order_by_asc(venue::Column::Name)
        .all(db)
        .await?;

    let ids: Vec<i32> = all.iter().map(|v| v.id).collect();
    let counts = shows::upcoming_counts_for_venues(db, &ids, now).await?;

    let mut grouped: BTreeMap<(Option<String>, Option<String>), Vec<SearchHit>> = BTreeMap::new();
    for v in all {
        grouped
            .entry((v.state.clone(), v.city.clone()))
            .or_default()
            .push(SearchHit {
                id: v.id,
                num_upcoming_shows: counts.get(&v.id).copied().unwrap_or(0),
                name: v.name,
            });
    }

    Ok(grouped
        .into_iter()
        .map(|((state, city), venues)| Area {
            city,
            state,
            venues,
        })
        .collect())
}

pub async fn search<C: ConnectionTrait>(
    db: &C,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults, BookingError> {
    let matches = venue::Entity::find()
        .filter(search::name_contains(venue::Column::Name, term))
        .order_by_asc(venue::Column::Name)
        .all(db)
        .await?;

    let ids: Vec<i32> = matches.iter().map(|v| v.id).collect();
    let counts = shows::upcoming_counts_for_venues(db, &ids, now).await?;

    Ok(matches
        .into_iter()
        .map(|v| SearchHit {
            id: v.id,
            num_upcoming_shows: counts.get(&v.id).copied().unwrap_or(0),
            name: v.name,
        })
        .collect::<Vec<_>>()
        .into())
}

/// Case-insensitive name check, optionally ignoring one venue (the one being edited).
pub async fn exists<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> Result<bool, BookingError> {
    let mut query = venue::Entity::find().filter(search::name_equals(venue::Column::Name, name));
    if let Some(id) = except {
        query = query.filter(venue::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

pub async fn choices<C: ConnectionTrait>(db: &C) -> Result<Vec<Choice>, BookingError> {
    Ok(venue::Entity::find()
        .select_only()
        .column(venue::Column::Id)
        .column(venue::Column::Name)
        .order_by_asc(venue::Column::Name)
        .into_model::<Choice>()
        .all(db)
        .await?)
}

/// Insert a venue and link its genres. Does not commit.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    input: VenueInput,
) -> Result<venue::Model, BookingError> {
    let name = input.validated_name()?;
    if exists(db, &name, None).await? {
        return Err(BookingError::DuplicateName {
            entity: "venue",
            name,
        });
    }

    let created = venue::ActiveModel {
        name: Set(name),
        city: Set(non_blank(input.city)),
        state: Set(non_blank(input.state)),
        address: Set(non_blank(input.address)),
        phone: Set(non_blank(input.phone)),
        image_link: Set(non_blank(input.image_link)),
        facebook_link: Set(non_blank(input.facebook_link)),
        website: Set(non_blank(input.website)),
        seeking_talent: Set(input.seeking_talent),
        seeking_description: Set(non_blank(input.seeking_description)),
        deleted: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await?;

    genres::synchronize(db, Parent::Venue(created.id), &input.genres).await?;

    tracing::info!(venue_id = created.id, name = %created.name, "venue listed");
    Ok(created)
}

/// Overwrite a venue's fields and reconcile its genres. Does not commit.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: VenueInput,
) -> Result<venue::Model, BookingError> {
    let existing = find(db, id).await?;
    let name = input.validated_name()?;
    if exists(db, &name, Some(id)).await? {
        return Err(BookingError::DuplicateName {
            entity: "venue",
            name,
        });
    }

    let mut active: venue::ActiveModel = existing.into();
    active.name = Set(name);
    active.city = Set(non_blank(input.city));
    active.state = Set(non_blank(input.state));
    active.address = Set(non_blank(input.address));
    active.phone = Set(non_blank(input.phone));
    active.image_link = Set(non_blank(input.image_link));
    active.facebook_link = Set(non_blank(input.facebook_link));
    active.website = Set(non_blank(input.website));
    active.seeking_talent = Set(input.seeking_talent);
    active.seeking_description = Set(non_blank(input.seeking_description));
    let updated = active.update(db).await?;

    let diff = genres::synchronize(db, Parent::Venue(id), &input.genres).await?;

    tracing::info!(
        venue_id = id,
        genres_added = diff.to_insert.len(),
        genres_removed = diff.to_delete.len(),
        "venue updated"
    );
    Ok(updated)
}

/// Hard delete. Genre links and shows go with it through the foreign keys.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), BookingError> {
    let res = venue::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(BookingError::NotFound { entity: "venue", id });
    }
    tracing::info!(venue_id = id, "venue deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_venue_model() -> venue::Model {
        venue::Model {
            id: 1,
            name: "The Musical Hop".into(),
            city: Some("San Francisco".into()),
            state: Some("CA".into()),
            address: Some("1015 Folsom Street".into()),
            phone: Some("123-123-1234".into()),
            image_link: None,
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".into()),
            website: Some("https://www.themusicalhop.com".into()),
            seeking_talent: true,
            seeking_description: Some("We are on the lookout for a local artist.".into()),
            deleted: false,
        }
    }

    #[test]
    fn test_venue_record_from_model() {
        let record = VenueRecord::new(make_venue_model(), vec!["Jazz".into(), "Swing".into()]);
        assert_eq!(record.id, 1);
        assert_eq!(record.genres, vec!["Jazz", "Swing"]);
        assert!(record.seeking_talent);
        assert_eq!(record.address.as_deref(), Some("1015 Folsom Street"));
    }

    #[test]
    fn test_venue_detail_flattens_record() {
        let detail = VenueDetail {
            venue: VenueRecord::new(make_venue_model(), vec![]),
            past_shows: vec![],
            upcoming_shows: vec![],
            past_shows_count: 0,
            upcoming_shows_count: 0,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "The Musical Hop");
        assert_eq!(json["city"], "San Francisco");
        assert_eq!(json["past_shows_count"], 0);
        assert!(json["upcoming_shows"].as_array().unwrap().is_empty());
        assert!(json.get("venue").is_none());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let input = VenueInput {
            name: "   ".into(),
            ..Default::default()
        };
        assert!(matches!(
            input.validated_name(),
            Err(BookingError::Validation(_))
        ));
    }
}
