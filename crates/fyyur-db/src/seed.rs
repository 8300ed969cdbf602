//! Demo data: the three venues, three artists and five shows the booking
//! site ships with.

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

use crate::artists::{self, ArtistInput};
use crate::entities::venue;
use crate::venues::{self, VenueInput};
use crate::{genres, shows, BookingError};

/// Every genre offered by the venue and artist forms.
pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Result<NaiveDateTime, BookingError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .ok_or_else(|| BookingError::InvalidStartTime(format!("{y}-{m}-{d} {h}:{min}")))
}

/// Insert the demo rows unless the database already holds venues.
/// Returns whether anything was written. Does not commit.
pub async fn seed_demo<C: ConnectionTrait>(db: &C) -> Result<bool, BookingError> {
    if venue::Entity::find().count(db).await? > 0 {
        tracing::debug!("venues present, skipping demo seed");
        return Ok(false);
    }

    let ids = genres::ensure_named(db, GENRES).await?;
    let genre_ids = |names: &[&str]| -> Vec<String> {
        names
            .iter()
            .filter_map(|n| ids.get(*n))
            .map(|id| id.to_string())
            .collect()
    };

    let musical_hop = venues::create(
        db,
        VenueInput {
            name: "The Musical Hop".into(),
            city: Some("San Francisco".into()),
            state: Some("CA".into()),
            address: Some("1015 Folsom Street".into()),
            phone: Some("123-123-1234".into()),
            image_link: Some("https://images.unsplash.com/photo-1543900694-133f37abaaa5?ixlib=rb-1.2.1&auto=format&fit=crop&w=400&q=60".into()),
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".into()),
            website: Some("https://www.themusicalhop.com".into()),
            seeking_talent: true,
            seeking_description: Some(
                "We are on the lookout for a local artist to play every two weeks. Please call us."
                    .into(),
            ),
            genres: genre_ids(&["Jazz", "Reggae", "Classical", "Folk"]),
        },
    )
    .await?;

    venues::create(
        db,
        VenueInput {
            name: "The Dueling Pianos Bar".into(),
            city: Some("New York".into()),
            state: Some("NY".into()),
            address: Some("335 Delancey Street".into()),
            phone: Some("914-003-1132".into()),
            image_link: Some("https://images.unsplash.com/photo-1497032205916-ac775f0649ae?ixlib=rb-1.2.1&auto=format&fit=crop&w=750&q=80".into()),
            facebook_link: Some("https://www.facebook.com/theduelingpianos".into()),
            website: Some("https://www.theduelingpianos.com".into()),
            seeking_talent: false,
            seeking_description: None,
            genres: genre_ids(&["Classical", "R&B", "Hip-Hop"]),
        },
    )
    .await?;

    let park_square = venues::create(
        db,
        VenueInput {
            name: "Park Square Live Music & Coffee".into(),
            city: Some("San Francisco".into()),
            state: Some("CA".into()),
            address: Some("34 Whiskey Moore Ave".into()),
            phone: Some("415-000-1234".into()),
            image_link: Some("https://images.unsplash.com/photo-1485686531765-ba63b07845a7?ixlib=rb-1.2.1&auto=format&fit=crop&w=747&q=80".into()),
            facebook_link: Some("https://www.facebook.com/ParkSquareLiveMusicAndCoffee".into()),
            website: Some("https://www.parksquarelivemusicandcoffee.com".into()),
            seeking_talent: false,
            seeking_description: None,
            genres: genre_ids(&["Rock n Roll", "Jazz", "Classical", "Folk"]),
        },
    )
    .await?;

    let guns_n_petals = artists::create(
        db,
        ArtistInput {
            name: "Guns N Petals".into(),
            city: Some("San Francisco".into()),
            state: Some("CA".into()),
            phone: Some("326-123-5000".into()),
            image_link: Some("https://images.unsplash.com/photo-1549213783-8284d0336c4f?ixlib=rb-1.2.1&auto=format&fit=crop&w=300&q=80".into()),
            facebook_link: Some("https://www.facebook.com/GunsNPetals".into()),
            website: Some("https://www.gunsnpetalsband.com".into()),
            seeking_venue: true,
            seeking_description: Some(
                "Looking for shows to perform at in the San Francisco Bay Area!".into(),
            ),
            genres: genre_ids(&["Rock n Roll"]),
        },
    )
    .await?;

    let matt_quevedo = artists::create(
        db,
        ArtistInput {
            name: "Matt Quevedo".into(),
            city: Some("New York".into()),
            state: Some("NY".into()),
            phone: Some("300-400-5000".into()),
            image_link: Some("https://images.unsplash.com/photo-1495223153807-b916f75de8c5?ixlib=rb-1.2.1&auto=format&fit=crop&w=334&q=80".into()),
            facebook_link: Some("https://www.facebook.com/mattquevedo923251523".into()),
            website: None,
            seeking_venue: false,
            seeking_description: None,
            genres: genre_ids(&["Jazz"]),
        },
    )
    .await?;

    let wild_sax = artists::create(
        db,
        ArtistInput {
            name: "The Wild Sax Band".into(),
            city: Some("San Francisco".into()),
            state: Some("CA".into()),
            phone: Some("432-325-5432".into()),
            image_link: Some("https://images.unsplash.com/photo-1558369981-f9ca78462e61?ixlib=rb-1.2.1&auto=format&fit=crop&w=794&q=80".into()),
            facebook_link: None,
            website: None,
            seeking_venue: false,
            seeking_description: None,
            genres: genre_ids(&["Jazz", "Classical"]),
        },
    )
    .await?;

    shows::create(db, guns_n_petals.id, musical_hop.id, at(2019, 5, 21, 21, 30)?).await?;
    shows::create(db, matt_quevedo.id, park_square.id, at(2019, 6, 15, 23, 0)?).await?;
    for day in [1, 8, 15] {
        shows::create(db, wild_sax.id, park_square.id, at(2035, 4, day, 20, 0)?).await?;
    }

    tracing::info!("demo data seeded");
    Ok(true)
}
