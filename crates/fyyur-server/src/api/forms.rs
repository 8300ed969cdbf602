//! Form payloads as browsers submit them (`application/x-www-form-urlencoded`).
//!
//! Multi-selects repeat their key (`genres=1&genres=4`), so these are read
//! with `axum_extra::extract::Form` rather than axum's own.

use fyyur_db::artists::ArtistInput;
use fyyur_db::venues::VenueInput;
use serde::Deserialize;

/// An HTML checkbox is absent when unticked and carries its value when ticked.
pub fn checkbox(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "false" | "off" | "n" | "no" | "0"),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VenueForm {
    #[serde(default)]
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: Option<String>,
    pub seeking_description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl From<VenueForm> for VenueInput {
    fn from(f: VenueForm) -> Self {
        Self {
            seeking_talent: checkbox(f.seeking_talent.as_deref()),
            name: f.name,
            city: f.city,
            state: f.state,
            address: f.address,
            phone: f.phone,
            image_link: f.image_link,
            facebook_link: f.facebook_link,
            website: f.website,
            seeking_description: f.seeking_description,
            genres: f.genres,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistForm {
    #[serde(default)]
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: Option<String>,
    pub seeking_description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl From<ArtistForm> for ArtistInput {
    fn from(f: ArtistForm) -> Self {
        Self {
            seeking_venue: checkbox(f.seeking_venue.as_deref()),
            name: f.name,
            city: f.city,
            state: f.state,
            phone: f.phone,
            image_link: f.image_link,
            facebook_link: f.facebook_link,
            website: f.website,
            seeking_description: f.seeking_description,
            genres: f.genres,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Ids arrive as text; they are parsed by the handler so a bad value becomes
/// a flash message instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}
