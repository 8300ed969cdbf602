pub use sea_orm_migration::prelude::*;

mod m20191025_000001_create_genres;
mod m20191025_000002_create_venues;
mod m20191025_000003_create_artists;
mod m20191025_000004_create_shows;
mod m20191025_000005_create_venue_genres;
mod m20191025_000006_create_artist_genres;
mod m20191030_000007_add_website_to_venues;
mod m20191030_000008_add_seeking_fields_to_venues;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20191025_000001_create_genres::Migration),
            Box::new(m20191025_000002_create_venues::Migration),
            Box::new(m20191025_000003_create_artists::Migration),
            Box::new(m20191025_000004_create_shows::Migration),
            Box::new(m20191025_000005_create_venue_genres::Migration),
            Box::new(m20191025_000006_create_artist_genres::Migration),
            Box::new(m20191030_000007_add_website_to_venues::Migration),
            Box::new(m20191030_000008_add_seeking_fields_to_venues::Migration),
        ]
    }
}
