use sea_orm_migration::prelude::*;

/// Adds the talent-seeking fields and the `deleted` marker to venues.
///
/// SQLite only accepts one change per `ALTER TABLE`, so every column gets
/// its own statement.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Venues::Table)
                    .add_column(
                        ColumnDef::new(Venues::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Venues::Table)
                    .add_column(ColumnDef::new(Venues::SeekingDescription).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Venues::Table)
                    .add_column(
                        ColumnDef::new(Venues::SeekingTalent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            Venues::SeekingTalent,
            Venues::SeekingDescription,
            Venues::Deleted,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Venues::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Venues {
    Table,
    Deleted,
    SeekingDescription,
    SeekingTalent,
}
