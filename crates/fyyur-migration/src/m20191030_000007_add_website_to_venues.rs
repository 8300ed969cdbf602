use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Venues::Table)
                    .add_column(ColumnDef::new(Venues::Website).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Venues::Table)
                    .drop_column(Venues::Website)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Venues {
    Table,
    Website,
}
