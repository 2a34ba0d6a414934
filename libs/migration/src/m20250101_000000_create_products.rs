use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(text(Products::Sku).primary_key())
                    .col(text(Products::Upc))
                    .col(text(Products::Name))
                    .to_owned(),
            )
            .await?;

        // Lookups by universal product code
        manager
            .create_index(
                Index::create()
                    .name("idx_products_upc")
                    .table(Products::Table)
                    .col(Products::Upc)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Sku,
    Upc,
    Name,
}
