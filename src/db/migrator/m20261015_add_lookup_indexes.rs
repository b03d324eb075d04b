use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_products_marketplace")
                    .table(Products::Table)
                    .col(Products::Marketplace)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .col(Products::Category)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Serves the per-product listing, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_insights_product_generated")
                    .table(Insights::Table)
                    .col(Insights::ProductId)
                    .col(Insights::GeneratedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_insights_product_generated")
                    .table(Insights::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_products_marketplace")
                    .table(Products::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Products {
    Table,
    Marketplace,
    Category,
}

#[derive(Iden)]
enum Insights {
    Table,
    ProductId,
    GeneratedAt,
}
