use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CatalogEntries::Table)
                    .if_not_exists()
                    .col(string(CatalogEntries::Id).primary_key())
                    .col(string(CatalogEntries::Title))
                    .col(string_null(CatalogEntries::Description))
                    .col(string_null(CatalogEntries::ReleaseDate))
                    .col(string_null(CatalogEntries::GenreId))
                    .col(double_null(CatalogEntries::AverageRating))
                    .col(string_null(CatalogEntries::SubtitleSetId))
                    .col(string_null(CatalogEntries::DubSetId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(History::Table)
                    .if_not_exists()
                    .col(pk_auto(History::Id))
                    .col(string(History::UserId))
                    .col(string(History::ContentId))
                    .col(big_integer(History::WatchedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_history_content")
                            .from(History::Table, History::ContentId)
                            .to(CatalogEntries::Table, CatalogEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_history_user")
                    .table(History::Table)
                    .col(History::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Likes::Table)
                    .if_not_exists()
                    .col(pk_auto(Likes::Id))
                    .col(string(Likes::UserId))
                    .col(string(Likes::ContentId))
                    .col(big_integer(Likes::LikedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_likes_content")
                            .from(Likes::Table, Likes::ContentId)
                            .to(CatalogEntries::Table, CatalogEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_likes_user_content")
                    .table(Likes::Table)
                    .col(Likes::UserId)
                    .col(Likes::ContentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recommendations::Table)
                    .if_not_exists()
                    .col(string(Recommendations::UserId))
                    .col(string(Recommendations::ContentId))
                    .col(double(Recommendations::Score))
                    .primary_key(
                        Index::create()
                            .col(Recommendations::UserId)
                            .col(Recommendations::ContentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recommendations_content")
                            .from(Recommendations::Table, Recommendations::ContentId)
                            .to(CatalogEntries::Table, CatalogEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trending::Table)
                    .if_not_exists()
                    .col(string(Trending::ContentId).primary_key())
                    .col(double(Trending::Score))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trending_content")
                            .from(Trending::Table, Trending::ContentId)
                            .to(CatalogEntries::Table, CatalogEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Trending::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Recommendations::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Likes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(History::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CatalogEntries::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum CatalogEntries {
    Table,
    Id,
    Title,
    Description,
    ReleaseDate,
    GenreId,
    AverageRating,
    SubtitleSetId,
    DubSetId,
}

#[derive(DeriveIden)]
enum History {
    Table,
    Id,
    UserId,
    ContentId,
    WatchedAt,
}

#[derive(DeriveIden)]
enum Likes {
    Table,
    Id,
    UserId,
    ContentId,
    LikedAt,
}

#[derive(DeriveIden)]
enum Recommendations {
    Table,
    UserId,
    ContentId,
    Score,
}

#[derive(DeriveIden)]
enum Trending {
    Table,
    ContentId,
    Score,
}
