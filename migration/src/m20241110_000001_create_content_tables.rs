use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(string(Genres::Id).primary_key())
                    .col(string(Genres::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Directors::Table)
                    .if_not_exists()
                    .col(string(Directors::Id).primary_key())
                    .col(string(Directors::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(string(Actors::Id).primary_key())
                    .col(string(Actors::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubtitleSets::Table)
                    .if_not_exists()
                    .col(string(SubtitleSets::Id).primary_key())
                    .col(string(SubtitleSets::Languages))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DubSets::Table)
                    .if_not_exists()
                    .col(string(DubSets::Id).primary_key())
                    .col(string(DubSets::Languages))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contents::Table)
                    .if_not_exists()
                    .col(string(Contents::Id).primary_key())
                    .col(string(Contents::Kind))
                    .col(string(Contents::Title))
                    .col(string_null(Contents::Description))
                    .col(string(Contents::ReleaseDate))
                    .col(string(Contents::GenreId))
                    .col(string_null(Contents::DirectorId))
                    .col(double_null(Contents::AverageRating))
                    .col(string_null(Contents::SubtitleSetId))
                    .col(string_null(Contents::DubSetId))
                    .col(integer_null(Contents::DurationMinutes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contents_genre")
                            .from(Contents::Table, Contents::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contents_director")
                            .from(Contents::Table, Contents::DirectorId)
                            .to(Directors::Table, Directors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contents_subtitles")
                            .from(Contents::Table, Contents::SubtitleSetId)
                            .to(SubtitleSets::Table, SubtitleSets::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contents_dubbing")
                            .from(Contents::Table, Contents::DubSetId)
                            .to(DubSets::Table, DubSets::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contents_genre")
                    .table(Contents::Table)
                    .col(Contents::GenreId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Seasons::Table)
                    .if_not_exists()
                    .col(string(Seasons::Id).primary_key())
                    .col(string(Seasons::ContentId))
                    .col(integer(Seasons::Number))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seasons_content")
                            .from(Seasons::Table, Seasons::ContentId)
                            .to(Contents::Table, Contents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Episodes::Table)
                    .if_not_exists()
                    .col(string(Episodes::Id).primary_key())
                    .col(string(Episodes::SeasonId))
                    .col(integer(Episodes::Number))
                    .col(string(Episodes::Title))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_episodes_season")
                            .from(Episodes::Table, Episodes::SeasonId)
                            .to(Seasons::Table, Seasons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CastMembers::Table)
                    .if_not_exists()
                    .col(string(CastMembers::ContentId))
                    .col(string(CastMembers::ActorId))
                    .primary_key(
                        Index::create().col(CastMembers::ContentId).col(CastMembers::ActorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cast_content")
                            .from(CastMembers::Table, CastMembers::ContentId)
                            .to(Contents::Table, Contents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cast_actor")
                            .from(CastMembers::Table, CastMembers::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CastMembers::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Episodes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Seasons::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Contents::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(DubSets::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(SubtitleSets::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Directors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Directors {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum SubtitleSets {
    Table,
    Id,
    Languages,
}

#[derive(DeriveIden)]
enum DubSets {
    Table,
    Id,
    Languages,
}

#[derive(DeriveIden)]
enum Contents {
    Table,
    Id,
    Kind,
    Title,
    Description,
    ReleaseDate,
    GenreId,
    DirectorId,
    AverageRating,
    SubtitleSetId,
    DubSetId,
    DurationMinutes,
}

#[derive(DeriveIden)]
enum Seasons {
    Table,
    Id,
    ContentId,
    Number,
}

#[derive(DeriveIden)]
enum Episodes {
    Table,
    Id,
    SeasonId,
    Number,
    Title,
}

#[derive(DeriveIden)]
enum CastMembers {
    Table,
    ContentId,
    ActorId,
}
