use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(string(Movie::Id).primary_key())
                    .col(string(Movie::Title))
                    .col(integer(Movie::ReleaseYear))
                    .col(text(Movie::Description))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_release_year")
                    .table(Movie::Table)
                    .col(Movie::ReleaseYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actor::Table)
                    .if_not_exists()
                    .col(pk_auto(Actor::Id))
                    .col(string(Actor::Name))
                    .col(string_null(Actor::Birthdate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoviePicture::Table)
                    .if_not_exists()
                    .col(string(MoviePicture::MovieId))
                    .col(integer(MoviePicture::Position))
                    .col(text(MoviePicture::Url))
                    .primary_key(
                        Index::create().col(MoviePicture::MovieId).col(MoviePicture::Position),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_picture_movie")
                            .from(MoviePicture::Table, MoviePicture::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieCast::Table)
                    .if_not_exists()
                    .col(string(MovieCast::MovieId))
                    .col(integer(MovieCast::ActorId))
                    .primary_key(Index::create().col(MovieCast::MovieId).col(MovieCast::ActorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_cast_movie")
                            .from(MovieCast::Table, MovieCast::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_cast_actor")
                            .from(MovieCast::Table, MovieCast::ActorId)
                            .to(Actor::Table, Actor::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_cast_actor")
                    .table(MovieCast::Table)
                    .col(MovieCast::ActorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieCast::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MoviePicture::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Title,
    ReleaseYear,
    Description,
}

#[derive(DeriveIden)]
enum Actor {
    Table,
    Id,
    Name,
    Birthdate,
}

#[derive(DeriveIden)]
enum MoviePicture {
    Table,
    MovieId,
    Position,
    Url,
}

#[derive(DeriveIden)]
enum MovieCast {
    Table,
    MovieId,
    ActorId,
}
