use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, LikeExpr},
};
use tracing::debug;

use super::{StoreError, StoreResult, new_id, require_non_empty};
use crate::{
    entities::{
        actor, cast_member, content, director, dub_set, episode, genre, season, subtitle_set,
    },
    models::{
        Content, ContentKind, ContentPatch, Episode, EpisodePatch, Genre, LanguageSet,
        LanguageSetPatch, NamedPatch, NewContent, NewEpisode, NewLanguageSet, NewNamed, NewSeason,
        Person, Season, SeasonDetail, SeasonPatch, SeriesDetail,
    },
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PersonKind {
    Director,
    Actor,
}

impl PersonKind {
    fn not_found(self) -> &'static str {
        match self {
            PersonKind::Director => "Director no encontrado",
            PersonKind::Actor => "Actor no encontrado",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LanguageSetKind {
    Subtitles,
    Dubbing,
}

impl LanguageSetKind {
    fn not_found(self) -> &'static str {
        match self {
            LanguageSetKind::Subtitles => "Subtítulos no encontrados",
            LanguageSetKind::Dubbing => "Doblaje no encontrado",
        }
    }
}

/// What a hierarchical delete removes. The deepest identifier present wins.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeleteTarget {
    Content { content_id: String },
    Season { content_id: String, season_id: String },
    Episode { content_id: String, season_id: String, episode_id: String },
}

impl DeleteTarget {
    pub fn resolve(
        content_id: String,
        season_id: Option<String>,
        episode_id: Option<String>,
    ) -> Self {
        match (season_id, episode_id) {
            (Some(season_id), Some(episode_id)) => {
                DeleteTarget::Episode { content_id, season_id, episode_id }
            },
            (Some(season_id), None) => DeleteTarget::Season { content_id, season_id },
            // an episode id is meaningless without its season
            (None, _) => DeleteTarget::Content { content_id },
        }
    }
}

#[derive(Clone)]
pub struct ContentStore {
    db: DatabaseConnection,
}

impl ContentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // Genres

    pub async fn list_genres(&self) -> StoreResult<Vec<Genre>> {
        let rows = genre::Entity::find().order_by_asc(genre::Column::Name).all(&self.db).await?;
        Ok(rows.into_iter().map(to_genre).collect())
    }

    pub async fn get_genre(&self, id: &str) -> StoreResult<Genre> {
        genre::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_genre)
            .ok_or_else(|| StoreError::not_found("Género no encontrado"))
    }

    pub async fn create_genre(&self, input: NewNamed) -> StoreResult<Genre> {
        require_non_empty("nombre", &input.name)?;
        let id = new_id(input.id);

        let txn = self.db.begin().await?;
        if genre::Entity::find_by_id(id.as_str()).one(&txn).await?.is_some() {
            return Err(StoreError::conflict(format!("El género '{id}' ya existe")));
        }
        let model = genre::ActiveModel { id: Set(id), name: Set(input.name.trim().to_string()) }
            .insert(&txn)
            .await?;
        txn.commit().await?;

        debug!(genre_id = %model.id, "created genre");
        Ok(to_genre(model))
    }

    pub async fn update_genre(&self, id: &str, patch: NamedPatch) -> StoreResult<Genre> {
        let txn = self.db.begin().await?;
        let existing = genre::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::not_found("Género no encontrado"))?;

        let mut active: genre::ActiveModel = existing.clone().into();
        if let Some(name) = patch.name.required("nombre")? {
            require_non_empty("nombre", &name)?;
            active.name = Set(name.trim().to_string());
        }
        let model = if active.is_changed() { active.update(&txn).await? } else { existing };
        txn.commit().await?;

        Ok(to_genre(model))
    }

    pub async fn delete_genre(&self, id: &str) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        let in_use =
            content::Entity::find().filter(content::Column::GenreId.eq(id)).count(&txn).await?;
        if in_use > 0 {
            return Err(StoreError::conflict(format!(
                "El género está asignado a {in_use} contenido(s)"
            )));
        }
        let res = genre::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::not_found("Género no encontrado"));
        }
        txn.commit().await?;
        Ok(())
    }

    pub async fn contents_by_genre(&self, genre_id: &str) -> StoreResult<Vec<Content>> {
        let genre = genre::Entity::find_by_id(genre_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::not_found("Género no encontrado"))?;

        let rows = genre
            .find_related(content::Entity)
            .order_by_asc(content::Column::Title)
            .all(&self.db)
            .await?;
        if rows.is_empty() {
            return Err(StoreError::not_found("No existe ningún contenido con ese género"));
        }
        rows.into_iter().map(to_content).collect()
    }

    // Directors and actors

    pub async fn list_people(&self, kind: PersonKind) -> StoreResult<Vec<Person>> {
        let people = match kind {
            PersonKind::Director => director::Entity::find()
                .order_by_asc(director::Column::Name)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| Person { id: m.id, name: m.name })
                .collect(),
            PersonKind::Actor => actor::Entity::find()
                .order_by_asc(actor::Column::Name)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| Person { id: m.id, name: m.name })
                .collect(),
        };
        Ok(people)
    }

    pub async fn get_person(&self, kind: PersonKind, id: &str) -> StoreResult<Person> {
        find_person(&self.db, kind, id).await?.ok_or_else(|| StoreError::not_found(kind.not_found()))
    }

    pub async fn create_person(&self, kind: PersonKind, input: NewNamed) -> StoreResult<Person> {
        require_non_empty("nombre", &input.name)?;
        let id = new_id(input.id);
        let name = input.name.trim().to_string();

        let txn = self.db.begin().await?;
        if find_person(&txn, kind, &id).await?.is_some() {
            return Err(StoreError::conflict(format!("Ya existe una persona con id '{id}'")));
        }
        let person = match kind {
            PersonKind::Director => {
                let m = director::ActiveModel { id: Set(id), name: Set(name) }.insert(&txn).await?;
                Person { id: m.id, name: m.name }
            },
            PersonKind::Actor => {
                let m = actor::ActiveModel { id: Set(id), name: Set(name) }.insert(&txn).await?;
                Person { id: m.id, name: m.name }
            },
        };
        txn.commit().await?;
        Ok(person)
    }

    pub async fn update_person(
        &self,
        kind: PersonKind,
        id: &str,
        patch: NamedPatch,
    ) -> StoreResult<Person> {
        let name = patch.name.required("nombre")?;
        if let Some(name) = &name {
            require_non_empty("nombre", name)?;
        }

        let txn = self.db.begin().await?;
        let Some(current) = find_person(&txn, kind, id).await? else {
            return Err(StoreError::not_found(kind.not_found()));
        };
        let Some(name) = name else {
            return Ok(current);
        };
        let name = name.trim().to_string();
        match kind {
            PersonKind::Director => {
                director::ActiveModel { id: Set(current.id.clone()), name: Set(name.clone()) }
                    .update(&txn)
                    .await?;
            },
            PersonKind::Actor => {
                actor::ActiveModel { id: Set(current.id.clone()), name: Set(name.clone()) }
                    .update(&txn)
                    .await?;
            },
        }
        txn.commit().await?;
        Ok(Person { id: current.id, name })
    }

    pub async fn delete_person(&self, kind: PersonKind, id: &str) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        let res = match kind {
            PersonKind::Director => {
                content::Entity::update_many()
                    .col_expr(content::Column::DirectorId, Expr::value(Option::<String>::None))
                    .filter(content::Column::DirectorId.eq(id))
                    .exec(&txn)
                    .await?;
                director::Entity::delete_by_id(id).exec(&txn).await?
            },
            PersonKind::Actor => {
                cast_member::Entity::delete_many()
                    .filter(cast_member::Column::ActorId.eq(id))
                    .exec(&txn)
                    .await?;
                actor::Entity::delete_by_id(id).exec(&txn).await?
            },
        };
        if res.rows_affected == 0 {
            return Err(StoreError::not_found(kind.not_found()));
        }
        txn.commit().await?;
        Ok(())
    }

    // Subtitle and dubbing language sets

    pub async fn list_language_sets(&self, kind: LanguageSetKind) -> StoreResult<Vec<LanguageSet>> {
        let sets = match kind {
            LanguageSetKind::Subtitles => subtitle_set::Entity::find()
                .order_by_asc(subtitle_set::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| language_set(m.id, &m.languages))
                .collect(),
            LanguageSetKind::Dubbing => dub_set::Entity::find()
                .order_by_asc(dub_set::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| language_set(m.id, &m.languages))
                .collect(),
        };
        Ok(sets)
    }

    pub async fn get_language_set(
        &self,
        kind: LanguageSetKind,
        id: &str,
    ) -> StoreResult<LanguageSet> {
        find_language_set(&self.db, kind, id)
            .await?
            .ok_or_else(|| StoreError::not_found(kind.not_found()))
    }

    pub async fn create_language_set(
        &self,
        kind: LanguageSetKind,
        input: NewLanguageSet,
    ) -> StoreResult<LanguageSet> {
        let id = new_id(input.id);
        let languages = join_languages(&input.languages)?;

        let txn = self.db.begin().await?;
        if find_language_set(&txn, kind, &id).await?.is_some() {
            return Err(StoreError::conflict(format!("El conjunto de idiomas '{id}' ya existe")));
        }
        let set = match kind {
            LanguageSetKind::Subtitles => {
                let m = subtitle_set::ActiveModel { id: Set(id), languages: Set(languages) }
                    .insert(&txn)
                    .await?;
                language_set(m.id, &m.languages)
            },
            LanguageSetKind::Dubbing => {
                let m = dub_set::ActiveModel { id: Set(id), languages: Set(languages) }
                    .insert(&txn)
                    .await?;
                language_set(m.id, &m.languages)
            },
        };
        txn.commit().await?;
        Ok(set)
    }

    pub async fn update_language_set(
        &self,
        kind: LanguageSetKind,
        id: &str,
        patch: LanguageSetPatch,
    ) -> StoreResult<LanguageSet> {
        let languages = patch.languages.required("idiomas")?;

        let txn = self.db.begin().await?;
        let Some(current) = find_language_set(&txn, kind, id).await? else {
            return Err(StoreError::not_found(kind.not_found()));
        };
        let Some(languages) = languages else {
            return Ok(current);
        };
        let joined = join_languages(&languages)?;
        match kind {
            LanguageSetKind::Subtitles => {
                subtitle_set::ActiveModel { id: Set(current.id.clone()), languages: Set(joined.clone()) }
                    .update(&txn)
                    .await?;
            },
            LanguageSetKind::Dubbing => {
                dub_set::ActiveModel { id: Set(current.id.clone()), languages: Set(joined.clone()) }
                    .update(&txn)
                    .await?;
            },
        }
        txn.commit().await?;
        Ok(language_set(current.id, &joined))
    }

    pub async fn delete_language_set(&self, kind: LanguageSetKind, id: &str) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        let res = match kind {
            LanguageSetKind::Subtitles => {
                content::Entity::update_many()
                    .col_expr(content::Column::SubtitleSetId, Expr::value(Option::<String>::None))
                    .filter(content::Column::SubtitleSetId.eq(id))
                    .exec(&txn)
                    .await?;
                subtitle_set::Entity::delete_by_id(id).exec(&txn).await?
            },
            LanguageSetKind::Dubbing => {
                content::Entity::update_many()
                    .col_expr(content::Column::DubSetId, Expr::value(Option::<String>::None))
                    .filter(content::Column::DubSetId.eq(id))
                    .exec(&txn)
                    .await?;
                dub_set::Entity::delete_by_id(id).exec(&txn).await?
            },
        };
        if res.rows_affected == 0 {
            return Err(StoreError::not_found(kind.not_found()));
        }
        txn.commit().await?;
        Ok(())
    }

    /// Points a content at an existing subtitle or dubbing set.
    pub async fn assign_language_set(
        &self,
        content_id: &str,
        kind: LanguageSetKind,
        set_id: &str,
    ) -> StoreResult<Content> {
        let txn = self.db.begin().await?;
        let existing = find_content(&txn, content_id).await?;
        if find_language_set(&txn, kind, set_id).await?.is_none() {
            return Err(StoreError::not_found(kind.not_found()));
        }
        let mut active: content::ActiveModel = existing.into();
        match kind {
            LanguageSetKind::Subtitles => active.subtitle_set_id = Set(Some(set_id.to_string())),
            LanguageSetKind::Dubbing => active.dub_set_id = Set(Some(set_id.to_string())),
        }
        let model = active.update(&txn).await?;
        txn.commit().await?;
        to_content(model)
    }

    pub async fn content_language_set(
        &self,
        content_id: &str,
        kind: LanguageSetKind,
    ) -> StoreResult<LanguageSet> {
        let content = find_content(&self.db, content_id).await?;
        let set_id = match kind {
            LanguageSetKind::Subtitles => content.subtitle_set_id,
            LanguageSetKind::Dubbing => content.dub_set_id,
        };
        let Some(set_id) = set_id else {
            return Err(StoreError::not_found(kind.not_found()));
        };
        self.get_language_set(kind, &set_id).await
    }

    // Movies and series

    pub async fn list_contents(&self) -> StoreResult<Vec<Content>> {
        let rows =
            content::Entity::find().order_by_asc(content::Column::Title).all(&self.db).await?;
        rows.into_iter().map(to_content).collect()
    }

    pub async fn get_content(&self, id: &str) -> StoreResult<Content> {
        to_content(find_content(&self.db, id).await?)
    }

    pub async fn get_content_of_kind(&self, id: &str, kind: ContentKind) -> StoreResult<Content> {
        content::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .filter(|m| m.kind == kind.as_code())
            .ok_or_else(|| StoreError::not_found(kind_not_found(kind)))
            .and_then(to_content)
    }

    pub async fn create_content(&self, kind: ContentKind, input: NewContent) -> StoreResult<Content> {
        require_non_empty("titulo", &input.title)?;
        validate_release_date(&input.release_date)?;
        validate_rating(input.average_rating)?;
        let id = new_id(input.id);

        let txn = self.db.begin().await?;
        if content::Entity::find_by_id(id.as_str()).one(&txn).await?.is_some() {
            return Err(StoreError::conflict(format!("El contenido '{id}' ya existe")));
        }
        ensure_genre(&txn, &input.genre_id).await?;
        if let Some(director_id) = &input.director_id {
            ensure_director(&txn, director_id).await?;
        }
        if let Some(set_id) = &input.subtitle_set_id {
            ensure_language_set(&txn, LanguageSetKind::Subtitles, set_id).await?;
        }
        if let Some(set_id) = &input.dub_set_id {
            ensure_language_set(&txn, LanguageSetKind::Dubbing, set_id).await?;
        }

        let model = content::ActiveModel {
            id: Set(id),
            kind: Set(kind.as_code().to_string()),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description),
            release_date: Set(input.release_date),
            genre_id: Set(input.genre_id),
            director_id: Set(input.director_id),
            average_rating: Set(input.average_rating),
            subtitle_set_id: Set(input.subtitle_set_id),
            dub_set_id: Set(input.dub_set_id),
            duration_minutes: Set(input.duration_minutes),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        debug!(content_id = %model.id, kind = kind.as_code(), "created content");
        to_content(model)
    }

    /// Applies only the fields present in `patch`.
    pub async fn update_content(
        &self,
        id: &str,
        kind: ContentKind,
        patch: ContentPatch,
    ) -> StoreResult<Content> {
        let txn = self.db.begin().await?;
        let existing = content::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .filter(|m| m.kind == kind.as_code())
            .ok_or_else(|| StoreError::not_found(kind_not_found(kind)))?;

        let mut active: content::ActiveModel = existing.clone().into();
        if let Some(title) = patch.title.required("titulo")? {
            require_non_empty("titulo", &title)?;
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = patch.description.nullable() {
            active.description = Set(description);
        }
        if let Some(release_date) = patch.release_date.required("fechaLanzamiento")? {
            validate_release_date(&release_date)?;
            active.release_date = Set(release_date);
        }
        if let Some(genre_id) = patch.genre_id.required("idGenero")? {
            ensure_genre(&txn, &genre_id).await?;
            active.genre_id = Set(genre_id);
        }
        if let Some(director_id) = patch.director_id.nullable() {
            if let Some(director_id) = &director_id {
                ensure_director(&txn, director_id).await?;
            }
            active.director_id = Set(director_id);
        }
        if let Some(rating) = patch.average_rating.nullable() {
            validate_rating(rating)?;
            active.average_rating = Set(rating);
        }
        if let Some(set_id) = patch.subtitle_set_id.nullable() {
            if let Some(set_id) = &set_id {
                ensure_language_set(&txn, LanguageSetKind::Subtitles, set_id).await?;
            }
            active.subtitle_set_id = Set(set_id);
        }
        if let Some(set_id) = patch.dub_set_id.nullable() {
            if let Some(set_id) = &set_id {
                ensure_language_set(&txn, LanguageSetKind::Dubbing, set_id).await?;
            }
            active.dub_set_id = Set(set_id);
        }
        if let Some(duration) = patch.duration_minutes.nullable() {
            active.duration_minutes = Set(duration);
        }

        let model = if active.is_changed() { active.update(&txn).await? } else { existing };
        txn.commit().await?;
        to_content(model)
    }

    pub async fn get_series(&self, id: &str) -> StoreResult<SeriesDetail> {
        let model = content::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .filter(|m| m.kind == ContentKind::Series.as_code())
            .ok_or_else(|| StoreError::not_found(kind_not_found(ContentKind::Series)))?;
        self.series_detail(model).await
    }

    pub async fn list_series(&self) -> StoreResult<Vec<SeriesDetail>> {
        let rows = content::Entity::find()
            .filter(content::Column::Kind.eq(ContentKind::Series.as_code()))
            .order_by_asc(content::Column::Title)
            .all(&self.db)
            .await?;
        if rows.is_empty() {
            return Err(StoreError::not_found("No existen series"));
        }

        let mut out = Vec::with_capacity(rows.len());
        for model in rows {
            out.push(self.series_detail(model).await?);
        }
        Ok(out)
    }

    async fn series_detail(&self, model: content::Model) -> StoreResult<SeriesDetail> {
        let seasons = model
            .find_related(season::Entity)
            .order_by_asc(season::Column::Number)
            .all(&self.db)
            .await?;

        let mut details = Vec::with_capacity(seasons.len());
        for s in seasons {
            details.push(self.season_detail(s).await?);
        }
        Ok(SeriesDetail { content: to_content(model)?, seasons: details })
    }

    async fn season_detail(&self, model: season::Model) -> StoreResult<SeasonDetail> {
        let episodes = model
            .find_related(episode::Entity)
            .order_by_asc(episode::Column::Number)
            .all(&self.db)
            .await?;
        Ok(SeasonDetail {
            season: to_season(model),
            episodes: episodes.into_iter().map(to_episode).collect(),
        })
    }

    // Seasons and episodes

    pub async fn create_season(&self, content_id: &str, input: NewSeason) -> StoreResult<Season> {
        validate_ordinal("numero", input.number)?;
        let id = new_id(input.id);

        let txn = self.db.begin().await?;
        find_series(&txn, content_id).await?;
        if season::Entity::find_by_id(id.as_str()).one(&txn).await?.is_some() {
            return Err(StoreError::conflict(format!("La temporada '{id}' ya existe")));
        }
        ensure_free_season_number(&txn, content_id, input.number, None).await?;

        let model = season::ActiveModel {
            id: Set(id),
            content_id: Set(content_id.to_string()),
            number: Set(input.number),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        Ok(to_season(model))
    }

    pub async fn get_season(&self, content_id: &str, season_id: &str) -> StoreResult<SeasonDetail> {
        let model = find_season(&self.db, content_id, season_id).await?;
        self.season_detail(model).await
    }

    pub async fn update_season(
        &self,
        content_id: &str,
        season_id: &str,
        patch: SeasonPatch,
    ) -> StoreResult<Season> {
        let txn = self.db.begin().await?;
        let existing = find_season(&txn, content_id, season_id).await?;

        let mut active: season::ActiveModel = existing.clone().into();
        if let Some(number) = patch.number.required("numero")? {
            validate_ordinal("numero", number)?;
            ensure_free_season_number(&txn, content_id, number, Some(season_id)).await?;
            active.number = Set(number);
        }
        let model = if active.is_changed() { active.update(&txn).await? } else { existing };
        txn.commit().await?;
        Ok(to_season(model))
    }

    pub async fn create_episode(
        &self,
        content_id: &str,
        season_id: &str,
        input: NewEpisode,
    ) -> StoreResult<Episode> {
        validate_ordinal("numero", input.number)?;
        require_non_empty("titulo", &input.title)?;
        let id = new_id(input.id);

        let txn = self.db.begin().await?;
        find_season(&txn, content_id, season_id).await?;
        if episode::Entity::find_by_id(id.as_str()).one(&txn).await?.is_some() {
            return Err(StoreError::conflict(format!("El episodio '{id}' ya existe")));
        }
        let model = episode::ActiveModel {
            id: Set(id),
            season_id: Set(season_id.to_string()),
            number: Set(input.number),
            title: Set(input.title.trim().to_string()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        Ok(to_episode(model))
    }

    pub async fn get_episode(
        &self,
        content_id: &str,
        season_id: &str,
        episode_id: &str,
    ) -> StoreResult<Episode> {
        find_episode(&self.db, content_id, season_id, episode_id).await.map(to_episode)
    }

    pub async fn update_episode(
        &self,
        content_id: &str,
        season_id: &str,
        episode_id: &str,
        patch: EpisodePatch,
    ) -> StoreResult<Episode> {
        let txn = self.db.begin().await?;
        let existing = find_episode(&txn, content_id, season_id, episode_id).await?;

        let mut active: episode::ActiveModel = existing.clone().into();
        if let Some(number) = patch.number.required("numero")? {
            validate_ordinal("numero", number)?;
            active.number = Set(number);
        }
        if let Some(title) = patch.title.required("titulo")? {
            require_non_empty("titulo", &title)?;
            active.title = Set(title.trim().to_string());
        }
        let model = if active.is_changed() { active.update(&txn).await? } else { existing };
        txn.commit().await?;
        Ok(to_episode(model))
    }

    /// Removes the target and everything beneath it in one transaction.
    pub async fn delete(&self, target: &DeleteTarget) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        match target {
            DeleteTarget::Episode { content_id, season_id, episode_id } => {
                let model = find_episode(&txn, content_id, season_id, episode_id).await?;
                episode::Entity::delete_by_id(model.id).exec(&txn).await?;
            },
            DeleteTarget::Season { content_id, season_id } => {
                let model = find_season(&txn, content_id, season_id).await?;
                episode::Entity::delete_many()
                    .filter(episode::Column::SeasonId.eq(model.id.as_str()))
                    .exec(&txn)
                    .await?;
                season::Entity::delete_by_id(model.id).exec(&txn).await?;
            },
            DeleteTarget::Content { content_id } => {
                let model = find_content(&txn, content_id).await?;
                let season_ids: Vec<String> = season::Entity::find()
                    .filter(season::Column::ContentId.eq(model.id.as_str()))
                    .all(&txn)
                    .await?
                    .into_iter()
                    .map(|s| s.id)
                    .collect();
                if !season_ids.is_empty() {
                    episode::Entity::delete_many()
                        .filter(episode::Column::SeasonId.is_in(season_ids))
                        .exec(&txn)
                        .await?;
                }
                season::Entity::delete_many()
                    .filter(season::Column::ContentId.eq(model.id.as_str()))
                    .exec(&txn)
                    .await?;
                cast_member::Entity::delete_many()
                    .filter(cast_member::Column::ContentId.eq(model.id.as_str()))
                    .exec(&txn)
                    .await?;
                content::Entity::delete_by_id(model.id).exec(&txn).await?;
            },
        }
        txn.commit().await?;
        debug!(?target, "deleted");
        Ok(())
    }

    // Cast

    pub async fn cast_of(&self, content_id: &str) -> StoreResult<Vec<Person>> {
        find_content(&self.db, content_id).await?;
        let actor_ids: Vec<String> = cast_member::Entity::find()
            .filter(cast_member::Column::ContentId.eq(content_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| c.actor_id)
            .collect();
        if actor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let actors = actor::Entity::find()
            .filter(actor::Column::Id.is_in(actor_ids))
            .order_by_asc(actor::Column::Name)
            .all(&self.db)
            .await?;
        Ok(actors.into_iter().map(|m| Person { id: m.id, name: m.name }).collect())
    }

    pub async fn add_cast_member(&self, content_id: &str, actor_id: &str) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        find_content(&txn, content_id).await?;
        if find_person(&txn, PersonKind::Actor, actor_id).await?.is_none() {
            return Err(StoreError::not_found(PersonKind::Actor.not_found()));
        }
        let already = cast_member::Entity::find_by_id((content_id.to_string(), actor_id.to_string()))
            .one(&txn)
            .await?;
        if already.is_none() {
            cast_member::Entity::insert(cast_member::ActiveModel {
                content_id: Set(content_id.to_string()),
                actor_id: Set(actor_id.to_string()),
            })
            .exec_without_returning(&txn)
            .await?;
        }
        txn.commit().await?;
        Ok(())
    }

    pub async fn remove_cast_member(&self, content_id: &str, actor_id: &str) -> StoreResult<()> {
        let res = cast_member::Entity::delete_by_id((content_id.to_string(), actor_id.to_string()))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(StoreError::not_found("El actor no forma parte del reparto"));
        }
        Ok(())
    }

    // Search

    pub async fn search_by_title(&self, query: &str) -> StoreResult<Vec<Content>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let rows = content::Entity::find()
            .filter(content::Column::Title.like(contains_literal(query)))
            .order_by_asc(content::Column::Title)
            .all(&self.db)
            .await?;
        rows.into_iter().map(to_content).collect()
    }

    /// Content whose cast includes an actor matching `query`.
    pub async fn search_by_actor(&self, query: &str) -> StoreResult<Vec<Content>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let actor_ids: Vec<String> = actor::Entity::find()
            .filter(actor::Column::Name.like(contains_literal(query)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        if actor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut content_ids: Vec<String> = cast_member::Entity::find()
            .filter(cast_member::Column::ActorId.is_in(actor_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| c.content_id)
            .collect();
        content_ids.sort();
        content_ids.dedup();
        if content_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = content::Entity::find()
            .filter(content::Column::Id.is_in(content_ids))
            .order_by_asc(content::Column::Title)
            .all(&self.db)
            .await?;
        rows.into_iter().map(to_content).collect()
    }
}

async fn find_content<C: ConnectionTrait>(conn: &C, id: &str) -> StoreResult<content::Model> {
    content::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| StoreError::not_found("Contenido no encontrado"))
}

async fn find_series<C: ConnectionTrait>(conn: &C, id: &str) -> StoreResult<content::Model> {
    let model = find_content(conn, id).await?;
    if model.kind != ContentKind::Series.as_code() {
        return Err(StoreError::invalid("Solo las series tienen temporadas"));
    }
    Ok(model)
}

async fn find_season<C: ConnectionTrait>(
    conn: &C,
    content_id: &str,
    season_id: &str,
) -> StoreResult<season::Model> {
    season::Entity::find_by_id(season_id)
        .filter(season::Column::ContentId.eq(content_id))
        .one(conn)
        .await?
        .ok_or_else(|| StoreError::not_found("Temporada no encontrada"))
}

async fn find_episode<C: ConnectionTrait>(
    conn: &C,
    content_id: &str,
    season_id: &str,
    episode_id: &str,
) -> StoreResult<episode::Model> {
    find_season(conn, content_id, season_id).await?;
    episode::Entity::find_by_id(episode_id)
        .filter(episode::Column::SeasonId.eq(season_id))
        .one(conn)
        .await?
        .ok_or_else(|| StoreError::not_found("Episodio no encontrado"))
}

async fn ensure_free_season_number<C: ConnectionTrait>(
    conn: &C,
    content_id: &str,
    number: i32,
    except: Option<&str>,
) -> StoreResult<()> {
    let mut query = season::Entity::find()
        .filter(season::Column::ContentId.eq(content_id))
        .filter(season::Column::Number.eq(number));
    if let Some(except) = except {
        query = query.filter(season::Column::Id.ne(except));
    }
    if query.count(conn).await? > 0 {
        return Err(StoreError::conflict(format!("La temporada {number} ya existe")));
    }
    Ok(())
}

async fn find_person<C: ConnectionTrait>(
    conn: &C,
    kind: PersonKind,
    id: &str,
) -> StoreResult<Option<Person>> {
    let person = match kind {
        PersonKind::Director => director::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|m| Person { id: m.id, name: m.name }),
        PersonKind::Actor => {
            actor::Entity::find_by_id(id).one(conn).await?.map(|m| Person { id: m.id, name: m.name })
        },
    };
    Ok(person)
}

async fn find_language_set<C: ConnectionTrait>(
    conn: &C,
    kind: LanguageSetKind,
    id: &str,
) -> StoreResult<Option<LanguageSet>> {
    let set = match kind {
        LanguageSetKind::Subtitles => subtitle_set::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|m| language_set(m.id, &m.languages)),
        LanguageSetKind::Dubbing => dub_set::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|m| language_set(m.id, &m.languages)),
    };
    Ok(set)
}

async fn ensure_genre<C: ConnectionTrait>(conn: &C, id: &str) -> StoreResult<()> {
    if genre::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Err(StoreError::invalid(format!("El género '{id}' no existe")));
    }
    Ok(())
}

async fn ensure_director<C: ConnectionTrait>(conn: &C, id: &str) -> StoreResult<()> {
    if find_person(conn, PersonKind::Director, id).await?.is_none() {
        return Err(StoreError::invalid(format!("El director '{id}' no existe")));
    }
    Ok(())
}

async fn ensure_language_set<C: ConnectionTrait>(
    conn: &C,
    kind: LanguageSetKind,
    id: &str,
) -> StoreResult<()> {
    if find_language_set(conn, kind, id).await?.is_none() {
        return Err(StoreError::invalid(format!("El conjunto de idiomas '{id}' no existe")));
    }
    Ok(())
}

fn validate_release_date(date: &str) -> StoreResult<()> {
    date.parse::<jiff::civil::Date>().map(|_| ()).map_err(|_| {
        StoreError::invalid(format!("`fechaLanzamiento` debe tener formato AAAA-MM-DD: {date}"))
    })
}

fn validate_rating(rating: Option<f64>) -> StoreResult<()> {
    match rating {
        Some(r) if !(0.0..=10.0).contains(&r) => {
            Err(StoreError::invalid("`valoracionPromedio` debe estar entre 0 y 10"))
        },
        _ => Ok(()),
    }
}

fn validate_ordinal(field: &str, n: i32) -> StoreResult<()> {
    if n < 1 {
        return Err(StoreError::invalid(format!("`{field}` debe ser mayor que 0")));
    }
    Ok(())
}

fn kind_not_found(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Movie => "Película no encontrada",
        ContentKind::Series => "Serie no encontrada",
    }
}

fn to_content(m: content::Model) -> StoreResult<Content> {
    let kind = ContentKind::from_code(&m.kind)
        .ok_or_else(|| anyhow::anyhow!("unknown content kind '{}' for {}", m.kind, m.id))?;
    Ok(Content {
        id: m.id,
        kind,
        title: m.title,
        description: m.description,
        release_date: m.release_date,
        genre_id: m.genre_id,
        director_id: m.director_id,
        average_rating: m.average_rating,
        subtitle_set_id: m.subtitle_set_id,
        dub_set_id: m.dub_set_id,
        duration_minutes: m.duration_minutes,
    })
}

fn to_genre(m: genre::Model) -> Genre {
    Genre { id: m.id, name: m.name }
}

fn to_season(m: season::Model) -> Season {
    Season { id: m.id, content_id: m.content_id, number: m.number }
}

fn to_episode(m: episode::Model) -> Episode {
    Episode { id: m.id, season_id: m.season_id, number: m.number, title: m.title }
}

fn language_set(id: String, stored: &str) -> LanguageSet {
    LanguageSet {
        id,
        languages: stored.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect(),
    }
}

/// `LIKE` pattern matching `query` as plain text anywhere in the column.
fn contains_literal(query: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

/// Sets are stored comma-joined, so a label may not contain a comma.
fn join_languages(languages: &[String]) -> StoreResult<String> {
    let mut labels = Vec::with_capacity(languages.len());
    for label in languages.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        if label.contains(',') {
            return Err(StoreError::invalid(format!("`idiomas` no admite comas: '{label}'")));
        }
        labels.push(label);
    }
    Ok(labels.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deepest_identifier_wins() {
        assert_eq!(
            DeleteTarget::resolve("c1".into(), Some("s1".into()), Some("e1".into())),
            DeleteTarget::Episode {
                content_id: "c1".into(),
                season_id: "s1".into(),
                episode_id: "e1".into()
            }
        );
        assert_eq!(
            DeleteTarget::resolve("c1".into(), Some("s1".into()), None),
            DeleteTarget::Season { content_id: "c1".into(), season_id: "s1".into() }
        );
        assert_eq!(
            DeleteTarget::resolve("c1".into(), None, None),
            DeleteTarget::Content { content_id: "c1".into() }
        );
    }

    #[test]
    fn languages_round_trip_through_storage_form() {
        let joined = join_languages(&[" es ".into(), "".into(), "en".into()]).unwrap();
        assert_eq!(joined, "es,en");
        assert_eq!(language_set("s1".into(), &joined).languages, vec!["es", "en"]);
        assert!(language_set("s2".into(), "").languages.is_empty());
    }

    #[test]
    fn language_labels_may_not_contain_the_separator() {
        let err = join_languages(&["es".into(), "Español, MX".into()]).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn release_dates_must_be_calendar_dates() {
        assert!(validate_release_date("2023-11-17").is_ok());
        assert!(validate_release_date("2023-02-30").is_err());
        assert!(validate_release_date("17/11/2023").is_err());
    }

    #[test]
    fn ratings_are_bounded() {
        assert!(validate_rating(None).is_ok());
        assert!(validate_rating(Some(7.5)).is_ok());
        assert!(validate_rating(Some(11.0)).is_err());
    }
}
