use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use super::ApiResult;
use crate::{
    models::{
        Content, ContentKind, ContentPatch, Episode, EpisodePatch, Genre, LanguageSet,
        LanguageSetPatch, Message, NamedPatch, NewContent, NewEpisode, NewLanguageSet, NewNamed,
        NewSeason, Person, SearchResults, Season, SeasonDetail, SeasonPatch, SeriesDetail,
    },
    stores::{ContentStore, DeleteTarget, LanguageSetKind, PersonKind},
};

pub fn router(store: ContentStore) -> Router {
    Router::new()
        .route("/peliculas", post(create_movie))
        .route("/peliculas/{id}", get(get_movie).put(update_movie))
        .route("/series", get(list_series).post(create_series))
        .route("/series/{id}", get(get_series).put(update_series))
        .route("/contenidos", get(list_contents))
        .route("/contenidos/{id}", get(get_content).delete(delete))
        .route("/contenidos/{id}/temporadas", post(create_season))
        .route(
            "/contenidos/{id}/temporadas/{season_id}",
            get(get_season).put(update_season).delete(delete),
        )
        .route("/contenidos/{id}/temporadas/{season_id}/episodios", post(create_episode))
        .route(
            "/contenidos/{id}/temporadas/{season_id}/episodios/{episode_id}",
            get(get_episode).put(update_episode).delete(delete),
        )
        .route("/contenidos/{id}/reparto", get(cast))
        .route("/contenidos/{id}/reparto/{actor_id}", post(add_cast).delete(remove_cast))
        .route("/contenidos/{id}/buscar", get(search_title))
        .route("/contenidos/{id}/actores", get(search_actor))
        .route(
            "/contenidos/{id}/subtitulos",
            get(content_language_set).layer(Extension(LanguageSetKind::Subtitles)),
        )
        .route(
            "/contenidos/{id}/subtitulos/{set_id}",
            post(assign_language_set).layer(Extension(LanguageSetKind::Subtitles)),
        )
        .route(
            "/contenidos/{id}/doblajes",
            get(content_language_set).layer(Extension(LanguageSetKind::Dubbing)),
        )
        .route(
            "/contenidos/{id}/doblajes/{set_id}",
            post(assign_language_set).layer(Extension(LanguageSetKind::Dubbing)),
        )
        .route("/generos", get(list_genres).post(create_genre))
        .route("/generos/{id}", get(get_genre).put(update_genre).delete(delete_genre))
        .route("/generos/{id}/contenidos", get(genre_contents))
        .route(
            "/directores",
            get(list_people).post(create_person).layer(Extension(PersonKind::Director)),
        )
        .route(
            "/directores/{id}",
            get(get_person)
                .put(update_person)
                .delete(delete_person)
                .layer(Extension(PersonKind::Director)),
        )
        .route(
            "/actores",
            get(list_people).post(create_person).layer(Extension(PersonKind::Actor)),
        )
        .route(
            "/actores/{id}",
            get(get_person).put(update_person).delete(delete_person).layer(Extension(PersonKind::Actor)),
        )
        .route(
            "/subtitulos",
            get(list_language_sets)
                .post(create_language_set)
                .layer(Extension(LanguageSetKind::Subtitles)),
        )
        .route(
            "/subtitulos/{id}",
            get(get_language_set)
                .put(update_language_set)
                .delete(delete_language_set)
                .layer(Extension(LanguageSetKind::Subtitles)),
        )
        .route(
            "/doblajes",
            get(list_language_sets)
                .post(create_language_set)
                .layer(Extension(LanguageSetKind::Dubbing)),
        )
        .route(
            "/doblajes/{id}",
            get(get_language_set)
                .put(update_language_set)
                .delete(delete_language_set)
                .layer(Extension(LanguageSetKind::Dubbing)),
        )
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}

// Movies and series

async fn create_movie(
    State(store): State<ContentStore>,
    Json(input): Json<NewContent>,
) -> ApiResult<Content> {
    Ok(Json(store.create_content(ContentKind::Movie, input).await?))
}

async fn get_movie(State(store): State<ContentStore>, Path(id): Path<String>) -> ApiResult<Content> {
    Ok(Json(store.get_content_of_kind(&id, ContentKind::Movie).await?))
}

async fn update_movie(
    State(store): State<ContentStore>,
    Path(id): Path<String>,
    Json(patch): Json<ContentPatch>,
) -> ApiResult<Message> {
    store.update_content(&id, ContentKind::Movie, patch).await?;
    Ok(Json(Message::new("Datos de película actualizados exitosamente")))
}

async fn create_series(
    State(store): State<ContentStore>,
    Json(input): Json<NewContent>,
) -> ApiResult<Content> {
    Ok(Json(store.create_content(ContentKind::Series, input).await?))
}

async fn list_series(State(store): State<ContentStore>) -> ApiResult<Vec<SeriesDetail>> {
    Ok(Json(store.list_series().await?))
}

async fn get_series(
    State(store): State<ContentStore>,
    Path(id): Path<String>,
) -> ApiResult<SeriesDetail> {
    Ok(Json(store.get_series(&id).await?))
}

async fn update_series(
    State(store): State<ContentStore>,
    Path(id): Path<String>,
    Json(patch): Json<ContentPatch>,
) -> ApiResult<Message> {
    store.update_content(&id, ContentKind::Series, patch).await?;
    Ok(Json(Message::new("Datos de serie actualizados exitosamente")))
}

async fn list_contents(State(store): State<ContentStore>) -> ApiResult<Vec<Content>> {
    Ok(Json(store.list_contents().await?))
}

async fn get_content(
    State(store): State<ContentStore>,
    Path(id): Path<String>,
) -> ApiResult<Content> {
    Ok(Json(store.get_content(&id).await?))
}

#[derive(Debug, Deserialize)]
struct DeletePath {
    id: String,
    #[serde(default)]
    season_id: Option<String>,
    #[serde(default)]
    episode_id: Option<String>,
}

/// Shared by the content, season and episode routes.
async fn delete(
    State(store): State<ContentStore>,
    Path(path): Path<DeletePath>,
) -> ApiResult<Message> {
    let target = DeleteTarget::resolve(path.id, path.season_id, path.episode_id);
    store.delete(&target).await?;
    let message = match target {
        DeleteTarget::Episode { .. } => "Episodio eliminado exitosamente",
        DeleteTarget::Season { .. } => "Temporada eliminada exitosamente",
        DeleteTarget::Content { .. } => "Contenido eliminado exitosamente",
    };
    Ok(Json(Message::new(message)))
}

// Seasons and episodes

async fn create_season(
    State(store): State<ContentStore>,
    Path(id): Path<String>,
    Json(input): Json<NewSeason>,
) -> ApiResult<Season> {
    Ok(Json(store.create_season(&id, input).await?))
}

async fn get_season(
    State(store): State<ContentStore>,
    Path((id, season_id)): Path<(String, String)>,
) -> ApiResult<SeasonDetail> {
    Ok(Json(store.get_season(&id, &season_id).await?))
}

async fn update_season(
    State(store): State<ContentStore>,
    Path((id, season_id)): Path<(String, String)>,
    Json(patch): Json<SeasonPatch>,
) -> ApiResult<Message> {
    store.update_season(&id, &season_id, patch).await?;
    Ok(Json(Message::new("Temporada actualizada exitosamente")))
}

async fn create_episode(
    State(store): State<ContentStore>,
    Path((id, season_id)): Path<(String, String)>,
    Json(input): Json<NewEpisode>,
) -> ApiResult<Episode> {
    Ok(Json(store.create_episode(&id, &season_id, input).await?))
}

async fn get_episode(
    State(store): State<ContentStore>,
    Path((id, season_id, episode_id)): Path<(String, String, String)>,
) -> ApiResult<Episode> {
    Ok(Json(store.get_episode(&id, &season_id, &episode_id).await?))
}

async fn update_episode(
    State(store): State<ContentStore>,
    Path((id, season_id, episode_id)): Path<(String, String, String)>,
    Json(patch): Json<EpisodePatch>,
) -> ApiResult<Message> {
    store.update_episode(&id, &season_id, &episode_id, patch).await?;
    Ok(Json(Message::new("Episodio actualizado exitosamente")))
}

// Cast

async fn cast(State(store): State<ContentStore>, Path(id): Path<String>) -> ApiResult<Vec<Person>> {
    Ok(Json(store.cast_of(&id).await?))
}

async fn add_cast(
    State(store): State<ContentStore>,
    Path((id, actor_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    store.add_cast_member(&id, &actor_id).await?;
    Ok(Json(Message::new("Actor añadido al reparto exitosamente")))
}

async fn remove_cast(
    State(store): State<ContentStore>,
    Path((id, actor_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    store.remove_cast_member(&id, &actor_id).await?;
    Ok(Json(Message::new("Actor eliminado del reparto exitosamente")))
}

// Search

async fn search_title(
    State(store): State<ContentStore>,
    Path(query): Path<String>,
) -> ApiResult<SearchResults<Content>> {
    Ok(Json(SearchResults { results: store.search_by_title(&query).await? }))
}

async fn search_actor(
    State(store): State<ContentStore>,
    Path(query): Path<String>,
) -> ApiResult<SearchResults<Content>> {
    Ok(Json(SearchResults { results: store.search_by_actor(&query).await? }))
}

// Language sets attached to content

async fn content_language_set(
    State(store): State<ContentStore>,
    Extension(kind): Extension<LanguageSetKind>,
    Path(id): Path<String>,
) -> ApiResult<LanguageSet> {
    Ok(Json(store.content_language_set(&id, kind).await?))
}

async fn assign_language_set(
    State(store): State<ContentStore>,
    Extension(kind): Extension<LanguageSetKind>,
    Path((id, set_id)): Path<(String, String)>,
) -> ApiResult<Content> {
    Ok(Json(store.assign_language_set(&id, kind, &set_id).await?))
}

// Genres

async fn list_genres(State(store): State<ContentStore>) -> ApiResult<Vec<Genre>> {
    Ok(Json(store.list_genres().await?))
}

async fn create_genre(
    State(store): State<ContentStore>,
    Json(input): Json<NewNamed>,
) -> ApiResult<Genre> {
    Ok(Json(store.create_genre(input).await?))
}

async fn get_genre(State(store): State<ContentStore>, Path(id): Path<String>) -> ApiResult<Genre> {
    Ok(Json(store.get_genre(&id).await?))
}

async fn update_genre(
    State(store): State<ContentStore>,
    Path(id): Path<String>,
    Json(patch): Json<NamedPatch>,
) -> ApiResult<Message> {
    store.update_genre(&id, patch).await?;
    Ok(Json(Message::new("Datos del género actualizados exitosamente")))
}

async fn delete_genre(
    State(store): State<ContentStore>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    store.delete_genre(&id).await?;
    Ok(Json(Message::new("Género eliminado exitosamente")))
}

async fn genre_contents(
    State(store): State<ContentStore>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Content>> {
    Ok(Json(store.contents_by_genre(&id).await?))
}

// Directors and actors

async fn list_people(
    State(store): State<ContentStore>,
    Extension(kind): Extension<PersonKind>,
) -> ApiResult<Vec<Person>> {
    Ok(Json(store.list_people(kind).await?))
}

async fn create_person(
    State(store): State<ContentStore>,
    Extension(kind): Extension<PersonKind>,
    Json(input): Json<NewNamed>,
) -> ApiResult<Person> {
    Ok(Json(store.create_person(kind, input).await?))
}

async fn get_person(
    State(store): State<ContentStore>,
    Extension(kind): Extension<PersonKind>,
    Path(id): Path<String>,
) -> ApiResult<Person> {
    Ok(Json(store.get_person(kind, &id).await?))
}

async fn update_person(
    State(store): State<ContentStore>,
    Extension(kind): Extension<PersonKind>,
    Path(id): Path<String>,
    Json(patch): Json<NamedPatch>,
) -> ApiResult<Message> {
    store.update_person(kind, &id, patch).await?;
    let message = match kind {
        PersonKind::Director => "Datos del director actualizados exitosamente",
        PersonKind::Actor => "Datos del actor actualizados exitosamente",
    };
    Ok(Json(Message::new(message)))
}

async fn delete_person(
    State(store): State<ContentStore>,
    Extension(kind): Extension<PersonKind>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    store.delete_person(kind, &id).await?;
    let message = match kind {
        PersonKind::Director => "Director eliminado exitosamente",
        PersonKind::Actor => "Actor eliminado exitosamente",
    };
    Ok(Json(Message::new(message)))
}

// Subtitle and dubbing sets

async fn list_language_sets(
    State(store): State<ContentStore>,
    Extension(kind): Extension<LanguageSetKind>,
) -> ApiResult<Vec<LanguageSet>> {
    Ok(Json(store.list_language_sets(kind).await?))
}

async fn create_language_set(
    State(store): State<ContentStore>,
    Extension(kind): Extension<LanguageSetKind>,
    Json(input): Json<NewLanguageSet>,
) -> ApiResult<LanguageSet> {
    Ok(Json(store.create_language_set(kind, input).await?))
}

async fn get_language_set(
    State(store): State<ContentStore>,
    Extension(kind): Extension<LanguageSetKind>,
    Path(id): Path<String>,
) -> ApiResult<LanguageSet> {
    Ok(Json(store.get_language_set(kind, &id).await?))
}

async fn update_language_set(
    State(store): State<ContentStore>,
    Extension(kind): Extension<LanguageSetKind>,
    Path(id): Path<String>,
    Json(patch): Json<LanguageSetPatch>,
) -> ApiResult<Message> {
    store.update_language_set(kind, &id, patch).await?;
    Ok(Json(Message::new("Idiomas actualizados exitosamente")))
}

async fn delete_language_set(
    State(store): State<ContentStore>,
    Extension(kind): Extension<LanguageSetKind>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    store.delete_language_set(kind, &id).await?;
    Ok(Json(Message::new("Idiomas eliminados exitosamente")))
}
