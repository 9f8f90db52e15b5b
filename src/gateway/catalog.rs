//! View assembly: sequential calls to the stores merged into page models.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    Backends,
    backend::{ServiceClient, segment},
};
use crate::models::{Content, ContentSummary, Genre, LanguageSet, Person, SearchResults, User};

pub const DATA_UNAVAILABLE: &str = "No se pudo recuperar la información de los microservicios.";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogView {
    pub recommendations: Vec<ContentSummary>,
    pub trending: Vec<ContentSummary>,
    pub history: Vec<ContentSummary>,
    pub genre_sections: Vec<GenreSection>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenreSection {
    pub name: String,
    pub contents: Vec<ContentSummary>,
}

/// Builds the main page for `user_id`. Never fails: a failed list call yields
/// an empty list plus [`DATA_UNAVAILABLE`], and a genre whose content list
/// cannot be fetched is left out.
pub async fn load_catalog(backends: &Backends, user_id: &str) -> CatalogView {
    let user = segment(user_id);
    let mut failed = false;

    let recommendations = list_or_empty(
        &backends.interactions,
        &format!("/usuarios/{user}/recomendaciones"),
        &mut failed,
    )
    .await;
    let trending = list_or_empty(&backends.interactions, "/contenido/tendencias", &mut failed).await;
    let history =
        list_or_empty(&backends.interactions, &format!("/usuarios/{user}/historial"), &mut failed)
            .await;
    let genres: Vec<Genre> = list_or_empty(&backends.content, "/generos", &mut failed).await;

    let mut genre_sections = Vec::with_capacity(genres.len());
    for genre in genres {
        let path = format!("/generos/{}/contenidos", segment(&genre.id));
        match backends.content.get_json::<Vec<ContentSummary>>(&path).await {
            Ok(contents) => genre_sections.push(GenreSection { name: genre.name, contents }),
            Err(err) => debug!(genre_id = %genre.id, error = %err, "omitting genre section"),
        }
    }

    debug!(user_id, sections = genre_sections.len(), failed, "assembled catalog");

    CatalogView {
        recommendations,
        trending,
        history,
        genre_sections,
        message: failed.then(|| DATA_UNAVAILABLE.to_string()),
    }
}

async fn list_or_empty<T: DeserializeOwned>(
    client: &ServiceClient,
    path: &str,
    failed: &mut bool,
) -> Vec<T> {
    match client.get_json(path).await {
        Ok(items) => items,
        Err(err) => {
            warn!(service = client.name(), path, error = %err, "catalog call failed");
            *failed = true;
            Vec::new()
        },
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub content: Content,
    pub genre: String,
    pub director: Option<String>,
    pub cast: Vec<String>,
    pub subtitles: Vec<String>,
    pub dubbing: Vec<String>,
}

/// `None` when the content record itself cannot be fetched. Follow-up
/// lookups fall back to the raw id (or an empty list) on failure.
pub async fn load_detail(backends: &Backends, content_id: &str) -> Option<DetailView> {
    let id = segment(content_id);
    let content: Content = match backends.content.get_json(&format!("/contenidos/{id}")).await {
        Ok(content) => content,
        Err(err) => {
            warn!(content_id, error = %err, "content lookup failed");
            return None;
        },
    };

    let genre = match backends
        .content
        .get_json::<Genre>(&format!("/generos/{}", segment(&content.genre_id)))
        .await
    {
        Ok(genre) => genre.name,
        Err(err) => {
            warn!(genre_id = %content.genre_id, error = %err, "genre lookup failed");
            content.genre_id.clone()
        },
    };

    let director = match &content.director_id {
        Some(director_id) => Some(
            match backends
                .content
                .get_json::<Person>(&format!("/directores/{}", segment(director_id)))
                .await
            {
                Ok(person) => person.name,
                Err(err) => {
                    warn!(%director_id, error = %err, "director lookup failed");
                    director_id.clone()
                },
            },
        ),
        None => None,
    };

    let cast = match backends.content.get_json::<Vec<Person>>(&format!("/contenidos/{id}/reparto")).await
    {
        Ok(people) => people.into_iter().map(|p| p.name).collect(),
        Err(err) => {
            warn!(content_id, error = %err, "cast lookup failed");
            Vec::new()
        },
    };

    let subtitles = languages(&backends.content, "/subtitulos", content.subtitle_set_id.as_deref()).await;
    let dubbing = languages(&backends.content, "/doblajes", content.dub_set_id.as_deref()).await;

    Some(DetailView { content, genre, director, cast, subtitles, dubbing })
}

async fn languages(client: &ServiceClient, collection: &str, set_id: Option<&str>) -> Vec<String> {
    let Some(set_id) = set_id else {
        return Vec::new();
    };
    match client.get_json::<LanguageSet>(&format!("{collection}/{}", segment(set_id))).await {
        Ok(set) => set.languages,
        Err(err) => {
            warn!(collection, set_id, error = %err, "language set lookup failed");
            Vec::new()
        },
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SearchKind {
    Content,
    Actor,
}

#[derive(Debug, thiserror::Error)]
#[error("Tipo de búsqueda no válido")]
pub struct UnknownSearchKind;

impl FromStr for SearchKind {
    type Err = UnknownSearchKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contenido" | "content" => Ok(SearchKind::Content),
            "actor" => Ok(SearchKind::Actor),
            _ => Err(UnknownSearchKind),
        }
    }
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Content => "contenido",
            SearchKind::Actor => "actor",
        }
    }
}

/// Empty results and a failed call look the same to the caller.
pub async fn search(backends: &Backends, kind: SearchKind, query: &str) -> Vec<ContentSummary> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let path = match kind {
        SearchKind::Content => format!("/contenidos/{}/buscar", segment(query)),
        SearchKind::Actor => format!("/contenidos/{}/actores", segment(query)),
    };
    match backends.content.get_json::<SearchResults<ContentSummary>>(&path).await {
        Ok(found) => found.results,
        Err(err) => {
            warn!(kind = kind.as_str(), query, error = %err, "search failed");
            Vec::new()
        },
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileView {
    pub user: User,
    pub liked: Vec<ContentSummary>,
}

pub async fn load_profile(backends: &Backends, user_id: &str) -> reqwest::Result<ProfileView> {
    let id = segment(user_id);
    let user = backends.users.get_json(&format!("/usuarios/{id}")).await?;
    let liked = backends.interactions.get_json(&format!("/usuarios/{id}/me-gusta")).await?;
    Ok(ProfileView { user, liked })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_kind_accepts_both_spellings() {
        assert_eq!("contenido".parse::<SearchKind>().unwrap(), SearchKind::Content);
        assert_eq!("content".parse::<SearchKind>().unwrap(), SearchKind::Content);
        assert_eq!(" Actor ".parse::<SearchKind>().unwrap(), SearchKind::Actor);
    }

    #[test]
    fn unknown_search_kind_is_rejected() {
        let err = "director".parse::<SearchKind>().unwrap_err();
        assert_eq!(err.to_string(), "Tipo de búsqueda no válido");
        assert!("".parse::<SearchKind>().is_err());
    }
}
