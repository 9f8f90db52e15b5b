//! JSON shapes exchanged between the services.
//!
//! Field names on the wire are the Spanish names the browser-facing gateway
//! and the stores agreed on; Rust field names are English.

use serde::{Deserialize, Serialize};

use crate::patch::Patch;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "pelicula")]
    Movie,
    #[serde(rename = "serie")]
    Series,
}

impl ContentKind {
    pub fn as_code(self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "movie" => Some(ContentKind::Movie),
            "series" => Some(ContentKind::Series),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    #[serde(rename = "tipo")]
    pub kind: ContentKind,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fechaLanzamiento")]
    pub release_date: String,
    #[serde(rename = "idGenero")]
    pub genre_id: String,
    #[serde(rename = "idDirector", default)]
    pub director_id: Option<String>,
    #[serde(rename = "valoracionPromedio", default)]
    pub average_rating: Option<f64>,
    #[serde(rename = "idSubtitulosContenido", default)]
    pub subtitle_set_id: Option<String>,
    #[serde(rename = "idDoblajeContenido", default)]
    pub dub_set_id: Option<String>,
    #[serde(rename = "duracion", default)]
    pub duration_minutes: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewContent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fechaLanzamiento")]
    pub release_date: String,
    #[serde(rename = "idGenero")]
    pub genre_id: String,
    #[serde(rename = "idDirector", default)]
    pub director_id: Option<String>,
    #[serde(rename = "valoracionPromedio", default)]
    pub average_rating: Option<f64>,
    #[serde(rename = "idSubtitulosContenido", default)]
    pub subtitle_set_id: Option<String>,
    #[serde(rename = "idDoblajeContenido", default)]
    pub dub_set_id: Option<String>,
    #[serde(rename = "duracion", default)]
    pub duration_minutes: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContentPatch {
    #[serde(rename = "titulo", default)]
    pub title: Patch<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Patch<String>,
    #[serde(rename = "fechaLanzamiento", default)]
    pub release_date: Patch<String>,
    #[serde(rename = "idGenero", default)]
    pub genre_id: Patch<String>,
    #[serde(rename = "idDirector", default)]
    pub director_id: Patch<String>,
    #[serde(rename = "valoracionPromedio", default)]
    pub average_rating: Patch<f64>,
    #[serde(rename = "idSubtitulosContenido", default)]
    pub subtitle_set_id: Patch<String>,
    #[serde(rename = "idDoblajeContenido", default)]
    pub dub_set_id: Patch<String>,
    #[serde(rename = "duracion", default)]
    pub duration_minutes: Patch<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    #[serde(rename = "idContenido")]
    pub content_id: String,
    #[serde(rename = "numero")]
    pub number: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSeason {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "numero")]
    pub number: i32,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SeasonPatch {
    #[serde(rename = "numero", default)]
    pub number: Patch<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonDetail {
    #[serde(flatten)]
    pub season: Season,
    #[serde(rename = "episodios")]
    pub episodes: Vec<Episode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    #[serde(rename = "idTemporada")]
    pub season_id: String,
    #[serde(rename = "numero")]
    pub number: i32,
    #[serde(rename = "titulo")]
    pub title: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewEpisode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "numero")]
    pub number: i32,
    #[serde(rename = "titulo")]
    pub title: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EpisodePatch {
    #[serde(rename = "numero", default)]
    pub number: Patch<i32>,
    #[serde(rename = "titulo", default)]
    pub title: Patch<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesDetail {
    #[serde(flatten)]
    pub content: Content,
    #[serde(rename = "temporadas")]
    pub seasons: Vec<SeasonDetail>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Directors and actors share this shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Create payload for genres, directors and actors.
#[derive(Clone, Debug, Deserialize)]
pub struct NewNamed {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NamedPatch {
    #[serde(rename = "nombre", default)]
    pub name: Patch<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSet {
    pub id: String,
    #[serde(rename = "idiomas")]
    pub languages: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewLanguageSet {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "idiomas")]
    pub languages: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LanguageSetPatch {
    #[serde(rename = "idiomas", default)]
    pub languages: Patch<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResults<T> {
    #[serde(rename = "resultados")]
    pub results: Vec<T>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precioMensual")]
    pub monthly_price: f64,
    #[serde(rename = "numeroDispositivos")]
    pub device_limit: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "idioma", default)]
    pub language: Option<String>,
    #[serde(rename = "idPlanSuscripcion")]
    pub plan_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "idioma", default)]
    pub language: Option<String>,
    #[serde(rename = "idPlanSuscripcion")]
    pub plan_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserPatch {
    #[serde(rename = "nombre", default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub password: Patch<String>,
    #[serde(rename = "idioma", default)]
    pub language: Patch<String>,
    #[serde(rename = "idPlanSuscripcion", default)]
    pub plan_id: Patch<String>,
}

/// Content as listed by the interaction service and as rendered in the
/// gateway's catalog rows. Every store's content record decodes into it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fechaLanzamiento", default)]
    pub release_date: Option<String>,
    #[serde(rename = "idGenero", default)]
    pub genre_id: Option<String>,
    #[serde(rename = "valoracionPromedio", default)]
    pub average_rating: Option<f64>,
    #[serde(rename = "idSubtitulosContenido", default)]
    pub subtitle_set_id: Option<String>,
    #[serde(rename = "idDoblajeContenido", default)]
    pub dub_set_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentRef {
    #[serde(rename = "idContenido")]
    pub content_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoredContent {
    #[serde(rename = "idContenido")]
    pub content_id: String,
    #[serde(rename = "puntuacion")]
    pub score: f64,
}
