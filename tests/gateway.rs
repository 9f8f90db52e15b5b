mod common;

use axum::{Json, Router, http::StatusCode, routing::get};
use common::{
    TempDb, UNREACHABLE, content_store, get_html, interaction_store, post_form, spawn, user_store,
};
use serde_json::json;
use streamflix::{
    api,
    gateway::{
        self, Backends,
        catalog::{self, DATA_UNAVAILABLE},
    },
    models::{ContentKind, ContentSummary, NewContent, NewLanguageSet, NewNamed, NewUser, ScoredContent},
    stores::{LanguageSetKind, PersonKind},
};

struct Stack {
    content_url: String,
    users_url: String,
    interactions_url: String,
    user_id: String,
    _dbs: Vec<TempDb>,
}

impl Stack {
    fn backends(&self) -> Backends {
        Backends::new(
            reqwest::Client::new(),
            &self.content_url,
            &self.users_url,
            &self.interactions_url,
        )
    }

    fn gateway(&self) -> Router {
        gateway::router(self.backends())
    }
}

fn named(id: &str, name: &str) -> NewNamed {
    NewNamed { id: Some(id.to_string()), name: name.to_string() }
}

fn movie(id: &str, title: &str, genre_id: &str) -> NewContent {
    NewContent {
        id: Some(id.to_string()),
        title: title.to_string(),
        description: None,
        release_date: "2021-10-22".to_string(),
        genre_id: genre_id.to_string(),
        director_id: None,
        average_rating: None,
        subtitle_set_id: None,
        dub_set_id: None,
        duration_minutes: None,
    }
}

fn entry(id: &str, title: &str) -> ContentSummary {
    ContentSummary {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        release_date: None,
        genre_id: None,
        average_rating: None,
        subtitle_set_id: None,
        dub_set_id: None,
    }
}

/// Genres, in list order: Acción (one movie), Comedia (empty), Drama (two movies).
async fn stack() -> Stack {
    let (content, content_db) = content_store().await;
    content.create_genre(named("g1", "Drama")).await.unwrap();
    content.create_genre(named("g2", "Acción")).await.unwrap();
    content.create_genre(named("g3", "Comedia")).await.unwrap();
    content.create_person(PersonKind::Director, named("d1", "Denis Villeneuve")).await.unwrap();
    content
        .create_language_set(
            LanguageSetKind::Subtitles,
            NewLanguageSet { id: Some("sub1".into()), languages: vec!["es".into(), "en".into()] },
        )
        .await
        .unwrap();

    let mut dune = movie("m1", "Dune", "g1");
    dune.director_id = Some("d1".into());
    dune.subtitle_set_id = Some("sub1".into());
    content.create_content(ContentKind::Movie, dune).await.unwrap();
    content
        .create_content(ContentKind::Movie, movie("m2", "Arrival", "g1"))
        .await
        .unwrap();
    content
        .create_content(ContentKind::Movie, movie("m3", "Sicario", "g2"))
        .await
        .unwrap();

    let (users, users_db) = user_store().await;
    let user = users
        .register(NewUser {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "s3creto".into(),
            language: Some("es".into()),
            plan_id: "P1".into(),
        })
        .await
        .unwrap();

    let (interactions, interactions_db) = interaction_store().await;
    interactions.upsert_entry(entry("m1", "Dune")).await.unwrap();
    interactions.upsert_entry(entry("m3", "Sicario")).await.unwrap();
    interactions
        .recommend(&user.id, ScoredContent { content_id: "m1".into(), score: 0.9 })
        .await
        .unwrap();
    interactions.set_trending(ScoredContent { content_id: "m3".into(), score: 10.0 }).await.unwrap();
    interactions.record_view(&user.id, "m3").await.unwrap();
    interactions.like(&user.id, "m1").await.unwrap();

    Stack {
        content_url: spawn(api::content_router(content)).await,
        users_url: spawn(api::users_router(users)).await,
        interactions_url: spawn(api::interactions_router(interactions)).await,
        user_id: user.id,
        _dbs: vec![content_db, users_db, interactions_db],
    }
}

fn titles(items: &[ContentSummary]) -> Vec<&str> {
    items.iter().map(|c| c.title.as_str()).collect()
}

#[tokio::test]
async fn catalog_sections_follow_genre_list_order() {
    let stack = stack().await;
    let view = catalog::load_catalog(&stack.backends(), &stack.user_id).await;

    assert_eq!(view.message, None);
    assert_eq!(titles(&view.recommendations), ["Dune"]);
    assert_eq!(titles(&view.trending), ["Sicario"]);
    assert_eq!(titles(&view.history), ["Sicario"]);

    // Comedia has no content and is left out
    let names: Vec<&str> = view.genre_sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Acción", "Drama"]);
    assert_eq!(titles(&view.genre_sections[1].contents), ["Arrival", "Dune"]);
}

#[tokio::test]
async fn one_failed_call_empties_only_its_field() {
    let stack = stack().await;
    let fake_interactions = Router::new()
        .route(
            "/usuarios/{id}/recomendaciones",
            get(|| async { Json(json!([{"id": "m1", "titulo": "Dune"}])) }),
        )
        .route("/contenido/tendencias", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/usuarios/{id}/historial",
            get(|| async { Json(json!([{"id": "m3", "titulo": "Sicario"}])) }),
        );
    let fake_url = spawn(fake_interactions).await;

    let backends =
        Backends::new(reqwest::Client::new(), &stack.content_url, &stack.users_url, &fake_url);
    let view = catalog::load_catalog(&backends, &stack.user_id).await;

    assert_eq!(view.message.as_deref(), Some(DATA_UNAVAILABLE));
    assert!(view.trending.is_empty());
    assert_eq!(titles(&view.recommendations), ["Dune"]);
    assert_eq!(titles(&view.history), ["Sicario"]);
    assert_eq!(view.genre_sections.len(), 2);
}

#[tokio::test]
async fn unreachable_services_degrade_to_empty_lists() {
    let stack = stack().await;

    let backends =
        Backends::new(reqwest::Client::new(), &stack.content_url, &stack.users_url, UNREACHABLE);
    let view = catalog::load_catalog(&backends, &stack.user_id).await;
    assert_eq!(view.message.as_deref(), Some(DATA_UNAVAILABLE));
    assert!(view.recommendations.is_empty());
    assert!(view.trending.is_empty());
    assert!(view.history.is_empty());
    assert_eq!(view.genre_sections.len(), 2);

    let backends =
        Backends::new(reqwest::Client::new(), UNREACHABLE, &stack.users_url, &stack.interactions_url);
    let view = catalog::load_catalog(&backends, &stack.user_id).await;
    assert_eq!(view.message.as_deref(), Some(DATA_UNAVAILABLE));
    assert!(view.genre_sections.is_empty());
    assert_eq!(titles(&view.recommendations), ["Dune"]);
}

#[tokio::test]
async fn main_page_renders_the_catalog() {
    let stack = stack().await;
    let app = stack.gateway();

    let (status, html) = get_html(&app, &format!("/pantalla_principal?user_id={}", stack.user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Recomendados para ti"));
    assert!(html.contains("Acción"));
    assert!(html.contains("/detalles_pelicula/m1"));
    assert!(!html.contains(DATA_UNAVAILABLE));
}

#[tokio::test]
async fn login_success_and_failure() {
    let stack = stack().await;
    let app = stack.gateway();

    let (status, html) = post_form(&app, "/login", "email=ana%40example.com&password=s3creto").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Recomendados para ti"));
    assert!(html.contains(&format!("/usuarios/{}/perfil", stack.user_id)));

    let (status, html) = post_form(&app, "/login", "email=ana%40example.com&password=mal").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(html.contains("Credenciales inválidas"));
}

#[tokio::test]
async fn registration_success_and_failure() {
    let stack = stack().await;
    let app = stack.gateway();

    let (status, html) = get_html(&app, "/registro_usuario").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Plan Premium"));

    let (status, _) = post_form(
        &app,
        "/registro",
        "name=Bob&email=bob%40example.com&password=x&language=en&subscription_plan=P3",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, html) = post_form(
        &app,
        "/registro",
        "name=Eve&email=eve%40example.com&password=x&language=&subscription_plan=P9",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(html.contains("Error al registrar el usuario."));
}

#[tokio::test]
async fn plans_are_passed_through_as_json() {
    let stack = stack().await;

    let (status, plans) = common::get(&stack.gateway(), "/planes_suscripcion").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plans.as_array().unwrap().len(), 3);
    assert_eq!(plans[0]["nombre"], "Plan Básico");

    let broken = gateway::router(Backends::new(
        reqwest::Client::new(),
        &stack.content_url,
        UNREACHABLE,
        &stack.interactions_url,
    ));
    let (status, _) = get_html(&broken, "/planes_suscripcion").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn detail_page_resolves_names() {
    let stack = stack().await;
    let app = stack.gateway();

    let (status, html) = get_html(&app, "/detalles_pelicula/m1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Dune"));
    assert!(html.contains("Drama"));
    assert!(html.contains("Denis Villeneuve"));
    assert!(html.contains("es, en"));
    assert!(html.contains("22/10/2021"));

    let (status, html) = get_html(&app, "/detalles_pelicula/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("No se encontraron los detalles de la película."));
}

#[tokio::test]
async fn detail_page_survives_failed_follow_up_lookups() {
    let stack = stack().await;
    let failing = || async { StatusCode::INTERNAL_SERVER_ERROR };
    let fake_content = Router::new()
        .route(
            "/contenidos/{id}",
            get(|| async {
                Json(json!({
                    "id": "m1",
                    "tipo": "pelicula",
                    "titulo": "Dune",
                    "fechaLanzamiento": "2021-10-22",
                    "idGenero": "g-raw",
                    "idDirector": "d-raw",
                    "idSubtitulosContenido": "sub1"
                }))
            }),
        )
        .route("/generos/{id}", get(failing))
        .route("/directores/{id}", get(failing))
        .route("/contenidos/{id}/reparto", get(failing))
        .route("/subtitulos/{id}", get(failing));
    let fake_url = spawn(fake_content).await;

    let app = gateway::router(Backends::new(
        reqwest::Client::new(),
        &fake_url,
        &stack.users_url,
        &stack.interactions_url,
    ));
    let (status, html) = get_html(&app, "/detalles_pelicula/m1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Dune"));
    assert!(html.contains("g-raw"));
    assert!(html.contains("d-raw"));
    // cast, subtitles and dubbing all fall back to a dash
    assert_eq!(html.matches(">—</dd>").count(), 3);
}

#[tokio::test]
async fn search_dispatches_on_type() {
    let stack = stack().await;
    let app = stack.gateway();

    let (status, html) = get_html(&app, "/buscar?query=dune&tipo=contenido").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("/detalles_pelicula/m1"));

    let (status, html) = get_html(&app, "/buscar?query=nadie&tipo=actor").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No se han encontrado resultados."));

    let (status, html) = get_html(&app, "/buscar?query=dune&tipo=director").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(html.contains("Tipo de búsqueda no válido"));
}

#[tokio::test]
async fn failed_search_looks_like_an_empty_one() {
    let stack = stack().await;
    let app = gateway::router(Backends::new(
        reqwest::Client::new(),
        UNREACHABLE,
        &stack.users_url,
        &stack.interactions_url,
    ));

    let (status, html) = get_html(&app, "/buscar?query=dune&tipo=content").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No se han encontrado resultados."));
}

#[tokio::test]
async fn profile_shows_likes_or_an_error() {
    let stack = stack().await;
    let app = stack.gateway();

    let (status, html) = get_html(&app, &format!("/usuarios/{}/perfil", stack.user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Ana"));
    assert!(html.contains("Me gusta"));
    assert!(html.contains("/detalles_pelicula/m1"));

    let (status, html) = get_html(&app, "/usuarios/nobody/perfil").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Error al obtener el perfil del usuario"));
}
