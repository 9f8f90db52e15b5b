mod common;

use axum::{Router, http::StatusCode};
use common::{content_app, delete, get, post, put};
use serde_json::{Value, json};

async fn seed_catalog(app: &Router) {
    let (status, _) = post(app, "/generos", json!({"id": "g1", "nombre": "Ciencia ficción"})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(app, "/directores", json!({"id": "d1", "nombre": "Denis Villeneuve"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        app,
        "/peliculas",
        json!({
            "id": "m1",
            "titulo": "Dune",
            "descripcion": "Paul Atreides llega a Arrakis.",
            "fechaLanzamiento": "2021-10-22",
            "idGenero": "g1",
            "idDirector": "d1",
            "valoracionPromedio": 8.1,
            "duracion": 155
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        app,
        "/series",
        json!({
            "id": "s1",
            "titulo": "Arcane",
            "fechaLanzamiento": "2021-11-06",
            "idGenero": "g1"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn get_content_returns_the_stored_record() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, body) = get(&app, "/contenidos/m1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": "m1",
            "tipo": "pelicula",
            "titulo": "Dune",
            "descripcion": "Paul Atreides llega a Arrakis.",
            "fechaLanzamiento": "2021-10-22",
            "idGenero": "g1",
            "idDirector": "d1",
            "valoracionPromedio": 8.1,
            "idSubtitulosContenido": null,
            "idDoblajeContenido": null,
            "duracion": 155
        })
    );

    let (status, body) = get(&app, "/contenidos/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Contenido no encontrado");
}

#[tokio::test]
async fn kind_specific_routes_reject_the_other_kind() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, _) = get(&app, "/peliculas/s1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/series/m1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/peliculas/m1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["titulo"], "Dune");
}

#[tokio::test]
async fn create_without_id_generates_one() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, body) = post(
        &app,
        "/peliculas",
        json!({"titulo": "Sicario", "fechaLanzamiento": "2015-09-18", "idGenero": "g1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap();
    assert_eq!(id.len(), 36);

    let (status, _) = get(&app, &format!("/contenidos/{id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_validates_references_and_ids() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, _) = post(
        &app,
        "/peliculas",
        json!({"titulo": "X", "fechaLanzamiento": "2020-01-01", "idGenero": "missing"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/peliculas",
        json!({"titulo": "X", "fechaLanzamiento": "01/01/2020", "idGenero": "g1"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/peliculas",
        json!({"id": "m1", "titulo": "Otra", "fechaLanzamiento": "2020-01-01", "idGenero": "g1"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn partial_update_leaves_other_fields_untouched() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (_, before) = get(&app, "/contenidos/m1").await;

    let (status, body) = put(&app, "/peliculas/m1", json!({"valoracionPromedio": 9.0})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Datos de película actualizados exitosamente");

    let (_, after) = get(&app, "/contenidos/m1").await;
    assert_eq!(after["valoracionPromedio"], 9.0);
    for (key, value) in before.as_object().unwrap() {
        if key != "valoracionPromedio" {
            assert_eq!(&after[key], value, "field {key} changed");
        }
    }

    // an empty payload changes nothing
    let (status, _) = put(&app, "/peliculas/m1", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, unchanged) = get(&app, "/contenidos/m1").await;
    assert_eq!(unchanged, after);
}

#[tokio::test]
async fn null_clears_optional_fields_but_not_required_ones() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, _) = put(&app, "/peliculas/m1", json!({"descripcion": null, "idDirector": null})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/contenidos/m1").await;
    assert_eq!(body["descripcion"], Value::Null);
    assert_eq!(body["idDirector"], Value::Null);
    assert_eq!(body["titulo"], "Dune");

    let (status, _) = put(&app, "/peliculas/m1", json!({"titulo": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = put(&app, "/peliculas/m1", json!({"idGenero": "missing"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn series_carry_seasons_and_episodes() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, _) = post(&app, "/contenidos/s1/temporadas", json!({"id": "t2", "numero": 2})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(&app, "/contenidos/s1/temporadas", json!({"id": "t1", "numero": 1})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(&app, "/contenidos/s1/temporadas", json!({"numero": 1})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, episode) = post(
        &app,
        "/contenidos/s1/temporadas/t1/episodios",
        json!({"id": "e1", "numero": 1, "titulo": "Bienvenidos al Playground"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(episode["idTemporada"], "t1");

    let (status, series) = get(&app, "/series/s1").await;
    assert_eq!(status, StatusCode::OK);
    let seasons = series["temporadas"].as_array().unwrap();
    assert_eq!(seasons.len(), 2);
    assert_eq!(seasons[0]["numero"], 1);
    assert_eq!(seasons[0]["episodios"][0]["titulo"], "Bienvenidos al Playground");
    assert_eq!(seasons[1]["id"], "t2");

    let (status, listed) = get(&app, "/series").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = put(&app, "/contenidos/s1/temporadas/t1/episodios/e1", json!({"titulo": "Piloto"})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, episode) = get(&app, "/contenidos/s1/temporadas/t1/episodios/e1").await;
    assert_eq!(episode["titulo"], "Piloto");
    assert_eq!(episode["numero"], 1);
}

#[tokio::test]
async fn seasons_are_only_for_series() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, body) = post(&app, "/contenidos/m1/temporadas", json!({"numero": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Solo las series tienen temporadas");
}

#[tokio::test]
async fn list_series_is_not_found_when_there_are_none() {
    let (app, _db) = content_app().await;
    let (status, _) = get(&app, "/series").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_content_cascades_to_seasons_and_episodes() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;
    post(&app, "/contenidos/s1/temporadas", json!({"id": "t1", "numero": 1})).await;
    post(&app, "/contenidos/s1/temporadas/t1/episodios", json!({"id": "e1", "numero": 1, "titulo": "Uno"}))
        .await;

    let (status, body) = delete(&app, "/contenidos/s1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Contenido eliminado exitosamente");

    let (status, _) = get(&app, "/contenidos/s1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/contenidos/s1/temporadas/t1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/contenidos/s1/temporadas/t1/episodios/e1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_dispatches_on_the_deepest_id() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;
    post(&app, "/contenidos/s1/temporadas", json!({"id": "t1", "numero": 1})).await;
    post(&app, "/contenidos/s1/temporadas/t1/episodios", json!({"id": "e1", "numero": 1, "titulo": "Uno"}))
        .await;
    post(&app, "/contenidos/s1/temporadas/t1/episodios", json!({"id": "e2", "numero": 2, "titulo": "Dos"}))
        .await;

    let (status, body) = delete(&app, "/contenidos/s1/temporadas/t1/episodios/e1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Episodio eliminado exitosamente");
    let (_, season) = get(&app, "/contenidos/s1/temporadas/t1").await;
    assert_eq!(season["episodios"].as_array().unwrap().len(), 1);

    let (status, body) = delete(&app, "/contenidos/s1/temporadas/t1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Temporada eliminada exitosamente");
    let (status, _) = get(&app, "/contenidos/s1/temporadas/t1/episodios/e2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, series) = get(&app, "/series/s1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(series["temporadas"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn genres_in_use_cannot_be_deleted() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, _) = delete(&app, "/generos/g1").await;
    assert_eq!(status, StatusCode::CONFLICT);

    post(&app, "/generos", json!({"id": "g2", "nombre": "Documental"})).await;
    let (status, _) = get(&app, "/generos/g2/contenidos").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = delete(&app, "/generos/g2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Género eliminado exitosamente");

    let (status, contents) = get(&app, "/generos/g1/contenidos").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> =
        contents.as_array().unwrap().iter().map(|c| c["titulo"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Arcane", "Dune"]);
}

#[tokio::test]
async fn deleting_a_director_unlinks_their_content() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, _) = delete(&app, "/directores/d1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, movie) = get(&app, "/contenidos/m1").await;
    assert_eq!(movie["idDirector"], Value::Null);
}

#[tokio::test]
async fn search_by_title_and_by_actor() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;
    post(&app, "/actores", json!({"id": "a1", "nombre": "Zendaya"})).await;
    post(&app, "/actores", json!({"id": "a2", "nombre": "Timothée Chalamet"})).await;
    let (status, _) = post(&app, "/contenidos/m1/reparto/a1", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    post(&app, "/contenidos/m1/reparto/a2", json!({})).await;

    let (status, body) = get(&app, "/contenidos/dun/buscar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resultados"].as_array().unwrap().len(), 1);
    assert_eq!(body["resultados"][0]["id"], "m1");

    let (status, body) = get(&app, "/contenidos/Zendaya/actores").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resultados"][0]["titulo"], "Dune");

    let (status, body) = get(&app, "/contenidos/nadie/actores").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["resultados"].as_array().unwrap().is_empty());

    let (_, cast) = get(&app, "/contenidos/m1/reparto").await;
    let names: Vec<&str> = cast.as_array().unwrap().iter().map(|a| a["nombre"].as_str().unwrap()).collect();
    assert_eq!(names, ["Timothée Chalamet", "Zendaya"]);

    let (status, _) = delete(&app, "/contenidos/m1/reparto/a1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, cast) = get(&app, "/contenidos/m1/reparto").await;
    assert_eq!(cast.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_treats_like_wildcards_as_text() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;
    post(&app, "/actores", json!({"id": "a1", "nombre": "Zendaya"})).await;
    post(&app, "/contenidos/m1/reparto/a1", json!({})).await;

    for uri in [
        "/contenidos/%25/buscar",
        "/contenidos/Dun_/buscar",
        "/contenidos/%25/actores",
        "/contenidos/Z_ndaya/actores",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body["resultados"].as_array().unwrap().is_empty(), "{uri}");
    }

    let (status, _) = post(
        &app,
        "/peliculas",
        json!({"id": "m9", "titulo": "100% Wolf", "fechaLanzamiento": "2020-06-26", "idGenero": "g1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/contenidos/0%25%20W/buscar").await;
    assert_eq!(body["resultados"].as_array().unwrap().len(), 1);
    assert_eq!(body["resultados"][0]["id"], "m9");
}

#[tokio::test]
async fn language_labels_with_commas_are_rejected() {
    let (app, _db) = content_app().await;

    let (status, _) =
        post(&app, "/doblajes", json!({"id": "dub1", "idiomas": ["es", "Español, MX"]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/doblajes/dub1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    post(&app, "/doblajes", json!({"id": "dub1", "idiomas": ["es"]})).await;
    let (status, _) = put(&app, "/doblajes/dub1", json!({"idiomas": ["en, US"]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, set) = get(&app, "/doblajes/dub1").await;
    assert_eq!(set["idiomas"], json!(["es"]));
}

#[tokio::test]
async fn subtitle_sets_can_be_assigned_to_content() {
    let (app, _db) = content_app().await;
    seed_catalog(&app).await;

    let (status, set) = post(&app, "/subtitulos", json!({"id": "sub1", "idiomas": ["es", "en"]})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(set["idiomas"], json!(["es", "en"]));

    let (status, _) = get(&app, "/contenidos/m1/subtitulos").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, movie) = post(&app, "/contenidos/m1/subtitulos/sub1", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movie["idSubtitulosContenido"], "sub1");

    let (status, set) = get(&app, "/contenidos/m1/subtitulos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(set["idiomas"], json!(["es", "en"]));

    let (status, _) = put(&app, "/subtitulos/sub1", json!({"idiomas": ["fr"]})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, set) = get(&app, "/subtitulos/sub1").await;
    assert_eq!(set["idiomas"], json!(["fr"]));

    let (status, _) = delete(&app, "/subtitulos/sub1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, movie) = get(&app, "/contenidos/m1").await;
    assert_eq!(movie["idSubtitulosContenido"], Value::Null);
}
