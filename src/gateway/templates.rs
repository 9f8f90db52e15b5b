use maud::{DOCTYPE, Markup, html};

use super::catalog::{CatalogView, DetailView, ProfileView, SearchKind};
use crate::models::{ContentKind, ContentSummary, SubscriptionPlan};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub const NO_RESULTS: &str = "No se han encontrado resultados.";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-700 bg-gray-800 px-3 py-2 text-gray-100 focus:border-red-500 focus:outline-none focus:ring-1 focus:ring-red-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-red-600 px-4 py-2 font-semibold text-white hover:bg-red-700";

pub fn index_page() -> String {
    page(
        "Streamflix",
        html! {
            div class="min-h-screen flex items-center justify-center" {
                div class="max-w-md w-full px-6" {
                    div class="bg-gray-900 shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-red-500" { "Streamflix" }
                        p class="mt-2 text-gray-400" { "Inicia sesión para continuar." }

                        form class="mt-8 space-y-6" method="post" action="/login" {
                            div {
                                label class="block text-sm font-medium text-gray-300" for="email" { "Email" }
                                input class=(INPUT_CLASS) type="email" name="email" id="email" required;
                            }
                            div {
                                label class="block text-sm font-medium text-gray-300" for="password" { "Contraseña" }
                                input class=(INPUT_CLASS) type="password" name="password" id="password" required;
                            }
                            button class=(BUTTON_CLASS) type="submit" { "Entrar" }
                        }

                        p class="mt-6 text-sm text-gray-400" {
                            "¿No tienes cuenta? "
                            a class="text-red-400 hover:text-red-300" href="/registro_usuario" { "Regístrate" }
                        }
                    }
                }
            }
        },
    )
}

pub fn registration_page(plans: &[SubscriptionPlan]) -> String {
    page(
        "Registro · Streamflix",
        html! {
            div class="min-h-screen flex items-center justify-center" {
                div class="max-w-md w-full px-6" {
                    div class="bg-gray-900 shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-100" { "Crear cuenta" }

                        form class="mt-8 space-y-5" method="post" action="/registro" {
                            div {
                                label class="block text-sm font-medium text-gray-300" for="name" { "Nombre" }
                                input class=(INPUT_CLASS) name="name" id="name" required;
                            }
                            div {
                                label class="block text-sm font-medium text-gray-300" for="email" { "Email" }
                                input class=(INPUT_CLASS) type="email" name="email" id="email" required;
                            }
                            div {
                                label class="block text-sm font-medium text-gray-300" for="password" { "Contraseña" }
                                input class=(INPUT_CLASS) type="password" name="password" id="password" required;
                            }
                            div {
                                label class="block text-sm font-medium text-gray-300" for="language" { "Idioma" }
                                input class=(INPUT_CLASS) name="language" id="language" placeholder="es";
                            }
                            div {
                                label class="block text-sm font-medium text-gray-300" for="subscription_plan" { "Plan de suscripción" }
                                select class=(INPUT_CLASS) name="subscription_plan" id="subscription_plan" required {
                                    @for plan in plans {
                                        option value=(plan.id) {
                                            (plan.name) " · " (format!("{:.2}", plan.monthly_price)) " €/mes · "
                                            (plan.device_limit) " dispositivo(s)"
                                        }
                                    }
                                }
                            }
                            button class=(BUTTON_CLASS) type="submit" { "Registrarse" }
                        }
                    }
                }
            }
        },
    )
}

pub fn main_page(user_id: &str, view: &CatalogView) -> String {
    page(
        "Streamflix",
        html! {
            (nav(Some(user_id)))
            div class="max-w-6xl mx-auto px-6 py-8 space-y-10" {
                @if let Some(message) = &view.message {
                    div class="rounded-md border border-yellow-600 bg-yellow-900/40 px-4 py-3 text-yellow-200" { (message) }
                }
                (content_row("Recomendados para ti", &view.recommendations))
                (content_row("Tendencias", &view.trending))
                (content_row("Seguir viendo", &view.history))
                @for section in &view.genre_sections {
                    (content_row(&section.name, &section.contents))
                }
            }
        },
    )
}

pub fn detail_page(view: &DetailView) -> String {
    let content = &view.content;
    let kind = match content.kind {
        ContentKind::Movie => "Película",
        ContentKind::Series => "Serie",
    };

    page(
        &format!("{} · Streamflix", content.title),
        html! {
            (nav(None))
            div class="max-w-3xl mx-auto px-6 py-10" {
                div class="bg-gray-900 shadow rounded-lg p-8" {
                    p class="text-sm uppercase tracking-wide text-red-400" { (kind) }
                    h1 class="mt-1 text-3xl font-bold text-gray-100" { (content.title) }
                    @if let Some(description) = &content.description {
                        p class="mt-4 text-gray-300" { (description) }
                    }

                    dl class="mt-6 grid grid-cols-2 gap-4 text-sm" {
                        (field("Estreno", &format_date(&content.release_date)))
                        (field("Género", &view.genre))
                        @if let Some(director) = &view.director {
                            (field("Director", director))
                        }
                        @if let Some(rating) = content.average_rating {
                            (field("Valoración", &format!("{rating:.1}")))
                        }
                        @if let Some(minutes) = content.duration_minutes {
                            (field("Duración", &format!("{minutes} min")))
                        }
                        (field("Reparto", &joined_or_dash(&view.cast)))
                        (field("Subtítulos", &joined_or_dash(&view.subtitles)))
                        (field("Doblaje", &joined_or_dash(&view.dubbing)))
                    }
                }
            }
        },
    )
}

pub fn search_page(query: &str, kind: SearchKind, results: &[ContentSummary]) -> String {
    page(
        "Búsqueda · Streamflix",
        html! {
            (nav(None))
            div class="max-w-6xl mx-auto px-6 py-8" {
                h1 class="text-2xl font-bold text-gray-100" {
                    "Resultados para \"" (query) "\""
                    span class="ml-2 text-base font-normal text-gray-400" { "(" (kind.as_str()) ")" }
                }
                @if results.is_empty() {
                    p class="mt-6 text-gray-400" { (NO_RESULTS) }
                } @else {
                    div class="mt-6 grid gap-4 sm:grid-cols-2 lg:grid-cols-4" {
                        @for item in results {
                            (content_card(item))
                        }
                    }
                }
            }
        },
    )
}

pub fn profile_page(profile: &ProfileView) -> String {
    let user = &profile.user;
    page(
        "Perfil · Streamflix",
        html! {
            (nav(Some(&user.id)))
            div class="max-w-6xl mx-auto px-6 py-8 space-y-8" {
                div class="bg-gray-900 shadow rounded-lg p-8" {
                    h1 class="text-2xl font-bold text-gray-100" { (user.name) }
                    dl class="mt-4 grid grid-cols-2 gap-4 text-sm" {
                        (field("Email", &user.email))
                        (field("Idioma", user.language.as_deref().unwrap_or("—")))
                        (field("Plan", &user.plan_id))
                    }
                }
                (content_row("Me gusta", &profile.liked))
            }
        },
    )
}

pub fn profile_error_page(message: &str) -> String {
    page(
        "Perfil · Streamflix",
        html! {
            (nav(None))
            div class="max-w-xl mx-auto px-6 py-12" {
                div class="bg-gray-900 shadow rounded-lg p-8" {
                    h1 class="text-2xl font-bold text-gray-100" { "Perfil" }
                    p class="mt-4 text-gray-300" { (message) }
                }
            }
        },
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-gray-900 shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-100" { "Error" }
                        p class="mt-4 text-gray-300" { (message) }
                        a class="mt-6 inline-block text-red-400 hover:text-red-300" href="/" { "Volver" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="bg-gray-950 text-gray-100" { (body) }
        }
    }
    .into_string()
}

fn nav(user_id: Option<&str>) -> Markup {
    html! {
        nav class="border-b border-gray-800 bg-gray-900" {
            div class="max-w-6xl mx-auto px-6 py-4 flex items-center justify-between gap-6" {
                @match user_id {
                    Some(id) => {
                        a class="text-xl font-bold text-red-500" href=(format!("/pantalla_principal?user_id={}", urlencoding::encode(id))) { "Streamflix" }
                    }
                    None => {
                        a class="text-xl font-bold text-red-500" href="/" { "Streamflix" }
                    }
                }
                form class="flex flex-1 max-w-lg gap-2" method="get" action="/buscar" {
                    input class="flex-1 rounded-md border border-gray-700 bg-gray-800 px-3 py-1 text-sm" name="query" placeholder="Buscar…";
                    select class="rounded-md border border-gray-700 bg-gray-800 px-2 py-1 text-sm" name="tipo" {
                        option value="contenido" { "Título" }
                        option value="actor" { "Actor" }
                    }
                    button class="rounded-md bg-red-600 px-3 py-1 text-sm font-semibold" type="submit" { "Buscar" }
                }
                @if let Some(id) = user_id {
                    a class="text-sm text-gray-300 hover:text-white" href=(format!("/usuarios/{}/perfil", urlencoding::encode(id))) { "Mi perfil" }
                }
            }
        }
    }
}

fn content_row(title: &str, items: &[ContentSummary]) -> Markup {
    html! {
        section {
            h2 class="text-xl font-semibold text-gray-100" { (title) }
            @if items.is_empty() {
                p class="mt-2 text-sm text-gray-500" { "—" }
            } @else {
                div class="mt-3 flex gap-4 overflow-x-auto pb-2" {
                    @for item in items {
                        div class="w-48 shrink-0" { (content_card(item)) }
                    }
                }
            }
        }
    }
}

fn content_card(item: &ContentSummary) -> Markup {
    html! {
        a class="block rounded-lg bg-gray-900 p-4 hover:bg-gray-800" href=(format!("/detalles_pelicula/{}", urlencoding::encode(&item.id))) {
            h3 class="font-semibold text-gray-100" { (item.title) }
            @if let Some(date) = &item.release_date {
                p class="mt-1 text-xs text-gray-400" { (format_date(date)) }
            }
            @if let Some(rating) = item.average_rating {
                p class="mt-1 text-xs text-yellow-400" { "★ " (format!("{rating:.1}")) }
            }
        }
    }
}

fn field(label: &str, value: &str) -> Markup {
    html! {
        div {
            dt class="text-gray-400" { (label) }
            dd class="mt-1 text-gray-100" { (value) }
        }
    }
}

fn joined_or_dash(items: &[String]) -> String {
    if items.is_empty() { "—".to_string() } else { items.join(", ") }
}

/// `YYYY-MM-DD` shown as `DD/MM/YYYY`; anything unparseable is shown as is.
fn format_date(raw: &str) -> String {
    match raw.parse::<jiff::civil::Date>() {
        Ok(date) => date.strftime("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_render_day_first() {
        assert_eq!(format_date("2023-11-17"), "17/11/2023");
        assert_eq!(format_date("pronto"), "pronto");
    }

    #[test]
    fn search_page_shows_no_results_message() {
        let html = search_page("zzz", SearchKind::Actor, &[]);
        assert!(html.contains(NO_RESULTS));
    }

    #[test]
    fn catalog_message_is_rendered() {
        let view = CatalogView { message: Some("aviso".to_string()), ..Default::default() };
        let html = main_page("u1", &view);
        assert!(html.contains("aviso"));
        assert!(html.contains("/usuarios/u1/perfil"));
    }
}
