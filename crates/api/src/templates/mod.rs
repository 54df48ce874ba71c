//! Server-rendered HTML pages.
//!
//! Every page is a plain `String` built from the fragments in this module and
//! wrapped in [`layout`]. All user-supplied text goes through [`html_escape`].

pub mod auth;
pub mod errors;
pub mod posts;

use quill_core::forms::FormErrors;
use quill_core::pagination::Page;
use quill_core::types::DbId;

use crate::middleware::auth::AuthUser;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escaped multi-line text with line breaks kept.
pub fn text_block(s: &str) -> String {
    html_escape(s).replace('\n', "<br>")
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

pub fn profile_url(username: &str) -> String {
    format!("/{}/", urlencoding::encode(username))
}

pub fn post_url(username: &str, post_id: DbId) -> String {
    format!("/{}/{post_id}/", urlencoding::encode(username))
}

pub fn group_url(slug: &str) -> String {
    format!("/group/{slug}/")
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Wrap page content in the shared document and navigation bar.
pub fn layout(title: &str, viewer: Option<&AuthUser>, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
{nav}
<main class="container">
{content}
</main>
<footer class="footer"><p>&copy; Quill</p></footer>
</body>
</html>"#,
        title = html_escape(title),
        nav = nav(viewer),
    )
}

fn nav(viewer: Option<&AuthUser>) -> String {
    let links = match viewer {
        Some(user) => format!(
            r#"<li><a href="/new/">Новая запись</a></li>
<li><a href="/follow/">Избранные авторы</a></li>
<li><a href="{profile}">{name}</a></li>
<li><a href="/auth/logout/">Выйти</a></li>"#,
            profile = profile_url(&user.username),
            name = html_escape(&user.username),
        ),
        None => r#"<li><a href="/auth/login/">Войти</a></li>
<li><a href="/auth/signup/">Регистрация</a></li>"#
            .to_string(),
    };
    format!(
        r#"<nav class="navbar">
<a class="navbar-brand" href="/">Quill</a>
<ul class="navbar-nav">
{links}
</ul>
</nav>"#
    )
}

// ---------------------------------------------------------------------------
// Shared fragments
// ---------------------------------------------------------------------------

/// Page links; empty when everything fits on one page.
pub fn paginator(page: &Page) -> String {
    if !page.has_other_pages() {
        return String::new();
    }

    let mut items = Vec::new();
    if let Some(prev) = page.previous_page_number() {
        items.push(r#"<li><a href="?page=1">&laquo; Первая</a></li>"#.to_string());
        items.push(format!(r#"<li><a href="?page={prev}">Назад</a></li>"#));
    }
    for n in 1..=page.num_pages {
        if n == page.number {
            items.push(format!(r#"<li class="active"><span>{n}</span></li>"#));
        } else if (n - page.number).abs() <= 3 {
            items.push(format!(r#"<li><a href="?page={n}">{n}</a></li>"#));
        }
    }
    if let Some(next) = page.next_page_number() {
        items.push(format!(r#"<li><a href="?page={next}">Вперёд</a></li>"#));
        items.push(format!(
            r#"<li><a href="?page={last}">Последняя &raquo;</a></li>"#,
            last = page.num_pages
        ));
    }

    format!(
        "<ul class=\"pagination\">\n{}\n</ul>",
        items.join("\n")
    )
}

/// Messages recorded for one field, as an error list.
pub fn field_errors(errors: &FormErrors, field: &str) -> String {
    let messages = errors.field(field);
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", html_escape(m)))
        .collect();
    format!(r#"<ul class="errorlist">{items}</ul>"#)
}
