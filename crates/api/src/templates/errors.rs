//! Error pages.

use axum::http::StatusCode;

use super::{html_escape, layout};

/// The 404 page; `path` is the address that was not found, when known.
pub fn not_found_page(path: Option<&str>) -> String {
    let detail = match path {
        Some(path) => format!(
            "<p>Страницы с адресом <code>{}</code> не существует.</p>",
            html_escape(path)
        ),
        None => "<p>Запрошенная страница не существует.</p>".to_string(),
    };
    let content = format!(
        r#"<h1>Ошибка 404</h1>
{detail}
<p><a href="/">Идите на главную</a></p>"#
    );
    layout("Страница не найдена", None, &content)
}

pub fn server_error_page() -> String {
    layout(
        "Ошибка сервера",
        None,
        "<h1>Ошибка 500</h1>\n<p>На сервере произошла ошибка. Попробуйте позже.</p>",
    )
}

/// Plain page for the remaining client errors (400, 401, 403, 409).
pub fn status_page(status: StatusCode, message: &str) -> String {
    let content = format!(
        "<h1>Ошибка {code}</h1>\n<p>{message}</p>",
        code = status.as_u16(),
        message = html_escape(message),
    );
    layout(status.canonical_reason().unwrap_or("Ошибка"), None, &content)
}
