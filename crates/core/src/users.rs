//! Username rules and author display names.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

pub const MAX_USERNAME_LENGTH: usize = 150;

/// Usernames that would shadow a fixed top-level route (`/new/`, `/follow/`, ...).
pub const RESERVED_USERNAMES: &[&str] = &["admin", "auth", "follow", "group", "health", "media", "new"];

pub const MSG_INVALID_USERNAME: &str = "Введите правильное имя пользователя. Оно может содержать \
     только буквы, цифры и знаки @/./+/-/_.";
pub const MSG_RESERVED_USERNAME: &str = "Это имя пользователя недоступно.";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid regex"));

/// `validator` rule for the signup username field.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty()
        || username.chars().count() > MAX_USERNAME_LENGTH
        || !USERNAME_RE.is_match(username)
    {
        return Err(ValidationError::new("username")
            .with_message(Cow::Borrowed(MSG_INVALID_USERNAME)));
    }
    if RESERVED_USERNAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(username))
    {
        return Err(ValidationError::new("reserved")
            .with_message(Cow::Borrowed(MSG_RESERVED_USERNAME)));
    }
    Ok(())
}

/// Full name when the user filled one in, otherwise the username.
pub fn display_name(first_name: &str, last_name: &str, username: &str) -> String {
    let full = format!("{} {}", first_name.trim(), last_name.trim());
    let full = full.trim();
    if full.is_empty() {
        username.to_string()
    } else {
        full.to_string()
    }
}
