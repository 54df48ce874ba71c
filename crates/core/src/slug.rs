//! Group slug generation and validation.
//!
//! Slugs are ASCII (`[-a-zA-Z0-9_]`). When an admin creates a group without
//! a slug it is derived from the title, transliterating Cyrillic so Russian
//! titles still yield a readable address.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Maximum stored slug length.
pub const MAX_SLUG_LENGTH: usize = 220;

pub const MSG_INVALID_SLUG: &str = "Значение должно состоять только из латинских букв, \
     цифр, знаков подчеркивания или дефиса.";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

/// Transliteration table for lowercase Russian letters.
fn transliterate(c: char) -> Option<&'static str> {
    let out = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sh",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(out)
}

/// Derive a slug from a free-form title.
///
/// Lowercases, transliterates Cyrillic, collapses every run of other
/// characters into a single `-`, trims dashes at both ends and truncates to
/// [`MAX_SLUG_LENGTH`].
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        let piece: Cow<'_, str> = if c.is_ascii_alphanumeric() || c == '_' {
            Cow::Owned(c.to_string())
        } else if let Some(latin) = transliterate(c) {
            Cow::Borrowed(latin)
        } else {
            pending_dash = true;
            continue;
        };
        if piece.is_empty() {
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.push_str(&piece);
    }

    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// `validator` rule for slug fields.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if !is_valid_slug(slug) {
        return Err(ValidationError::new("slug").with_message(Cow::Borrowed(MSG_INVALID_SLUG)));
    }
    Ok(())
}
