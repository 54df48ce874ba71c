//! Form payloads, their validation rules and the user-facing messages.
//!
//! Field-level rules are declared with `validator` derives. Checks that need
//! outside input (does the chosen group exist, does the upload decode as an
//! image) are added by the handler on top of [`FormErrors`], so every failure
//! ends up in the same per-field message map that the page renders.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::slug::validate_slug;
use crate::types::DbId;
use crate::users::validate_username;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const MSG_REQUIRED: &str = "Обязательное поле.";
pub const MSG_INVALID_CHOICE: &str =
    "Выберите корректный вариант. Вашего варианта нет среди допустимых значений.";
pub const MSG_INVALID_IMAGE: &str = "Загрузите правильное изображение. \
     Файл, который вы загрузили, поврежден или не является изображением.";
pub const MSG_UPLOAD_AND_CLEAR: &str =
    "Пожалуйста, загрузите файл или поставьте флажок \"Очистить\", но не то и другое одновременно.";
pub const MSG_INVALID_EMAIL: &str = "Введите правильный адрес электронной почты.";
pub const MSG_BAD_CREDENTIALS: &str = "Пожалуйста, введите правильные имя пользователя и пароль.";
pub const MSG_USERNAME_TAKEN: &str = "Пользователь с таким именем уже существует.";

pub const LABEL_POST_TEXT: &str = "Введите текст поста";
pub const LABEL_POST_GROUP: &str = "Выберите группу(при необходимости)";
pub const LABEL_POST_IMAGE: &str = "Изображение";
pub const LABEL_COMMENT_TEXT: &str = "Введите текст комментария";

// ---------------------------------------------------------------------------
// Error collection
// ---------------------------------------------------------------------------

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    /// Key for errors that belong to the form as a whole.
    pub const NON_FIELD: &'static str = "__all__";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Messages for one field; empty when the field is valid.
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, name: &str) -> bool {
        !self.field(name).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// One line listing every message, e.g. `slug: ...; title: ...`.
    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FormErrors::new();
        for (field, list) in errors.field_errors() {
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                out.add(&field, message);
            }
        }
        out
    }
}

/// Run the derived rules and collect failures as [`FormErrors`].
pub fn collect_errors<T: Validate>(form: &T) -> FormErrors {
    match form.validate() {
        Ok(()) => FormErrors::new(),
        Err(errors) => errors.into(),
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Rejects empty and whitespace-only input.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(MSG_REQUIRED)));
    }
    Ok(())
}

/// Parse an optional select value holding an id.
///
/// An empty value means "no choice". Anything else must be an integer; the
/// caller still has to check that the id exists.
pub fn parse_choice(raw: Option<&str>) -> Result<Option<DbId>, ()> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<DbId>().map(Some).map_err(|_| ()),
    }
}

/// A checkbox counts as ticked for any value other than an explicit off.
pub fn checkbox(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some(v) if !v.is_empty() && v != "0" && v != "false" && v != "off")
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Create / edit a post. The image is validated separately.
#[derive(Debug, Clone, Default, Validate)]
pub struct PostForm {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    pub group: Option<DbId>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

/// Group fields as edited from the admin API.
#[derive(Debug, Clone, Default, Validate)]
pub struct GroupForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Убедитесь, что это значение содержит не более 200 символов.")
    )]
    pub title: String,
    #[validate(
        custom(function = "validate_slug"),
        length(max = 220, message = "Убедитесь, что это значение содержит не более 220 символов.")
    )]
    pub slug: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct SignupForm {
    #[validate(length(max = 150, message = "Убедитесь, что это значение содержит не более 150 символов."))]
    pub first_name: String,
    #[validate(length(max = 150, message = "Убедитесь, что это значение содержит не более 150 символов."))]
    pub last_name: String,
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(
        custom(function = "not_blank"),
        email(message = "Введите правильный адрес электронной почты.")
    )]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "not_blank"))]
    pub username: String,
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}
