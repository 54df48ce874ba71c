//! Signup and login pages.

use quill_core::forms::FormErrors;

use super::{field_errors, html_escape, layout};

/// Values echoed back into the signup form after a failed submission.
#[derive(Debug, Default)]
pub struct SignupValues<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
}

fn input(name: &str, label: &str, kind: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        r#"<div class="form-group">
<label for="id_{name}">{label}</label>
{errors}
<input type="{kind}" name="{name}" id="id_{name}" value="{value}">
</div>"#,
        errors = field_errors(errors, name),
        value = html_escape(value),
    )
}

pub fn signup_page(values: &SignupValues<'_>, errors: &FormErrors) -> String {
    let content = format!(
        r#"<h1>Зарегистрироваться</h1>
<form method="post" action="/auth/signup/" class="auth-form">
{non_field}
{first_name}
{last_name}
{username}
{email}
{password}
<button type="submit" class="btn btn-primary">Зарегистрироваться</button>
</form>"#,
        non_field = field_errors(errors, FormErrors::NON_FIELD),
        first_name = input("first_name", "Имя", "text", values.first_name, errors),
        last_name = input("last_name", "Фамилия", "text", values.last_name, errors),
        username = input("username", "Имя пользователя", "text", values.username, errors),
        email = input("email", "Адрес электронной почты", "email", values.email, errors),
        password = input("password", "Пароль", "password", "", errors),
    );
    layout("Зарегистрироваться", None, &content)
}

/// `next` is carried through a hidden field to the post-login redirect.
pub fn login_page(username: &str, next: Option<&str>, errors: &FormErrors) -> String {
    let next_field = match next {
        Some(next) => format!(
            r#"<input type="hidden" name="next" value="{}">"#,
            html_escape(next)
        ),
        None => String::new(),
    };
    let content = format!(
        r#"<h1>Войти на сайт</h1>
<form method="post" action="/auth/login/" class="auth-form">
{non_field}
{next_field}
{username}
{password}
<button type="submit" class="btn btn-primary">Войти</button>
</form>
<p><a href="/auth/signup/">Регистрация</a></p>"#,
        non_field = field_errors(errors, FormErrors::NON_FIELD),
        username = input("username", "Имя пользователя", "text", username, errors),
        password = input("password", "Пароль", "password", "", errors),
    );
    layout("Войти", None, &content)
}

#[cfg(test)]
mod tests {
    use quill_core::forms::MSG_BAD_CREDENTIALS;

    use super::*;

    #[test]
    fn login_keeps_next_and_username() {
        let mut errors = FormErrors::new();
        errors.add(FormErrors::NON_FIELD, MSG_BAD_CREDENTIALS);
        let html = login_page("leo\"", Some("/new/"), &errors);
        assert!(html.contains(r#"name="next" value="/new/""#));
        assert!(html.contains(r#"value="leo&quot;""#));
        assert!(html.contains(MSG_BAD_CREDENTIALS));
    }

    #[test]
    fn signup_never_echoes_password() {
        let html = signup_page(&SignupValues::default(), &FormErrors::new());
        assert!(html.contains(r#"<input type="password" name="password" id="id_password" value="">"#));
    }
}
