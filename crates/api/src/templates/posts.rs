//! Post listings, the single-post page and the post / comment forms.

use quill_core::forms::{
    FormErrors, LABEL_COMMENT_TEXT, LABEL_POST_GROUP, LABEL_POST_IMAGE, LABEL_POST_TEXT,
};
use quill_core::pagination::Page;
use quill_core::types::DbId;
use quill_db::models::comment::CommentView;
use quill_db::models::group::{Group, GroupChoice};
use quill_db::models::post::PostView;
use quill_db::models::user::{AuthorStats, User};

use super::{
    field_errors, group_url, html_escape, layout, paginator, post_url, profile_url, text_block,
};
use crate::media::media_url;
use crate::middleware::auth::AuthUser;

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

fn post_image(post: &PostView) -> String {
    match post.image.as_deref() {
        Some(path) => format!(
            r#"<img class="card-img" src="{}" alt="">"#,
            html_escape(&media_url(path))
        ),
        None => String::new(),
    }
}

fn post_group_link(post: &PostView) -> String {
    match (post.group_slug.as_deref(), post.group_title.as_deref()) {
        (Some(slug), Some(title)) => format!(
            r#"<a class="card-group" href="{}">#{}</a>"#,
            group_url(slug),
            html_escape(title)
        ),
        _ => String::new(),
    }
}

fn post_card(post: &PostView) -> String {
    format!(
        r#"<article class="card" id="post-{id}">
<p class="card-meta"><a href="{profile}"><strong>{author}</strong></a> {date}</p>
{image}
<p class="card-text">{text}</p>
<div class="card-footer">{group} <a href="{url}">Комментарии: {comments}</a></div>
</article>"#,
        id = post.id,
        profile = profile_url(&post.author_username),
        author = html_escape(&post.author_name()),
        date = post.created_at.format(DATE_FORMAT),
        image = post_image(post),
        text = text_block(&post.text),
        group = post_group_link(post),
        url = post_url(&post.author_username, post.id),
        comments = post.comment_count,
    )
}

fn post_list(page: &Page, posts: &[PostView]) -> String {
    let cards: Vec<String> = posts.iter().map(post_card).collect();
    let body = if cards.is_empty() {
        r#"<p class="empty">Записей пока нет.</p>"#.to_string()
    } else {
        cards.join("\n")
    };
    format!("{body}\n{}", paginator(page))
}

fn author_card(author: &User, stats: &AuthorStats) -> String {
    format!(
        r#"<section class="author-card">
<h2>{name}</h2>
<p class="username">@{username}</p>
<ul class="author-stats">
<li>Подписчиков: {followers}</li>
<li>Подписан: {following}</li>
<li>Записей: {posts}</li>
</ul>
</section>"#,
        name = html_escape(&author.display_name()),
        username = html_escape(&author.username),
        followers = stats.followers,
        following = stats.following,
        posts = stats.posts,
    )
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

pub fn index_page(viewer: Option<&AuthUser>, page: &Page, posts: &[PostView]) -> String {
    let content = format!(
        "<h1>Последние обновления на сайте</h1>\n{}",
        post_list(page, posts)
    );
    layout("Последние обновления на сайте", viewer, &content)
}

pub fn group_page(
    viewer: Option<&AuthUser>,
    group: &Group,
    page: &Page,
    posts: &[PostView],
) -> String {
    let content = format!(
        r#"<h1>{title}</h1>
<p class="group-description">{description}</p>
{list}"#,
        title = html_escape(&group.title),
        description = text_block(&group.description),
        list = post_list(page, posts),
    );
    layout(&format!("Записи сообщества {}", group.title), viewer, &content)
}

pub fn follow_page(viewer: Option<&AuthUser>, page: &Page, posts: &[PostView]) -> String {
    let content = format!("<h1>Избранные авторы</h1>\n{}", post_list(page, posts));
    layout("Избранные авторы", viewer, &content)
}

/// `following` is `None` when no follow button applies (anonymous or own profile).
pub fn profile_page(
    viewer: Option<&AuthUser>,
    author: &User,
    stats: &AuthorStats,
    following: Option<bool>,
    page: &Page,
    posts: &[PostView],
) -> String {
    let button = match following {
        Some(true) => format!(
            r#"<form method="post" action="/{}/unfollow/"><button type="submit" class="btn">Отписаться</button></form>"#,
            urlencoding::encode(&author.username)
        ),
        Some(false) => format!(
            r#"<form method="post" action="/{}/follow/"><button type="submit" class="btn btn-primary">Подписаться</button></form>"#,
            urlencoding::encode(&author.username)
        ),
        None => String::new(),
    };
    let content = format!(
        "{card}\n{button}\n{list}",
        card = author_card(author, stats),
        list = post_list(page, posts),
    );
    layout(&format!("Профиль {}", author.display_name()), viewer, &content)
}

// ---------------------------------------------------------------------------
// Single post
// ---------------------------------------------------------------------------

fn comment_item(comment: &CommentView) -> String {
    format!(
        r#"<div class="comment" id="comment-{id}">
<p class="comment-meta"><a href="{profile}"><strong>{author}</strong></a> {date}</p>
<p class="comment-text">{text}</p>
</div>"#,
        id = comment.id,
        profile = profile_url(&comment.author_username),
        author = html_escape(&comment.author_name()),
        date = comment.created_at.format(DATE_FORMAT),
        text = text_block(&comment.text),
    )
}

fn comment_form(post: &PostView, text: &str, errors: &FormErrors) -> String {
    format!(
        r#"<form method="post" action="{url}comment/" class="comment-form">
<label for="id_text">{label}</label>
{errors}
<textarea name="text" id="id_text" required>{text}</textarea>
<button type="submit" class="btn btn-primary">Отправить</button>
</form>"#,
        url = post_url(&post.author_username, post.id),
        label = LABEL_COMMENT_TEXT,
        errors = field_errors(errors, "text"),
        text = html_escape(text),
    )
}

pub fn post_page(
    viewer: Option<&AuthUser>,
    author: &User,
    stats: &AuthorStats,
    post: &PostView,
    comments: &[CommentView],
) -> String {
    let edit_link = match viewer {
        Some(user) if user.user_id == post.author_id => format!(
            r#"<a class="btn" href="{}edit/">Редактировать</a>"#,
            post_url(&post.author_username, post.id)
        ),
        _ => String::new(),
    };
    let form = if viewer.is_some() {
        comment_form(post, "", &FormErrors::new())
    } else {
        String::new()
    };
    let comments: Vec<String> = comments.iter().map(comment_item).collect();

    let content = format!(
        r#"{card}
<article class="post" id="post-{id}">
<p class="card-meta">{date}</p>
{image}
<p class="card-text">{text}</p>
<div class="card-footer">{group} {edit_link}</div>
</article>
<section class="comments">
{form}
{comments}
</section>"#,
        card = author_card(author, stats),
        id = post.id,
        date = post.created_at.format(DATE_FORMAT),
        image = post_image(post),
        text = text_block(&post.text),
        group = post_group_link(post),
        comments = comments.join("\n"),
    );
    layout(&format!("Запись {}", post.author_name()), viewer, &content)
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Current values of the post form fields.
#[derive(Debug, Default)]
pub struct PostFormValues<'a> {
    pub text: &'a str,
    pub group: Option<DbId>,
    /// Image already attached to the post being edited.
    pub image: Option<&'a str>,
}

/// Create (`editing = None`) or edit form for a post.
pub fn post_form_page(
    viewer: Option<&AuthUser>,
    values: &PostFormValues<'_>,
    errors: &FormErrors,
    groups: &[GroupChoice],
    editing: Option<(&str, DbId)>,
) -> String {
    let (title, action, submit) = match editing {
        Some((username, id)) => (
            "Редактировать запись",
            format!("{}edit/", post_url(username, id)),
            "Сохранить",
        ),
        None => ("Добавить запись", "/new/".to_string(), "Добавить"),
    };

    let mut options = vec![r#"<option value="">---------</option>"#.to_string()];
    for group in groups {
        let selected = if values.group == Some(group.id) { " selected" } else { "" };
        options.push(format!(
            r#"<option value="{id}"{selected}>{title}</option>"#,
            id = group.id,
            title = html_escape(&group.title),
        ));
    }

    let current_image = match values.image {
        Some(path) => format!(
            r#"<p class="current-image">На данный момент: <a href="{url}">{path}</a>
<label><input type="checkbox" name="image-clear" id="image-clear_id"> Очистить</label></p>"#,
            url = html_escape(&media_url(path)),
            path = html_escape(path),
        ),
        None => String::new(),
    };

    let content = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}" enctype="multipart/form-data" class="post-form">
{non_field}
<div class="form-group">
<label for="id_text">{text_label}</label>
{text_errors}
<textarea name="text" id="id_text" required>{text}</textarea>
</div>
<div class="form-group">
<label for="id_group">{group_label}</label>
{group_errors}
<select name="group" id="id_group">
{options}
</select>
</div>
<div class="form-group">
<label for="id_image">{image_label}</label>
{image_errors}
{current_image}
<input type="file" name="image" id="id_image" accept="image/*">
</div>
<button type="submit" class="btn btn-primary">{submit}</button>
</form>"#,
        non_field = field_errors(errors, FormErrors::NON_FIELD),
        text_label = LABEL_POST_TEXT,
        text_errors = field_errors(errors, "text"),
        text = html_escape(values.text),
        group_label = LABEL_POST_GROUP,
        group_errors = field_errors(errors, "group"),
        options = options.join("\n"),
        image_label = LABEL_POST_IMAGE,
        image_errors = field_errors(errors, "image"),
    );
    layout(title, viewer, &content)
}

/// Standalone comment form, shown again when a submitted comment is invalid.
pub fn comment_form_page(
    viewer: Option<&AuthUser>,
    post: &PostView,
    text: &str,
    errors: &FormErrors,
) -> String {
    let content = format!(
        r#"<h1>Добавить комментарий</h1>
<p><a href="{url}">{author}: запись {id}</a></p>
{form}"#,
        url = post_url(&post.author_username, post.id),
        author = html_escape(&post.author_name()),
        id = post.id,
        form = comment_form(post, text, errors),
    );
    layout("Добавить комментарий", viewer, &content)
}
