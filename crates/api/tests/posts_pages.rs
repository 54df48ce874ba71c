//! Integration tests for post listings, the post form and the index cache.

mod common;

use axum::http::StatusCode;
use common::*;
use quill_core::forms::{
    MSG_INVALID_CHOICE, MSG_INVALID_IMAGE, MSG_REQUIRED, MSG_UPLOAD_AND_CLEAR,
};
use quill_db::models::group::CreateGroup;
use quill_db::models::post::{CreatePost, Post};
use quill_db::repositories::{GroupRepo, PostRepo};
use sqlx::PgPool;

async fn create_group(pool: &PgPool, slug: &str) -> quill_db::models::group::Group {
    GroupRepo::create(
        pool,
        &CreateGroup {
            title: format!("Группа {slug}"),
            slug: slug.to_string(),
            description: "Описание".to_string(),
        },
    )
    .await
    .unwrap()
}

async fn create_post(pool: &PgPool, author_id: i64, text: &str, group_id: Option<i64>) -> Post {
    PostRepo::create(
        pool,
        &CreatePost {
            author_id,
            text: text.to_string(),
            group_id,
            image: None,
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn anonymous_new_post_redirects_to_login(pool: PgPool) {
    let (app, _state, _media) = app(pool.clone());

    let response = get(app.clone(), "/new/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login/?next=/new/");

    let response = post_form(app, "/new/", None, &[("text", "Тест")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(count(&pool, "posts").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_pages_render_for_anonymous(pool: PgPool) {
    let (app, _state, _media) = app(pool.clone());
    let author = create_user(&pool, "leo", false).await;
    let group = create_group(&pool, "cats").await;
    let post = create_post(&pool, author.id, "Открытый пост", Some(group.id)).await;

    for uri in [
        "/".to_string(),
        "/group/cats/".to_string(),
        "/leo/".to_string(),
        format!("/leo/{}/", post.id),
    ] {
        let response = get(app.clone(), &uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        assert!(body_text(response).await.contains("Открытый пост"), "GET {uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_objects_are_not_found(pool: PgPool) {
    let (app, _state, _media) = app(pool.clone());
    let leo = create_user(&pool, "leo", false).await;
    create_user(&pool, "mia", false).await;
    let post = create_post(&pool, leo.id, "Пост", None).await;

    for uri in [
        "/group/missing/".to_string(),
        "/nobody/".to_string(),
        "/leo/abc/".to_string(),
        format!("/leo/{}/", post.id + 1000),
        format!("/mia/{}/", post.id),
    ] {
        let response = get(app.clone(), &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn valid_post_is_saved_once(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let group = create_group(&pool, "cats").await;
    let token = token_for(&state, &user);

    let response = post_form(
        app,
        "/new/",
        Some(&token),
        &[("text", "Новый пост"), ("group", &group.id.to_string())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(count(&pool, "posts").await, 1);

    let (text, author_id, group_id): (String, i64, Option<i64>) =
        sqlx::query_as("SELECT text, author_id, group_id FROM posts")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(text, "Новый пост");
    assert_eq!(author_id, user.id);
    assert_eq!(group_id, Some(group.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_text_is_trimmed(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let token = token_for(&state, &user);

    let response = post_form(app, "/new/", Some(&token), &[("text", "  Привет  \n")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (text,): (String,) = sqlx::query_as("SELECT text FROM posts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(text, "Привет");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_insert_leaves_no_image_behind(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let token = token_for(&state, &user);

    sqlx::query(
        "CREATE FUNCTION reject_post() RETURNS trigger AS $$
         BEGIN RAISE EXCEPTION 'posts are read-only'; END
         $$ LANGUAGE plpgsql",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER trg_reject_post BEFORE INSERT ON posts
         FOR EACH ROW EXECUTE FUNCTION reject_post()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let png = png_bytes();
    let response = post_multipart(
        app,
        "/new/",
        Some(&token),
        &[("text", "Не сохранится")],
        Some(("image", "a.png", &png)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let posts_dir = state.config.media_root.join("posts");
    let leftovers = std::fs::read_dir(&posts_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_with_image_shows_on_every_listing(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let group = create_group(&pool, "cats").await;
    let token = token_for(&state, &user);
    let png = png_bytes();

    let response = post_multipart(
        app.clone(),
        "/new/",
        Some(&token),
        &[("text", "Пост с картинкой"), ("group", &group.id.to_string())],
        Some(("image", "small.png", &png)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (post_id, image): (i64, Option<String>) =
        sqlx::query_as("SELECT id, image FROM posts")
            .fetch_one(&pool)
            .await
            .unwrap();
    let image = image.expect("image path should be stored");
    assert!(image.starts_with("posts/"));
    assert!(image.ends_with(".png"));
    assert!(state.config.media_root.join(&image).exists());

    for uri in [
        "/".to_string(),
        "/leo/".to_string(),
        "/group/cats/".to_string(),
        format!("/leo/{post_id}/"),
    ] {
        let body = body_text(get(app.clone(), &uri).await).await;
        assert!(body.contains("Пост с картинкой"), "GET {uri}");
        assert!(body.contains(&format!("src=\"/media/{image}\"")), "GET {uri}");
    }

    let response = get(app, &format!("/media/{image}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_image_upload_is_rejected(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let token = token_for(&state, &user);

    let response = post_multipart(
        app,
        "/new/",
        Some(&token),
        &[("text", "Текст")],
        Some(("image", "notes.txt", b"just some text")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(MSG_INVALID_IMAGE));
    assert_eq!(count(&pool, "posts").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_fields_rerender_the_form(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let token = token_for(&state, &user);

    let response = post_form(app.clone(), "/new/", Some(&token), &[("text", "   ")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(MSG_REQUIRED));

    let response = post_form(
        app,
        "/new/",
        Some(&token),
        &[("text", "Текст"), ("group", "9999")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(MSG_INVALID_CHOICE));

    assert_eq!(count(&pool, "posts").await, 0);
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn author_edits_post_in_place(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let group = create_group(&pool, "cats").await;
    let post = create_post(&pool, user.id, "Старый текст", None).await;
    let token = token_for(&state, &user);
    let uri = format!("/leo/{}/edit/", post.id);

    let response = get_as(app.clone(), &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Старый текст"));

    let response = post_form(
        app,
        &uri,
        Some(&token),
        &[("text", "Новый текст"), ("group", &group.id.to_string())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/leo/{}/", post.id));

    assert_eq!(count(&pool, "posts").await, 1);
    let updated = PostRepo::find_by_id(&pool, post.id).await.unwrap().unwrap();
    assert_eq!(updated.text, "Новый текст");
    assert_eq!(updated.group_id, Some(group.id));
    assert_eq!(updated.author_id, user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn others_cannot_edit(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let author = create_user(&pool, "leo", false).await;
    let other = create_user(&pool, "mia", false).await;
    let post = create_post(&pool, author.id, "Оригинал", None).await;
    let uri = format!("/leo/{}/edit/", post.id);
    let post_uri = format!("/leo/{}/", post.id);
    let token = token_for(&state, &other);

    let response = get_as(app.clone(), &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), post_uri);

    for token in [Some(token.as_str()), None] {
        let response = post_form(app.clone(), &uri, token, &[("text", "Взлом")]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let unchanged = PostRepo::find_by_id(&pool, post.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "Оригинал");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_keeps_image_unless_cleared(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let token = token_for(&state, &user);
    let png = png_bytes();

    post_multipart(
        app.clone(),
        "/new/",
        Some(&token),
        &[("text", "С картинкой")],
        Some(("image", "a.png", &png)),
    )
    .await;
    let (post_id, image): (i64, Option<String>) =
        sqlx::query_as("SELECT id, image FROM posts")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(image.is_some());
    let uri = format!("/leo/{post_id}/edit/");

    post_multipart(app.clone(), &uri, Some(&token), &[("text", "Правка")], None).await;
    let kept = PostRepo::find_by_id(&pool, post_id).await.unwrap().unwrap();
    assert_eq!(kept.text, "Правка");
    assert_eq!(kept.image, image);

    post_multipart(
        app,
        &uri,
        Some(&token),
        &[("text", "Без картинки"), ("image-clear", "on")],
        None,
    )
    .await;
    let cleared = PostRepo::find_by_id(&pool, post_id).await.unwrap().unwrap();
    assert_eq!(cleared.image, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_with_clear_is_rejected(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let token = token_for(&state, &user);
    let png = png_bytes();

    post_multipart(
        app.clone(),
        "/new/",
        Some(&token),
        &[("text", "С картинкой")],
        Some(("image", "a.png", &png)),
    )
    .await;
    let (post_id, image): (i64, Option<String>) =
        sqlx::query_as("SELECT id, image FROM posts")
            .fetch_one(&pool)
            .await
            .unwrap();

    let response = post_multipart(
        app,
        &format!("/leo/{post_id}/edit/"),
        Some(&token),
        &[("text", "Правка"), ("image-clear", "on")],
        Some(("image", "b.png", &png)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains(&quill_api::templates::html_escape(MSG_UPLOAD_AND_CLEAR)));

    let unchanged = PostRepo::find_by_id(&pool, post_id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "С картинкой");
    assert_eq!(unchanged.image, image);
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn group_page_lists_only_its_posts(pool: PgPool) {
    let (app, _state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let cats = create_group(&pool, "cats").await;
    let dogs = create_group(&pool, "dogs").await;
    create_post(&pool, user.id, "Про котов", Some(cats.id)).await;
    create_post(&pool, user.id, "Про собак", Some(dogs.id)).await;

    let body = body_text(get(app, "/group/cats/").await).await;
    assert!(body.contains("Про котов"));
    assert!(!body.contains("Про собак"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pagination_clamps_bad_page_numbers(pool: PgPool) {
    let (app, _state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    for i in 0..13 {
        create_post(&pool, user.id, &format!("Запись номер {i:02}"), None).await;
    }

    let first = body_text(get(app.clone(), "/leo/").await).await;
    assert!(first.contains("Запись номер 12"));
    assert!(!first.contains("Запись номер 02"));
    assert!(first.contains("?page=2"));

    let bad = body_text(get(app.clone(), "/leo/?page=abc").await).await;
    assert!(bad.contains("Запись номер 12"));

    let past_end = body_text(get(app.clone(), "/leo/?page=99").await).await;
    assert!(past_end.contains("Запись номер 00"));
    assert!(!past_end.contains("Запись номер 12"));

    let second = body_text(get(app, "/leo/?page=2").await).await;
    assert!(second.contains("Запись номер 02"));
    assert!(!second.contains("Запись номер 03"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn index_is_served_from_cache_until_cleared(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    create_post(&pool, user.id, "Первый", None).await;

    let before = body_text(get(app.clone(), "/").await).await;
    assert!(before.contains("Первый"));

    create_post(&pool, user.id, "Второй", None).await;
    let cached = body_text(get(app.clone(), "/").await).await;
    assert_eq!(cached, before);

    state.page_cache.clear();
    let fresh = body_text(get(app, "/").await).await;
    assert_ne!(fresh, before);
    assert!(fresh.contains("Второй"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn index_cache_is_per_viewer(pool: PgPool) {
    let (app, state, _media) = app(pool.clone());
    let user = create_user(&pool, "leo", false).await;
    let token = token_for(&state, &user);

    let anonymous = body_text(get(app.clone(), "/").await).await;
    assert!(anonymous.contains("/auth/login/"));

    let signed_in = body_text(get_as(app, "/", Some(&token)).await).await;
    assert!(signed_in.contains("/auth/logout/"));
}
