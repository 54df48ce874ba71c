//! Integration tests for the repository layer.
//!
//! Exercises the repositories against a real database:
//! - Post listing filters (all, group, author, followed authors)
//! - Cascade and set-null delete behaviour
//! - Follow edge uniqueness and self-follow rejection
//! - In-place post updates

use assert_matches::assert_matches;
use quill_db::models::comment::CreateComment;
use quill_db::models::group::{CreateGroup, UpdateGroup};
use quill_db::models::post::{CreatePost, PostFilter, PostSearch, UpdatePost};
use quill_db::models::user::{CreateUser, User};
use quill_db::repositories::{CommentRepo, FollowRepo, GroupRepo, PostRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "not-a-real-hash".to_string(),
            is_staff: false,
        },
    )
    .await
    .expect("user creation should succeed")
}

fn new_post(author_id: i64, group_id: Option<i64>, text: &str) -> CreatePost {
    CreatePost {
        author_id,
        text: text.to_string(),
        group_id,
        image: None,
    }
}

fn new_group(slug: &str) -> CreateGroup {
    CreateGroup {
        title: format!("Group {slug}"),
        slug: slug.to_string(),
        description: "description".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let reader = new_user(&pool, "reader").await;
    let group = GroupRepo::create(&pool, &new_group("test")).await.unwrap();

    PostRepo::create(&pool, &new_post(alice.id, Some(group.id), "a1")).await.unwrap();
    PostRepo::create(&pool, &new_post(alice.id, None, "a2")).await.unwrap();
    PostRepo::create(&pool, &new_post(bob.id, Some(group.id), "b1")).await.unwrap();
    FollowRepo::get_or_create(&pool, reader.id, bob.id).await.unwrap();

    assert_eq!(PostRepo::count(&pool, PostFilter::All).await.unwrap(), 3);
    assert_eq!(PostRepo::count(&pool, PostFilter::Group(group.id)).await.unwrap(), 2);
    assert_eq!(PostRepo::count(&pool, PostFilter::Author(alice.id)).await.unwrap(), 2);
    assert_eq!(PostRepo::count(&pool, PostFilter::FollowedBy(reader.id)).await.unwrap(), 1);

    let feed = PostRepo::list(&pool, PostFilter::FollowedBy(reader.id), 10, 0)
        .await
        .unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].text, "b1");
    assert_eq!(feed[0].author_username, "bob");
    assert_eq!(feed[0].group_slug.as_deref(), Some("test"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_is_newest_first_and_paged(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    for i in 0..12 {
        PostRepo::create(&pool, &new_post(author.id, None, &format!("post {i}")))
            .await
            .unwrap();
    }

    let first = PostRepo::list(&pool, PostFilter::All, 10, 0).await.unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].text, "post 11");

    let second = PostRepo::list(&pool, PostFilter::All, 10, 10).await.unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second[1].text, "post 0");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_view_requires_matching_author(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let other = new_user(&pool, "other").await;
    let post = PostRepo::create(&pool, &new_post(author.id, None, "text")).await.unwrap();

    assert!(PostRepo::find_view(&pool, author.id, post.id).await.unwrap().is_some());
    assert!(PostRepo::find_view(&pool, other.id, post.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Updates and deletes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_keeps_row_and_pub_date(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let post = PostRepo::create(&pool, &new_post(author.id, None, "old")).await.unwrap();

    let updated = PostRepo::update(
        &pool,
        post.id,
        &UpdatePost {
            text: "new".to_string(),
            group_id: None,
            image: Some("posts/x.png".to_string()),
        },
    )
    .await
    .unwrap()
    .expect("post should exist");

    assert_eq!(updated.id, post.id);
    assert_eq!(updated.text, "new");
    assert_eq!(updated.created_at, post.created_at);
    assert_eq!(PostRepo::count(&pool, PostFilter::All).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_group_clears_post_group(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let group = GroupRepo::create(&pool, &new_group("gone")).await.unwrap();
    let post = PostRepo::create(&pool, &new_post(author.id, Some(group.id), "t")).await.unwrap();

    assert!(GroupRepo::delete(&pool, group.id).await.unwrap());

    let post = PostRepo::find_by_id(&pool, post.id).await.unwrap().expect("post survives");
    assert_eq!(post.group_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_post_cascades_to_comments(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let post = PostRepo::create(&pool, &new_post(author.id, None, "t")).await.unwrap();
    CommentRepo::create(
        &pool,
        &CreateComment {
            post_id: post.id,
            author_id: author.id,
            text: "c".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(PostRepo::delete(&pool, post.id).await.unwrap());
    let remaining: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_group_slug_violates_constraint(pool: PgPool) {
    GroupRepo::create(&pool, &new_group("dup")).await.unwrap();
    let err = GroupRepo::create(&pool, &new_group("dup")).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("uq_groups_slug"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_partial_update_and_search(pool: PgPool) {
    let group = GroupRepo::create(&pool, &new_group("cats")).await.unwrap();
    GroupRepo::create(&pool, &new_group("dogs")).await.unwrap();

    let updated = GroupRepo::update(
        &pool,
        group.id,
        &UpdateGroup {
            title: Some("Кошки".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "Кошки");
    assert_eq!(updated.slug, "cats");

    let found = GroupRepo::search(&pool, Some("Кош"), 10, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, group.id);
}

// ---------------------------------------------------------------------------
// Follows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_follow_is_unique(pool: PgPool) {
    let fan = new_user(&pool, "fan").await;
    let star = new_user(&pool, "star").await;

    assert!(FollowRepo::get_or_create(&pool, fan.id, star.id).await.unwrap());
    assert!(!FollowRepo::get_or_create(&pool, fan.id, star.id).await.unwrap());

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);

    // Direction matters.
    assert!(FollowRepo::exists(&pool, fan.id, star.id).await.unwrap());
    assert!(!FollowRepo::exists(&pool, star.id, fan.id).await.unwrap());

    let stats = UserRepo::stats(&pool, star.id).await.unwrap();
    assert_eq!(stats.followers, 1);
    assert_eq!(stats.following, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_self_follow_rejected_by_schema(pool: PgPool) {
    let user = new_user(&pool, "narcissus").await;
    let err = FollowRepo::get_or_create(&pool, user.id, user.id).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("ck_follows_not_self"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_post_search(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    PostRepo::create(&pool, &new_post(author.id, None, "about rust")).await.unwrap();
    PostRepo::create(&pool, &new_post(author.id, None, "about go")).await.unwrap();

    let rows = PostRepo::admin_search(
        &pool,
        &PostSearch {
            query: Some("RUST".to_string()),
            since: None,
            limit: 10,
            offset: 0,
        },
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].author, "author");
    assert_eq!(rows[0].group, None);
}
