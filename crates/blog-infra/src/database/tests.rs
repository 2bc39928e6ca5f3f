use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use blog_core::domain::{NewPost, Post, PostOrder, PostQuery, PostStatus};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

use crate::database::entity::post;
use crate::database::postgres_repo::{PostgresPostRepository, like_pattern};

fn row(slug: &str, status: post::Status, day: u32) -> post::Model {
    let publish = Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap();
    post::Model {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        title: format!("Post {slug}"),
        slug: slug.to_owned(),
        body: "Content".to_owned(),
        publish: publish.into(),
        created_at: publish.into(),
        updated_at: publish.into(),
        status,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = row("hello", post::Status::Draft, 1);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.slug, "hello");
    assert_eq!(post.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_find_published_maps_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row("b", post::Status::Published, 2)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

    let post = repo.find_published("b", date).await.unwrap().unwrap();
    assert!(post.is_published());
    assert_eq!(post.publish_date(), date);
}

#[tokio::test]
async fn test_find_published_without_match_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

    assert!(repo.find_published("missing", date).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_published_slice_keeps_storage_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            row("b", post::Status::Published, 2),
            row("a", post::Status::Published, 1),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo
        .list_published_slice(PostOrder::PublishDesc, 0, 2)
        .await
        .unwrap();
    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["b", "a"]);
}

#[tokio::test]
async fn test_insert_returns_stored_row() {
    let stored = row("fresh", post::Status::Draft, 3);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = Post::new(NewPost {
        author_id: stored.author_id,
        title: stored.title.clone(),
        slug: stored.slug.clone(),
        ..Default::default()
    });

    let saved = repo.insert(post).await.unwrap();
    assert_eq!(saved.slug, "fresh");
    assert_eq!(saved.id, stored.id);
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let err = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}

#[test]
fn test_like_pattern_takes_wildcards_literally() {
    assert_eq!(like_pattern("Rust"), "%rust%");
    assert_eq!(like_pattern("100%_off"), r"%100\%\_off%");
    assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
}

#[tokio::test]
async fn test_search_escapes_like_wildcards() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection(),
    );
    let repo = PostgresPostRepository::new(Arc::clone(&db));

    let query = PostQuery {
        search: Some("100%_Off".to_owned()),
        ..Default::default()
    };
    assert!(repo.search(&query).await.unwrap().is_empty());
    drop(repo);

    let db = Arc::try_unwrap(db).ok().unwrap();
    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("ESCAPE"));
    assert!(log.contains(r"%100\\%\\_off%"));
}
