//! Public read paths and admin operations over the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use blog_core::domain::{DateRange, NewPost, Post, PostQuery, PostStatus, PostUpdate, User};
use blog_core::ports::{BaseRepository, UserRepository};
use blog_core::services::{AdminService, BlogService, DateLevel};
use blog_core::{DomainError, RepoError};
use blog_infra::{InMemoryStore, InMemoryUserRepository};

struct Fixture {
    blog: BlogService,
    admin: AdminService,
    author: User,
}

async fn fixture(page_size: u64) -> Fixture {
    let store = InMemoryStore::new();
    let posts = Arc::new(store.posts());
    let users = Arc::new(store.users());
    let admin = AdminService::new(posts.clone(), users, 100);
    let author = admin
        .create_user("ann".into(), "ann@example.com".into())
        .await
        .unwrap();
    Fixture {
        blog: BlogService::new(posts, page_size),
        admin,
        author,
    }
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
}

impl Fixture {
    async fn add(&self, slug: &str, status: PostStatus, publish: DateTime<Utc>) -> Post {
        self.admin
            .create_post(NewPost {
                author_id: self.author.id,
                title: format!("Title {slug}"),
                slug: slug.to_string(),
                body: format!("Body of {slug}"),
                publish: Some(publish),
                status: Some(status),
            })
            .await
            .unwrap()
    }

    async fn page_slugs(&self, token: Option<&str>) -> Vec<String> {
        let page = self.blog.list_posts(token).await.unwrap();
        page.items.into_iter().map(|p| p.slug).collect()
    }
}

#[tokio::test]
async fn two_posts_one_per_page() {
    let f = fixture(1).await;
    f.add("a", PostStatus::Published, at(2024, 1, 1)).await;
    f.add("b", PostStatus::Published, at(2024, 1, 2)).await;

    let first = f.blog.list_posts(None).await.unwrap();
    assert_eq!(first.num_pages, 2);
    assert_eq!(first.number, 1);
    assert_eq!(f.page_slugs(Some("1")).await, ["b"]);
    assert_eq!(f.page_slugs(Some("2")).await, ["a"]);
}

#[tokio::test]
async fn list_only_shows_published_newest_first() {
    let f = fixture(10).await;
    f.add("old", PostStatus::Published, at(2023, 5, 1)).await;
    f.add("draft", PostStatus::Draft, at(2024, 6, 1)).await;
    f.add("new", PostStatus::Published, at(2024, 2, 1)).await;

    let page = f.blog.list_posts(None).await.unwrap();
    assert_eq!(page.count, 2);
    assert!(page.items.iter().all(Post::is_published));
    assert!(page.items.windows(2).all(|w| w[0].publish >= w[1].publish));
}

#[tokio::test]
async fn pages_cover_every_published_post_once() {
    let f = fixture(3).await;
    for day in 1..=8 {
        f.add(&format!("p{day}"), PostStatus::Published, at(2024, 3, day)).await;
    }
    f.add("hidden", PostStatus::Draft, at(2024, 3, 9)).await;

    let first = f.blog.list_posts(None).await.unwrap();
    assert_eq!(first.num_pages, 3);

    let mut all = Vec::new();
    for n in 1..=first.num_pages {
        all.extend(f.page_slugs(Some(&n.to_string())).await);
    }
    let expected: Vec<String> = (1..=8).rev().map(|d| format!("p{d}")).collect();
    assert_eq!(all, expected);
}

#[tokio::test]
async fn bad_page_tokens_fall_back_to_last_page() {
    let f = fixture(2).await;
    for day in 1..=5 {
        f.add(&format!("p{day}"), PostStatus::Published, at(2024, 4, day)).await;
    }

    let last = f.page_slugs(Some("3")).await;
    assert_eq!(last, ["p1"]);
    assert_eq!(f.page_slugs(Some("abc")).await, last);
    assert_eq!(f.page_slugs(Some("9999")).await, last);
    assert_eq!(f.page_slugs(Some("0")).await, last);
    assert_eq!(f.page_slugs(Some("")).await, last);
    assert_eq!(f.page_slugs(None).await, ["p5", "p4"]);
}

#[tokio::test]
async fn empty_blog_lists_one_empty_page() {
    let f = fixture(3).await;
    let page = f.blog.list_posts(Some("abc")).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.num_pages, 1);
}

#[tokio::test]
async fn detail_finds_published_post_by_date_and_slug() {
    let f = fixture(3).await;
    let post = f.add("hello", PostStatus::Published, at(2024, 1, 2)).await;

    let found = f.blog.post_detail(2024, 1, 2, "hello").await.unwrap();
    assert_eq!(found.id, post.id);
}

#[tokio::test]
async fn detail_misses_are_uniform() {
    let f = fixture(3).await;
    f.add("live", PostStatus::Published, at(2024, 1, 2)).await;
    f.add("draft", PostStatus::Draft, at(2024, 1, 2)).await;

    let misses = [
        f.blog.post_detail(2024, 1, 2, "draft").await,
        f.blog.post_detail(2024, 1, 3, "live").await,
        f.blog.post_detail(2024, 1, 2, "nope").await,
        f.blog.post_detail(2024, 13, 2, "live").await,
        f.blog.post_detail(2024, 1, 2, "not a slug").await,
    ];
    for miss in misses {
        assert!(matches!(
            miss,
            Err(DomainError::NotFound {
                entity_type: "Post",
                ..
            })
        ));
    }
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let f = fixture(3).await;
    f.add("same", PostStatus::Draft, at(2024, 1, 1)).await;

    let err = f
        .admin
        .create_post(NewPost {
            author_id: f.author.id,
            title: "Another".into(),
            slug: "same".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn create_suggests_slug_and_requires_author() {
    let f = fixture(3).await;
    let post = f
        .admin
        .create_post(NewPost {
            author_id: f.author.id,
            title: "Hello, Rust World!".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(post.slug, "hello-rust-world");
    assert_eq!(post.status, PostStatus::Draft);

    let err = f
        .admin
        .create_post(NewPost {
            author_id: Uuid::new_v4(),
            title: "Orphan".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn publishing_a_draft_makes_it_visible() {
    let f = fixture(3).await;
    let draft = f.add("soon", PostStatus::Draft, at(2024, 7, 7)).await;
    assert!(f.blog.post_detail(2024, 7, 7, "soon").await.is_err());

    let published = f
        .admin
        .set_status(draft.id, PostStatus::Published)
        .await
        .unwrap();
    assert_eq!(published.created_at, draft.created_at);
    assert!(published.updated_at >= draft.updated_at);
    assert!(f.blog.post_detail(2024, 7, 7, "soon").await.is_ok());

    f.admin
        .set_status(draft.id, PostStatus::Draft)
        .await
        .unwrap();
    assert!(f.blog.post_detail(2024, 7, 7, "soon").await.is_err());
}

#[tokio::test]
async fn update_to_taken_slug_conflicts() {
    let f = fixture(3).await;
    f.add("first", PostStatus::Draft, at(2024, 1, 1)).await;
    let second = f.add("second", PostStatus::Draft, at(2024, 1, 2)).await;

    let err = f
        .admin
        .update_post(
            second.id,
            PostUpdate {
                slug: Some("first".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    let kept = f
        .admin
        .update_post(
            second.id,
            PostUpdate {
                slug: Some("second".into()),
                body: Some("new body".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(kept.body, "new body");
}

#[tokio::test]
async fn delete_is_irreversible() {
    let f = fixture(3).await;
    let post = f.add("gone", PostStatus::Published, at(2024, 1, 1)).await;

    f.admin.delete_post(post.id).await.unwrap();
    assert!(f.blog.post_detail(2024, 1, 1, "gone").await.is_err());
    assert!(matches!(
        f.admin.delete_post(post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn deleting_author_removes_their_posts() {
    let f = fixture(3).await;
    f.add("mine", PostStatus::Published, at(2024, 1, 1)).await;

    f.admin.delete_user(f.author.id).await.unwrap();
    let page = f.blog.list_posts(None).await.unwrap();
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn admin_search_filters_and_orders_drafts_first() {
    let f = fixture(3).await;
    f.add("rust-news", PostStatus::Published, at(2024, 1, 1)).await;
    f.add("rust-draft", PostStatus::Draft, at(2024, 2, 1)).await;
    f.add("python", PostStatus::Published, at(2024, 3, 1)).await;

    let query = PostQuery {
        search: Some("RUST".into()),
        ..Default::default()
    };
    let page = f.admin.search_posts(&query, None).await.unwrap();
    let slugs: Vec<_> = page.items.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["rust-draft", "rust-news"]);

    let published_since_feb = PostQuery {
        status: Some(PostStatus::Published),
        publish: DateRange {
            since: Some(at(2024, 2, 1)),
            until: None,
        },
        ..Default::default()
    };
    let page = f.admin.search_posts(&published_since_feb, None).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].slug, "python");
}

#[tokio::test]
async fn date_hierarchy_drills_down() {
    let f = fixture(3).await;
    f.add("a", PostStatus::Published, at(2023, 12, 31)).await;
    f.add("b", PostStatus::Published, at(2024, 1, 5)).await;
    f.add("c", PostStatus::Draft, at(2024, 1, 5)).await;
    f.add("d", PostStatus::Published, at(2024, 2, 9)).await;

    let years = f.admin.date_hierarchy(&PostQuery::default()).await.unwrap();
    assert_eq!(years.len(), 2);
    assert_eq!((years[0].year, years[0].count), (2023, 1));
    assert_eq!((years[1].year, years[1].count), (2024, 3));
    assert!(years.iter().all(|b| b.level == DateLevel::Year));

    let months = f
        .admin
        .date_hierarchy(&PostQuery {
            year: Some(2024),
            ..Default::default()
        })
        .await
        .unwrap();
    let months: Vec<_> = months.iter().map(|b| (b.month, b.count)).collect();
    assert_eq!(months, [(Some(1), 2), (Some(2), 1)]);

    let days = f
        .admin
        .date_hierarchy(&PostQuery {
            year: Some(2024),
            month: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!((days[0].day, days[0].count), (Some(5), 2));
}

#[tokio::test]
async fn author_lookup_and_duplicate_usernames() {
    let f = fixture(3).await;
    f.admin
        .create_user("bob".into(), "bob@example.com".into())
        .await
        .unwrap();

    let found = f.admin.lookup_authors("ANN", 10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, f.author.id);

    let err = f
        .admin
        .create_user("ann".into(), "other@example.com".into())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

/// Author lookups that still see a user after it was deleted from the store.
struct StaleUsers {
    inner: InMemoryUserRepository,
    seen: User,
}

#[async_trait]
impl BaseRepository<User, Uuid> for StaleUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok((id == self.seen.id).then(|| self.seen.clone()))
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        self.inner.insert(user).await
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        self.inner.update(user).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl UserRepository for StaleUsers {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        self.inner.find_by_username(username).await
    }

    async fn search(&self, term: &str, limit: u64) -> Result<Vec<User>, RepoError> {
        self.inner.search(term, limit).await
    }
}

#[tokio::test]
async fn author_deleted_mid_create_is_not_a_slug_conflict() {
    let store = InMemoryStore::new();
    let author = store
        .users()
        .insert(User::new("gone".into(), String::new()))
        .await
        .unwrap();
    store.users().delete(author.id).await.unwrap();

    let users = StaleUsers {
        inner: store.users(),
        seen: author.clone(),
    };
    let admin = AdminService::new(Arc::new(store.posts()), Arc::new(users), 100);

    let err = admin
        .create_post(NewPost {
            author_id: author.id,
            title: "Orphan".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(msg) if msg.contains("author")));
}
