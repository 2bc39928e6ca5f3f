//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Both repositories share one set of tables so that deleting a user
//! cascades to their posts and slug uniqueness holds across writers.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{DateRange, Post, PostOrder, PostQuery, PostStatus, User};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
}

/// Shared storage behind the in-memory repositories.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: Arc::clone(&self.tables),
        }
    }
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPostRepository {
    async fn collect(
        &self,
        order: PostOrder,
        keep: impl Fn(&Post) -> bool + Send,
    ) -> Vec<Post> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| keep(*p))
            .cloned()
            .collect();
        order.sort(&mut posts);
        posts
    }
}

fn slug_taken(tables: &Tables, slug: &str, except: Uuid) -> bool {
    tables
        .posts
        .values()
        .any(|p| p.slug == slug && p.id != except)
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) || slug_taken(&tables, &post.slug, post.id) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint on slug '{}'",
                post.slug
            )));
        }
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Reference(format!(
                "author {} does not exist",
                post.author_id
            )));
        }

        let now = Utc::now();
        post.created_at = now;
        post.updated_at = now;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(created_at) = tables.posts.get(&post.id).map(|p| p.created_at) else {
            return Err(RepoError::NotFound);
        };
        if slug_taken(&tables, &post.slug, post.id) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint on slug '{}'",
                post.slug
            )));
        }
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Reference(format!(
                "author {} does not exist",
                post.author_id
            )));
        }

        post.created_at = created_at;
        post.updated_at = Utc::now().max(created_at);
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.tables.write().await.posts.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_published(&self, order: PostOrder) -> Result<Vec<Post>, RepoError> {
        Ok(self.collect(order, Post::is_published).await)
    }

    async fn count_published(&self) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().filter(|p| p.is_published()).count() as u64)
    }

    async fn list_published_slice(
        &self,
        order: PostOrder,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .collect(order, Post::is_published)
            .await
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_published(
        &self,
        slug: &str,
        date: NaiveDate,
    ) -> Result<Option<Post>, RepoError> {
        let day = DateRange::day(date);
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .find(|p| {
                p.status == PostStatus::Published && p.slug == slug && day.contains(p.publish)
            })
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .collect(PostOrder::default(), |p| p.author_id == author_id)
            .await)
    }

    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .collect(query.order.unwrap_or_default(), |p| query.matches(p))
            .await)
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, mut user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|u| u.id == user.id || u.username == user.username);
        if taken {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint on username '{}'",
                user.username
            )));
        }

        let now = Utc::now();
        user.created_at = now;
        user.updated_at = now;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, mut user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(created_at) = tables.users.get(&user.id).map(|u| u.created_at) else {
            return Err(RepoError::NotFound);
        };
        if tables
            .users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint on username '{}'",
                user.username
            )));
        }

        user.created_at = created_at;
        user.updated_at = Utc::now().max(created_at);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Deleting a user removes their posts as well.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.posts.retain(|_, post| post.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn search(&self, term: &str, limit: u64) -> Result<Vec<User>, RepoError> {
        let term = term.to_lowercase();
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| {
                u.username.to_lowercase().contains(&term) || u.email.to_lowercase().contains(&term)
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users.truncate(limit as usize);
        Ok(users)
    }
}
