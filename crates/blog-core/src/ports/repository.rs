use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Post, PostOrder, PostQuery, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// `insert` assigns the creation and modification timestamps; `update`
/// refreshes the modification timestamp and never touches the creation one.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Update an existing entity. `RepoError::NotFound` if it does not exist.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Case-insensitive substring match on username or email, ordered by
    /// username.
    async fn search(&self, term: &str, limit: u64) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
///
/// Every `*_published` method only ever sees posts whose status is
/// published.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn list_published(&self, order: PostOrder) -> Result<Vec<Post>, RepoError>;

    async fn count_published(&self) -> Result<u64, RepoError>;

    /// A window of the ordered published collection.
    async fn list_published_slice(
        &self,
        order: PostOrder,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// The published post with this slug whose publish timestamp falls on
    /// `date` (UTC).
    async fn find_published(&self, slug: &str, date: NaiveDate)
    -> Result<Option<Post>, RepoError>;

    /// Any post with this slug, regardless of status.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// All posts matching `query`, in `query.order` (default publish
    /// descending).
    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;
}
