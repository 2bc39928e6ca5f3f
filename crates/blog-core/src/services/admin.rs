//! Content management: post CRUD, search, date hierarchy and author lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostOrder, PostQuery, PostStatus, PostUpdate, User, slug};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, Paginator};
use crate::ports::{PostRepository, UserRepository};

/// Page size of the admin listing when none is configured.
pub const DEFAULT_ADMIN_PAGE_SIZE: u64 = 100;

/// Upper bound on author lookup results.
pub const MAX_AUTHOR_LOOKUP: u64 = 50;

/// Level of a date hierarchy bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateLevel {
    Year,
    Month,
    Day,
}

/// Number of matching posts published in one year, month or day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBucket {
    pub level: DateLevel,
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub count: u64,
}

#[derive(Clone)]
pub struct AdminService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    page_size: u64,
}

impl AdminService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        page_size: u64,
    ) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_ADMIN_PAGE_SIZE
        } else {
            page_size
        };
        Self {
            posts,
            users,
            page_size,
        }
    }

    /// Slug suggested for a title.
    pub fn suggest_slug(title: &str) -> String {
        slug::slugify(title)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    pub async fn create_post(&self, new: NewPost) -> Result<Post, DomainError> {
        let post = Post::new(new);
        post.validate()?;
        self.ensure_author(post.author_id).await?;
        self.ensure_slug_free(&post.slug, None).await?;

        let saved = self.posts.insert(post).await.map_err(slug_conflict)?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, status = %saved.status, "Post created");
        Ok(saved)
    }

    pub async fn update_post(&self, id: Uuid, update: PostUpdate) -> Result<Post, DomainError> {
        let mut post = self.get_post(id).await?;
        let author_changed = update.author_id.is_some_and(|a| a != post.author_id);

        post.apply(update);
        post.validate()?;
        if author_changed {
            self.ensure_author(post.author_id).await?;
        }
        self.ensure_slug_free(&post.slug, Some(id)).await?;

        let saved = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", id),
            other => slug_conflict(other),
        })?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, status = %saved.status, "Post updated");
        Ok(saved)
    }

    /// Inline status edit from the listing.
    pub async fn set_status(&self, id: Uuid, status: PostStatus) -> Result<Post, DomainError> {
        self.update_post(
            id,
            PostUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Irreversibly delete a post.
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", id),
            other => other.into(),
        })?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Filtered, searched and paginated listing over posts of any status.
    pub async fn search_posts(
        &self,
        query: &PostQuery,
        page_token: Option<&str>,
    ) -> Result<Page<Post>, DomainError> {
        let mut query = query.clone();
        query.order.get_or_insert(PostOrder::StatusThenPublish);

        let posts = self.posts.search(&query).await?;
        let paginator = Paginator::new(posts.len() as u64, self.page_size);
        Ok(paginator.paginate(&posts, page_token))
    }

    /// Publish-date drill-down: years, then the months of `query.year`,
    /// then the days of `query.month`.
    pub async fn date_hierarchy(&self, query: &PostQuery) -> Result<Vec<DateBucket>, DomainError> {
        let level = match (query.year, query.month) {
            (Some(_), Some(_)) => DateLevel::Day,
            (Some(_), None) => DateLevel::Month,
            _ => DateLevel::Year,
        };
        let mut scoped = query.clone();
        scoped.day = None;
        if level == DateLevel::Year {
            scoped.month = None;
        }

        let mut counts: BTreeMap<(i32, Option<u32>, Option<u32>), u64> = BTreeMap::new();
        for post in self.posts.search(&scoped).await? {
            let date = post.publish_date();
            let key = match level {
                DateLevel::Year => (date.year(), None, None),
                DateLevel::Month => (date.year(), Some(date.month()), None),
                DateLevel::Day => (date.year(), Some(date.month()), Some(date.day())),
            };
            *counts.entry(key).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|((year, month, day), count)| DateBucket {
                level,
                year,
                month,
                day,
                count,
            })
            .collect())
    }

    /// Searchable author lookup for the author field.
    pub async fn lookup_authors(&self, term: &str, limit: u64) -> Result<Vec<User>, DomainError> {
        let limit = limit.clamp(1, MAX_AUTHOR_LOOKUP);
        Ok(self.users.search(term.trim(), limit).await?)
    }

    pub async fn create_user(&self, username: String, email: String) -> Result<User, DomainError> {
        let user = User::new(username, email);
        user.validate()?;
        if self.users.find_by_username(&user.username).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        let saved = self.users.insert(user).await?;
        tracing::info!(user_id = %saved.id, "Author created");
        Ok(saved)
    }

    /// Delete an author together with every post they wrote.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        self.users.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("User", id),
            other => other.into(),
        })?;
        tracing::info!(user_id = %id, "Author deleted with their posts");
        Ok(())
    }

    async fn ensure_author(&self, author_id: Uuid) -> Result<(), DomainError> {
        match self.users.find_by_id(author_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::Validation(format!(
                "Author {author_id} does not exist"
            ))),
        }
    }

    async fn ensure_slug_free(&self, slug: &str, owner: Option<Uuid>) -> Result<(), DomainError> {
        match self.posts.find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Duplicate(format!(
                "A post with slug '{slug}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}

fn slug_conflict(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => {
            DomainError::Duplicate("A post with this slug already exists".to_string())
        }
        other => other.into(),
    }
}
