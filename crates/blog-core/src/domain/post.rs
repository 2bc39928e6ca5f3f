use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug;
use crate::error::DomainError;

/// Maximum length, in characters, of a post title.
pub const TITLE_MAX_LEN: usize = 300;

/// Publication status of a post. Only published posts are publicly visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    /// Two-letter code persisted in storage.
    pub fn code(self) -> &'static str {
        match self {
            PostStatus::Draft => "DF",
            PostStatus::Published => "PB",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PostStatus::Draft => "Draft",
            PostStatus::Published => "Published",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DF" => Some(PostStatus::Draft),
            "PB" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    /// Accepts the variant name, the label or the storage code, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(status) = Self::from_code(&trimmed.to_ascii_uppercase()) {
            return Ok(status);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            _ => Err(DomainError::Validation(format!("Unknown post status '{trimmed}'"))),
        }
    }
}

/// Post entity - a blog post authored by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: PostStatus,
}

/// Fields supplied when creating a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    /// Left empty to derive the slug from the title.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub publish: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<PostStatus>,
}

/// Partial update of a post. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdate {
    pub author_id: Option<Uuid>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub body: Option<String>,
    pub publish: Option<DateTime<Utc>>,
    pub status: Option<PostStatus>,
}

impl Post {
    /// Create a new post. `publish` defaults to the creation time and
    /// `status` to draft; a blank slug is derived from the title.
    pub fn new(new: NewPost) -> Self {
        let now = Utc::now();
        let slug = if new.slug.trim().is_empty() {
            slug::slugify(&new.title)
        } else {
            new.slug.trim().to_string()
        };
        Self {
            id: Uuid::new_v4(),
            author_id: new.author_id,
            title: new.title.trim().to_string(),
            slug,
            body: new.body,
            publish: new.publish.unwrap_or(now),
            created_at: now,
            updated_at: now,
            status: new.status.unwrap_or_default(),
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Calendar date (UTC) of the publish timestamp.
    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Apply a partial update. Timestamps are left to the storage layer.
    pub fn apply(&mut self, update: PostUpdate) {
        if let Some(author_id) = update.author_id {
            self.author_id = author_id;
        }
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(slug) = update.slug {
            self.slug = slug.trim().to_string();
        }
        if let Some(body) = update.body {
            self.body = body;
        }
        if let Some(publish) = update.publish {
            self.publish = publish;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }

    /// Check field-level constraints (title and slug shape).
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "Title must be at most {TITLE_MAX_LEN} characters"
            )));
        }
        slug::validate(&self.slug)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
