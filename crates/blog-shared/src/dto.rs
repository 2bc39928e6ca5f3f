//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// A post as rendered by the public and admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub publish: String,
    pub created_at: String,
    pub updated_at: String,
    /// `draft` or `published`.
    pub status: String,
    /// Public address: `/blog/{year}/{month}/{day}/{slug}/`.
    pub url: String,
}

/// Pager state accompanying a page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub has_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u64>,
    pub start_index: u64,
    pub end_index: u64,
}

/// A page of items plus pager metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Query string of paginated listings. The page token is kept raw.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub author_id: String,
    pub title: String,
    /// Derived from the title when omitted or blank.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub body: String,
    /// RFC 3339 timestamp; defaults to now.
    #[serde(default)]
    pub publish: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Partial update of a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub author_id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub body: Option<String>,
    pub publish: Option<String>,
    pub status: Option<String>,
}

/// Inline status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Admin listing filters. Dates are RFC 3339 timestamps or `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFilterParams {
    pub q: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub publish_since: Option<String>,
    pub publish_until: Option<String>,
    pub created_since: Option<String>,
    pub created_until: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    /// `publish_desc`, `publish_asc`, `created_desc`, `status_then_publish`
    /// or `title_asc`.
    pub order: Option<String>,
    pub page: Option<String>,
}

/// One bucket of the publish date hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateBucketResponse {
    pub level: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugParams {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugSuggestion {
    pub slug: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserLookupParams {
    pub q: Option<String>,
    pub limit: Option<u64>,
}

/// Request to create an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}
