//! Public read paths: the paginated published list and the detail lookup.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{Post, PostOrder, slug};
use crate::error::DomainError;
use crate::pagination::{Page, PageResolution, Paginator};
use crate::ports::PostRepository;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u64 = 3;

/// Read-only access to published posts.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    page_size: u64,
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostRepository>, page_size: u64) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self { posts, page_size }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// One page of published posts, newest first.
    ///
    /// Malformed or out-of-range tokens fall back to the last page; only
    /// storage failures are returned as errors.
    pub async fn list_posts(&self, page_token: Option<&str>) -> Result<Page<Post>, DomainError> {
        let count = self.posts.count_published().await?;
        let paginator = Paginator::new(count, self.page_size);

        let (number, resolution) = paginator.resolve(page_token);
        if matches!(
            resolution,
            PageResolution::Malformed | PageResolution::OutOfRange
        ) {
            tracing::debug!(
                token = ?page_token,
                page = number,
                ?resolution,
                "Page token recovered to last page"
            );
        }

        let (offset, limit) = paginator.window(number);
        let items = self
            .posts
            .list_published_slice(PostOrder::default(), offset, limit)
            .await?;

        Ok(paginator.page(number, items))
    }

    /// The published post addressed by its publish date and slug.
    ///
    /// Every failure to match (bad date, unknown slug, draft post) yields
    /// the same `NotFound`.
    pub async fn post_detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        post_slug: &str,
    ) -> Result<Post, DomainError> {
        let not_found = || DomainError::not_found("Post", format!("{year}/{month}/{day}/{post_slug}"));

        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return Err(not_found());
        };
        if !slug::is_slug(post_slug) {
            return Err(not_found());
        }

        self.posts
            .find_published(post_slug, date)
            .await?
            .filter(Post::is_published)
            .ok_or_else(not_found)
    }
}
