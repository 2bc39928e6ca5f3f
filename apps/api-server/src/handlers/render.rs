//! Domain values to wire DTOs.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

use blog_core::domain::{Post, PostStatus, User};
use blog_core::pagination::Page;
use blog_shared::dto::{PageResponse, PaginationMeta, PostResponse, UserResponse};

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn status(status: PostStatus) -> &'static str {
    match status {
        PostStatus::Draft => "draft",
        PostStatus::Published => "published",
    }
}

/// Public address of a post.
pub fn post_url(post: &Post) -> String {
    let date = post.publish_date();
    format!(
        "/blog/{}/{}/{}/{}/",
        date.year(),
        date.month(),
        date.day(),
        post.slug
    )
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        url: post_url(&post),
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        publish: timestamp(post.publish),
        created_at: timestamp(post.created_at),
        updated_at: timestamp(post.updated_at),
        status: status(post.status).to_string(),
        title: post.title,
        slug: post.slug,
        body: post.body,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        created_at: timestamp(user.created_at),
        username: user.username,
        email: user.email,
    }
}

pub fn page<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let page = page.map(f);
    PageResponse {
        pagination: PaginationMeta {
            page: page.number,
            total_pages: page.num_pages,
            total_items: page.count,
            page_size: page.page_size,
            has_next: page.has_next,
            has_previous: page.has_previous,
            next_page: page.next_page_number,
            previous_page: page.previous_page_number,
            start_index: page.start_index,
            end_index: page.end_index,
        },
        items: page.items,
    }
}
