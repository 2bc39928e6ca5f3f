//! Application services built on the ports.

mod admin;
mod blog;

pub use admin::{AdminService, DEFAULT_ADMIN_PAGE_SIZE, DateBucket, DateLevel, MAX_AUTHOR_LOOKUP};
pub use blog::{BlogService, DEFAULT_PAGE_SIZE};
