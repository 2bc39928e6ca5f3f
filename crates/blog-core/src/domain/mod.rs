//! Domain entities - the core business objects.

mod post;
mod query;
pub mod slug;
mod user;

pub use post::{NewPost, Post, PostStatus, PostUpdate, TITLE_MAX_LEN};
pub use query::{DateRange, PostOrder, PostQuery};
pub use user::User;
