//! # Blog Core
//!
//! The domain layer of the blog.
//! Posts, pagination and the services behind the public and admin paths,
//! with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
