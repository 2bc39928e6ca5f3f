//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{PostRepository, UserRepository};
use blog_core::services::{AdminService, BlogService};
use blog_infra::InMemoryStore;

#[cfg(feature = "postgres")]
use blog_infra::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};

use crate::config::{AppConfig, BlogConfig};

/// Which storage backs the repositories.
#[derive(Clone)]
pub enum Storage {
    InMemory,
    #[cfg(feature = "postgres")]
    Postgres(Arc<DatabaseConnections>),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub admin: AdminService,
    pub storage: Storage,
}

impl AppState {
    fn with_repos(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        blog: &BlogConfig,
        storage: Storage,
    ) -> Self {
        Self {
            blog: BlogService::new(posts.clone(), blog.page_size),
            admin: AdminService::new(posts, users, blog.admin_page_size),
            storage,
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(blog: &BlogConfig) -> Self {
        Self::in_memory_with(InMemoryStore::new(), blog)
    }

    /// State over an existing in-memory store.
    pub fn in_memory_with(store: InMemoryStore, blog: &BlogConfig) -> Self {
        Self::with_repos(
            Arc::new(store.posts()),
            Arc::new(store.users()),
            blog,
            Storage::InMemory,
        )
    }

    /// Build the application state with appropriate implementations.
    ///
    /// Falls back to in-memory storage when no database is configured or
    /// it cannot be reached.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    if config.auto_migrate {
                        run_migrations(&connections).await;
                    }
                    let pool = Arc::clone(&connections.main);
                    let posts = Arc::new(PostgresPostRepository::new(Arc::clone(&pool)));
                    let users = Arc::new(PostgresUserRepository::new(pool));
                    tracing::info!("Application state initialized (postgres)");
                    return Self::with_repos(
                        posts,
                        users,
                        &config.blog,
                        Storage::Postgres(Arc::new(connections)),
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory repositories");

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(&config.blog)
    }

    pub fn storage_name(&self) -> &'static str {
        match self.storage {
            Storage::InMemory => "in-memory",
            #[cfg(feature = "postgres")]
            Storage::Postgres(_) => "postgres",
        }
    }
}

#[cfg(feature = "postgres")]
async fn run_migrations(connections: &DatabaseConnections) {
    use migration::{Migrator, MigratorTrait};

    match Migrator::up(&*connections.main, None).await {
        Ok(()) => tracing::info!("Database migrations applied"),
        Err(e) => tracing::error!("Failed to apply migrations: {}", e),
    }
}
