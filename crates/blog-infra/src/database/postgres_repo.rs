//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use uuid::Uuid;

use blog_core::domain::{DateRange, Post, PostOrder, PostQuery, User};
use blog_core::error::RepoError;
use blog_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Escape character of every `LIKE` pattern built here.
const LIKE_ESCAPE: char = '\\';

/// `%term%` with `term` lowercased and its `\`, `%` and `_` taken literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `lower(column) LIKE '%term%' ESCAPE '\'`, a literal substring match.
pub(crate) fn contains_ci<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(like_pattern(term)).escape(LIKE_ESCAPE))
}

fn in_range<C: ColumnTrait>(column: C, range: &DateRange) -> Condition {
    let mut cond = Condition::all();
    if let Some(since) = range.since {
        cond = cond.add(column.gte(DateTime::<FixedOffset>::from(since)));
    }
    if let Some(until) = range.until {
        cond = cond.add(column.lt(DateTime::<FixedOffset>::from(until)));
    }
    cond
}

fn published() -> Select<PostEntity> {
    PostEntity::find().filter(post::Column::Status.eq(post::Status::Published))
}

fn ordered(select: Select<PostEntity>, order: PostOrder) -> Select<PostEntity> {
    match order {
        PostOrder::PublishDesc => select.order_by_desc(post::Column::Publish),
        PostOrder::PublishAsc => select.order_by_asc(post::Column::Publish),
        PostOrder::CreatedDesc => select.order_by_desc(post::Column::CreatedAt),
        PostOrder::StatusThenPublish => select
            .order_by_asc(post::Column::Status)
            .order_by_asc(post::Column::Publish),
        PostOrder::TitleAsc => select.order_by_asc(post::Column::Title),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn search(&self, term: &str, limit: u64) -> Result<Vec<User>, RepoError> {
        let mut select = UserEntity::find();
        if !term.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(contains_ci(user::Column::Username, term))
                    .add(contains_ci(user::Column::Email, term)),
            );
        }

        let result = select
            .order_by_asc(user::Column::Username)
            .limit(limit)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_published(&self, order: PostOrder) -> Result<Vec<Post>, RepoError> {
        let result = ordered(published(), order)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_published(&self) -> Result<u64, RepoError> {
        published().count(self.conn()).await.map_err(map_db_err)
    }

    async fn list_published_slice(
        &self,
        order: PostOrder,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(offset, limit, ?order, "Listing published posts");

        let result = ordered(published(), order)
            .offset(offset)
            .limit(limit)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_published(
        &self,
        slug: &str,
        date: NaiveDate,
    ) -> Result<Option<Post>, RepoError> {
        tracing::debug!(%slug, %date, "Finding published post");

        let result = published()
            .filter(post::Column::Slug.eq(slug))
            .filter(in_range(post::Column::Publish, &DateRange::day(date)))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = ordered(
            PostEntity::find().filter(post::Column::AuthorId.eq(author_id)),
            PostOrder::default(),
        )
        .all(self.conn())
        .await
        .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let drilldown = query.drilldown();
        if drilldown.is_some_and(|range| range.is_empty()) {
            return Ok(Vec::new());
        }

        let mut cond = Condition::all();
        if let Some(term) = query.search_term() {
            cond = cond.add(
                Condition::any()
                    .add(contains_ci(post::Column::Title, term))
                    .add(contains_ci(post::Column::Body, term))
                    .add(contains_ci(post::Column::Slug, term)),
            );
        }
        if let Some(author_id) = query.author_id {
            cond = cond.add(post::Column::AuthorId.eq(author_id));
        }
        if let Some(status) = query.status {
            cond = cond.add(post::Column::Status.eq(post::Status::from(status)));
        }
        cond = cond
            .add(in_range(post::Column::Publish, &query.publish))
            .add(in_range(post::Column::CreatedAt, &query.created));
        if let Some(range) = drilldown {
            cond = cond.add(in_range(post::Column::Publish, &range));
        }

        tracing::debug!(?query, "Searching posts");

        let result = ordered(PostEntity::find().filter(cond), query.order.unwrap_or_default())
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
