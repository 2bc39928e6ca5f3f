//! Content management handlers.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use blog_core::domain::{DateRange, NewPost, PostOrder, PostQuery, PostStatus, PostUpdate};
use blog_core::services::{AdminService, DateBucket, DateLevel};
use blog_shared::dto::{
    CreatePostRequest, CreateUserRequest, DateBucketResponse, PostFilterParams, SlugParams,
    SlugSuggestion, StatusUpdateRequest, UpdatePostRequest, UserLookupParams,
};

use super::render;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// Author lookup size when the caller gives none.
const DEFAULT_LOOKUP_LIMIT: u64 = 20;

/// GET /api/admin/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<PostFilterParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let query = post_query(&params)?;
    let page = state
        .admin
        .search_posts(&query, params.page.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(render::page(page, render::post)))
}

/// POST /api/admin/posts
pub async fn create_post(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let new = NewPost {
        author_id: parse_id(&req.author_id)?,
        title: req.title,
        slug: req.slug.unwrap_or_default(),
        body: req.body,
        publish: req.publish.as_deref().map(parse_instant).transpose()?,
        status: req.status.as_deref().map(parse_status).transpose()?,
    };

    let post = state.admin.create_post(new).await?;
    tracing::debug!(request_id = %request_id.as_str(), post_id = %post.id, "Created via admin");
    Ok(HttpResponse::Created().json(render::post(post)))
}

/// GET /api/admin/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let post = state.admin.get_post(id).await?;
    Ok(HttpResponse::Ok().json(render::post(post)))
}

/// PATCH /api/admin/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let req = body.into_inner();
    let update = PostUpdate {
        author_id: req.author_id.as_deref().map(parse_id).transpose()?,
        title: req.title,
        slug: req.slug,
        body: req.body,
        publish: req.publish.as_deref().map(parse_instant).transpose()?,
        status: req.status.as_deref().map(parse_status).transpose()?,
    };

    let post = state.admin.update_post(id, update).await?;
    Ok(HttpResponse::Ok().json(render::post(post)))
}

/// PATCH /api/admin/posts/{id}/status
pub async fn set_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let status = parse_status(&body.status)?;
    let post = state.admin.set_status(id, status).await?;
    Ok(HttpResponse::Ok().json(render::post(post)))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.admin.delete_post(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/admin/posts/dates
///
/// Accepts the same filters as the listing; `year` and `month` select the
/// level of the returned buckets.
pub async fn date_hierarchy(
    state: web::Data<AppState>,
    params: web::Query<PostFilterParams>,
) -> AppResult<HttpResponse> {
    let query = post_query(&params)?;
    let buckets: Vec<DateBucketResponse> = state
        .admin
        .date_hierarchy(&query)
        .await?
        .into_iter()
        .map(bucket)
        .collect();
    Ok(HttpResponse::Ok().json(buckets))
}

/// GET /api/admin/slug?title=
pub async fn suggest_slug(params: web::Query<SlugParams>) -> HttpResponse {
    HttpResponse::Ok().json(SlugSuggestion {
        slug: AdminService::suggest_slug(&params.title),
    })
}

/// GET /api/admin/users?q=&limit=
pub async fn lookup_users(
    state: web::Data<AppState>,
    params: web::Query<UserLookupParams>,
) -> AppResult<HttpResponse> {
    let users = state
        .admin
        .lookup_authors(
            params.q.as_deref().unwrap_or_default(),
            params.limit.unwrap_or(DEFAULT_LOOKUP_LIMIT),
        )
        .await?;
    let users: Vec<_> = users.into_iter().map(render::user).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/admin/users
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state.admin.create_user(req.username, req.email).await?;
    Ok(HttpResponse::Created().json(render::user(user)))
}

/// DELETE /api/admin/users/{id}
///
/// Removes the author's posts as well.
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.admin.delete_user(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

fn bucket(b: DateBucket) -> DateBucketResponse {
    let level = match b.level {
        DateLevel::Year => "year",
        DateLevel::Month => "month",
        DateLevel::Day => "day",
    };
    DateBucketResponse {
        level: level.to_string(),
        year: b.year,
        month: b.month,
        day: b.day,
        count: b.count,
    }
}

fn post_query(params: &PostFilterParams) -> AppResult<PostQuery> {
    Ok(PostQuery {
        search: params.q.clone(),
        author_id: params.author.as_deref().map(parse_id).transpose()?,
        status: params.status.as_deref().map(parse_status).transpose()?,
        publish: range(&params.publish_since, &params.publish_until)?,
        created: range(&params.created_since, &params.created_until)?,
        year: params.year,
        month: params.month,
        day: params.day,
        order: params.order.as_deref().map(parse_order).transpose()?,
    })
}

/// A date-only `until` covers the whole of that day.
fn range(since: &Option<String>, until: &Option<String>) -> AppResult<DateRange> {
    let until = match until.as_deref().map(str::trim) {
        Some(raw) => Some(match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => match date.succ_opt() {
                Some(next) => start_of(next),
                None => parse_instant(raw)?,
            },
            Err(_) => parse_instant(raw)?,
        }),
        None => None,
    };
    Ok(DateRange {
        since: since.as_deref().map(parse_instant).transpose()?,
        until,
    })
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(format!("Invalid id '{raw}'")))
}

fn parse_status(raw: &str) -> AppResult<PostStatus> {
    raw.parse::<PostStatus>().map_err(AppError::from)
}

/// RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
fn parse_instant(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(start_of)
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{raw}'")))
}

fn parse_order(raw: &str) -> AppResult<PostOrder> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_ascii_lowercase()))
        .map_err(|_| AppError::BadRequest(format!("Unknown order '{raw}'")))
}
