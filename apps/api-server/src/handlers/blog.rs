//! Public read paths.

use actix_web::{HttpResponse, web};

use blog_core::DomainError;
use blog_shared::dto::PageParams;

use super::render;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /blog/?page=
///
/// Never fails on the page token; only storage errors surface.
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let page = state.blog.list_posts(query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(render::page(page, render::post)))
}

/// GET /blog/{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();

    match state.blog.post_detail(year, month, day, &slug).await {
        Ok(post) => Ok(HttpResponse::Ok().json(render::post(post))),
        Err(DomainError::NotFound { key, .. }) => {
            tracing::debug!(%key, "Post detail miss");
            Err(AppError::post_not_found())
        }
        Err(e) => Err(e.into()),
    }
}
