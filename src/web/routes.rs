use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use tracing::{debug, info};

use super::envelope::Envelope;
use super::error::ApiError;
use super::AppState;
use crate::db::{
    delete_post, get_post, get_posts_page, insert_post, list_posts, update_post, PageSummary,
    Post, PostInput,
};

/// Board resource routes, nested under `/api/board`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all).post(create).fallback(super::not_found))
        .route("/page", get(list_page).fallback(super::not_found))
        .route(
            "/:id",
            get(get_by_id)
                .put(update)
                .delete(delete)
                .fallback(super::not_found),
        )
}

/// Ids that do not decode or parse cannot name an existing post.
fn parse_post_id(
    raw: Result<Path<String>, PathRejection>,
    not_found: &str,
) -> Result<i64, ApiError> {
    raw.ok()
        .and_then(|Path(id)| id.parse::<i64>().ok())
        .ok_or_else(|| ApiError::not_found(not_found))
}

fn parse_body(body: Result<Json<PostInput>, JsonRejection>) -> Result<PostInput, ApiError> {
    match body {
        Ok(Json(input)) => Ok(input),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Rejected post body");
            Err(ApiError::Validation(
                "Request body must be a JSON object with title and content.".to_string(),
            ))
        }
    }
}

// ========== Handlers ==========

async fn list_all(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Post>>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let posts = list_posts(&mut conn)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch posts.", e))?;

    Ok(Json(Envelope::data(posts)))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    page: Option<String>,
    keyword: Option<String>,
}

impl PageParams {
    /// 1-based page; absent, non-numeric or non-positive values mean page 1.
    fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1)
    }

    fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

async fn list_page(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Post>>>, ApiError> {
    let params = params.map_or_else(
        |rejection| {
            debug!(error = %rejection.body_text(), "Unreadable page query, using defaults");
            PageParams::default()
        },
        |Query(params)| params,
    );
    let page = params.page();
    let keyword = params.keyword();

    let mut conn = state.db.acquire().await?;
    let result = get_posts_page(&mut conn, page, keyword)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch posts.", e))?;

    debug!(
        page,
        keyword = keyword.unwrap_or(""),
        total = result.total_count,
        "Served page of posts"
    );

    let summary = PageSummary::new(page, result.total_count);
    Ok(Json(Envelope::page(result.posts, summary)))
}

async fn get_by_id(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope<Post>>, ApiError> {
    const NOT_FOUND: &str = "Post not found.";
    let id = parse_post_id(id, NOT_FOUND)?;

    let mut conn = state.db.acquire().await?;
    let post = get_post(&mut conn, id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch post.", e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(Json(Envelope::data(post)))
}

async fn create(
    State(state): State<AppState>,
    body: Result<Json<PostInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let post = parse_body(body)?.validate()?;

    let mut conn = state.db.acquire().await?;
    let id = insert_post(&mut conn, &post)
        .await
        .map_err(|e| ApiError::internal("Failed to create post.", e))?;

    info!(id, "Post created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::message("Post created successfully.")),
    )
        .into_response())
}

async fn update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<PostInput>, JsonRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    const NOT_FOUND: &str = "Post to update not found.";
    let post = parse_body(body)?.validate()?;
    let id = parse_post_id(id, NOT_FOUND)?;

    let mut conn = state.db.acquire().await?;
    let affected = update_post(&mut conn, id, &post)
        .await
        .map_err(|e| ApiError::internal("Failed to update post.", e))?;

    if affected == 0 {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    info!(id, "Post updated");
    Ok(Json(Envelope::message("Post updated successfully.")))
}

async fn delete(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    const NOT_FOUND: &str = "Post to delete not found.";
    let id = parse_post_id(id, NOT_FOUND)?;

    let mut conn = state.db.acquire().await?;
    let affected = delete_post(&mut conn, id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete post.", e))?;

    if affected == 0 {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    info!(id, "Post deleted");
    Ok(Json(Envelope::message("Post deleted successfully.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, keyword: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(String::from),
            keyword: keyword.map(String::from),
        }
    }

    #[test]
    fn test_page_defaults() {
        assert_eq!(params(None, None).page(), 1);
        assert_eq!(params(Some("abc"), None).page(), 1);
        assert_eq!(params(Some("0"), None).page(), 1);
        assert_eq!(params(Some("-4"), None).page(), 1);
        assert_eq!(params(Some("3"), None).page(), 3);
    }

    #[test]
    fn test_keyword_trimmed() {
        assert_eq!(params(None, Some("  rust ")).keyword(), Some("rust"));
        assert_eq!(params(None, Some("   ")).keyword(), None);
        assert_eq!(params(None, None).keyword(), None);
    }

    #[test]
    fn test_parse_post_id() {
        let raw = |id: &str| -> Result<Path<String>, PathRejection> { Ok(Path(id.to_string())) };
        assert_eq!(parse_post_id(raw("42"), "x").unwrap(), 42);
        assert!(matches!(
            parse_post_id(raw("abc"), "x"),
            Err(ApiError::NotFound(_))
        ));
    }
}
