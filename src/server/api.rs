//! Public JSON endpoints

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::Json;
use serde::Deserialize;

use super::{raw_slug, ApiError, AppState};
use crate::content::{Post, PostMeta, PostPage};
use crate::error::BlogError;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<usize>,
    page_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostMeta>>, ApiError> {
    let posts = state.blocking(|blog| blog.content().list_posts()).await?;
    Ok(Json(posts))
}

pub async fn paginated_posts(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PostPage>, ApiError> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(state.blog.config.per_page);
    let page = state
        .blocking(move |blog| blog.content().paginated_posts(page, page_size))
        .await?;
    Ok(Json(page))
}

pub async fn get_post(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Post>, ApiError> {
    let slug = raw_slug(&uri);
    let lookup = slug.clone();
    let post = state
        .blocking(move |blog| blog.content().get_post_by_slug(&lookup))
        .await?;
    post.map(Json)
        .ok_or_else(|| BlogError::NotFound(slug).into())
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PostMeta>>, ApiError> {
    let posts = state
        .blocking(move |blog| blog.content().search_posts(&params.q))
        .await?;
    Ok(Json(posts))
}
