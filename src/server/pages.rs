//! Public HTML pages

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use super::{raw_slug, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    page: Option<usize>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<Html<String>, ApiError> {
    let page = params.page.unwrap_or(1);
    let per_page = state.blog.config.per_page;
    let page = state
        .blocking(move |blog| blog.content().paginated_posts(page, per_page))
        .await?;
    Ok(Html(state.templates.render_index(&page)?))
}

pub async fn post(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let slug = raw_slug(&uri);
    let markdown = state.markdown.clone();

    let found = state
        .blocking(move |blog| {
            let Some(post) = blog.content().get_post_by_slug(&slug)? else {
                return Ok(None);
            };
            let posts = blog.content().list_posts()?;
            let body = markdown.render(&post.content);
            Ok(Some((post, body, posts)))
        })
        .await?;

    let Some((post, body, posts)) = found else {
        let html = state
            .templates
            .render_not_found("That post does not exist.")?;
        return Ok((StatusCode::NOT_FOUND, Html(html)).into_response());
    };

    let html = state.templates.render_post(
        &post,
        &body,
        post.meta.prev(&posts),
        post.meta.next(&posts),
    )?;
    Ok(Html(html).into_response())
}
