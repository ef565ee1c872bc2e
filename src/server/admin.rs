//! Admin endpoints and the gate in front of them

use axum::extract::{Multipart, Request, State};
use axum::http::{header, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{raw_slug, ApiError, AppState};
use crate::admin::SaveRequest;
use crate::config::AdminConfig;
use crate::content::store::decode_slug;
use crate::content::PostDraft;
use crate::error::BlogError;

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    slug: String,
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn request_host(req: &Request) -> &str {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().host())
        .unwrap_or("")
}

/// Why a request was refused, if it was
fn check_access(config: &AdminConfig, req: &Request) -> Option<StatusCode> {
    match config.token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) if bearer_token(req) != Some(token) => Some(StatusCode::UNAUTHORIZED),
        Some(_) => None,
        None if !request_host(req).contains(config.allowed_host.as_str()) => {
            Some(StatusCode::NOT_FOUND)
        }
        None => None,
    }
}

/// Refuse admin requests that fail the host check or the configured token
pub async fn gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match check_access(&state.blog.config.admin, &req) {
        None => next.run(req).await,
        Some(status) => {
            tracing::warn!(
                "Refused admin request to {} from host {:?}",
                req.uri().path(),
                request_host(&req)
            );
            let message = if status == StatusCode::UNAUTHORIZED {
                "Unauthorized"
            } else {
                "Not found"
            };
            (status, Json(json!({ "error": message }))).into_response()
        }
    }
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let posts = state.blocking(|blog| blog.content().list_posts()).await?;
    Ok(Html(state.templates.render_admin(&posts)?))
}

pub async fn new_post_form(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let config = &state.blog.config;
    let draft = PostDraft {
        author: config.author.clone(),
        category: config.default_category.clone(),
        reading_time: config.default_reading_time,
        ..Default::default()
    };
    Ok(Html(state.templates.render_editor(None, &draft)?))
}

pub async fn edit_post_form(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Html<String>, ApiError> {
    let slug = raw_slug(&uri);
    let lookup = slug.clone();
    let post = state
        .blocking(move |blog| blog.content().get_post_by_slug(&lookup))
        .await?
        .ok_or(BlogError::NotFound(slug))?;

    let draft = PostDraft::from_post(&post);
    Ok(Html(
        state.templates.render_editor(Some(&post.meta.slug), &draft)?,
    ))
}

pub async fn save_markdown(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .mutate(move |blog| blog.admin().save_markdown(&req))
        .await?;
    Ok(Json(json!({ "success": true, "slug": outcome.slug })))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.slug.trim().is_empty() {
        return Err(BlogError::required("slug").into());
    }
    state
        .mutate(move |blog| blog.admin().delete_post(&req.slug))
        .await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn generate_index(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let report = state.mutate(|blog| blog.regenerate_index()).await?;
    Ok(Json(json!({
        "success": true,
        "indexed": report.indexed,
        "skipped": report.skipped,
    })))
}

pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        ApiError::from(BlogError::validation("file", e.body_text()))
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(invalid)?;
        let url = state
            .blocking(move |blog| blog.admin().upload_image(&name, &bytes))
            .await?;
        return Ok(Json(json!({ "url": url })));
    }

    Err(BlogError::validation("file", "No file uploaded").into())
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(draft): Json<PostDraft>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .mutate(move |blog| blog.admin().create_post(&draft))
        .await?;
    Ok(Json(json!({ "success": true, "slug": outcome.slug })))
}

pub async fn update_post(
    State(state): State<AppState>,
    uri: Uri,
    Json(draft): Json<PostDraft>,
) -> Result<Json<Value>, ApiError> {
    let raw = raw_slug(&uri);
    let old_slug = decode_slug(&raw).ok_or(BlogError::NotFound(raw))?;
    let outcome = state
        .mutate(move |blog| blog.admin().update_post(&old_slug, &draft))
        .await?;
    Ok(Json(json!({ "success": true, "slug": outcome.slug })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(host: Option<&str>, auth: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/admin/generate-index");
        if let Some(host) = host {
            builder = builder.header(header::HOST, host);
        }
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_host_gate() {
        let config = AdminConfig::default();
        assert_eq!(check_access(&config, &request(Some("localhost:3000"), None)), None);
        assert_eq!(
            check_access(&config, &request(Some("blog.example.com"), None)),
            Some(StatusCode::NOT_FOUND)
        );
        assert_eq!(
            check_access(&config, &request(None, None)),
            Some(StatusCode::NOT_FOUND)
        );
    }

    #[test]
    fn test_token_gate() {
        let config = AdminConfig {
            token: Some("s3cret".to_string()),
            ..Default::default()
        };
        assert_eq!(
            check_access(&config, &request(Some("localhost"), None)),
            Some(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(
            check_access(&config, &request(Some("localhost"), Some("Bearer wrong"))),
            Some(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(
            check_access(&config, &request(Some("anywhere.example"), Some("Bearer s3cret"))),
            None
        );
    }
}
