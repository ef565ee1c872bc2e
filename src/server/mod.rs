//! HTTP server: public site, JSON API and the admin surface

mod admin;
mod api;
mod error;
mod pages;

pub use error::ApiError;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::MarkdownRenderer;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<Blog>,
    pub markdown: Arc<MarkdownRenderer>,
    pub templates: Arc<TemplateRenderer>,
    /// Held for the whole of a write plus its reindex
    write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(blog: Blog) -> Result<Self> {
        Ok(Self {
            markdown: Arc::new(MarkdownRenderer::from_config(&blog.config.highlight)),
            templates: Arc::new(TemplateRenderer::new(&blog.config)?),
            blog: Arc::new(blog),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Run file work on the blocking pool
    pub async fn blocking<T, F>(&self, f: F) -> std::result::Result<T, ApiError>
    where
        F: FnOnce(&Blog) -> crate::error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let blog = self.blog.clone();
        Ok(tokio::task::spawn_blocking(move || f(&blog)).await??)
    }

    /// Like `blocking`, but one mutation at a time
    pub async fn mutate<T, F>(&self, f: F) -> std::result::Result<T, ApiError>
    where
        F: FnOnce(&Blog) -> crate::error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        self.blocking(f).await
    }
}

/// Final path segment exactly as sent. Every `:slug` route ends in the slug,
/// which the content layer percent-decodes itself.
fn raw_slug(uri: &Uri) -> String {
    uri.path().rsplit('/').next().unwrap_or_default().to_string()
}

/// Build the application router
pub fn router(blog: Blog) -> Result<Router> {
    let public_dir = blog.public_dir.clone();
    let body_limit = blog.config.server.max_upload_bytes;
    let state = AppState::new(blog)?;

    let admin_routes = Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/new", get(admin::new_post_form))
        .route("/admin/edit/:slug", get(admin::edit_post_form))
        .route("/api/admin/save-markdown", post(admin::save_markdown))
        .route("/api/admin/delete-post", post(admin::delete_post))
        .route("/api/admin/generate-index", post(admin::generate_index))
        .route("/api/admin/upload-image", post(admin::upload_image))
        .route("/api/admin/posts", post(admin::create_post))
        .route("/api/admin/posts/:slug", post(admin::update_post))
        .route_layer(from_fn_with_state(state.clone(), admin::gate));

    Ok(Router::new()
        .route("/", get(pages::index))
        .route("/posts/:slug", get(pages::post))
        .route("/api/posts", get(api::list_posts))
        .route("/api/posts/page", get(api::paginated_posts))
        .route("/api/posts/:slug", get(api::get_post))
        .route("/api/search", get(api::search))
        .merge(admin_routes)
        .fallback_service(ServeDir::new(public_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog.clone())?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Admin dashboard at http://{}:{}/admin", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
