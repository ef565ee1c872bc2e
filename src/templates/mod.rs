//! HTML pages for the public site and the admin dashboard
//!
//! The theme is embedded with `include_str!` and rendered with Tera.
//! Autoescaping stays on for every `.html` template, so front-matter values
//! are escaped; the rendered markdown body is the only value marked `safe`.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::store::SLUG_ENCODE_SET;
use crate::content::{Post, PostDraft, PostMeta, PostPage};
use crate::helpers::{html_escape, long_date, short_date};

/// Page renderer bound to one site's settings
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Tera's own escaper also rewrites `/`, which would mangle every href
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("admin.html", include_str!("theme/admin.html")),
            ("editor.html", include_str!("theme/editor.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
            (
                "partials/style.css",
                include_str!("theme/partials/style.css"),
            ),
            (
                "partials/script.js",
                include_str!("theme/partials/script.js"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self {
            tera,
            site: SiteData {
                title: config.title.clone(),
                description: config.description.clone(),
                min_query_chars: config.search.min_query_chars,
            },
        })
    }

    fn context(&self, page_title: &str, admin: bool) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("page_title", page_title);
        context.insert("admin", &admin);
        context
    }

    /// Home page: one page of post cards with a pager
    pub fn render_index(&self, page: &PostPage) -> tera::Result<String> {
        let mut context = self.context(&self.site.title, false);
        context.insert("posts", &views(&page.posts));
        context.insert("pager", &PagerData::from_page(page));
        self.tera.render("index.html", &context)
    }

    /// Detail page. `body_html` is the already rendered markdown body.
    pub fn render_post(
        &self,
        post: &Post,
        body_html: &str,
        prev: Option<&PostMeta>,
        next: Option<&PostMeta>,
    ) -> tera::Result<String> {
        let mut context = self.context(post.meta.title(), false);
        context.insert("post", &PostView::from(&post.meta));
        context.insert("body", body_html);
        context.insert("prev", &prev.map(PostView::from));
        context.insert("next", &next.map(PostView::from));
        self.tera.render("post.html", &context)
    }

    /// Admin dashboard: every post with edit and delete actions
    pub fn render_admin(&self, posts: &[PostMeta]) -> tera::Result<String> {
        let mut context = self.context("Admin", true);
        context.insert("posts", &views(posts));
        self.tera.render("admin.html", &context)
    }

    /// Post form. `slug` is the post being edited, `None` for a new post.
    pub fn render_editor(&self, slug: Option<&str>, draft: &PostDraft) -> tera::Result<String> {
        let (heading, action) = match slug {
            Some(slug) => (
                "Edit post",
                format!(
                    "/api/admin/posts/{}",
                    percent_encoding::utf8_percent_encode(slug, SLUG_ENCODE_SET)
                ),
            ),
            None => ("New post", "/api/admin/posts".to_string()),
        };

        let mut context = self.context(heading, true);
        context.insert("action", &action);
        context.insert("draft", draft);
        self.tera.render("editor.html", &context)
    }

    pub fn render_not_found(&self, message: &str) -> tera::Result<String> {
        let mut context = self.context("Not found", false);
        context.insert("message", message);
        self.tera.render("not_found.html", &context)
    }
}

#[derive(Debug, Clone, Serialize)]
struct SiteData {
    title: String,
    description: String,
    min_query_chars: usize,
}

/// Pager links, already clamped to real pages
#[derive(Debug, Clone, Serialize)]
struct PagerData {
    page: usize,
    total_pages: usize,
    prev: Option<usize>,
    next: Option<usize>,
}

impl PagerData {
    fn from_page(page: &PostPage) -> Self {
        Self {
            page: page.page,
            total_pages: page.total_pages,
            prev: page
                .has_prev()
                .then(|| (page.page - 1).min(page.total_pages)),
            next: page.has_next().then_some(page.page + 1),
        }
    }
}

/// One post as the templates see it
#[derive(Debug, Clone, Serialize)]
struct PostView<'a> {
    slug: &'a str,
    path: String,
    edit_path: String,
    title: &'a str,
    date: &'a str,
    author: &'a str,
    category: &'a str,
    description: &'a str,
    tags: &'a [String],
    reading_time: Option<u32>,
    thumbnail: Option<&'a str>,
}

impl<'a> From<&'a PostMeta> for PostView<'a> {
    fn from(post: &'a PostMeta) -> Self {
        let m = &post.matter;
        let path = post.path();
        Self {
            slug: &post.slug,
            edit_path: path.replacen("/posts/", "/admin/edit/", 1),
            path,
            title: &m.title,
            date: post.date(),
            author: &m.author,
            category: &m.category,
            description: &m.description,
            tags: &m.tags,
            reading_time: m.reading_time,
            thumbnail: m.thumbnail.as_deref().filter(|t| !t.is_empty()),
        }
    }
}

fn views(posts: &[PostMeta]) -> Vec<PostView<'_>> {
    posts.iter().map(PostView::from).collect()
}

/// Tera filter: `short` card dates or `long` dashboard dates
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "short".to_string(),
    };

    Ok(tera::Value::String(match format.as_str() {
        "long" => long_date(&s),
        _ => short_date(&s),
    }))
}
