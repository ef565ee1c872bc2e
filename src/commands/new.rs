//! Create a new post from the command line

use anyhow::Result;

use crate::admin::{generate_filename, SaveRequest};
use crate::content::PostDraft;
use crate::Blog;

/// Fields given on the command line; anything missing falls back to config
#[derive(Debug, Default)]
pub struct NewPost {
    pub title: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub reading_time: Option<u32>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

/// Scaffold a post file and reindex. Returns the slug it was saved under.
///
/// Unlike the admin form, empty optional fields are allowed here; the file
/// is meant to be filled in by hand.
pub fn create_post(blog: &Blog, post: NewPost) -> Result<String> {
    if post.title.trim().is_empty() {
        anyhow::bail!("Title is required");
    }

    let config = &blog.config;
    let draft = PostDraft {
        title: post.title,
        author: post.author.unwrap_or_else(|| config.author.clone()),
        tags: post.tags,
        reading_time: post.reading_time.unwrap_or(config.default_reading_time),
        category: post
            .category
            .unwrap_or_else(|| config.default_category.clone()),
        thumbnail: post.thumbnail.unwrap_or_default(),
        description: post.description.unwrap_or_default(),
        body: String::new(),
    };

    let now = config.now();
    let outcome = blog.admin().save_markdown(&SaveRequest {
        content: draft.to_markdown(&now)?,
        filename: generate_filename(&draft.title, now.date()),
        old_slug: None,
    })?;

    println!("Created: {:?}", blog.store().path_for(&outcome.slug));
    Ok(outcome.slug)
}
