//! Admin write API
//!
//! Every mutation writes or removes one file in the store and then rebuilds
//! the index, so the listing never lags behind the files on disk.
//!
//! Slugs passed in here are already decoded, exactly as they appear in the
//! index. Percent-decoding belongs to the URL handlers.

mod filename;
mod upload;

pub use filename::{filename_stem, generate_filename, slugify_title};
pub use upload::{store_upload, upload_file_name};

use serde::{Deserialize, Serialize};

use crate::content::store::is_valid_slug;
use crate::content::{FrontMatter, IndexReport, PostDraft};
use crate::error::{BlogError, Result};
use crate::Blog;

/// Raw save request: a complete markdown file and the name to store it under
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveRequest {
    pub content: String,
    pub filename: String,
    /// Slug of the post being edited, when this save replaces it
    pub old_slug: Option<String>,
}

/// Result of a successful save
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub slug: String,
    #[serde(skip)]
    pub report: IndexReport,
}

/// Write side of the blog
pub struct AdminApi<'a> {
    blog: &'a Blog,
}

impl<'a> AdminApi<'a> {
    pub fn new(blog: &'a Blog) -> Self {
        Self { blog }
    }

    /// Store a markdown file and reindex.
    ///
    /// A name already taken by another post gets a numeric suffix. When
    /// `old_slug` names a different file, that file is removed after the new
    /// one is written.
    pub fn save_markdown(&self, req: &SaveRequest) -> Result<SaveOutcome> {
        if req.content.trim().is_empty() {
            return Err(BlogError::required("content"));
        }
        let stem = filename_stem(&req.filename)?;

        FrontMatter::parse(&req.content).map_err(|e| {
            BlogError::validation("content", format!("Invalid front matter: {}", e))
        })?;

        let old_slug = match req.old_slug.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(old) if is_valid_slug(old) => Some(old),
            Some(old) => {
                return Err(BlogError::validation(
                    "oldSlug",
                    format!("Invalid slug: {}", old),
                ))
            }
        };

        let store = self.blog.store();
        store.ensure_dir()?;

        let slug = store.unique_slug(&stem, old_slug);
        if slug != stem {
            tracing::info!("{}.md is taken, saving as {}.md", stem, slug);
        }
        store.write(&slug, &req.content)?;

        if let Some(old) = old_slug.filter(|old| *old != slug) {
            match store.remove(old) {
                Ok(()) => tracing::info!("Renamed {} to {}", old, slug),
                Err(e) => tracing::warn!("Could not remove old post {}: {}", old, e),
            }
        }

        let report = self.regenerate_index()?;
        Ok(SaveOutcome { slug, report })
    }

    /// Remove a post and reindex
    pub fn delete_post(&self, slug: &str) -> Result<IndexReport> {
        self.blog.store().remove(slug)?;
        tracing::info!("Deleted post {}", slug);
        self.regenerate_index()
    }

    pub fn regenerate_index(&self) -> Result<IndexReport> {
        self.blog.index().build(self.blog.store())
    }

    /// New post from the structured form, dated now
    pub fn create_post(&self, draft: &PostDraft) -> Result<SaveOutcome> {
        self.save_draft(draft, None)
    }

    /// Replace an existing post with the form contents
    pub fn update_post(&self, old_slug: &str, draft: &PostDraft) -> Result<SaveOutcome> {
        if !self.blog.store().exists(old_slug) {
            return Err(BlogError::NotFound(old_slug.to_string()));
        }
        self.save_draft(draft, Some(old_slug))
    }

    fn save_draft(&self, draft: &PostDraft, old_slug: Option<&str>) -> Result<SaveOutcome> {
        draft.validate()?;

        let now = self.blog.config.now();
        let req = SaveRequest {
            content: draft.to_markdown(&now)?,
            filename: generate_filename(&draft.title, now.date()),
            old_slug: old_slug.map(str::to_string),
        };
        self.save_markdown(&req)
    }

    /// Store an uploaded image and return its public URL
    pub fn upload_image(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        store_upload(self.blog, original_name, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Blog) {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_config(tmp.path(), SiteConfig::default());
        (tmp, blog)
    }

    fn markdown(title: &str, date: &str, body: &str) -> String {
        format!(
            "---\ntitle: {}\ndate: {}\ntags:\n  - zeta\n  - alpha\n---\n\n{}",
            title, date, body
        )
    }

    fn save(blog: &Blog, filename: &str, content: String, old: Option<&str>) -> Result<SaveOutcome> {
        blog.admin().save_markdown(&SaveRequest {
            content,
            filename: filename.to_string(),
            old_slug: old.map(str::to_string),
        })
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            author: "Nguyen Nguyen".to_string(),
            tags: vec!["Cloud".to_string()],
            reading_time: 4,
            category: "Technology".to_string(),
            thumbnail: "/images/uploads/1-cover.png".to_string(),
            description: "About it".to_string(),
            body: "Body text\n".to_string(),
        }
    }

    #[test]
    fn test_write_reindex_read() {
        let (_tmp, blog) = setup();
        let outcome = save(
            &blog,
            "first-post.md",
            markdown("First Post", "2024-03-01T09:00:00", "Hello\n"),
            None,
        )
        .unwrap();
        assert_eq!(outcome.slug, "first-post");
        assert_eq!(outcome.report.indexed, 1);

        let post = blog.content().get_post_by_slug("first-post").unwrap().unwrap();
        assert_eq!(post.meta.title(), "First Post");
        assert_eq!(post.meta.matter.tags, vec!["zeta", "alpha"]);
        assert_eq!(post.meta.date(), "2024-03-01T09:00:00");
        assert_eq!(post.content, "Hello\n");

        let listed = blog.content().list_posts().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].matter.tags, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_required_fields() {
        let (_tmp, blog) = setup();
        assert!(matches!(
            save(&blog, "x.md", "  ".to_string(), None),
            Err(BlogError::Validation { field: "content", .. })
        ));
        assert!(matches!(
            save(&blog, "", markdown("T", "2024-01-01", ""), None),
            Err(BlogError::Validation { field: "filename", .. })
        ));
        assert!(matches!(
            save(&blog, "x.md", "no header".to_string(), None),
            Err(BlogError::Validation { field: "content", .. })
        ));
    }

    #[test]
    fn test_collision_gets_suffix() {
        let (_tmp, blog) = setup();
        save(&blog, "same.md", markdown("One", "2024-01-01", "1"), None).unwrap();
        let second = save(&blog, "same.md", markdown("Two", "2024-01-02", "2"), None).unwrap();
        assert_eq!(second.slug, "same-2");

        let titles: Vec<_> = blog
            .content()
            .list_posts()
            .unwrap()
            .iter()
            .map(|p| p.title().to_string())
            .collect();
        assert_eq!(titles, vec!["Two", "One"]);
    }

    #[test]
    fn test_resave_same_slug_overwrites() {
        let (_tmp, blog) = setup();
        save(&blog, "post.md", markdown("Old", "2024-01-01", "a"), None).unwrap();
        let outcome =
            save(&blog, "post.md", markdown("New", "2024-01-01", "b"), Some("post")).unwrap();
        assert_eq!(outcome.slug, "post");
        assert_eq!(blog.store().markdown_files().unwrap().len(), 1);
    }

    #[test]
    fn test_rename_leaves_one_file() {
        let (_tmp, blog) = setup();
        save(&blog, "old-name.md", markdown("Old", "2024-01-01", "old"), None).unwrap();
        let outcome = save(
            &blog,
            "new-name.md",
            markdown("New", "2024-01-01", "new body"),
            Some("old-name"),
        )
        .unwrap();

        assert_eq!(outcome.slug, "new-name");
        assert_eq!(blog.store().markdown_files().unwrap().len(), 1);
        assert!(blog.content().get_post_by_slug("old-name").unwrap().is_none());
        let post = blog.content().get_post_by_slug("new-name").unwrap().unwrap();
        assert_eq!(post.content, "new body");
    }

    #[test]
    fn test_rename_with_missing_old_file_still_saves() {
        let (_tmp, blog) = setup();
        let outcome = save(
            &blog,
            "fresh.md",
            markdown("Fresh", "2024-01-01", ""),
            Some("never-existed"),
        )
        .unwrap();
        assert_eq!(outcome.slug, "fresh");
    }

    #[test]
    fn test_delete_post() {
        let (_tmp, blog) = setup();
        save(&blog, "gone.md", markdown("Gone", "2024-01-01", ""), None).unwrap();
        save(&blog, "kept.md", markdown("Kept", "2024-01-02", ""), None).unwrap();

        let report = blog.admin().delete_post("gone").unwrap();
        assert_eq!(report.indexed, 1);
        let slugs: Vec<_> = blog
            .content()
            .list_posts()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["kept"]);
        assert!(matches!(
            blog.admin().delete_post("gone"),
            Err(BlogError::NotFound(_))
        ));
        assert!(matches!(
            blog.admin().delete_post("../kept"),
            Err(BlogError::NotFound(_))
        ));
    }

    #[test]
    fn test_percent_sequences_in_slugs_are_literal() {
        let (_tmp, blog) = setup();
        let saved = save(&blog, "100%41.md", markdown("Percent", "2024-01-01", "v1"), None)
            .unwrap();
        assert_eq!(saved.slug, "100%41");
        let listed = blog.content().list_posts().unwrap();
        assert_eq!(listed[0].slug, "100%41");

        let renamed = save(
            &blog,
            "100%41-v2.md",
            markdown("Percent", "2024-01-01", "v2"),
            Some(listed[0].slug.as_str()),
        )
        .unwrap();
        assert_eq!(renamed.slug, "100%41-v2");
        assert_eq!(blog.store().markdown_files().unwrap().len(), 1);

        blog.admin().delete_post(&renamed.slug).unwrap();
        assert!(blog.store().markdown_files().unwrap().is_empty());
        assert!(blog.content().list_posts().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_old_slug_is_rejected() {
        let (_tmp, blog) = setup();
        assert!(matches!(
            save(&blog, "x.md", markdown("X", "2024-01-01", ""), Some("../x")),
            Err(BlogError::Validation { field: "oldSlug", .. })
        ));
    }

    #[test]
    fn test_create_and_update_from_draft() {
        let (_tmp, blog) = setup();
        let created = blog.admin().create_post(&draft("Docker Basics")).unwrap();
        let today = blog.config.now().date().format("%Y-%m-%d").to_string();
        assert_eq!(created.slug, format!("{}-docker-basics", today));

        let post = blog.content().get_post_by_slug(&created.slug).unwrap().unwrap();
        assert_eq!(post.meta.matter.layout.as_deref(), Some("blog"));
        assert_eq!(post.meta.matter.reading_time, Some(4));

        let updated = blog
            .admin()
            .update_post(&created.slug, &draft("Docker Advanced"))
            .unwrap();
        assert_eq!(updated.slug, format!("{}-docker-advanced", today));
        assert_eq!(blog.store().markdown_files().unwrap().len(), 1);

        assert!(matches!(
            blog.admin().update_post("missing", &draft("X")),
            Err(BlogError::NotFound(_))
        ));
        let mut bad = draft("Y");
        bad.tags.clear();
        assert!(matches!(
            blog.admin().create_post(&bad),
            Err(BlogError::Validation { field: "tags", .. })
        ));
    }
}
