//! File names for new posts

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::content::store::is_valid_slug;
use crate::error::{BlogError, Result};

lazy_static! {
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Lowercase the title and collapse everything outside `[a-z0-9]` into `-`
pub fn slugify_title(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// `YYYY-MM-DD-title-slug.md`; a title with nothing usable gives `YYYY-MM-DD.md`
pub fn generate_filename(title: &str, date: NaiveDate) -> String {
    let prefix = date.format("%Y-%m-%d");
    let slug = slugify_title(title);
    if slug.is_empty() {
        format!("{}.md", prefix)
    } else {
        format!("{}-{}.md", prefix, slug)
    }
}

/// Reduce a requested file name to the slug it will be stored under.
///
/// The name must be a bare file name; a trailing `.md` is optional.
pub fn filename_stem(filename: &str) -> Result<String> {
    let name = filename.trim();
    if name.is_empty() {
        return Err(BlogError::required("filename"));
    }

    let stem = name.strip_suffix(".md").unwrap_or(name).trim();
    if !is_valid_slug(stem) {
        return Err(BlogError::validation(
            "filename",
            format!("Invalid filename: {}", name),
        ));
    }
    Ok(stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Hello, World!"), "hello-world");
        assert_eq!(slugify_title("  Rust & Axum: 2024  "), "rust-axum-2024");
        assert_eq!(slugify_title("already-slugged"), "already-slugged");
        assert_eq!(slugify_title("!!!"), "");
    }

    #[test]
    fn test_generate_filename() {
        assert_eq!(
            generate_filename("Deploying with Docker", june_first()),
            "2024-06-01-deploying-with-docker.md"
        );
        assert_eq!(generate_filename("???", june_first()), "2024-06-01.md");
    }

    #[test]
    fn test_filename_stem() {
        assert_eq!(filename_stem("2024-06-01-post.md").unwrap(), "2024-06-01-post");
        assert_eq!(filename_stem("draft").unwrap(), "draft");
        assert!(matches!(
            filename_stem("  "),
            Err(BlogError::Validation { field: "filename", .. })
        ));
        assert!(filename_stem("../escape.md").is_err());
        assert!(filename_stem("nested/post.md").is_err());
        assert!(filename_stem("..").is_err());
        assert!(filename_stem(".md").is_err());
    }
}
