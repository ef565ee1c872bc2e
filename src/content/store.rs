//! Markdown store - one `.md` file per post in a flat directory

use percent_encoding::{percent_decode_str, AsciiSet, CONTROLS};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, Post, PostMeta};
use crate::error::{BlogError, Result};

/// Characters escaped when a slug is placed in a URL path segment
pub const SLUG_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// Directory of markdown posts
#[derive(Debug, Clone)]
pub struct PostStore {
    dir: PathBuf,
}

impl PostStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory when missing
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| BlogError::io(&self.dir, e))
    }

    /// File path backing a slug
    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.md", slug))
    }

    pub fn exists(&self, slug: &str) -> bool {
        is_valid_slug(slug) && self.path_for(slug).is_file()
    }

    /// All markdown files directly in the store, in filename order
    pub fn markdown_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.dir).to_path_buf();
                BlogError::io(path, e.into())
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && is_markdown_file(path) {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }

    /// Read and parse one file's front matter
    pub fn read_meta(&self, path: &Path) -> Result<PostMeta> {
        let slug = slug_from_path(path).ok_or_else(|| BlogError::FrontMatter {
            file: path.display().to_string(),
            reason: "not a markdown file name".to_string(),
        })?;
        let (meta, _) = self.read_file(path, slug)?;
        Ok(meta)
    }

    /// Load the full post for a slug. Returns `None` when no such file exists.
    pub fn read_post(&self, slug: &str) -> Result<Option<Post>> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        let path = self.path_for(slug);
        if !path.is_file() {
            return Ok(None);
        }

        let (meta, content) = self.read_file(&path, slug.to_string())?;
        Ok(Some(Post { meta, content }))
    }

    fn read_file(&self, path: &Path, slug: String) -> Result<(PostMeta, String)> {
        let raw = fs::read_to_string(path).map_err(|e| BlogError::io(path, e))?;
        let (matter, body) = FrontMatter::parse(&raw).map_err(|e| BlogError::FrontMatter {
            file: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            reason: e.to_string(),
        })?;
        let body = body.to_string();
        Ok((PostMeta::new(slug, matter), body))
    }

    /// Write a post file, replacing any existing content
    pub fn write(&self, slug: &str, content: &str) -> Result<PathBuf> {
        let path = self.path_for(slug);
        fs::write(&path, content).map_err(|e| BlogError::io(&path, e))?;
        tracing::debug!("Wrote {:?}", path);
        Ok(path)
    }

    /// Delete the file behind a slug
    pub fn remove(&self, slug: &str) -> Result<()> {
        if !is_valid_slug(slug) {
            return Err(BlogError::NotFound(slug.to_string()));
        }

        let path = self.path_for(slug);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Deleted {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlogError::NotFound(slug.to_string())),
            Err(e) => Err(BlogError::io(&path, e)),
        }
    }

    /// Pick a free slug for `stem`, appending `-2`, `-3`, ... on collision.
    /// A file owned by `owner` (the post being edited) is not a collision.
    pub fn unique_slug(&self, stem: &str, owner: Option<&str>) -> String {
        if owner == Some(stem) || !self.path_for(stem).exists() {
            return stem.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", stem, n);
            if owner == Some(candidate.as_str()) || !self.path_for(&candidate).exists() {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}

/// Slug of a markdown file: its name with `.md` stripped
pub fn slug_from_path(path: &Path) -> Option<String> {
    if !is_markdown_file(path) {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Percent-decode a slug taken from a URL, rejecting anything that is not
/// a plain file stem
pub fn decode_slug(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let slug = decoded.trim();
    if is_valid_slug(slug) {
        Some(slug.to_string())
    } else {
        None
    }
}

/// A slug must name a file directly inside the store
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
}
