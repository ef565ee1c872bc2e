//! markblog: a flat-file markdown blog with a local admin interface
//!
//! Posts live as markdown files with YAML front matter in one directory.
//! A JSON index of their metadata backs listing, search and pagination, and
//! is rebuilt after every change made through the admin API.

pub mod admin;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentAccess, IndexReport, PostIndex, PostStore};

/// A blog rooted at a site directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown store directory
    pub content_dir: PathBuf,
    /// Directory served as static files
    pub public_dir: PathBuf,
    /// Where uploaded images are written, inside `public_dir`
    pub upload_dir: PathBuf,
    store: PostStore,
    index: PostIndex,
}

impl Blog {
    /// Open the blog in a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let upload_dir = public_dir.join(config.upload_dir.trim_matches('/'));
        let store = PostStore::new(&content_dir);
        let index = PostIndex::new(content_dir.join(&config.index_file));

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            upload_dir,
            store,
            index,
        }
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    pub fn index(&self) -> &PostIndex {
        &self.index
    }

    /// Read-side queries
    pub fn content(&self) -> ContentAccess<'_> {
        ContentAccess::new(self)
    }

    /// Write-side operations
    pub fn admin(&self) -> admin::AdminApi<'_> {
        admin::AdminApi::new(self)
    }

    /// Rebuild the index from the store
    pub fn regenerate_index(&self) -> error::Result<IndexReport> {
        self.admin().regenerate_index()
    }
}
