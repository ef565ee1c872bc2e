//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    /// IANA timezone used for new-post dates; empty means the local zone
    pub timezone: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    /// Upload directory, relative to `public_dir` and to the site root URL
    pub upload_dir: String,
    pub index_file: String,

    // Writing
    pub default_category: String,
    pub default_reading_time: u32,

    // Pagination
    pub per_page: usize,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            timezone: String::new(),

            content_dir: "content/blog".to_string(),
            public_dir: "public".to_string(),
            upload_dir: "images/uploads".to_string(),
            index_file: "index.json".to_string(),

            default_category: "Technology".to_string(),
            default_reading_time: 10,

            per_page: 10,

            highlight: HighlightConfig::default(),
            search: SearchConfig::default(),
            admin: AdminConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Resolve the configured timezone, `None` meaning local time
    pub fn tz(&self) -> Option<chrono_tz::Tz> {
        if self.timezone.trim().is_empty() {
            return None;
        }
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => Some(tz),
            Err(e) => {
                tracing::warn!("Unknown timezone {:?}, using local time: {}", self.timezone, e);
                None
            }
        }
    }

    /// Current wall-clock time in the configured timezone
    pub fn now(&self) -> chrono::NaiveDateTime {
        match self.tz() {
            Some(tz) => chrono::Utc::now().with_timezone(&tz).naive_local(),
            None => chrono::Local::now().naive_local(),
        }
    }
}

/// Syntax highlighting for fenced code blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Title search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) return nothing
    pub min_query_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { min_query_chars: 3 }
    }
}

/// Admin access gate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Substring the request host must contain
    pub allowed_host: String,
    /// When set, a bearer token is required instead of the host check
    pub token: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            allowed_host: "localhost".to_string(),
            token: None,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content/blog");
        assert_eq!(config.per_page, 10);
        assert_eq!(config.search.min_query_chars, 3);
        assert_eq!(config.admin.allowed_host, "localhost");
        assert!(config.admin.token.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Dev Notes
author: Test User
per_page: 5
timezone: Asia/Ho_Chi_Minh
admin:
  token: s3cret
server:
  port: 8080
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Dev Notes");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.per_page, 5);
        assert_eq!(config.admin.token.as_deref(), Some("s3cret"));
        assert_eq!(config.admin.allowed_host, "localhost");
        assert_eq!(config.server.port, 8080);
        assert!(config.tz().is_some());
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_local() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(config.tz().is_none());
    }
}
