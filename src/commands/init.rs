//! Initialize a new blog

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::FrontMatter;
use crate::helpers::front_matter_date;
use crate::Blog;

const DEFAULT_CONFIG: &str = r#"# markblog configuration

# Site
title: My Blog
description: ''
author: John Doe
# IANA zone for new-post dates, e.g. Asia/Ho_Chi_Minh; empty uses local time
timezone: ''

# Directory
content_dir: content/blog
public_dir: public
upload_dir: images/uploads
index_file: index.json

# Writing
default_category: Technology
default_reading_time: 10

# Pagination
per_page: 10

highlight:
  enable: true
  theme: base16-ocean.dark

search:
  min_query_chars: 3

admin:
  allowed_host: localhost
  # token: change-me

server:
  ip: localhost
  port: 3000
  max_upload_bytes: 10485760
"#;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir)
        .with_context(|| format!("Failed to create {:?}", target_dir))?;
    fs::write(&config_path, DEFAULT_CONFIG)?;

    let blog = Blog::new(target_dir)?;
    fs::create_dir_all(&blog.content_dir)?;
    fs::create_dir_all(&blog.upload_dir)?;

    write_sample_post(&blog)?;

    blog.regenerate_index()?;
    Ok(())
}

/// Write the welcome post, filling author and category from the config
fn write_sample_post(blog: &Blog) -> Result<()> {
    let config = &blog.config;
    let matter = FrontMatter {
        layout: Some("blog".to_string()),
        title: "Hello World".to_string(),
        date: Some(front_matter_date(&config.now())),
        author: config.author.clone(),
        tags: vec!["Welcome".to_string()],
        reading_time: Some(1),
        category: config.default_category.clone(),
        thumbnail: None,
        description: "The first post on this blog".to_string(),
    };

    let body = format!(
        r#"Welcome! This post lives in `{}` as plain markdown.

## Writing

```bash
$ markblog new "My New Post"
```

Or open `/admin` while the server runs.

## Serving

```bash
$ markblog server
```
"#,
        config.content_dir
    );

    let path = blog.store().path_for("hello-world");
    fs::write(&path, format!("{}{}", matter.to_block()?, body))
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_site() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("site");
        init_site(&target).unwrap();

        let blog = Blog::new(&target).unwrap();
        assert_eq!(blog.config.server.port, 3000);
        assert!(blog.upload_dir.is_dir());

        let posts = blog.content().list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title(), "Hello World");

        assert!(init_site(&target).is_err());
    }

    #[test]
    fn test_sample_post_survives_yaml_characters() {
        let tmp = TempDir::new().unwrap();
        let mut config = crate::config::SiteConfig::default();
        config.author = "Nguyen: Editor # 1".to_string();
        config.default_category = "- Notes".to_string();
        let blog = Blog::with_config(tmp.path(), config);
        blog.store().ensure_dir().unwrap();

        write_sample_post(&blog).unwrap();
        let report = blog.regenerate_index().unwrap();
        assert_eq!(report.indexed, 1);
        assert!(report.skipped.is_empty());

        let post = blog.content().get_post_by_slug("hello-world").unwrap().unwrap();
        assert_eq!(post.meta.matter.author, "Nguyen: Editor # 1");
        assert_eq!(post.meta.matter.category, "- Notes");
        assert_eq!(post.meta.matter.tags, vec!["Welcome"]);
        assert!(post.content.starts_with("Welcome!"));
    }
}
