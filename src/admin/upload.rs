//! Image uploads into the public directory

use std::fs;
use std::path::Path;

use crate::error::{BlogError, Result};
use crate::Blog;

/// Stored name for an upload: `<millis>-<slugified stem>.<ext>`
pub fn upload_file_name(original: &str, millis: i64) -> String {
    // Browsers may send a full client path
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let path = Path::new(base);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slug::slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "upload".to_string());
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|e| !e.is_empty());

    match ext {
        Some(ext) => format!("{}-{}.{}", millis, stem, ext),
        None => format!("{}-{}", millis, stem),
    }
}

/// Write an uploaded file and return its public URL
pub fn store_upload(blog: &Blog, original: &str, bytes: &[u8]) -> Result<String> {
    fs::create_dir_all(&blog.upload_dir).map_err(|e| BlogError::io(&blog.upload_dir, e))?;

    let name = upload_file_name(original, chrono::Utc::now().timestamp_millis());
    let path = blog.upload_dir.join(&name);
    fs::write(&path, bytes).map_err(|e| BlogError::io(&path, e))?;
    tracing::info!("Stored upload {:?} ({} bytes)", path, bytes.len());

    Ok(format!(
        "/{}/{}",
        blog.config.upload_dir.trim_matches('/'),
        name
    ))
}
