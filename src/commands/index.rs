//! Build the post index, optionally keeping it current while files change

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use std::path::Path;
use std::time::Duration;

use crate::Blog;

/// Rebuild the index once and print a summary
pub fn run(blog: &Blog) -> Result<()> {
    let report = blog.regenerate_index()?;
    println!(
        "Indexed {} posts into {:?}",
        report.indexed,
        blog.index().path()
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.file, skipped.reason);
    }
    Ok(())
}

/// Only markdown edits matter; the index itself lives in the same directory
fn is_post_change(event: &DebouncedEvent) -> bool {
    let path: &Path = &event.path;
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') || n.ends_with('~'))
        .unwrap_or(true);
    !hidden && path.extension().and_then(|e| e.to_str()) == Some("md")
}

/// Watch the store and reindex after external edits
pub async fn watch(blog: &Blog) -> Result<()> {
    blog.store().ensure_dir()?;

    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(blog.store().dir(), RecursiveMode::NonRecursive)?;

    tracing::info!(
        "Watching {:?} for changes. Press Ctrl+C to stop.",
        blog.store().dir()
    );

    let blog = blog.clone();
    tokio::task::spawn_blocking(move || {
        for result in rx {
            match result {
                Ok(events) => {
                    let changed: Vec<_> = events.iter().filter(|e| is_post_change(e)).collect();
                    if changed.is_empty() {
                        continue;
                    }
                    for event in &changed {
                        tracing::info!("Changed: {}", event.path.display());
                    }
                    if let Err(e) = run(&blog) {
                        tracing::error!("Reindex failed: {}", e);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }
    })
    .await?;

    drop(debouncer);
    Ok(())
}
