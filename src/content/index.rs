//! Post index - a JSON array of every post's front matter
//!
//! The index is a disposable cache. It is rebuilt from the store after every
//! mutation and is only ever read for listing metadata, never for content.

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::NamedTempFile;

use super::{PostMeta, PostStore};
use crate::error::{BlogError, Result};

/// A markdown file left out of the index
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Outcome of an index build
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexReport {
    /// Number of entries written
    pub indexed: usize,
    /// Files that failed to read or parse
    pub skipped: Vec<SkippedFile>,
}

/// The on-disk index file. Clones share one build lock.
#[derive(Debug, Clone)]
pub struct PostIndex {
    path: PathBuf,
    build_lock: Arc<Mutex<()>>,
}

impl PostIndex {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            build_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Rescan the store and replace the index file.
    ///
    /// Files that cannot be read or parsed are skipped with a warning; the
    /// build only fails when the store cannot be listed or the index cannot
    /// be written.
    pub fn build(&self, store: &PostStore) -> Result<IndexReport> {
        let _guard = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.build_locked(store)
    }

    /// Build the index only if no file exists yet. Concurrent callers wait
    /// for the first build instead of starting their own.
    pub fn ensure_built(&self, store: &PostStore) -> Result<()> {
        let _guard = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.exists() {
            tracing::info!("No index at {:?}, building it", self.path);
            self.build_locked(store)?;
        }
        Ok(())
    }

    fn build_locked(&self, store: &PostStore) -> Result<IndexReport> {
        let mut entries = Vec::new();
        let mut report = IndexReport::default();

        for path in store.markdown_files()? {
            match store.read_meta(&path) {
                Ok(meta) => entries.push(meta),
                Err(e) => {
                    tracing::warn!("Skipping {:?} in index: {}", path, e);
                    report.skipped.push(SkippedFile {
                        file: path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.save(&entries)?;
        report.indexed = entries.len();

        tracing::info!(
            "Indexed {} posts ({} skipped) into {:?}",
            report.indexed,
            report.skipped.len(),
            self.path
        );
        Ok(report)
    }

    /// Read all entries in index order
    pub fn load(&self) -> Result<Vec<PostMeta>> {
        let content = fs::read_to_string(&self.path).map_err(|e| BlogError::io(&self.path, e))?;
        let entries: Vec<PostMeta> = serde_json::from_str(&content)?;
        Ok(entries)
    }

    /// Save entries to disk, replacing the previous file atomically.
    /// Each save stages into its own temp file next to the index.
    pub fn save(&self, entries: &[PostMeta]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| BlogError::io(dir, e))?;

        let content = serde_json::to_string_pretty(entries)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| BlogError::io(dir, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| BlogError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| BlogError::io(&self.path, e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PostStore, PostIndex) {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("content/blog");
        let store = PostStore::new(&dir);
        store.ensure_dir().unwrap();
        let index = PostIndex::new(dir.join("index.json"));
        (tmp, store, index)
    }

    #[test]
    fn test_build_writes_every_post() {
        let (_tmp, store, index) = setup();
        store
            .write("first", "---\ntitle: First\ndate: 2024-01-01\n---\nOne")
            .unwrap();
        store
            .write("second", "---\ntitle: Second\ndate: 2024-06-01\n---\nTwo")
            .unwrap();

        let report = index.build(&store).unwrap();
        assert_eq!(report.indexed, 2);
        assert!(report.skipped.is_empty());

        let entries = index.load().unwrap();
        let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second"]);

        let raw = fs::read_to_string(index.path()).unwrap();
        assert!(!raw.contains("One"), "index must not carry bodies");
    }

    #[test]
    fn test_build_skips_unparseable_files() {
        let (_tmp, store, index) = setup();
        store.write("good", "---\ntitle: Good\n---\nok").unwrap();
        store.write("bad", "---\nauthor: nobody\n---\nno title").unwrap();

        let report = index.build(&store).unwrap();
        assert_eq!(report.indexed, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].file, "bad.md");
        assert!(report.skipped[0].reason.contains("title"));
    }

    #[test]
    fn test_build_replaces_previous_index() {
        let (_tmp, store, index) = setup();
        store.write("a", "---\ntitle: A\n---\n").unwrap();
        index.build(&store).unwrap();
        store.remove("a").unwrap();
        index.build(&store).unwrap();

        assert!(index.load().unwrap().is_empty());
        let leftovers: Vec<_> = fs::read_dir(index.path().parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "index.json")
            .collect();
        assert!(leftovers.is_empty(), "temp files left: {:?}", leftovers);
    }

    #[test]
    fn test_concurrent_first_builds_all_succeed() {
        let (_tmp, store, index) = setup();
        for i in 0..20 {
            store
                .write(&format!("p{}", i), &format!("---\ntitle: P{}\n---\n", i))
                .unwrap();
        }

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (store, index) = (store.clone(), index.clone());
                std::thread::spawn(move || {
                    index.ensure_built(&store)?;
                    index.load()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap().len(), 20);
        }
    }

    #[test]
    fn test_ensure_built_keeps_existing_index() {
        let (_tmp, store, index) = setup();
        index.save(&[]).unwrap();
        store.write("late", "---\ntitle: Late\n---\n").unwrap();

        index.ensure_built(&store).unwrap();
        assert!(index.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_index_is_io_error() {
        let (_tmp, _store, index) = setup();
        assert!(matches!(index.load(), Err(BlogError::Io { .. })));
    }
}
