//! Coordinate record storage.
//!
//! A record is the text of one route's coordinates, addressed by route id.
//! [`DirectoryStore`] keeps one `<routeId>.txt` file per route in a directory;
//! [`MemoryStore`] keeps records in memory.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;

use super::error::RouteError;

/// Default directory holding route records.
pub const DEFAULT_DESTINATIONS_DIR: &str = "destinations";

/// File extension of a route record.
pub const RECORD_EXTENSION: &str = "txt";

/// Source of coordinate records keyed by route id.
///
/// Uses boxed futures so the reader can hold an `Arc<dyn RouteStore>`.
pub trait RouteStore: Send + Sync {
    /// Read the raw record bytes for a route.
    ///
    /// Callers guarantee `route_id` is non-empty. Content is not decoded
    /// here; an unreadable line is a parse concern, not a storage one.
    fn read_record<'a>(&'a self, route_id: &'a str) -> BoxFuture<'a, Result<Vec<u8>, RouteError>>;

    /// List the ids of all routes held by the store, sorted.
    fn list_routes(&self) -> BoxFuture<'_, io::Result<Vec<String>>>;

    /// Human readable location of the store, for logs.
    fn describe(&self) -> String;
}

/// Reject ids that are not a single plain path component.
fn validate_route_id(route_id: &str) -> Result<(), RouteError> {
    let invalid = route_id == "."
        || route_id == ".."
        || route_id.contains('/')
        || route_id.contains('\\')
        || route_id.contains('\0');
    if invalid {
        return Err(RouteError::InvalidIdentifier(route_id.to_string()));
    }
    Ok(())
}

/// Records stored as `<directory>/<routeId>.txt` files.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    directory: PathBuf,
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_DESTINATIONS_DIR)
    }
}

impl DirectoryStore {
    /// Create a store rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory records are read from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the record for `route_id`.
    pub fn record_path(&self, route_id: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", route_id, RECORD_EXTENSION))
    }
}

impl RouteStore for DirectoryStore {
    fn read_record<'a>(&'a self, route_id: &'a str) -> BoxFuture<'a, Result<Vec<u8>, RouteError>> {
        Box::pin(async move {
            validate_route_id(route_id)?;
            let path = self.record_path(route_id);
            tokio::fs::read(&path)
                .await
                .map_err(|source| match source.kind() {
                    io::ErrorKind::NotFound => RouteError::RecordNotFound {
                        route_id: route_id.to_string(),
                        source,
                    },
                    _ => RouteError::Io {
                        route_id: route_id.to_string(),
                        source,
                    },
                })
        })
    }

    fn list_routes(&self) -> BoxFuture<'_, io::Result<Vec<String>>> {
        Box::pin(async move {
            let mut entries = tokio::fs::read_dir(&self.directory).await?;
            let mut ids = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                    continue;
                }
                if !entry.file_type().await?.is_file() {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
            ids.sort();
            Ok(ids)
        })
    }

    fn describe(&self) -> String {
        self.directory.display().to_string()
    }
}

/// In-memory records, keyed by route id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, builder style.
    pub fn with_record(mut self, route_id: impl Into<String>, text: impl Into<Vec<u8>>) -> Self {
        self.insert(route_id, text);
        self
    }

    /// Add or replace a record.
    pub fn insert(&mut self, route_id: impl Into<String>, text: impl Into<Vec<u8>>) {
        self.records.insert(route_id.into(), text.into());
    }
}

impl RouteStore for MemoryStore {
    fn read_record<'a>(&'a self, route_id: &'a str) -> BoxFuture<'a, Result<Vec<u8>, RouteError>> {
        let record = self
            .records
            .get(route_id)
            .cloned()
            .ok_or_else(|| RouteError::RecordNotFound {
                route_id: route_id.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such record in memory store"),
            });
        Box::pin(async move { record })
    }

    fn list_routes(&self) -> BoxFuture<'_, io::Result<Vec<String>>> {
        let ids = self.records.keys().cloned().collect();
        Box::pin(async move { Ok(ids) })
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_route_id() {
        assert!(validate_route_id("1").is_ok());
        assert!(validate_route_id("route-a.v2").is_ok());
        assert!(validate_route_id("..").is_err());
        assert!(validate_route_id(".").is_err());
        assert!(validate_route_id("../etc/passwd").is_err());
        assert!(validate_route_id("a\\b").is_err());
    }

    #[test]
    fn test_record_path() {
        let store = DirectoryStore::new("/data/destinations");
        assert_eq!(
            store.record_path("3"),
            PathBuf::from("/data/destinations/3.txt")
        );
    }

    #[tokio::test]
    async fn test_directory_store_reads_record() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1.txt"), "10.0,20.0\n").unwrap();

        let store = DirectoryStore::new(dir.path());
        assert_eq!(store.read_record("1").await.unwrap(), b"10.0,20.0\n");
    }

    #[tokio::test]
    async fn test_directory_store_returns_non_utf8_bytes() {
        let dir = TempDir::new().unwrap();
        let bytes = b"10.0,20.0\n1\xe9.0,22.0\n";
        std::fs::write(dir.path().join("1.txt"), bytes).unwrap();

        let store = DirectoryStore::new(dir.path());
        assert_eq!(store.read_record("1").await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_directory_store_missing_record() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path());

        let err = store.read_record("404").await.unwrap_err();
        assert!(matches!(err, RouteError::RecordNotFound { ref route_id, .. } if route_id == "404"));
    }

    #[tokio::test]
    async fn test_directory_store_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path());

        let err = store.read_record("../secret").await.unwrap_err();
        assert!(matches!(err, RouteError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_directory_store_lists_routes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("2.txt"), "").unwrap();
        std::fs::write(dir.path().join("1.txt"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let store = DirectoryStore::new(dir.path());
        assert_eq!(store.list_routes().await.unwrap(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new()
            .with_record("b", "1,2")
            .with_record("a", "3,4");

        assert_eq!(store.read_record("a").await.unwrap(), b"3,4");
        assert!(matches!(
            store.read_record("c").await,
            Err(RouteError::RecordNotFound { .. })
        ));
        assert_eq!(store.list_routes().await.unwrap(), vec!["a", "b"]);
        assert_eq!(store.describe(), "memory (2 records)");
    }
}
