use crate::domain::ports::KeyValueStore;
use crate::error::{JamaError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for the persisted session entries.
pub const CF_SESSION: &str = "session";

/// A persistent key-value store implementation using RocksDB.
///
/// Keeps the session payload across process restarts. Values are stored as
/// UTF-8 strings in their own Column Family.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "session" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_session = ColumnFamilyDescriptor::new(CF_SESSION, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_session])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn missing_cf() -> JamaError {
        JamaError::Storage(Box::new(std::io::Error::other(
            "Session column family not found",
        )))
    }
}

#[async_trait]
impl KeyValueStore for RocksDBStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let cf = self.db.cf_handle(CF_SESSION).ok_or_else(Self::missing_cf)?;

        match self.db.get_cf(&cf, key.as_bytes())? {
            Some(bytes) => {
                let value = String::from_utf8(bytes).map_err(|e| {
                    JamaError::Storage(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Stored value is not UTF-8: {}", e),
                    )))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let cf = self.db.cf_handle(CF_SESSION).ok_or_else(Self::missing_cf)?;
        self.db.put_cf(&cf, key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let cf = self.db.cf_handle(CF_SESSION).ok_or_else(Self::missing_cf)?;
        self.db.delete_cf(&cf, key.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_SESSION).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_key_value_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        store.set("jama_user", "{\"id\":\"1\"}".to_string()).await.unwrap();
        assert_eq!(
            store.get("jama_user").await.unwrap().as_deref(),
            Some("{\"id\":\"1\"}")
        );

        store.remove("jama_user").await.unwrap();
        assert!(store.get("jama_user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.set("jama_user", "payload".to_string()).await.unwrap();
        }

        let reopened = RocksDBStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("jama_user").await.unwrap().as_deref(),
            Some("payload")
        );
    }
}
