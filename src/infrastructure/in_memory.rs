use crate::domain::identity::{Identity, IdentityId};
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{IdentityDirectory, KeyValueStore, PaymentSource};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory key-value store.
///
/// Clones share the same map, which lets a test hand one handle to a
/// `SessionManager` and inspect what it persisted through another.
#[derive(Default, Clone)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Creates a new, empty in-memory key-value store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

/// Service members keyed by national service id.
#[derive(Default, Clone)]
pub struct InMemoryIdentityDirectory {
    identities: Arc<HashMap<String, Identity>>,
}

impl InMemoryIdentityDirectory {
    pub fn new(identities: impl IntoIterator<Item = Identity>) -> Self {
        let identities = identities
            .into_iter()
            .map(|identity| (identity.national_service_id.clone(), identity))
            .collect();
        Self {
            identities: Arc::new(identities),
        }
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn lookup(&self, national_service_id: &str) -> Result<Option<Identity>> {
        Ok(self.identities.get(national_service_id).cloned())
    }
}

/// Payment months keyed by internal identity id.
#[derive(Default, Clone)]
pub struct InMemoryPaymentSource {
    records: Arc<HashMap<IdentityId, Vec<PaymentRecord>>>,
}

impl InMemoryPaymentSource {
    pub fn new(records: HashMap<IdentityId, Vec<PaymentRecord>>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

#[async_trait]
impl PaymentSource for InMemoryPaymentSource {
    async fn records_for(&self, identity: &IdentityId) -> Result<Vec<PaymentRecord>> {
        Ok(self.records.get(identity).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::catalog::Catalog;

    #[tokio::test]
    async fn test_in_memory_key_value_store() {
        let store = InMemoryKeyValueStore::new();
        store.set("jama_user", "{}".to_string()).await.unwrap();

        let shared = store.clone();
        assert_eq!(shared.get("jama_user").await.unwrap().as_deref(), Some("{}"));

        store.remove("jama_user").await.unwrap();
        assert!(shared.get("jama_user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_directory_lookup_by_service_id() {
        let catalog = Catalog::demo().unwrap();
        let directory = catalog.directory();

        let identity = directory.lookup("NS67890").await.unwrap().unwrap();
        assert_eq!(identity.id, IdentityId::new("2"));
        assert!(directory.lookup("ns67890").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_payment_source_unknown_identity_is_empty() {
        let source = Catalog::demo().unwrap().payments();
        assert_eq!(source.records_for(&IdentityId::new("1")).await.unwrap().len(), 6);
        assert!(source.records_for(&IdentityId::new("42")).await.unwrap().is_empty());
    }
}
