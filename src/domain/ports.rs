use super::identity::{Identity, IdentityId};
use super::payment::PaymentRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Read-only catalog of registered service members.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn lookup(&self, national_service_id: &str) -> Result<Option<Identity>>;
}

/// Read-only source of each member's payment months, in catalog order.
#[async_trait]
pub trait PaymentSource: Send + Sync {
    async fn records_for(&self, identity: &IdentityId) -> Result<Vec<PaymentRecord>>;
}

/// Minimal string key-value persistence used for the session payload.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

pub type IdentityDirectoryBox = Box<dyn IdentityDirectory>;
pub type PaymentSourceBox = Box<dyn PaymentSource>;
pub type KeyValueStoreBox = Box<dyn KeyValueStore>;
