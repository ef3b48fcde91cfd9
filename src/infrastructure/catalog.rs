//! The bundled demo catalog of service members and their payment months.

use super::in_memory::{InMemoryIdentityDirectory, InMemoryPaymentSource};
use crate::domain::identity::{Identity, IdentityId};
use crate::domain::payment::PaymentRecord;
use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;

const DEMO_CATALOG: &str = include_str!("catalog.json");

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    users: Vec<Identity>,
    payments: HashMap<IdentityId, Vec<PaymentRecord>>,
}

impl Catalog {
    /// Parses a catalog document (`users` plus `payments` keyed by internal id).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The two demo members `NS12345` and `NS67890`.
    pub fn demo() -> Result<Self> {
        Self::from_json(DEMO_CATALOG)
    }

    pub fn directory(&self) -> InMemoryIdentityDirectory {
        InMemoryIdentityDirectory::new(self.users.clone())
    }

    pub fn payments(&self) -> InMemoryPaymentSource {
        InMemoryPaymentSource::new(self.payments.clone())
    }
}
