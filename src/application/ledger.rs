use super::latency::{InFlight, Latency};
use crate::domain::aggregates::{self, DashboardSummary};
use crate::domain::identity::IdentityId;
use crate::domain::payment::{Money, PaymentRecord, PaymentStatus};
use crate::domain::ports::{PaymentSource, PaymentSourceBox};
use crate::error::{JamaError, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct LedgerState {
    owner: Option<IdentityId>,
    records: Vec<PaymentRecord>,
}

/// The payment months of the signed-in member.
///
/// Aggregates are computed from the records on every call; nothing derived
/// is stored alongside them. Clones share the same collection.
#[derive(Clone)]
pub struct PaymentLedger {
    source: Arc<dyn PaymentSource>,
    latency: Latency,
    in_flight: InFlight,
    state: Arc<RwLock<LedgerState>>,
}

impl PaymentLedger {
    pub fn new(source: PaymentSourceBox, latency: Latency) -> Self {
        Self {
            source: Arc::from(source),
            latency,
            in_flight: InFlight::default(),
            state: Arc::new(RwLock::new(LedgerState::default())),
        }
    }

    /// Replaces the collection with the records of `identity`.
    ///
    /// `None` clears the ledger. Returns the number of records loaded.
    pub async fn load(&self, identity: Option<&IdentityId>) -> Result<usize> {
        let records = match identity {
            Some(id) => self.source.records_for(id).await?,
            None => Vec::new(),
        };

        let mut state = self.state.write().await;
        state.owner = identity.cloned();
        state.records = records;
        debug!(owner = ?state.owner, count = state.records.len(), "Ledger loaded");
        Ok(state.records.len())
    }

    /// Marks an unpaid record as requested.
    ///
    /// Suspends on the configured latency first. Fails with
    /// [`JamaError::RecordNotFound`] when the id is not in the collection and
    /// [`JamaError::RequestNotAllowed`] when the record is not unpaid.
    pub async fn request_payment(&self, record_id: u32) -> Result<PaymentRecord> {
        let _busy = self.in_flight.enter();
        self.latency.wait().await;

        let mut state = self.state.write().await;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or(JamaError::RecordNotFound(record_id))?;

        if record.status != PaymentStatus::Unpaid {
            return Err(JamaError::RequestNotAllowed {
                id: record.id,
                status: record.status,
            });
        }

        record.status = PaymentStatus::Requested;
        info!(
            record = record.id,
            month = %record.month,
            year = record.year,
            "Payment requested"
        );
        Ok(record.clone())
    }

    /// True while a payment request is suspended on its latency.
    pub async fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    pub async fn owner(&self) -> Option<IdentityId> {
        self.state.read().await.owner.clone()
    }

    pub async fn records(&self) -> Vec<PaymentRecord> {
        self.state.read().await.records.clone()
    }

    pub async fn record(&self, record_id: u32) -> Option<PaymentRecord> {
        let state = self.state.read().await;
        state.records.iter().find(|r| r.id == record_id).cloned()
    }

    pub async fn unpaid_count(&self) -> usize {
        aggregates::unpaid_count(&self.state.read().await.records)
    }

    pub async fn requested_count(&self) -> usize {
        aggregates::requested_count(&self.state.read().await.records)
    }

    pub async fn total_unpaid(&self) -> Money {
        aggregates::total_unpaid(&self.state.read().await.records)
    }

    pub async fn total_ever_requested(&self) -> Money {
        aggregates::total_ever_requested(&self.state.read().await.records)
    }

    pub async fn unpaid_date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        aggregates::unpaid_date_range(&self.state.read().await.records)
    }

    pub async fn recent_transactions(&self, n: usize) -> Vec<PaymentRecord> {
        aggregates::recent_transactions(&self.state.read().await.records, n)
    }

    pub async fn transaction_history(&self) -> Vec<PaymentRecord> {
        aggregates::transaction_history(&self.state.read().await.records)
    }

    pub async fn unpaid_records(&self) -> Vec<PaymentRecord> {
        aggregates::unpaid_records(&self.state.read().await.records)
    }

    pub async fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_records(&self.state.read().await.records)
    }
}
