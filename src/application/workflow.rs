use super::ledger::PaymentLedger;
use crate::domain::fees::FeeBreakdown;
use crate::domain::payment::{Amount, Money, PaymentMethod, PaymentRecord, PaymentStatus};
use crate::error::{JamaError, Result};
use tracing::{debug, warn};

/// The parts of a record a request needs, frozen when it is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSnapshot {
    pub id: u32,
    pub month: String,
    pub year: i32,
    pub amount: Amount,
}

impl From<&PaymentRecord> for RecordSnapshot {
    fn from(record: &PaymentRecord) -> Self {
        Self {
            id: record.id,
            month: record.month.clone(),
            year: record.year,
            amount: record.amount,
        }
    }
}

/// Working state of one in-flight payment request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub record: RecordSnapshot,
    pub method: Option<PaymentMethod>,
    pub fees: Option<FeeBreakdown>,
}

impl RequestContext {
    /// Fee preview shown before a method is picked.
    pub fn quote(&self) -> FeeBreakdown {
        self.fees
            .unwrap_or_else(|| FeeBreakdown::for_amount(self.record.amount))
    }
}

/// What the member is told once the request has been recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub record_id: u32,
    pub month: String,
    pub year: i32,
    pub method: PaymentMethod,
    pub fees: FeeBreakdown,
}

impl Confirmation {
    pub fn net_amount(&self) -> Money {
        self.fees.net_amount
    }
}

/// Carries one unpaid record through method selection to a ledger update.
///
/// Holds at most one [`RequestContext`]. Steps entered without one fail with
/// [`JamaError::NoActiveRequest`], which callers answer by going back to the
/// list of unpaid months.
#[derive(Debug, Default)]
pub struct RequestWorkflow {
    context: Option<RequestContext>,
}

impl RequestWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request for `record`, replacing any request in progress.
    pub fn begin(&mut self, record: &PaymentRecord) -> Result<&RequestContext> {
        if record.status != PaymentStatus::Unpaid {
            return Err(JamaError::RequestNotAllowed {
                id: record.id,
                status: record.status,
            });
        }
        debug!(record = record.id, "Request started");
        Ok(&*self.context.insert(RequestContext {
            record: RecordSnapshot::from(record),
            method: None,
            fees: None,
        }))
    }

    /// Chooses the payout method and prices the request.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<&RequestContext> {
        let context = self.context.as_mut().ok_or(JamaError::NoActiveRequest)?;
        context.method = Some(method);
        context.fees = Some(FeeBreakdown::for_amount(context.record.amount));
        Ok(&*context)
    }

    /// Submits the request to the ledger.
    ///
    /// The context is consumed whether or not the ledger accepts it; on
    /// failure the caller should return to record selection.
    pub async fn confirm(&mut self, ledger: &PaymentLedger) -> Result<Confirmation> {
        let context = self.context.take().ok_or(JamaError::NoActiveRequest)?;
        let (Some(method), Some(fees)) = (context.method, context.fees) else {
            self.context = Some(context);
            return Err(JamaError::MethodNotSelected);
        };

        if let Err(e) = ledger.request_payment(context.record.id).await {
            warn!(record = context.record.id, error = %e, "Payment request failed");
            return Err(e);
        }

        Ok(Confirmation {
            record_id: context.record.id,
            month: context.record.month,
            year: context.record.year,
            method,
            fees,
        })
    }

    /// Drops the request in progress, if any.
    pub fn abandon(&mut self) {
        if let Some(context) = self.context.take() {
            debug!(record = context.record.id, "Request abandoned");
        }
    }

    /// The request in progress, or [`JamaError::NoActiveRequest`].
    pub fn current(&self) -> Result<&RequestContext> {
        self.context.as_ref().ok_or(JamaError::NoActiveRequest)
    }
}
