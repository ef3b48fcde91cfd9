use crate::domain::payment::PaymentStatus;
use thiserror::Error;

/// Errors raised by the session, ledger and request workflow.
///
/// The `Display` text of the authentication variants is the message shown to
/// the user and stored on the session state.
#[derive(Error, Debug)]
pub enum JamaError {
    #[error("Invalid National Service ID or password")]
    InvalidCredentials,
    #[error("Invalid National Service ID")]
    UnknownServiceId,
    #[error("National Service ID is required")]
    ServiceIdRequired,
    #[error("Password should be at least 6 characters")]
    WeakPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Payment record {0} not found")]
    RecordNotFound(u32),
    #[error("Payment record {id} is {status} and cannot be requested")]
    RequestNotAllowed { id: u32, status: PaymentStatus },
    #[error("No payment request in progress")]
    NoActiveRequest,
    #[error("No payment method selected")]
    MethodNotSelected,
    #[error("Failed to parse stored session: {0}")]
    RestoreParseFailure(#[source] serde_json::Error),
    #[error("Missing information: {0}")]
    MissingPayoutDetails(&'static str),
    #[error("Mobile money number must be 10 digits")]
    InvalidMobileNumber,
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for JamaError {
    fn from(err: rocksdb::Error) -> Self {
        JamaError::Storage(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, JamaError>;
