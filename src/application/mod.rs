//! Application layer: the session, the payment ledger, the request workflow
//! and the facade that routes member intents between them.
//!
//! Each component owns its state explicitly and is handed its ports at
//! construction; nothing here is a process-wide singleton.

pub mod app;
pub mod latency;
pub mod ledger;
pub mod session;
pub mod workflow;
