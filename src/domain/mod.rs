//! Domain types and the ports the application layer depends on.

pub mod aggregates;
pub mod fees;
pub mod identity;
pub mod payment;
pub mod payout;
pub mod ports;
