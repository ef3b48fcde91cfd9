use crate::error::JamaError;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// A monetary total in cedis.
///
/// Wraps `rust_decimal::Decimal` so aggregation never picks up floating-point
/// drift. Values are kept exact and only rounded when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Value rounded half away from zero to 2 decimal places.
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GH₵ {:.2}", self.rounded())
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

/// The allowance amount of a single payment month.
///
/// Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, JamaError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(JamaError::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = JamaError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Money {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Pending,
    Paid,
    Requested,
}

impl PaymentStatus {
    /// Label shown in history lists. Requested records read as "Processing".
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Requested => "Processing",
        }
    }

    /// Whether the allowance has been claimed, either through an early
    /// request or the regular payout.
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Requested | PaymentStatus::Paid)
    }

    /// Whether the allowance is still owed by the service authority.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, PaymentStatus::Unpaid | PaymentStatus::Requested)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Requested => "requested",
        };
        f.write_str(s)
    }
}

/// How an early payout is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "momo")]
    MobileMoney,
    #[serde(rename = "bank")]
    BankTransfer,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::MobileMoney => f.write_str("Mobile Money"),
            PaymentMethod::BankTransfer => f.write_str("Bank Transfer"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "momo" | "mobile-money" => Ok(PaymentMethod::MobileMoney),
            "bank" | "bank-transfer" => Ok(PaymentMethod::BankTransfer),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

/// One billing month of a member's allowance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: u32,
    pub month: String,
    pub year: i32,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub due_date: NaiveDate,
}

impl PaymentRecord {
    /// `"Nov, 2023"`: abbreviated month and year.
    pub fn short_period(&self) -> String {
        let month: String = self.month.chars().take(3).collect();
        format!("{}, {}", month, self.year)
    }

    /// Transaction reference, the id zero-padded to six digits.
    pub fn reference(&self) -> String {
        format!("#{:06}", self.id)
    }
}
