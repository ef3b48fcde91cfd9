use super::payment::{Amount, Money, PaymentRecord, PaymentStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Platform fee deducted from every early payout.
pub const SERVICE_FEE_RATE: Decimal = dec!(0.04);

/// What a member is charged and receives for one early payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub amount: Money,
    pub service_fee: Money,
    pub net_amount: Money,
}

impl FeeBreakdown {
    pub fn for_amount(amount: Amount) -> Self {
        let amount = Money::from(amount);
        let service_fee = Money::new(amount.value() * SERVICE_FEE_RATE);
        Self {
            amount,
            service_fee,
            net_amount: amount - service_fee,
        }
    }

    /// No fee charged, for months that were never claimed early.
    pub fn waived(amount: Amount) -> Self {
        let amount = Money::from(amount);
        Self {
            amount,
            service_fee: Money::ZERO,
            net_amount: amount,
        }
    }
}

/// A history entry as shown on its detail screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDetail {
    pub record: PaymentRecord,
    pub reference: String,
    pub status_label: &'static str,
    pub fees: FeeBreakdown,
}

impl TransactionDetail {
    /// The fee only applies once the month has been requested or paid out.
    pub fn from_record(record: &PaymentRecord) -> Self {
        let fees = if record.status.is_settled() {
            FeeBreakdown::for_amount(record.amount)
        } else {
            FeeBreakdown::waived(record.amount)
        };
        Self {
            record: record.clone(),
            reference: record.reference(),
            status_label: record.status.label(),
            fees,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self.record.status {
            PaymentStatus::Requested => "Your payment is being processed",
            PaymentStatus::Paid => "Payment completed",
            PaymentStatus::Unpaid | PaymentStatus::Pending => "Not yet processed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            id: 3,
            month: "November".to_string(),
            year: 2023,
            amount: Amount::new(dec!(559.00)).unwrap(),
            status,
            due_date: NaiveDate::from_ymd_opt(2023, 12, 15).unwrap(),
        }
    }

    #[test]
    fn test_fee_for_standard_allowance() {
        let fees = FeeBreakdown::for_amount(Amount::new(dec!(559.00)).unwrap());
        assert_eq!(fees.service_fee.rounded(), dec!(22.36));
        assert_eq!(fees.net_amount.rounded(), dec!(536.64));
        assert_eq!(fees.service_fee + fees.net_amount, fees.amount);
    }

    #[test]
    fn test_fee_keeps_full_precision_until_display() {
        let fees = FeeBreakdown::for_amount(Amount::new(dec!(10.01)).unwrap());
        assert_eq!(fees.service_fee.value(), dec!(0.4004));
        assert_eq!(fees.service_fee.to_string(), "GH₵ 0.40");
    }

    #[test]
    fn test_detail_fee_only_for_settled_records() {
        let unpaid = TransactionDetail::from_record(&record(PaymentStatus::Unpaid));
        assert_eq!(unpaid.fees.service_fee, Money::ZERO);
        assert_eq!(unpaid.headline(), "Not yet processed");

        let requested = TransactionDetail::from_record(&record(PaymentStatus::Requested));
        assert_eq!(requested.fees.service_fee.rounded(), dec!(22.36));
        assert_eq!(requested.status_label, "Processing");
        assert_eq!(requested.reference, "#000003");
    }
}
