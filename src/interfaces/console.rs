use crate::application::app::Screen;
use crate::domain::payment::{Money, PaymentRecord};
use std::io::{self, Write};

/// Renders screens as plain text, one block per screen.
pub struct ScreenWriter<W: Write> {
    out: W,
}

impl<W: Write> ScreenWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_screen(&mut self, screen: &Screen) -> io::Result<()> {
        match screen {
            Screen::Loading => writeln!(self.out, "Loading...")?,
            Screen::Login { error } => {
                writeln!(self.out, "== Login ==")?;
                if let Some(error) = error {
                    writeln!(self.out, "error: {error}")?;
                }
            }
            Screen::Signup { verified, error } => {
                writeln!(self.out, "== Signup ==")?;
                if let Some(member) = verified {
                    writeln!(self.out, "verified: {} ({})", member.national_service_id, member.name)?;
                }
                if let Some(error) = error {
                    writeln!(self.out, "error: {error}")?;
                }
            }
            Screen::Dashboard { member, summary } => {
                writeln!(self.out, "== Dashboard: {} ==", member.name)?;
                writeln!(self.out, "unpaid months: {}", summary.unpaid_count)?;
                writeln!(self.out, "requested months: {}", summary.requested_count)?;
                writeln!(self.out, "total unpaid: {}", summary.total_unpaid)?;
                writeln!(self.out, "total requested: {}", summary.total_ever_requested)?;
                writeln!(self.out, "period: {}", summary.period_text)?;
                for record in &summary.recent {
                    self.write_record(record)?;
                }
            }
            Screen::Payments { unpaid, notice } => {
                writeln!(self.out, "== Payments ==")?;
                if let Some(notice) = notice {
                    writeln!(self.out, "notice: {notice}")?;
                }
                if unpaid.is_empty() {
                    writeln!(self.out, "No unpaid months found")?;
                }
                for record in unpaid {
                    self.write_record(record)?;
                }
            }
            Screen::MethodSelection(context) => {
                let quote = context.quote();
                writeln!(
                    self.out,
                    "== Payment Method: {} {} ==",
                    context.record.month, context.record.year
                )?;
                if let Some(method) = context.method {
                    writeln!(self.out, "method: {method}")?;
                }
                self.write_fees(quote.amount, quote.service_fee, quote.net_amount)?;
            }
            Screen::Confirmation(confirmation) => {
                writeln!(self.out, "== Payment Request Submitted ==")?;
                writeln!(
                    self.out,
                    "{} {}: you'll receive {} via {}",
                    confirmation.month,
                    confirmation.year,
                    confirmation.net_amount(),
                    confirmation.method
                )?;
            }
            Screen::Transactions(records) => {
                writeln!(self.out, "== Transactions ==")?;
                if records.is_empty() {
                    writeln!(self.out, "No transaction records found")?;
                }
                for record in records {
                    self.write_record(record)?;
                }
            }
            Screen::TransactionDetail(detail) => {
                writeln!(self.out, "== Transaction {} ==", detail.reference)?;
                writeln!(
                    self.out,
                    "{} {}: {} ({})",
                    detail.record.month,
                    detail.record.year,
                    detail.status_label,
                    detail.headline()
                )?;
                self.write_fees(
                    detail.fees.amount,
                    detail.fees.service_fee,
                    detail.fees.net_amount,
                )?;
            }
            Screen::TransactionNotFound(id) => {
                writeln!(self.out, "Transaction {id} not found")?;
            }
            Screen::Profile {
                member,
                payout,
                notice,
            } => {
                writeln!(self.out, "== Profile: {} ==", member.name)?;
                if let Some(notice) = notice {
                    writeln!(self.out, "notice: {notice}")?;
                }
                writeln!(self.out, "{} at {}", member.position, member.institution)?;
                writeln!(self.out, "{}, {}", member.district, member.region)?;
                writeln!(self.out, "service: {} - {}", member.start_date, member.end_date)?;
                match payout {
                    Some(payout) => writeln!(self.out, "payout: {payout}")?,
                    None => writeln!(self.out, "payout: not set")?,
                }
            }
            Screen::PayoutEditor { error } => {
                writeln!(self.out, "== Payment Method ==")?;
                writeln!(self.out, "error: {error}")?;
            }
        }
        self.out.flush()
    }

    fn write_record(&mut self, record: &PaymentRecord) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{} {},{},{},{}",
            record.id,
            record.month,
            record.year,
            Money::from(record.amount),
            record.status,
            record.due_date
        )
    }

    fn write_fees(&mut self, amount: Money, fee: Money, net: Money) -> io::Result<()> {
        writeln!(self.out, "amount: {amount}")?;
        writeln!(self.out, "service fee: {fee}")?;
        writeln!(self.out, "you'll receive: {net}")
    }
}
