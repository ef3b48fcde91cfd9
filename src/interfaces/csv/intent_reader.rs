use crate::application::app::{Intent, PayoutForm};
use crate::domain::payment::PaymentMethod;
use crate::error::{JamaError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
enum IntentKind {
    Login,
    Verify,
    Signup,
    Logout,
    Dashboard,
    Payments,
    Select,
    Method,
    Confirm,
    Cancel,
    Transactions,
    Transaction,
    Profile,
    PayoutBank,
    PayoutMomo,
}

/// One line of an intent script: `intent, first, second, third`.
#[derive(Debug, Deserialize)]
struct IntentRow {
    intent: IntentKind,
    #[serde(default)]
    first: Option<String>,
    #[serde(default)]
    second: Option<String>,
    #[serde(default)]
    third: Option<String>,
}

fn required(field: Option<String>, kind: IntentKind, name: &str) -> Result<String> {
    field.ok_or_else(|| JamaError::InvalidIntent(format!("{kind:?} is missing {name}")))
}

fn record_id(field: Option<String>, kind: IntentKind) -> Result<u32> {
    let raw = required(field, kind, "a record id")?;
    raw.parse()
        .map_err(|_| JamaError::InvalidIntent(format!("'{raw}' is not a record id")))
}

impl TryFrom<IntentRow> for Intent {
    type Error = JamaError;

    fn try_from(row: IntentRow) -> Result<Self> {
        let kind = row.intent;
        let intent = match kind {
            IntentKind::Login => Intent::Login {
                service_id: required(row.first, kind, "a service id")?,
                password: row.second.unwrap_or_default(),
            },
            IntentKind::Verify => Intent::VerifyServiceId {
                service_id: row.first.unwrap_or_default(),
            },
            IntentKind::Signup => Intent::Signup {
                service_id: required(row.first, kind, "a service id")?,
                password: row.second.unwrap_or_default(),
                confirm: row.third.unwrap_or_default(),
            },
            IntentKind::Logout => Intent::Logout,
            IntentKind::Dashboard => Intent::Dashboard,
            IntentKind::Payments => Intent::Payments,
            IntentKind::Select => Intent::SelectRecord(record_id(row.first, kind)?),
            IntentKind::Method => {
                let raw = required(row.first, kind, "a payment method")?;
                Intent::SelectMethod(raw.parse::<PaymentMethod>().map_err(JamaError::InvalidIntent)?)
            }
            IntentKind::Confirm => Intent::ConfirmRequest,
            IntentKind::Cancel => Intent::CancelRequest,
            IntentKind::Transactions => Intent::Transactions,
            IntentKind::Transaction => Intent::Transaction(record_id(row.first, kind)?),
            IntentKind::Profile => Intent::Profile,
            IntentKind::PayoutBank => Intent::SavePayout(PayoutForm::Bank {
                bank: row.first.unwrap_or_default(),
                account_number: row.second.unwrap_or_default(),
                branch: row.third.unwrap_or_default(),
            }),
            IntentKind::PayoutMomo => Intent::SavePayout(PayoutForm::MobileMoney {
                provider: row.first.unwrap_or_default(),
                number: row.second.unwrap_or_default(),
            }),
        };
        Ok(intent)
    }
}

/// Reads member intents from a CSV script.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// so trailing empty columns may be omitted.
pub struct IntentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> IntentReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily parses each row into an [`Intent`].
    pub fn intents(self) -> impl Iterator<Item = Result<Intent>> {
        self.reader
            .into_deserialize::<IntentRow>()
            .map(|row| -> Result<Intent> { Intent::try_from(row?) })
    }
}
