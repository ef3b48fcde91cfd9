//! Payout destinations a member can save from the profile screen.

use crate::error::JamaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Gcb,
    Ecobank,
    Stanbic,
    Absa,
    Cal,
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bank::Gcb => "Ghana Commercial Bank",
            Bank::Ecobank => "Ecobank",
            Bank::Stanbic => "Stanbic Bank",
            Bank::Absa => "Absa Bank",
            Bank::Cal => "CAL Bank",
        };
        f.write_str(name)
    }
}

impl FromStr for Bank {
    type Err = JamaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcb" => Ok(Bank::Gcb),
            "ecobank" => Ok(Bank::Ecobank),
            "stanbic" => Ok(Bank::Stanbic),
            "absa" => Ok(Bank::Absa),
            "cal" => Ok(Bank::Cal),
            _ => Err(JamaError::MissingPayoutDetails("Please fill all bank details")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MobileProvider {
    Mtn,
    Telecel,
    AirtelTigo,
}

impl fmt::Display for MobileProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MobileProvider::Mtn => "MTN Mobile Money",
            MobileProvider::Telecel => "Telecel Cash",
            MobileProvider::AirtelTigo => "AirtelTigo Money",
        };
        f.write_str(name)
    }
}

impl FromStr for MobileProvider {
    type Err = JamaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mtn" => Ok(MobileProvider::Mtn),
            "telecel" => Ok(MobileProvider::Telecel),
            "airteltigo" => Ok(MobileProvider::AirtelTigo),
            _ => Err(JamaError::MissingPayoutDetails(
                "Please fill all mobile money details",
            )),
        }
    }
}

/// A validated payout destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PayoutAccount {
    Bank {
        bank: Bank,
        account_number: String,
        branch: String,
    },
    #[serde(rename = "momo")]
    MobileMoney {
        provider: MobileProvider,
        number: String,
    },
}

impl PayoutAccount {
    /// Builds a bank payout account. Every field is required.
    pub fn bank(bank: &str, account_number: &str, branch: &str) -> Result<Self, JamaError> {
        let (account_number, branch) = (account_number.trim(), branch.trim());
        if bank.trim().is_empty() || account_number.is_empty() || branch.is_empty() {
            return Err(JamaError::MissingPayoutDetails("Please fill all bank details"));
        }
        Ok(PayoutAccount::Bank {
            bank: bank.parse()?,
            account_number: account_number.to_string(),
            branch: branch.to_string(),
        })
    }

    /// Builds a mobile money payout account. The number must be exactly 10 digits.
    pub fn mobile_money(provider: &str, number: &str) -> Result<Self, JamaError> {
        let number = number.trim();
        if provider.trim().is_empty() || number.is_empty() {
            return Err(JamaError::MissingPayoutDetails(
                "Please fill all mobile money details",
            ));
        }
        if number.len() != 10 || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(JamaError::InvalidMobileNumber);
        }
        Ok(PayoutAccount::MobileMoney {
            provider: provider.parse()?,
            number: number.to_string(),
        })
    }
}

impl fmt::Display for PayoutAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoutAccount::Bank {
                bank,
                account_number,
                branch,
            } => write!(f, "{bank} {account_number} ({branch})"),
            PayoutAccount::MobileMoney { provider, number } => write!(f, "{provider} {number}"),
        }
    }
}
