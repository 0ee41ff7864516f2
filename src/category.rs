//! This file defines the closed set of categories a mobile money transaction can be assigned to.
//! Unlike user-defined tags, the set of categories is fixed and every transaction has exactly one.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// The kind of mobile money transaction described by an SMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Money received from another party.
    IncomingMoney,
    /// Payments made to merchants with a payment code.
    PaymentsToCodeHolders,
    /// Transfers sent to another mobile number.
    TransfersToMobileNumbers,
    /// Deposits from a bank into the mobile money account.
    BankDeposits,
    /// Airtime and bill payments.
    AirtimeBillPayments,
    /// Electricity token purchases.
    CashPower,
    /// Cash withdrawn at an agent.
    Withdrawal,
    /// Transfers out to a bank account.
    BankTransfer,
    /// Internet and voice bundle purchases.
    Pack,
    /// Transactions initiated by a third party.
    ThirdParty,
    /// No category rule matched the message.
    Uncategorized,
}

impl Category {
    /// Every category, in the order they are listed in reports.
    pub const ALL: [Category; 11] = [
        Category::IncomingMoney,
        Category::PaymentsToCodeHolders,
        Category::TransfersToMobileNumbers,
        Category::BankDeposits,
        Category::AirtimeBillPayments,
        Category::CashPower,
        Category::Withdrawal,
        Category::BankTransfer,
        Category::Pack,
        Category::ThirdParty,
        Category::Uncategorized,
    ];

    /// The label stored in the database and used in JSON, e.g. "incoming_money".
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::IncomingMoney => "incoming_money",
            Category::PaymentsToCodeHolders => "payments_to_code_holders",
            Category::TransfersToMobileNumbers => "transfers_to_mobile_numbers",
            Category::BankDeposits => "bank_deposits",
            Category::AirtimeBillPayments => "airtime_bill_payments",
            Category::CashPower => "cash_power",
            Category::Withdrawal => "withdrawal",
            Category::BankTransfer => "bank_transfer",
            Category::Pack => "pack",
            Category::ThirdParty => "third_party",
            Category::Uncategorized => "uncategorized",
        }
    }

    /// The name shown to people on the dashboard.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::IncomingMoney => "Incoming Money",
            Category::PaymentsToCodeHolders => "Payments to Code Holders",
            Category::TransfersToMobileNumbers => "Transfer to Mobile Numbers",
            Category::BankDeposits => "Bank Deposits",
            Category::AirtimeBillPayments => "Airtime Purchase",
            Category::CashPower => "Cash Power",
            Category::Withdrawal => "Withdrawal",
            Category::BankTransfer => "Bank Transfer",
            Category::Pack => "Internet and Voice Bundle Purchases",
            Category::ThirdParty => "Third Party",
            Category::Uncategorized => "No category",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The label did not match any known category.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("\"{0}\" is not a valid category")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
            .ok_or_else(|| UnknownCategory(label.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Category, UnknownCategory};

    #[test]
    fn labels_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn labels_are_unique() {
        let labels: HashSet<_> = Category::ALL.iter().map(Category::as_str).collect();

        assert_eq!(labels.len(), Category::ALL.len());
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(
            "groceries".parse::<Category>(),
            Err(UnknownCategory("groceries".to_owned()))
        );
    }

    #[test]
    fn serializes_as_snake_case_label() {
        let json = serde_json::to_string(&Category::TransfersToMobileNumbers).unwrap();

        assert_eq!(json, "\"transfers_to_mobile_numbers\"");
    }
}
