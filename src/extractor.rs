//! Functions to extract transaction fields from the text of a mobile money SMS.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::Error;

/// Messages containing this phrase carry a one-time password, not a transaction.
const ONE_TIME_PASSWORD_MARKER: &str = "one-time password";

// Numerals are ASCII only, `str::parse` rejects other Unicode digits.
static AMOUNT_BEFORE_CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9][0-9,]*) RWF").expect("valid amount regex"));
static AMOUNT_AFTER_CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RWF ([0-9][0-9,]*)").expect("valid amount regex"));
static BALANCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)balance.*?([0-9][0-9,]*).*?\.").expect("valid balance regex"));
static TRANSACTION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TxId:\s?([0-9]+)").expect("valid transaction ID regex"));

/// The amount of money moved by a transaction.
///
/// An SMS without a recognisable amount is [Amount::Unknown], which is not
/// the same thing as an amount of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    /// The amount in Rwandan francs.
    Known(i64),
    /// No amount pattern matched.
    Unknown,
}

impl Amount {
    /// The amount as an option, `None` for [Amount::Unknown].
    pub fn value(&self) -> Option<i64> {
        match self {
            Amount::Known(amount) => Some(*amount),
            Amount::Unknown => None,
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Amount::Known(amount) => serializer.serialize_i64(*amount),
            Amount::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

/// Hands out transaction IDs for messages that do not carry a `TxId`.
///
/// The counter lives for a single import run and starts at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticIdCounter {
    next: u64,
}

impl SyntheticIdCounter {
    /// Create a counter whose first ID is 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next ID, advancing the counter.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for SyntheticIdCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// The fields extracted from a single SMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    /// The original text of the SMS.
    pub body: String,
    /// The amount of money moved, if it could be found.
    pub amount: Amount,
    /// The account balance after the transaction, zero if it was not found.
    pub balance: i64,
    /// The `TxId` from the message, or a synthetic ID if there was none.
    pub transaction_id: String,
    /// When the SMS was received, as shown on the phone.
    pub readable_date: String,
}

/// The outcome of extracting an SMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The SMS is not a transaction and should be ignored.
    Skip,
    /// The SMS describes a transaction.
    Message(ExtractedMessage),
}

/// Extract the transaction fields from an SMS `body`.
///
/// One-time password messages are skipped before any other work is done, so
/// they never consume a synthetic ID. Messages without a `TxId` are given the
/// next ID from `synthetic_ids`.
///
/// # Errors
/// Returns [Error::InvalidNumber] if a matched numeral does not fit in an `i64`.
pub fn extract_message(
    body: &str,
    readable_date: &str,
    synthetic_ids: &mut SyntheticIdCounter,
) -> Result<Extraction, Error> {
    if body.contains(ONE_TIME_PASSWORD_MARKER) {
        return Ok(Extraction::Skip);
    }

    let amount = extract_amount(body)?;
    let balance = extract_balance(body)?;
    let transaction_id = match extract_transaction_id(body) {
        Some(transaction_id) => transaction_id.to_owned(),
        None => synthetic_ids.next_id().to_string(),
    };

    Ok(Extraction::Message(ExtractedMessage {
        body: body.to_owned(),
        amount,
        balance,
        transaction_id,
        readable_date: readable_date.to_owned(),
    }))
}

fn extract_amount(body: &str) -> Result<Amount, Error> {
    let numeral = AMOUNT_BEFORE_CURRENCY
        .captures(body)
        .or_else(|| AMOUNT_AFTER_CURRENCY.captures(body))
        .and_then(|captures| captures.get(1));

    match numeral {
        Some(numeral) => parse_numeral(numeral.as_str()).map(Amount::Known),
        None => Ok(Amount::Unknown),
    }
}

fn extract_balance(body: &str) -> Result<i64, Error> {
    match BALANCE.captures(body).and_then(|captures| captures.get(1)) {
        Some(numeral) => parse_numeral(numeral.as_str()),
        None => Ok(0),
    }
}

fn extract_transaction_id(body: &str) -> Option<&str> {
    TRANSACTION_ID
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Parse a numeral with comma thousands separators, e.g. "1,000".
fn parse_numeral(numeral: &str) -> Result<i64, Error> {
    numeral
        .replace(',', "")
        .parse()
        .map_err(|_| Error::InvalidNumber(numeral.to_owned()))
}
