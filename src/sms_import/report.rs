//! The report of messages that no category rule matched.

use std::{fs, path::Path};

use serde::Serialize;

use crate::{
    Error,
    extractor::{Amount, ExtractedMessage},
};

/// A message in the uncategorized report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UncategorizedEntry<'a> {
    /// The transaction ID, either from the message or synthesized.
    pub transaction_id: &'a str,
    /// The amount, serialized as the string "Unknown" if it was not found.
    pub amount: Amount,
    /// When the SMS was received.
    pub date: &'a str,
    /// The text of the SMS.
    pub body: &'a str,
}

impl<'a> From<&'a ExtractedMessage> for UncategorizedEntry<'a> {
    fn from(message: &'a ExtractedMessage) -> Self {
        Self {
            transaction_id: &message.transaction_id,
            amount: message.amount,
            date: &message.readable_date,
            body: &message.body,
        }
    }
}

/// Write `messages` to `path` as a pretty-printed JSON array, replacing any previous report.
///
/// # Errors
/// Returns an [Error::ReportWriteError] if the file cannot be written.
pub fn write_uncategorized_report(messages: &[ExtractedMessage], path: &Path) -> Result<(), Error> {
    let entries: Vec<UncategorizedEntry> = messages.iter().map(UncategorizedEntry::from).collect();
    let json = serde_json::to_string_pretty(&entries)?;

    fs::write(path, json).map_err(|error| Error::ReportWriteError {
        path: path.display().to_string(),
        reason: error.to_string(),
    })?;

    tracing::debug!(
        "Wrote {} uncategorized messages to {}",
        entries.len(),
        path.display()
    );

    Ok(())
}
