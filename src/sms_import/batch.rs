//! Reads the SMS backup XML export that transactions are imported from.
//!
//! The export looks like:
//!
//! ```xml
//! <smses count="2">
//!   <sms protocol="0" address="M-Money" date="1715351458724" body="You have received 2000 RWF..." readable_date="10 May 2024 4:30:58 PM" />
//!   <sms protocol="0" address="M-Money" date="1715351506754" body="TxId: 73214484437. Your payment..." readable_date="10 May 2024 4:31:46 PM" />
//! </smses>
//! ```

use std::{fs, path::Path};

use crate::Error;

/// A single SMS as it appears in the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// The text of the SMS.
    pub body: String,
    /// The raw timestamp in milliseconds since the Unix epoch, as text.
    pub date: String,
    /// The timestamp as shown on the phone, e.g. "10 May 2024 4:30:58 PM".
    pub readable_date: String,
}

/// Read and parse the SMS export at `path`.
///
/// # Errors
/// Returns an [Error::BatchSourceUnreadable] if the file cannot be read, or an
/// [Error::InvalidBatchSource] if it is not valid XML.
pub fn read_batch_file(path: &Path) -> Result<Vec<RawMessage>, Error> {
    let text = fs::read_to_string(path).map_err(|error| Error::BatchSourceUnreadable {
        path: path.display().to_string(),
        reason: error.to_string(),
    })?;

    tracing::debug!("Read batch source {} ({} bytes)", path.display(), text.len());

    parse_batch(&text)
}

/// Parse the `<sms>` elements that are direct children of the document's root element.
///
/// Missing attributes are read as empty strings.
///
/// # Errors
/// Returns an [Error::InvalidBatchSource] if `text` is not valid XML.
pub fn parse_batch(text: &str) -> Result<Vec<RawMessage>, Error> {
    let document = roxmltree::Document::parse(text)
        .map_err(|error| Error::InvalidBatchSource(error.to_string()))?;

    let messages = document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("sms"))
        .map(|node| RawMessage {
            body: node.attribute("body").unwrap_or_default().to_owned(),
            date: node.attribute("date").unwrap_or_default().to_owned(),
            readable_date: node.attribute("readable_date").unwrap_or_default().to_owned(),
        })
        .collect();

    Ok(messages)
}
