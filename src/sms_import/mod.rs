//! Importing transactions from an SMS backup export.
//!
//! An import run reads every `<sms>` element in the export, drops one-time
//! password messages, extracts the amount, balance and transaction ID from
//! the rest, categorizes them and stores them in the database. Messages that
//! match no category are written to a JSON report for review.

mod batch;
mod buckets;
mod pipeline;
mod report;

pub use batch::{RawMessage, parse_batch, read_batch_file};
pub use buckets::CategoryBuckets;
pub use pipeline::{ImportConfig, ImportRun, ImportSummary, run_import};
pub use report::{UncategorizedEntry, write_uncategorized_report};
