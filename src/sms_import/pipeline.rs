//! Drives an import run: extract, categorize and store each SMS in the batch.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use rusqlite::Connection;
use serde_json::json;

use crate::{
    Error,
    category::Category,
    classifier::categorize,
    extractor::{ExtractedMessage, Extraction, SyntheticIdCounter, extract_message},
    sms_import::{
        batch::{RawMessage, read_batch_file},
        buckets::CategoryBuckets,
        report::write_uncategorized_report,
    },
    transaction::{
        NewTransaction, NewTransactionDetail, Transaction, TransactionDetail, create_transaction,
        create_transaction_detail,
    },
};

const COMPLETED_STATUS: &str = "Completed";
const COMPLETED_DESCRIPTION: &str = "Transaction completed";
const AUTOMATED_NOTE: &str = "Automated transaction";

/// Where an import run reads its messages from and writes its report to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// The SMS backup XML export.
    pub batch_path: PathBuf,
    /// Where to write the JSON report of uncategorized messages.
    pub report_path: PathBuf,
}

/// The counts collected over an import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// The number of messages in the batch.
    pub messages_read: usize,
    /// The number of one-time password messages that were skipped.
    pub one_time_passwords_skipped: usize,
    /// The number of messages that were extracted and categorized.
    pub processed: usize,
    /// The number of transactions that were stored in the database.
    pub persisted: usize,
    /// The number of processed messages per category.
    pub category_counts: Vec<(Category, usize)>,
}

/// The state of a single import run.
///
/// Owns the synthetic transaction ID counter and the category buckets, both of
/// which start fresh for every run.
#[derive(Debug, Default)]
pub struct ImportRun {
    synthetic_ids: SyntheticIdCounter,
    buckets: CategoryBuckets,
    messages_read: usize,
    one_time_passwords_skipped: usize,
    persisted: usize,
}

impl ImportRun {
    /// Start a new run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Import `messages` in order.
    ///
    /// Failing to store a message is logged and does not stop the run.
    ///
    /// # Errors
    /// Returns an [Error::InvalidNumber] if a message contains an amount or
    /// balance that cannot be parsed, which aborts the run.
    pub fn import_all(&mut self, messages: &[RawMessage], connection: &Connection) -> Result<(), Error> {
        for message in messages {
            self.import_message(message, connection)?;
        }

        Ok(())
    }

    /// Extract, categorize and store a single message.
    ///
    /// The transaction and its detail are each written in their own SQL
    /// transaction, so a failure only discards the writes for this message.
    ///
    /// # Errors
    /// Returns an [Error::InvalidNumber] if the message contains an amount or
    /// balance that cannot be parsed.
    pub fn import_message(&mut self, message: &RawMessage, connection: &Connection) -> Result<(), Error> {
        self.messages_read += 1;

        let extracted = match extract_message(&message.body, &message.readable_date, &mut self.synthetic_ids)? {
            Extraction::Skip => {
                self.one_time_passwords_skipped += 1;
                return Ok(());
            }
            Extraction::Message(extracted) => extracted,
        };

        let category = categorize(&extracted.body);
        let new_transaction = to_new_transaction(&extracted, category);
        self.buckets.push(category, extracted);

        let transaction = match persist_transaction(&new_transaction, connection) {
            Ok(transaction) => transaction,
            Err(Error::DuplicateTransactionId(transaction_id)) => {
                tracing::warn!("Skipping message with duplicate transaction ID {transaction_id}");
                return Ok(());
            }
            Err(error) => {
                tracing::error!(
                    "Could not store transaction {}: {error}",
                    new_transaction.transaction_id
                );
                return Ok(());
            }
        };

        self.persisted += 1;

        if let Err(error) = persist_detail(&completed_detail(&transaction), connection) {
            tracing::error!(
                "Could not store details for transaction {}: {error}",
                transaction.transaction_id
            );
        }

        Ok(())
    }

    /// The messages seen so far, grouped by category.
    pub fn buckets(&self) -> &CategoryBuckets {
        &self.buckets
    }

    /// The counts collected so far.
    pub fn summary(&self) -> ImportSummary {
        let category_counts = self.buckets.counts();

        ImportSummary {
            messages_read: self.messages_read,
            one_time_passwords_skipped: self.one_time_passwords_skipped,
            processed: category_counts.iter().map(|(_, count)| count).sum(),
            persisted: self.persisted,
            category_counts,
        }
    }
}

/// Import the SMS export at `config.batch_path` and write the report of
/// uncategorized messages to `config.report_path`.
///
/// # Errors
/// Returns an error if the batch source cannot be read or parsed, a message
/// contains a malformed number, or the report cannot be written. Failing to
/// store individual messages is not an error.
pub fn run_import(config: &ImportConfig, connection: &Connection) -> Result<ImportSummary, Error> {
    let start_time = Instant::now();

    let messages = read_batch_file(&config.batch_path)?;
    tracing::info!(
        "Importing {} messages from {}",
        messages.len(),
        config.batch_path.display()
    );

    let mut run = ImportRun::new();
    run.import_all(&messages, connection)?;

    write_report(&run, &config.report_path)?;

    let summary = run.summary();
    tracing::info!(
        "Imported {} of {} messages in {}ms: {} stored, {} one-time passwords skipped",
        summary.processed,
        summary.messages_read,
        start_time.elapsed().as_millis(),
        summary.persisted,
        summary.one_time_passwords_skipped,
    );
    for (category, count) in &summary.category_counts {
        tracing::debug!("{category}: {count}");
    }

    Ok(summary)
}

fn write_report(run: &ImportRun, report_path: &Path) -> Result<(), Error> {
    let uncategorized = run.buckets().get(Category::Uncategorized);
    write_uncategorized_report(uncategorized, report_path)?;
    tracing::info!(
        "Wrote {} uncategorized messages to {}",
        uncategorized.len(),
        report_path.display()
    );

    Ok(())
}

fn to_new_transaction(message: &ExtractedMessage, category: Category) -> NewTransaction {
    NewTransaction {
        body: message.body.clone(),
        amount: message.amount.value(),
        balance: message.balance,
        readable_date: message.readable_date.clone(),
        category,
        transaction_id: message.transaction_id.clone(),
    }
}

fn completed_detail(transaction: &Transaction) -> NewTransactionDetail {
    NewTransactionDetail {
        transaction_id: Some(transaction.transaction_id.clone()),
        status: COMPLETED_STATUS.to_owned(),
        description: COMPLETED_DESCRIPTION.to_owned(),
        additional_info: json!({ "note": AUTOMATED_NOTE }),
    }
}

fn persist_transaction(
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let tx = connection.unchecked_transaction()?;
    // Dropping `tx` on error rolls the insert back.
    let transaction = create_transaction(new_transaction, &tx)?;
    tx.commit()?;

    Ok(transaction)
}

fn persist_detail(
    new_detail: &NewTransactionDetail,
    connection: &Connection,
) -> Result<Option<TransactionDetail>, Error> {
    let tx = connection.unchecked_transaction()?;

    match create_transaction_detail(new_detail, &tx) {
        Ok(detail) => {
            tx.commit()?;
            Ok(detail)
        }
        Err(error) => {
            tx.rollback()?;
            Err(error)
        }
    }
}
