//! MoMo Ledger imports mobile money SMS notifications into a SQLite database
//! and serves them over a small web API.
//!
//! An import run reads an SMS backup XML export, skips one-time password
//! messages, extracts the amount, balance and transaction ID from each
//! remaining message, assigns it a [Category] and stores it along with a
//! status detail. Messages that match no category are written to a JSON
//! report for review.
//!
//! The web API lists the stored transactions as JSON and serves an HTML
//! dashboard that summarizes them per category.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod category;
mod classifier;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error;
mod extractor;
mod html;
mod logging;
mod not_found;
mod routing;
mod sms_import;
mod transaction;

pub use app_state::AppState;
pub use category::{Category, UnknownCategory};
pub use classifier::categorize;
pub use database_id::DatabaseId;
pub use db::{SchemaStatus, initialize as initialize_db};
pub use error::Error;
pub use extractor::{Amount, ExtractedMessage, Extraction, SyntheticIdCounter, extract_message};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware, setup_logging};
pub use routing::build_router;
pub use sms_import::{
    CategoryBuckets, ImportConfig, ImportRun, ImportSummary, RawMessage, UncategorizedEntry,
    parse_batch, read_batch_file, run_import, write_uncategorized_report,
};
pub use transaction::{
    NewTransaction, NewTransactionDetail, Transaction, TransactionDetail, TransactionEntry,
    count_transactions, create_transaction, create_transaction_detail, get_all_transactions,
    get_total_amount, get_transaction_details,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
