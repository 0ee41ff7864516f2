//! JSON endpoints for reading stored transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    category::Category,
    database_id::DatabaseId,
    transaction::{
        TransactionDetail, get_all_transactions, get_total_amount, get_transaction_details,
    },
};

/// The state needed for reading transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A transaction as it is returned by the transactions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEntry {
    /// The database ID of the transaction.
    pub id: DatabaseId,
    /// The original text of the SMS.
    pub body: String,
    /// The amount of money moved, `null` if unknown.
    pub amount: Option<i64>,
    /// The account balance after the transaction.
    pub balance: i64,
    /// When the SMS was received.
    pub readable_date: String,
    /// The kind of transaction.
    pub category: Category,
    /// The sum of the amounts of all stored transactions.
    pub total_transactions: Option<i64>,
}

/// A route handler that lists every stored transaction.
///
/// Each entry also carries the total amount over all transactions.
///
/// # Errors
/// Returns an error response if the database lock cannot be acquired or a query fails.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
) -> Result<Json<Vec<TransactionEntry>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transactions = get_all_transactions(&connection)?;
    let total_amount = get_total_amount(&connection)?;

    let entries = transactions
        .into_iter()
        .map(|transaction| TransactionEntry {
            id: transaction.id,
            body: transaction.body,
            amount: transaction.amount,
            balance: transaction.balance,
            readable_date: transaction.readable_date,
            category: transaction.category,
            total_transactions: total_amount,
        })
        .collect();

    Ok(Json(entries))
}

/// A route handler that lists the details of the transaction with `transaction_id`.
///
/// # Errors
/// Returns an error response if the database lock cannot be acquired or a query fails.
pub async fn get_transaction_details_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Vec<TransactionDetail>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_transaction_details(&transaction_id, &connection).map(Json)
}
