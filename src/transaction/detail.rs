//! Status details attached to stored transactions.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, database_id::DatabaseId};

/// Extra information about a stored transaction, e.g. its processing status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetail {
    /// The database ID of the detail.
    pub id: DatabaseId,
    /// The transaction ID of the transaction this detail belongs to.
    pub transaction_id: String,
    /// A short status label, e.g. "Completed".
    pub status: String,
    /// A free-text description of the status.
    pub description: String,
    /// Arbitrary JSON annotations.
    pub additional_info: Value,
}

/// The data needed to store a new [TransactionDetail].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionDetail {
    /// The transaction ID of the transaction this detail belongs to.
    ///
    /// `None` means the transaction ID is missing, in which case no detail is created.
    pub transaction_id: Option<String>,
    /// A short status label, e.g. "Completed".
    pub status: String,
    /// A free-text description of the status.
    pub description: String,
    /// Arbitrary JSON annotations.
    pub additional_info: Value,
}

/// Create a new transaction detail in the database.
///
/// Returns `Ok(None)` without touching the database if the detail's
/// transaction ID is missing.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTransactionReference] if the transaction ID does not refer to a stored transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction_detail(
    new_detail: &NewTransactionDetail,
    connection: &Connection,
) -> Result<Option<TransactionDetail>, Error> {
    let Some(transaction_id) = &new_detail.transaction_id else {
        tracing::debug!("Skipping transaction detail without a transaction ID");
        return Ok(None);
    };

    let detail = connection
        .prepare(
            "INSERT INTO transaction_details (transaction_id, status, description, additional_info)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, transaction_id, status, description, additional_info",
        )?
        .query_row(
            (
                transaction_id,
                &new_detail.status,
                &new_detail.description,
                new_detail.additional_info.to_string(),
            ),
            map_transaction_detail_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidTransactionReference(transaction_id.clone()),
            error => error.into(),
        })?;

    Ok(Some(detail))
}

/// Retrieve the details for the transaction with `transaction_id`, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transaction_details(
    transaction_id: &str,
    connection: &Connection,
) -> Result<Vec<TransactionDetail>, Error> {
    connection
        .prepare(
            "SELECT id, transaction_id, status, description, additional_info
             FROM transaction_details WHERE transaction_id = :transaction_id ORDER BY id ASC",
        )?
        .query_map(
            &[(":transaction_id", transaction_id)],
            map_transaction_detail_row,
        )?
        .map(|detail_result| detail_result.map_err(Error::SqlError))
        .collect()
}

/// Create the transaction detail table in the database if it does not exist.
///
/// The transaction table must be created first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_detail_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaction_details (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                transaction_id VARCHAR(60) REFERENCES transactions(transaction_id),
                status VARCHAR(50),
                description TEXT,
                additional_info TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a TransactionDetail.
pub fn map_transaction_detail_row(row: &Row) -> Result<TransactionDetail, rusqlite::Error> {
    let raw_additional_info: String = row.get(4)?;
    let additional_info = serde_json::from_str(&raw_additional_info)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error)))?;

    Ok(TransactionDetail {
        id: row.get(0)?,
        transaction_id: row.get(1)?,
        status: row.get(2)?,
        description: row.get(3)?,
        additional_info,
    })
}
