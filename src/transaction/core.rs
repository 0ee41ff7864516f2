//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, category::Category, database_id::DatabaseId};

// ============================================================================
// MODELS
// ============================================================================

/// A mobile money transaction that was read from an SMS and stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The database ID of the transaction.
    pub id: DatabaseId,
    /// The original text of the SMS.
    pub body: String,
    /// The amount of money moved, `None` if the SMS did not state an amount.
    pub amount: Option<i64>,
    /// The account balance after the transaction.
    pub balance: i64,
    /// When the SMS was received, as shown on the phone.
    pub readable_date: String,
    /// The kind of transaction.
    pub category: Category,
    /// The mobile money transaction ID, either from the SMS or synthesized.
    pub transaction_id: String,
}

/// The data needed to store a new [Transaction].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// The original text of the SMS.
    pub body: String,
    /// The amount of money moved, `None` if the SMS did not state an amount.
    pub amount: Option<i64>,
    /// The account balance after the transaction.
    pub balance: i64,
    /// When the SMS was received, as shown on the phone.
    pub readable_date: String,
    /// The kind of transaction.
    pub category: Category,
    /// The mobile money transaction ID, must be unique.
    pub transaction_id: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// **Note**: If you want the insert to be isolated from other writes, pass in
/// a transaction for `connection`.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateTransactionId] if a transaction with the same transaction ID already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (body, amount, balance, readable_date, category, transaction_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, body, amount, balance, readable_date, category, transaction_id",
        )?
        .query_row(
            (
                &new_transaction.body,
                new_transaction.amount,
                new_transaction.balance,
                &new_transaction.readable_date,
                new_transaction.category,
                &new_transaction.transaction_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateTransactionId(new_transaction.transaction_id.clone()),
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve every transaction in the database in the order they were stored.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, body, amount, balance, readable_date, category, transaction_id
             FROM transactions ORDER BY id ASC",
        )?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Get the sum of the amounts of all transactions.
///
/// Transactions with an unknown amount are ignored. Returns `None` if no
/// transaction has a known amount.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_total_amount(connection: &Connection) -> Result<Option<i64>, Error> {
    connection
        .query_row("SELECT SUM(amount) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database if it does not exist.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                body TEXT,
                amount NUMERIC(10, 2),
                balance NUMERIC(10, 2),
                readable_date TEXT,
                category VARCHAR(50),
                transaction_id VARCHAR(60) UNIQUE
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let body = row.get(1)?;
    let amount = row.get(2)?;
    let balance = row.get(3)?;
    let readable_date = row.get(4)?;
    let category = row.get(5)?;
    let transaction_id = row.get(6)?;

    Ok(Transaction {
        id,
        body,
        amount,
        balance,
        readable_date,
        category,
        transaction_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::Category,
        db::initialize,
        transaction::{
            NewTransaction, count_transactions, create_transaction, get_all_transactions,
            get_total_amount,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_transaction(transaction_id: &str, amount: Option<i64>) -> NewTransaction {
        NewTransaction {
            body: format!("TxId: {transaction_id}. You have received some RWF"),
            amount,
            balance: 1500,
            readable_date: "10 May 2024 4:30:58 PM".to_owned(),
            category: Category::IncomingMoney,
            transaction_id: transaction_id.to_owned(),
        }
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let want = new_transaction("123", Some(5000));

        let got = create_transaction(&want, &conn).expect("Could not create transaction");

        assert!(got.id > 0);
        assert_eq!(got.body, want.body);
        assert_eq!(got.amount, Some(5000));
        assert_eq!(got.balance, 1500);
        assert_eq!(got.readable_date, want.readable_date);
        assert_eq!(got.category, Category::IncomingMoney);
        assert_eq!(got.transaction_id, "123");
    }

    #[test]
    fn create_stores_unknown_amount_as_null() {
        let conn = get_test_connection();

        let got = create_transaction(&new_transaction("1", None), &conn)
            .expect("Could not create transaction");

        assert_eq!(got.amount, None);
    }

    #[test]
    fn create_fails_on_duplicate_transaction_id() {
        let conn = get_test_connection();
        create_transaction(&new_transaction("123", Some(1)), &conn)
            .expect("Could not create transaction");

        let duplicate = create_transaction(&new_transaction("123", Some(2)), &conn);

        assert_eq!(duplicate, Err(Error::DuplicateTransactionId("123".to_owned())));
        assert_eq!(count_transactions(&conn), Ok(1));
    }

    #[test]
    fn get_all_returns_transactions_in_insertion_order() {
        let conn = get_test_connection();
        let want = vec![
            create_transaction(&new_transaction("3", Some(30)), &conn).unwrap(),
            create_transaction(&new_transaction("1", Some(10)), &conn).unwrap(),
            create_transaction(&new_transaction("2", None), &conn).unwrap(),
        ];

        let got = get_all_transactions(&conn).expect("Could not get transactions");

        assert_eq!(want, got);
    }

    #[test]
    fn total_ignores_unknown_amounts() {
        let conn = get_test_connection();
        create_transaction(&new_transaction("1", Some(5000)), &conn).unwrap();
        create_transaction(&new_transaction("2", None), &conn).unwrap();
        create_transaction(&new_transaction("3", Some(1500)), &conn).unwrap();

        let total = get_total_amount(&conn);

        assert_eq!(total, Ok(Some(6500)));
    }

    #[test]
    fn total_of_empty_table_is_none() {
        let conn = get_test_connection();

        assert_eq!(get_total_amount(&conn), Ok(None));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(&new_transaction(&i.to_string(), Some(i as i64)), &conn)
                .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
