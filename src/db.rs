//! Sets up the application's SQLite database.

use rusqlite::Connection;

use crate::{
    Error,
    transaction::{create_transaction_detail_table, create_transaction_table},
};

/// Whether [initialize] had to create the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// The tables did not exist and were created.
    Created,
    /// The tables were already present, nothing was changed.
    AlreadyPresent,
}

/// Create the tables for the domain models if they do not exist yet.
///
/// Also turns on foreign key enforcement for `connection`, so this function
/// should be called on every connection before it is used.
///
/// Calling this function on an initialized database is a no-op and leaves
/// existing rows untouched.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<SchemaStatus, Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let already_present =
        table_exists("transactions", connection)? && table_exists("transaction_details", connection)?;

    let transaction = connection.unchecked_transaction()?;
    create_transaction_table(&transaction)?;
    create_transaction_detail_table(&transaction)?;
    transaction.commit()?;

    if already_present {
        tracing::debug!("Database tables already exist, skipping setup.");
        Ok(SchemaStatus::AlreadyPresent)
    } else {
        tracing::info!("Database setup completed successfully.");
        Ok(SchemaStatus::Created)
    }
}

fn table_exists(name: &str, connection: &Connection) -> Result<bool, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        category::Category,
        transaction::{NewTransaction, count_transactions, create_transaction},
    };

    use super::{SchemaStatus, initialize};

    #[test]
    fn first_initialization_creates_schema() {
        let conn = Connection::open_in_memory().unwrap();

        assert_eq!(initialize(&conn), Ok(SchemaStatus::Created));
    }

    #[test]
    fn initialization_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).expect("Could not initialize database");
        create_transaction(
            &NewTransaction {
                body: "You have received 100 RWF".to_owned(),
                amount: Some(100),
                balance: 0,
                readable_date: "10 May 2024 4:30:58 PM".to_owned(),
                category: Category::IncomingMoney,
                transaction_id: "1".to_owned(),
            },
            &conn,
        )
        .expect("Could not create transaction");

        let status = initialize(&conn);

        assert_eq!(status, Ok(SchemaStatus::AlreadyPresent));
        assert_eq!(count_transactions(&conn), Ok(1));
    }

    #[test]
    fn enables_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();

        assert_eq!(enabled, 1);
    }
}
