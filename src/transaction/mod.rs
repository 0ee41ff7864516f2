//! Transaction storage and the endpoints for reading it.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` and `TransactionDetail` models
//! - Database functions for storing and querying them
//! - JSON route handlers for listing them

mod core;
mod detail;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, count_transactions, create_transaction, create_transaction_table,
    get_all_transactions, get_total_amount,
};
pub use detail::{
    NewTransactionDetail, TransactionDetail, create_transaction_detail,
    create_transaction_detail_table, get_transaction_details,
};
pub use list_endpoint::{
    TransactionEntry, get_transaction_details_endpoint,
    get_transactions_endpoint,
};
