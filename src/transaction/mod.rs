//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The `TransactionType` that carries the sign of a transaction
//! - Database functions for storing, querying, and managing transactions

mod core;
mod transaction_type;

pub use core::{
    CategorizedTransaction, MAX_NOTE_LENGTH, Transaction, TransactionBuilder, count_transactions,
    create_transaction, create_transaction_table, delete_transaction,
    get_categorized_transactions, get_transaction, get_transactions_for_user,
    map_transaction_row,
};
pub use transaction_type::TransactionType;
