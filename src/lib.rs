//! Ledgerbook is a personal finance ledger for tracking income and expenses.
//!
//! Users record transactions under categories and view a dashboard of
//! aggregate balances. The heart of the library is signed balance aggregation
//! over a user's ledger, see [ledger].
//!
//! This library provides the domain types, the SQLite storage layer and the
//! balance queries. The `ledgerbook` binary is a command line front end.

#![warn(missing_docs)]

use rust_decimal::Decimal;
use time::Date;

mod amount;
mod app_config;
pub mod category;
mod currency;
pub mod dashboard;
mod database_id;
mod db;
pub mod ledger;
mod logging;
mod timezone;
pub mod transaction;
pub mod user;

pub use amount::Amount;
pub use app_config::{AppConfig, DEFAULT_TIMEZONE};
pub use currency::format_currency;
pub use database_id::{CategoryId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::setup_logging;
pub use timezone::{get_local_offset, today_in_timezone};
pub use user::{User, UserID};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A string could not be parsed as a decimal amount of money.
    #[error("\"{0}\" is not a valid amount of money")]
    InvalidAmount(String),

    /// A zero or negative amount was used to create a transaction.
    ///
    /// Whether money came in or went out is recorded by the transaction
    /// type, so amounts are always strictly positive.
    #[error("amount must be greater than $0, got {0}")]
    NonPositiveAmount(Decimal),

    /// An amount had more than two digits after the decimal point.
    #[error("amount {0} has more than two decimal places")]
    TooManyDecimalPlaces(Decimal),

    /// An amount had more digits than can be stored.
    #[error("amount {0} is too large, amounts may have at most 12 digits")]
    AmountTooLarge(Decimal),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A transaction was created with a type other than income or expense.
    #[error("\"{0}\" is not a valid transaction type, expected INCOME or EXPENSE")]
    InvalidTransactionType(String),

    /// The note attached to a transaction was longer than allowed.
    #[error("notes may be at most {max} characters long, got {0}", max = transaction::MAX_NOTE_LENGTH)]
    NoteTooLong(usize),

    /// The category ID used to create a transaction did not match a category
    /// owned by the same user.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A category name was longer than allowed.
    #[error("category names may be at most {max} characters long, got {0}", max = category::MAX_CATEGORY_NAME_LENGTH)]
    CategoryNameTooLong(usize),

    /// The user already has a category with the same name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// An empty string was used as a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// A username was longer than allowed.
    #[error("usernames may be at most {max} characters long, got {0}", max = user::MAX_USERNAME_LENGTH)]
    UsernameTooLong(usize),

    /// The username is already taken.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// A ledger entry broke one of the ledger's invariants, e.g. an amount
    /// that is not strictly positive.
    ///
    /// This indicates data that bypassed validation and should never be seen
    /// in practice. Aggregation stops rather than returning a wrong total.
    #[error("ledger invariant violated: {0}")]
    InvariantViolation(String),

    /// A date could not be constructed or parsed.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<time::error::ComponentRange> for Error {
    fn from(value: time::error::ComponentRange) -> Self {
        Error::InvalidDate(value.to_string())
    }
}
