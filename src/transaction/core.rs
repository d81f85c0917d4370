//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Amount, Error,
    category::{CategoryName, get_category},
    database_id::{CategoryId, TransactionId},
    transaction::TransactionType,
    user::UserID,
};

/// The maximum number of characters in a transaction note.
pub const MAX_NOTE_LENGTH: usize = 255;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
    /// The amount of money spent or earned in this transaction, always positive.
    pub amount: Amount,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// A short free text note, empty if not set.
    pub note: String,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: Amount,
        transaction_type: TransactionType,
        date: Date,
        category_id: CategoryId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            transaction_type,
            date,
            category_id,
            note: String::new(),
        }
    }
}

/// A transaction joined with the name of its category, for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    /// The transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The name of the transaction's category.
    pub category_name: CategoryName,
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::{Amount, transaction::{Transaction, TransactionType}};
///
/// let builder = Transaction::build(
///         Amount::from_cents(4599).unwrap(),
///         TransactionType::Expense,
///         date!(2025-01-15),
///         category.id,
///     )
///     .note("Coffee with Sam");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    ///
    /// Always positive, the direction is given by `transaction_type`.
    pub amount: Amount,

    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,

    /// The date when the transaction occurred.
    ///
    /// The date must not be in the future, transactions record events that
    /// have already happened.
    pub date: Date,

    /// The category the transaction belongs to.
    ///
    /// The category must belong to the same user as the transaction.
    pub category_id: CategoryId,

    /// A short free text note, at most [MAX_NOTE_LENGTH] characters.
    pub note: String,
}

impl TransactionBuilder {
    /// Set the note for the transaction.
    pub fn note(mut self, note: &str) -> Self {
        self.note = note.trim().to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction for a user in the database from a builder.
///
/// `today` is the current date in the user's timezone, dates must be no later than today.
///
/// # Errors
/// This function will return a:
/// - [Error::FutureDate] if the date is after `today`,
/// - [Error::InvalidTransactionType] if the type is not income or expense,
/// - [Error::NoteTooLong] if the note is longer than [MAX_NOTE_LENGTH] characters,
/// - [Error::InvalidCategory] if the category does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    today: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if builder.date > today {
        return Err(Error::FutureDate(builder.date));
    }

    if let TransactionType::Other(raw) = &builder.transaction_type {
        return Err(Error::InvalidTransactionType(raw.clone()));
    }

    let note_length = builder.note.chars().count();
    if note_length > MAX_NOTE_LENGTH {
        return Err(Error::NoteTooLong(note_length));
    }

    match get_category(builder.category_id, connection) {
        Ok(category) if category.user_id == user_id => {}
        Ok(_) | Err(Error::NotFound) => return Err(Error::InvalidCategory(builder.category_id)),
        Err(error) => return Err(error),
    }

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, category_id, amount, transaction_type, date, note, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, category_id, amount, transaction_type, date, note, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                builder.category_id,
                builder.amount,
                &builder.transaction_type,
                builder.date,
                &builder.note,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    tracing::debug!(
        "Created {} transaction {} of {} for user {}",
        transaction.transaction_type,
        transaction.id,
        transaction.amount,
        user_id
    );

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, category_id, amount, transaction_type, date, note, created_at
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve a user's transactions, newest first.
///
/// Transactions on the same date are ordered by most recently created first.
/// If `limit` is set, at most `limit` transactions are returned.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_for_user(
    user_id: UserID,
    limit: Option<u32>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, amount, transaction_type, date, note, created_at
             FROM \"transaction\"
             WHERE user_id = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2",
        )?
        .query_map((user_id.as_i64(), sql_limit(limit)), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a user's transactions along with their category names, newest first.
///
/// Ordering and `limit` behave the same as [get_transactions_for_user].
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_categorized_transactions(
    user_id: UserID,
    limit: Option<u32>,
    connection: &Connection,
) -> Result<Vec<CategorizedTransaction>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.user_id, t.category_id, t.amount, t.transaction_type, t.date, t.note,
                    t.created_at, c.name
             FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             WHERE t.user_id = ?1
             ORDER BY t.date DESC, t.id DESC
             LIMIT ?2",
        )?
        .query_map((user_id.as_i64(), sql_limit(limit)), |row| {
            let transaction = map_transaction_row(row)?;
            let raw_name: String = row.get(8)?;

            Ok(CategorizedTransaction {
                transaction,
                category_name: CategoryName::new_unchecked(&raw_name),
            })
        })?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Delete one of a user's transactions.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if the user has no transaction with the ID `id`.
pub fn delete_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    tracing::debug!("Deleted transaction {id} for user {user_id}");

    Ok(())
}

/// Get the number of transactions a user has.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1;",
            (user_id.as_i64(),),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// Amounts are stored as integer cents and must be positive.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                amount INTEGER NOT NULL CHECK (amount > 0),
                transaction_type TEXT NOT NULL,
                date TEXT NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Add composite index used by the balance queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let category_id = row.get(2)?;
    let amount = row.get(3)?;
    let transaction_type = row.get(4)?;
    let date = row.get(5)?;
    let note = row.get(6)?;
    let created_at = row.get(7)?;

    Ok(Transaction {
        id,
        user_id,
        category_id,
        amount,
        transaction_type,
        date,
        note,
        created_at,
    })
}

/// SQLite treats a negative limit as no limit.
fn sql_limit(limit: Option<u32>) -> i64 {
    limit.map(i64::from).unwrap_or(-1)
}

// ============================================================================
// TESTS
// ============================================================================
