//! Balance aggregation pushed down into the database.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, amount::DECIMAL_PLACES, ledger::month_window, user::UserID};

/// Total income and total expenses over some part of a user's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// The sum of all income, zero or greater.
    pub income: Decimal,
    /// The sum of all expenses, zero or greater.
    pub expenses: Decimal,
}

impl LedgerTotals {
    /// Income minus expenses.
    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// Sum a user's income and expenses with a single query.
///
/// If `date_range` is set, only transactions dated within it (inclusive) are
/// included. Transactions with an unrecognised type are left out of both
/// totals. With no matching transactions both totals are `0.00`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn ledger_totals(
    user_id: UserID,
    date_range: Option<&RangeInclusive<Date>>,
    connection: &Connection,
) -> Result<LedgerTotals, Error> {
    let start = date_range.map(|range| *range.start());
    let end = date_range.map(|range| *range.end());

    let (income_cents, expense_cents): (i64, i64) = connection
        .prepare(
            "SELECT
                COALESCE(SUM(CASE WHEN transaction_type = 'INCOME' THEN amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN transaction_type = 'EXPENSE' THEN amount ELSE 0 END), 0)
             FROM \"transaction\"
             WHERE user_id = ?1
               AND (?2 IS NULL OR date >= ?2)
               AND (?3 IS NULL OR date <= ?3)",
        )?
        .query_row((user_id.as_i64(), start, end), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;

    Ok(LedgerTotals {
        income: Decimal::new(income_cents, DECIMAL_PLACES),
        expenses: Decimal::new(expense_cents, DECIMAL_PLACES),
    })
}

/// The net balance of a user's transactions in the calendar month of `as_of`.
///
/// Every transaction dated from the first to the last day of the month is
/// included, both days inclusive. Other users' transactions are excluded.
/// Returns `0.00` if there are no matching transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn month_to_date_balance(
    user_id: UserID,
    as_of: Date,
    connection: &Connection,
) -> Result<Decimal, Error> {
    let window = month_window(as_of)?;
    let totals = ledger_totals(user_id, Some(&window), connection)?;

    tracing::debug!(
        "Month-to-date totals for user {user_id} from {} to {}: {totals:?}",
        window.start(),
        window.end()
    );

    Ok(totals.net())
}

/// The net balance over all of a user's transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn balance(user_id: UserID, connection: &Connection) -> Result<Decimal, Error> {
    ledger_totals(user_id, None, connection).map(|totals| totals.net())
}
