//! The dashboard: a summary of a user's balances and recent activity.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error, format_currency,
    ledger::{LedgerTotals, balance, ledger_totals, month_window},
    transaction::{CategorizedTransaction, count_transactions, get_categorized_transactions},
    user::UserID,
};

/// How many of the latest transactions are shown on the dashboard.
pub const RECENT_TRANSACTION_COUNT: u32 = 5;

/// Aggregate balances for a user as of a given date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// The date the dashboard was calculated for.
    pub as_of: Date,
    /// The first day of the month of `as_of`.
    pub month_start: Date,
    /// The last day of the month of `as_of`.
    pub month_end: Date,
    /// Income and expenses from `month_start` to `month_end`.
    pub month_to_date: LedgerTotals,
    /// Income minus expenses from `month_start` to `month_end`.
    pub month_to_date_balance: Decimal,
    /// Income minus expenses over the entire ledger.
    pub all_time_balance: Decimal,
    /// The number of transactions in the entire ledger.
    pub transaction_count: u32,
    /// The latest transactions, newest first.
    pub recent_transactions: Vec<CategorizedTransaction>,
}

/// Calculate the dashboard for a user as of `as_of`.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the underlying queries fail.
pub fn get_dashboard(
    user_id: UserID,
    as_of: Date,
    connection: &Connection,
) -> Result<Dashboard, Error> {
    let window = month_window(as_of)?;
    let month_to_date = ledger_totals(user_id, Some(&window), connection)?;

    Ok(Dashboard {
        as_of,
        month_start: *window.start(),
        month_end: *window.end(),
        month_to_date,
        month_to_date_balance: month_to_date.net(),
        all_time_balance: balance(user_id, connection)?,
        transaction_count: count_transactions(user_id, connection)?,
        recent_transactions: get_categorized_transactions(
            user_id,
            Some(RECENT_TRANSACTION_COUNT),
            connection,
        )?,
    })
}

/// Render the dashboard as plain text for a terminal.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut lines = vec![
        format!(
            "Month to date ({} to {})",
            dashboard.month_start, dashboard.month_end
        ),
        format!(
            "  Income:   {}",
            format_currency(dashboard.month_to_date.income)
        ),
        format!(
            "  Expenses: {}",
            format_currency(dashboard.month_to_date.expenses)
        ),
        format!(
            "  Balance:  {}",
            format_currency(dashboard.month_to_date_balance)
        ),
        format!(
            "All time balance: {} over {} transaction(s)",
            format_currency(dashboard.all_time_balance),
            dashboard.transaction_count
        ),
    ];

    if dashboard.recent_transactions.is_empty() {
        lines.push("No transactions yet.".to_owned());
    } else {
        lines.push("Recent transactions:".to_owned());
        lines.extend(dashboard.recent_transactions.iter().map(
            |CategorizedTransaction {
                 transaction,
                 category_name,
             }| {
                format!(
                    "  {} {:<7} {:>14} {}",
                    transaction.date,
                    transaction.transaction_type,
                    format_currency(transaction.amount.as_decimal()),
                    category_name
                )
            },
        ));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
