//! Signed balance aggregation over a user's ledger.
//!
//! Amounts are always positive, the sign of each transaction comes from its
//! [TransactionType](crate::transaction::TransactionType): income adds to the
//! balance and expenses subtract from it. Unrecognised types are skipped.
//!
//! There are two ways to compute a balance:
//! - [net_balance] sums transactions that have already been loaded into memory.
//! - [month_to_date_balance] and [ledger_totals] push the filter and sum
//!   down into a single SQL query. Prefer these for stored transactions.

mod aggregate;
mod query;
mod window;

pub use aggregate::{LedgerEntry, filter_month, net_balance};
pub use query::{LedgerTotals, balance, ledger_totals, month_to_date_balance};
pub use window::month_window;
