//! In-memory balance aggregation over already loaded transactions.

use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    amount::DECIMAL_PLACES,
    ledger::month_window,
    transaction::{Transaction, TransactionType},
    user::UserID,
};

/// Anything that can be summed into a balance.
///
/// Implementors must report amounts that are strictly positive, the direction
/// of the money is given by [LedgerEntry::transaction_type].
pub trait LedgerEntry {
    /// The amount of money moved, always greater than zero.
    fn amount(&self) -> Decimal;

    /// Whether the amount is added to or subtracted from the balance.
    fn transaction_type(&self) -> &TransactionType;
}

impl LedgerEntry for Transaction {
    fn amount(&self) -> Decimal {
        self.amount.as_decimal()
    }

    fn transaction_type(&self) -> &TransactionType {
        &self.transaction_type
    }
}

impl<T: LedgerEntry + ?Sized> LedgerEntry for &T {
    fn amount(&self) -> Decimal {
        (**self).amount()
    }

    fn transaction_type(&self) -> &TransactionType {
        (**self).transaction_type()
    }
}

/// Calculate the net balance of `entries`: total income minus total expenses.
///
/// The sum starts from exactly `0.00`, so an empty ledger has a balance of
/// `0.00`. Entries with an unrecognised transaction type are skipped and a
/// warning is logged. The result does not depend on the order of `entries`.
///
/// # Errors
/// Returns an [Error::InvariantViolation] if an entry has an amount that is
/// zero or negative, or if the sum overflows.
pub fn net_balance<'a, T, I>(entries: I) -> Result<Decimal, Error>
where
    T: LedgerEntry + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut balance = Decimal::new(0, DECIMAL_PLACES);

    for entry in entries {
        let amount = entry.amount();

        if amount <= Decimal::ZERO {
            return Err(Error::InvariantViolation(format!(
                "ledger entry has the non-positive amount {amount}"
            )));
        }

        let next_balance = match entry.transaction_type() {
            TransactionType::Income => balance.checked_add(amount),
            TransactionType::Expense => balance.checked_sub(amount),
            TransactionType::Other(raw) => {
                tracing::warn!("Skipping ledger entry with unknown transaction type \"{raw}\"");
                continue;
            }
        };

        balance = next_balance.ok_or_else(|| {
            Error::InvariantViolation(format!("balance overflowed when adding {amount}"))
        })?;
    }

    Ok(balance)
}

/// Select the transactions owned by `user_id` that fall within the calendar
/// month of `as_of`, first and last day included.
///
/// This is the in-memory counterpart of
/// [month_to_date_balance](crate::ledger::month_to_date_balance) for
/// transactions that have already been loaded.
///
/// # Errors
/// Returns an [Error::InvalidDate] if the month bounds cannot be represented.
pub fn filter_month(
    transactions: &[Transaction],
    user_id: UserID,
    as_of: Date,
) -> Result<Vec<&Transaction>, Error> {
    let window = month_window(as_of)?;

    Ok(transactions
        .iter()
        .filter(|transaction| transaction.user_id == user_id && window.contains(&transaction.date))
        .collect())
}


#[cfg(test)]
mod filter_month_tests {
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{
        Amount,
        ledger::filter_month,
        transaction::{Transaction, TransactionType},
        user::UserID,
    };

    fn transaction(id: i64, user_id: i64, date: Date) -> Transaction {
        Transaction {
            id,
            user_id: UserID::new(user_id),
            category_id: 1,
            amount: Amount::from_cents(100).unwrap(),
            transaction_type: TransactionType::Income,
            date,
            note: String::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn keeps_only_the_users_transactions_in_the_month() {
        let transactions = vec![
            transaction(1, 1, date!(2024 - 02 - 29)),
            transaction(2, 1, date!(2024 - 03 - 01)),
            transaction(3, 1, date!(2024 - 03 - 15)),
            transaction(4, 1, date!(2024 - 03 - 31)),
            transaction(5, 1, date!(2024 - 04 - 01)),
            transaction(6, 2, date!(2024 - 03 - 15)),
            transaction(7, 1, date!(2023 - 03 - 15)),
        ];

        let filtered = filter_month(&transactions, UserID::new(1), date!(2024 - 03 - 15)).unwrap();

        let ids: Vec<i64> = filtered.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }
}
