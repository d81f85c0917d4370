//! Whether a transaction brought money in or sent it out.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

const INCOME: &str = "INCOME";
const EXPENSE: &str = "EXPENSE";

/// The direction money moved in a transaction.
///
/// Transactions are stored with the type as the text `INCOME` or `EXPENSE`.
/// Any other stored value is kept as [TransactionType::Other] so that the row
/// can still be loaded. New transactions can only be created as income or
/// expense, see [crate::transaction::create_transaction].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TransactionType {
    /// Money earned, added to the balance.
    Income,
    /// Money spent, subtracted from the balance.
    Expense,
    /// An unrecognised type read from storage, holding the raw value.
    Other(String),
}

impl TransactionType {
    /// The text representation used for storage, e.g. `"INCOME"`.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Income => INCOME,
            TransactionType::Expense => EXPENSE,
            TransactionType::Other(raw) => raw,
        }
    }

    /// Map a stored value to a transaction type without validation.
    ///
    /// Only the exact strings `INCOME` and `EXPENSE` are recognised, anything
    /// else becomes [TransactionType::Other].
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            INCOME => TransactionType::Income,
            EXPENSE => TransactionType::Expense,
            other => TransactionType::Other(other.to_owned()),
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    /// Parse user input, e.g. "income" or "EXPENSE".
    ///
    /// Unlike [TransactionType::from_stored], unrecognised values are rejected
    /// with [Error::InvalidTransactionType].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.eq_ignore_ascii_case(INCOME) {
            Ok(TransactionType::Income)
        } else if trimmed.eq_ignore_ascii_case(EXPENSE) {
            Ok(TransactionType::Expense)
        } else {
            Err(Error::InvalidTransactionType(trimmed.to_owned()))
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<String> for TransactionType {
    fn from(value: String) -> Self {
        TransactionType::from_stored(&value)
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(TransactionType::from_stored)
    }
}
