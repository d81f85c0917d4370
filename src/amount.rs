//! An exact, strictly positive amount of money.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The number of digits after the decimal point that amounts are stored with.
pub const DECIMAL_PLACES: u32 = 2;

/// The largest amount that can be stored, 12 digits in total.
const MAX_CENTS: i64 = 999_999_999_999;

/// A validated amount of money for a transaction.
///
/// Amounts are always greater than zero and have exactly two decimal places,
/// e.g. `12.50`. Whether the money was earned or spent is recorded by the
/// transaction type, never by the sign of the amount.
///
/// Amounts are stored in the database as an integer number of cents so that
/// sums computed by SQL are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "Decimal", try_from = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount from a decimal value.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `value` is zero or negative,
    /// - [Error::TooManyDecimalPlaces] if `value` has non-zero digits beyond the
    ///   second decimal place,
    /// - or [Error::AmountTooLarge] if `value` has more than 12 digits.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(value));
        }

        if value.normalize().scale() > DECIMAL_PLACES {
            return Err(Error::TooManyDecimalPlaces(value));
        }

        if value > Decimal::new(MAX_CENTS, DECIMAL_PLACES) {
            return Err(Error::AmountTooLarge(value));
        }

        let mut value = value;
        value.rescale(DECIMAL_PLACES);

        Ok(Self(value))
    }

    /// Create an amount from an integer number of cents.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [Amount::new].
    pub fn from_cents(cents: i64) -> Result<Self, Error> {
        Self::new(Decimal::new(cents, DECIMAL_PLACES))
    }

    /// The amount as an integer number of cents, e.g. `12.50` is `1250`.
    pub fn cents(&self) -> i64 {
        // The mantissa is bounded by `MAX_CENTS` since the scale is always two.
        self.0.mantissa() as i64
    }

    /// The amount as a decimal with two decimal places.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value =
            Decimal::from_str(s.trim()).map_err(|_| Error::InvalidAmount(s.trim().to_owned()))?;

        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.cents()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let cents = i64::column_result(value)?;

        Amount::from_cents(cents).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
