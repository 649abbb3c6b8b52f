//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront prices are US dollars, so unlike a multi-currency
//! `Price { amount, currency }` this is a plain non-negative decimal amount.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount does not fit the stored `NUMERIC(12,2)` range.
    #[error("price is too large")]
    OutOfRange,
}

/// Largest storable amount, `9999999999.99`.
const MAX_CENTS: i64 = 999_999_999_999;

/// A non-negative currency amount.
///
/// Deserializes from either a JSON number (`2.5`) or a string (`"2.50"`), and
/// always serializes as a string to avoid floating point drift in clients.
///
/// ```
/// use greengrocer_core::{Price, Quantity};
///
/// let apple = Price::from_cents(250);
/// let line = apple.times(Quantity::new(4).unwrap()).unwrap();
/// assert_eq!(line.to_string(), "$10.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::OutOfRange` if the result overflows or exceeds
    /// the storable range.
    pub fn times(self, quantity: Quantity) -> Result<Self, PriceError> {
        Self::bounded(self.0.checked_mul(Decimal::from(quantity.get())))
    }

    /// Sum of two prices.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::OutOfRange` if the sum exceeds the storable range.
    pub fn checked_add(self, rhs: Self) -> Result<Self, PriceError> {
        Self::bounded(self.0.checked_add(rhs.0))
    }

    /// Sum of many prices, failing on the first out-of-range partial sum.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::OutOfRange` if the total exceeds the storable range.
    pub fn total<I: IntoIterator<Item = Self>>(prices: I) -> Result<Self, PriceError> {
        prices.into_iter().try_fold(Self::ZERO, Self::checked_add)
    }

    fn bounded(amount: Option<Decimal>) -> Result<Self, PriceError> {
        match amount {
            Some(amount) if amount <= Decimal::new(MAX_CENTS, 2) => Ok(Self(amount)),
            _ => Err(PriceError::OutOfRange),
        }
    }

    /// The amount rounded to cents, e.g. `10.00`.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        let mut amount = self.0.round_dp(2);
        amount.rescale(2);
        amount
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.rounded())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
