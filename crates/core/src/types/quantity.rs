//! Ingredient quantity using decimal arithmetic.
//!
//! Cart line items carry whatever amount the recipe called for ("0.5 cup",
//! "2 large"), so a quantity is a strictly positive decimal with no unit
//! attached. The unit travels beside it as free text.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not a decimal number.
    #[error("quantity must be a number: {0}")]
    NotANumber(String),
    /// The value is zero or negative.
    #[error("quantity must be greater than zero")]
    NotPositive,
}

/// A strictly positive ingredient amount.
///
/// ```
/// use recipe_box_core::Quantity;
///
/// assert_eq!(Quantity::parse("1.5").unwrap().to_string(), "1.5");
/// assert!(Quantity::parse("0").is_err());
/// assert!(Quantity::parse("a pinch").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    /// Create a quantity from a decimal.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotPositive` if the amount is zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, QuantityError> {
        if amount <= Decimal::ZERO {
            return Err(QuantityError::NotPositive);
        }
        Ok(Self(amount.normalize()))
    }

    /// Parse a quantity from user input (e.g. a form field).
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotANumber` if the input is not a decimal, or
    /// `QuantityError::NotPositive` if it is zero or negative.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| QuantityError::NotANumber(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = QuantityError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Quantity {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Quantity {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Quantity::parse("2").unwrap().amount(), Decimal::from(2));
        assert_eq!(Quantity::parse(" 0.25 ").unwrap().to_string(), "0.25");
        assert_eq!(Quantity::parse("1.50").unwrap().to_string(), "1.5");
    }

    #[test]
    fn test_parse_not_a_number() {
        assert!(matches!(
            Quantity::parse("some"),
            Err(QuantityError::NotANumber(_))
        ));
        assert!(matches!(
            Quantity::parse(""),
            Err(QuantityError::NotANumber(_))
        ));
    }

    #[test]
    fn test_parse_not_positive() {
        assert_eq!(Quantity::parse("0"), Err(QuantityError::NotPositive));
        assert_eq!(Quantity::parse("-1"), Err(QuantityError::NotPositive));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Quantity = serde_json::from_str("\"3.5\"").unwrap();
        assert_eq!(ok.to_string(), "3.5");

        let err = serde_json::from_str::<Quantity>("\"0\"");
        assert!(err.is_err());
    }
}
