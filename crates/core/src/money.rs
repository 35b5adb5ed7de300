//! Fixed-point prices measured in millions.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, Sub},
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Price of a draftable entry, stored as whole tenths of a million.
///
/// Amounts are never negative and never drift: `30.5` is held as `305`,
/// so budget comparisons are exact integer comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u32);

/// Reasons a decimal amount cannot become a [`Price`].
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The amount was below zero.
    #[error("price cannot be negative: {0}")]
    Negative(f64),
    /// The amount was NaN or infinite.
    #[error("price must be a finite number")]
    NotFinite,
    /// The amount does not fit the fixed-point range.
    #[error("price out of range: {0}")]
    OutOfRange(f64),
}

impl Price {
    /// Zero cost.
    pub const ZERO: Price = Price(0);

    /// Build a price from whole tenths of a million.
    pub const fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    /// Build a price from a decimal amount in millions, rounding to the nearest tenth.
    pub fn from_millions(amount: f64) -> Result<Self, PriceError> {
        if !amount.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if amount < 0.0 {
            return Err(PriceError::Negative(amount));
        }
        let tenths = (amount * 10.0).round();
        if tenths > f64::from(u32::MAX) {
            return Err(PriceError::OutOfRange(amount));
        }
        Ok(Self(tenths as u32))
    }

    /// Whole tenths of a million.
    pub const fn tenths(self) -> u32 {
        self.0
    }

    /// Decimal amount in millions, for display and serialisation.
    pub fn as_millions(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Subtract without going below zero.
    pub fn saturating_sub(self, other: Price) -> Price {
        Price(self.0.saturating_sub(other.0))
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Price {
    type Output = Price;

    fn sub(self, rhs: Price) -> Price {
        self.saturating_sub(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, |acc, price| acc + price)
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Price>>(iter: I) -> Price {
        iter.copied().sum()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{}M", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_millions())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = f64::deserialize(deserializer)?;
        Price::from_millions(amount).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_one_decimal() {
        let price = Price::from_millions(30.5).unwrap();
        assert_eq!(price.tenths(), 305);
        assert_eq!(price.to_string(), "$30.5M");
        assert_eq!(Price::from_tenths(1000).to_string(), "$100.0M");
        assert_eq!(Price::ZERO.to_string(), "$0.0M");
    }

    #[test]
    fn rejects_negative_and_non_finite_amounts() {
        assert_eq!(Price::from_millions(-1.0), Err(PriceError::Negative(-1.0)));
        assert_eq!(Price::from_millions(f64::NAN), Err(PriceError::NotFinite));
        assert_eq!(
            Price::from_millions(f64::INFINITY),
            Err(PriceError::NotFinite)
        );
    }

    #[test]
    fn sums_without_float_drift() {
        let prices = [0.1, 0.2, 0.3, 99.4]
            .iter()
            .map(|amount| Price::from_millions(*amount).unwrap())
            .collect::<Vec<_>>();
        let total: Price = prices.iter().sum();
        assert_eq!(total, Price::from_tenths(1000));
    }

    #[test]
    fn serialises_as_millions() {
        let price = Price::from_tenths(245);
        assert_eq!(serde_json::to_string(&price).unwrap(), "24.5");
        let decoded: Price = serde_json::from_str("24.5").unwrap();
        assert_eq!(decoded, price);
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }
}
