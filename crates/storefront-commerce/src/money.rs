//! Money and rate types.
//!
//! Amounts are integer cents and rates are integer basis points, so repeated
//! add/remove cycles never drift and every rounding step is explicit
//! (half-up, to the cent).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

const CENTS_PER_UNIT: i64 = 100;
const BASIS_POINTS_PER_UNIT: i128 = 10_000;

/// A monetary value in the store currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Create a new Money value from cents.
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a Money value from a decimal amount, rounding to the nearest cent.
    ///
    /// ```
    /// use storefront_commerce::money::Money;
    /// let price = Money::from_decimal(109.95);
    /// assert_eq!(price.amount_cents, 10995);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self::new((amount * CENTS_PER_UNIT as f64).round() as i64)
    }

    /// A zero amount.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value (display and JSON only).
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / CENTS_PER_UNIT as f64
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}${}", sign, self.display_amount_abs())
    }

    /// Format without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}", sign, self.display_amount_abs())
    }

    fn display_amount_abs(&self) -> String {
        let abs = self.amount_cents.unsigned_abs();
        let unit = CENTS_PER_UNIT as u64;
        format!("{}.{:02}", abs / unit, abs % unit)
    }

    /// Try to add another Money value, returning None on overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Money::new)
    }

    /// Try to subtract another Money value, returning None on overflow.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        self.amount_cents.checked_sub(other.amount_cents).map(Money::new)
    }

    /// Try to multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents.checked_mul(factor).map(Money::new)
    }

    /// Sum an iterator of Money values, returning None on overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>) -> Option<Money> {
        iter.try_fold(Money::zero(), |acc, m| acc.try_add(m))
    }

    /// Clamp below at zero.
    pub fn floor_zero(self) -> Money {
        self.max(Money::zero())
    }
}

impl Add for Money {
    type Output = Money;

    /// Saturating; pricing inputs are bounded by cart validation.
    fn add(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_add(other.amount_cents))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_sub(other.amount_cents))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Error parsing a decimal money string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount '{0}': expected a decimal with at most two fraction digits")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Parse "12", "12.5", "12.50" or "-3.20" exactly, without going through floats.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoneyError(s.to_string());
        let trimmed = s.trim().trim_start_matches('$');
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if frac.len() > 2 || !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(err());
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| err())? };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };
        let cents = whole
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(err)?;

        Ok(Money::new(if negative { -cents } else { cents }))
    }
}

/// A proportional rate in basis points (1 bp = 0.01 %).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Rate {
    basis_points: u32,
}

impl Rate {
    /// Create from basis points (800 = 8 %).
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self { basis_points }
    }

    /// Create from a fraction (0.19 = 19 %). Negative input is treated as zero.
    pub fn from_fraction(fraction: f64) -> Self {
        Self::from_basis_points((fraction.max(0.0) * BASIS_POINTS_PER_UNIT as f64).round() as u32)
    }

    /// Create from a percentage (15.0 = 15 %). Negative input is treated as zero.
    pub fn from_percent(percent: f64) -> Self {
        Self::from_fraction(percent / 100.0)
    }

    /// Basis points.
    pub const fn basis_points(&self) -> u32 {
        self.basis_points
    }

    /// The rate as a fraction.
    pub fn as_fraction(&self) -> f64 {
        self.basis_points as f64 / BASIS_POINTS_PER_UNIT as f64
    }

    /// Apply the rate to an amount, rounding half-up (away from zero) to the cent.
    pub fn of(&self, amount: Money) -> Money {
        let scaled = amount.amount_cents as i128 * self.basis_points as i128;
        let half = BASIS_POINTS_PER_UNIT / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / BASIS_POINTS_PER_UNIT
        } else {
            (scaled - half) / BASIS_POINTS_PER_UNIT
        };
        Money::new(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.basis_points / 100;
        let frac = self.basis_points % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

/// Serde adapter storing [`Money`] as a non-negative decimal JSON number,
/// the shape catalog records arrive in (`"price": 109.95`).
pub mod decimal {
    use super::Money;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(D::Error::custom(format!(
                "price must be a non-negative number, got {}",
                amount
            )));
        }
        Ok(Money::from_decimal(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).amount_cents, 4999);
        assert_eq!(Money::from_decimal(0.1 + 0.2).amount_cents, 30);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999).display(), "$49.99");
        assert_eq!(Money::new(5).display(), "$0.05");
        assert_eq!(Money::new(-320).display(), "-$3.20");
        assert_eq!(Money::new(2550).display_amount(), "25.50");
    }

    #[test]
    fn test_money_parse() {
        assert_eq!("10".parse::<Money>().unwrap(), Money::new(1000));
        assert_eq!("5.5".parse::<Money>().unwrap(), Money::new(550));
        assert_eq!("$9.99".parse::<Money>().unwrap(), Money::new(999));
        assert_eq!("-3.20".parse::<Money>().unwrap(), Money::new(-320));
        assert_eq!(".75".parse::<Money>().unwrap(), Money::new(75));
        assert!("1.234".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn test_money_checked_arithmetic() {
        let m = Money::new(1000);
        assert_eq!(m.try_multiply(3), Some(Money::new(3000)));
        assert_eq!(Money::new(i64::MAX).try_add(&Money::new(1)), None);
        assert_eq!(
            Money::try_sum([Money::new(1), Money::new(2)].iter()),
            Some(Money::new(3))
        );
    }

    #[test]
    fn test_try_sum_overflow() {
        assert_eq!(Money::try_sum(std::iter::empty()), Some(Money::zero()));
        let lines = [Money::new(i64::MAX - 5), Money::new(5)];
        assert_eq!(Money::try_sum(lines.iter()), Some(Money::new(i64::MAX)));
        let lines = [Money::new(i64::MAX), Money::new(1), Money::new(-1)];
        assert_eq!(Money::try_sum(lines.iter()), None);
    }

    #[test]
    fn test_rate_rounds_half_up() {
        let eight = Rate::from_fraction(0.08);
        assert_eq!(eight.basis_points(), 800);
        assert_eq!(eight.of(Money::new(4000)), Money::new(320));
        // 0.5 cent rounds up
        assert_eq!(Rate::from_basis_points(500).of(Money::new(10)), Money::new(1));
        // 0.4 cent rounds down
        assert_eq!(Rate::from_basis_points(400).of(Money::new(10)), Money::new(0));
    }

    #[test]
    fn test_rate_from_percent_and_display() {
        let r = Rate::from_percent(12.5);
        assert_eq!(r.basis_points(), 1250);
        assert_eq!(r.to_string(), "12.50%");
        assert_eq!(Rate::from_fraction(0.19).to_string(), "19%");
        assert_eq!(Rate::from_fraction(-1.0).basis_points(), 0);
    }

    #[test]
    fn test_decimal_serde_rejects_negative() {
        #[derive(Debug, Deserialize)]
        struct Priced {
            #[serde(with = "decimal")]
            #[allow(dead_code)]
            price: Money,
        }
        assert!(serde_json::from_str::<Priced>(r#"{"price": -1.0}"#).is_err());
        let ok: Priced = serde_json::from_str(r#"{"price": 22.3}"#).unwrap();
        assert_eq!(ok.price, Money::new(2230));
    }
}
