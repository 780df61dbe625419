//! Amount type for handling signed monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts are parsed from user
//! input that may or may not include a dollar sign and commas, are persisted as plain JSON numbers,
//! and are displayed as dollars with thousands separators, e.g. `-$1,234.50`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Number of decimal places used when amounts are rounded for display.
const DISPLAY_DP: u32 = 2;

/// Represents a signed dollar amount. Positive amounts are income, negative amounts are expenses.
///
/// Equality and ordering are numeric, so `4.5` and `4.50` are the same amount.
///
/// # Examples
///
/// Parsing with or without a dollar sign:
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("-$1,000.00").unwrap();
/// let b = Amount::from_str("-1000").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "-$1,000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Returns true if the amount is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Rounds to cents. Midpoints round away from zero, so `0.125` becomes `0.13`.
    pub fn rounded(&self) -> Self {
        Self::new(
            self.value
                .round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Formats the amount with an explicit `+` for income, as shown in transaction history.
    pub fn signed(&self) -> String {
        if self.is_positive() {
            format!("+{self}")
        } else {
            self.to_string()
        }
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError {
    input: String,
    source: rust_decimal::Error,
}

impl AmountError {
    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmountError")
            .field("input", &self.input)
            .field("source", &self.source)
            .finish()
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid amount: {}", self.input, self.source)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Remove dollar sign if present: "-$50.00", "$50.00" or "-50.00"
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else if let Some(after_plus) = trimmed.strip_prefix('+') {
            after_plus
                .strip_prefix('$')
                .unwrap_or(after_plus)
                .to_string()
        } else {
            trimmed.strip_prefix('$').unwrap_or(trimmed).to_string()
        };

        // Remove commas (thousand separators)
        let without_commas = without_dollar.replace(',', "");

        let value = Decimal::from_str(&without_commas).map_err(|source| AmountError {
            input: s.to_string(),
            source,
        })?;
        Ok(Amount::new(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        let sign = if rounded.is_negative() { "-" } else { "" };
        let digits = rounded.value().abs().to_string();
        let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        write!(f, "{sign}${}.{cents:0<2}", group_thousands(whole))
    }
}

/// Inserts a comma between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (ix, ch) in digits.chars().enumerate() {
        if ix > 0 && (digits.len() - ix) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Persisted as a plain JSON number carrying every digit, e.g. -4.5
        Number::from_str(&self.value.normalize().to_string())
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Accepts amounts written as JSON numbers or as strings such as `"-$4.50"`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => {
                let text = number.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(Amount::new)
                    .map_err(|e| de::Error::custom(format!("{text} is not a valid amount: {e}")))
            }
            Value::String(text) => Amount::from_str(&text).map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a number or a dollar amount, found {other}"
            ))),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}
