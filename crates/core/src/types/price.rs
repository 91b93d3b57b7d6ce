//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from the backend as loosely typed JSON (numbers, numeric
//! strings, or nothing at all). [`parse_amount`] accepts the first two,
//! [`coerce_amount`] additionally maps everything else to zero so callers
//! never see a negative or missing unit price.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors from parsing price-related values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Currency code is not one we can display.
    #[error("unsupported currency code: {0}")]
    UnsupportedCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display with the currency symbol and two decimal places.
    ///
    /// ```rust
    /// # use halltek_core::{CurrencyCode, Price};
    /// # use rust_decimal::Decimal;
    /// let price = Price::new(Decimal::new(2550, 2), CurrencyCode::INR);
    /// assert_eq!(price.display(), "₹25.50");
    /// ```
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol prefixed to formatted amounts.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Self::INR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(PriceError::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// Parse a JSON number or numeric string into a decimal amount.
///
/// Returns `None` for anything else, including non-finite floats.
#[must_use]
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64))
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    }
}

/// Coerce a loosely typed price into a non-negative amount.
///
/// Missing, invalid, or negative input becomes zero.
#[must_use]
pub fn coerce_amount(value: Option<&Value>) -> Decimal {
    value
        .and_then(parse_amount)
        .map_or(Decimal::ZERO, clamp_non_negative)
}

/// Clamp an amount to zero or above.
#[must_use]
pub fn clamp_non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Serde adapter storing a decimal amount as a plain JSON number.
///
/// Amounts an `f64` cannot carry exactly are written as numeric strings.
/// Deserialization also accepts numeric strings. Negative amounts are
/// clamped to zero; anything non-numeric is an error.
pub mod amount_as_number {
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use super::{FromStr, ToPrimitive};

    /// Serialize the amount as a JSON number when an `f64` holds it exactly,
    /// otherwise as its decimal string so no digits are lost.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        match amount.to_f64() {
            Some(f) if Decimal::from_str(&f.to_string()).is_ok_and(|back| back == *amount) => {
                serializer.serialize_f64(f)
            }
            _ => serializer.serialize_str(&amount.normalize().to_string()),
        }
    }

    /// Deserialize a number or numeric string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not numeric.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = Value::deserialize(deserializer)?;
        super::parse_amount(&value)
            .map(super::clamp_non_negative)
            .ok_or_else(|| D::Error::custom(format!("expected a numeric price, got {value}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_display_pads_two_decimals() {
        let price = Price::new(Decimal::new(10, 0), CurrencyCode::INR);
        assert_eq!(price.display(), "₹10.00");
    }

    #[test]
    fn test_display_rounds_half_up() {
        let price = Price::new(Decimal::new(1005, 3), CurrencyCode::USD);
        assert_eq!(price.display(), "$1.01");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("inr".parse::<CurrencyCode>().unwrap(), CurrencyCode::INR);
        assert_eq!(" GBP ".parse::<CurrencyCode>().unwrap(), CurrencyCode::GBP);
        assert!(matches!(
            "XYZ".parse::<CurrencyCode>(),
            Err(PriceError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn test_parse_amount_accepts_numbers_and_strings() {
        assert_eq!(parse_amount(&json!(12)), Some(Decimal::new(12, 0)));
        assert_eq!(parse_amount(&json!(5.5)), Some(Decimal::new(55, 1)));
        assert_eq!(parse_amount(&json!("19.99")), Some(Decimal::new(1999, 2)));
        assert_eq!(parse_amount(&json!("")), None);
        assert_eq!(parse_amount(&json!("abc")), None);
        assert_eq!(parse_amount(&json!(null)), None);
        assert_eq!(parse_amount(&json!(true)), None);
    }

    #[test]
    fn test_coerce_amount_defaults_to_zero() {
        assert_eq!(coerce_amount(None), Decimal::ZERO);
        assert_eq!(coerce_amount(Some(&json!("nope"))), Decimal::ZERO);
        assert_eq!(coerce_amount(Some(&json!(-3))), Decimal::ZERO);
        assert_eq!(coerce_amount(Some(&json!("7.25"))), Decimal::new(725, 2));
    }

    #[test]
    fn test_amount_as_number_serializes_number() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            #[serde(with = "amount_as_number")]
            price: Decimal,
        }

        let json = serde_json::to_string(&Wrapper {
            price: Decimal::new(55, 1),
        })
        .unwrap();
        assert_eq!(json, r#"{"price":5.5}"#);

        let parsed: Wrapper = serde_json::from_str(r#"{"price":"5.50"}"#).unwrap();
        assert_eq!(parsed.price, Decimal::new(55, 1));

        assert!(serde_json::from_str::<Wrapper>(r#"{"price":"free"}"#).is_err());
    }

    #[test]
    fn test_amount_as_number_keeps_every_digit() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            #[serde(with = "amount_as_number")]
            price: Decimal,
        }

        for text in ["12345678901234567.89", "79228162514264337593543950335"] {
            let price = Decimal::from_str(text).unwrap();
            let json = serde_json::to_string(&Wrapper { price }).unwrap();
            assert_eq!(json, format!(r#"{{"price":"{text}"}}"#));
            let parsed: Wrapper = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.price, price);
        }

        let json = serde_json::to_string(&Wrapper {
            price: Decimal::new(19999, 2),
        })
        .unwrap();
        assert_eq!(json, r#"{"price":199.99}"#);
    }
}
