//! Catalog product record and its fixed-scale price.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// A product as served by the listing endpoints. Read-only for this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque, stable identifier (primary key).
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(value_type = String, example = "19.99")]
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// `None` means the stock level is unknown.
    #[serde(default)]
    pub stock: Option<i32>,
}

/// Decimal price with a fixed scale of two digits, held as whole cents.
///
/// Serialized as a decimal string (`"12.30"`), matching how a `NUMERIC(10,2)` column
/// travels over JSON. Deserializes from either a decimal string or a JSON number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    cents: i64,
}

impl Price {
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub const fn cents(self) -> i64 {
        self.cents
    }

    /// Accepts a JSON number only when it has at most two fraction digits, like the string form.
    fn from_number(n: f64) -> Result<Self, ParsePriceError> {
        let err = || ParsePriceError(n.to_string());
        let scaled = n * 100.0;
        let cents = scaled.round();
        // Beyond 2^53 an f64 no longer holds every whole cent.
        if !scaled.is_finite() || cents.abs() > MAX_EXACT_CENTS {
            return Err(err());
        }
        if (scaled - cents).abs() > SCALE_TOLERANCE * scaled.abs().max(1.0) {
            return Err(err());
        }
        Ok(Price::from_cents(cents as i64))
    }
}

const MAX_EXACT_CENTS: f64 = 9_007_199_254_740_992.0;

/// Slack for binary representation error in values such as `19.99 * 100.0`.
const SCALE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid price '{0}': expected a decimal with at most two fraction digits")]
pub struct ParsePriceError(String);

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Price {
    type Err = ParsePriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePriceError(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || frac.len() > 2 {
            return Err(err());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let whole: i64 = whole.parse().map_err(|_| err())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(err)?;
        Ok(Price::from_cents(if negative { -cents } else { cents }))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::Number(n) => Price::from_number(n).map_err(serde::de::Error::custom),
        }
    }
}
