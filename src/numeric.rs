//! Lossless decimal codec for prices and volumes.
//!
//! Every arbitrary-precision field is carried as a [`BigDecimal`] in memory and
//! as a string with exactly [`FRACTIONAL_DIGITS`] fractional digits on the wire.
//! Encoding never goes through `f64` and never uses exponent notation.
//!
//! Digits past the 16th fractional place are truncated toward zero, so
//! `decode(encode(v)) == v` only holds for values with at most 16 fractional
//! digits.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::error::{AppError, Result};

pub const FRACTIONAL_DIGITS: i64 = 16;

/// Render `value` with exactly 16 fractional digits, e.g. `100` → `"100.0000000000000000"`.
pub fn encode(value: &BigDecimal) -> String {
    let (digits, _) = value.with_scale(FRACTIONAL_DIGITS).as_bigint_and_exponent();
    let raw = digits.to_string();
    let (sign, magnitude) = match raw.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", raw.as_str()),
    };

    let width = FRACTIONAL_DIGITS as usize + 1;
    let padded = format!("{magnitude:0>width$}");
    let split = padded.len() - FRACTIONAL_DIGITS as usize;
    format!("{sign}{}.{}", &padded[..split], &padded[split..])
}

/// Parse a plain decimal literal, `[+-]?digits[.digits]`. Exponents, digit
/// separators, bare points and non-finite tokens are a
/// [`AppError::MalformedNumber`].
pub fn decode(raw: &str) -> Result<BigDecimal> {
    if !is_plain_decimal(raw) {
        return Err(AppError::malformed(raw));
    }
    BigDecimal::from_str(raw).map_err(|_| AppError::malformed(raw))
}

fn is_plain_decimal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    all_digits(int_part) && frac_part.map_or(true, all_digits)
}

/// Serde adapter: `#[serde(with = "crate::numeric::fixed16")]`.
pub mod fixed16 {
    use bigdecimal::BigDecimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &BigDecimal,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BigDecimal, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::decode(&raw).map_err(de::Error::custom)
    }
}
