//! Account wire types and balance parsing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Store-assigned account identifier.
pub type AccountId = i64;

/// A persisted account row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    #[serde(with = "balance")]
    pub balance: Decimal,
}

/// Validated create/update payload. Only produced by `AccountValidator` on the server side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    #[serde(with = "balance")]
    pub balance: Decimal,
}

impl NewAccount {
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            name: self.name,
            balance: self.balance,
        }
    }
}

/// Raw request body for create and update. Unknown fields (such as an echoed `id`) are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AccountInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub balance: Option<Value>,
}

/// Parse a balance from a JSON number or a string in plain decimal notation.
/// Returns None for anything else, including partially numeric strings like "12abc".
pub fn parse_balance(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(s.trim()),
        _ => None,
    }
}

/// Parse `[+-]digits[.digits][(e|E)[+-]digits]`.
pub fn parse_decimal_str(s: &str) -> Option<Decimal> {
    if !is_decimal_notation(s) {
        return None;
    }
    let Some((mantissa, exponent)) = s.split_once(['e', 'E']) else {
        return Decimal::from_str(s).ok();
    };
    shift_decimal(Decimal::from_str(mantissa).ok()?, exponent.parse().ok()?)
}

/// Finest fraction a `Decimal` can hold.
const MAX_SCALE: u32 = 28;

/// `value * 10^exponent`. Digits below the finest representable fraction are rounded
/// half away from zero; None when the result is too large.
fn shift_decimal(value: Decimal, exponent: i64) -> Option<Decimal> {
    let digits = value.mantissa();
    let scale = i64::from(value.scale()).checked_sub(exponent)?;
    if scale < 0 {
        let factor = 10i128.checked_pow(u32::try_from(-scale).ok()?)?;
        return Decimal::try_from_i128_with_scale(digits.checked_mul(factor)?, 0).ok();
    }
    if scale <= i64::from(MAX_SCALE) {
        return Decimal::try_from_i128_with_scale(digits, scale as u32).ok();
    }
    let dropped = scale - i64::from(MAX_SCALE);
    if dropped > 38 {
        return Some(Decimal::ZERO);
    }
    let divisor = 10i128.pow(dropped as u32);
    let (quotient, remainder) = (digits / divisor, (digits % divisor).abs());
    let rounded = if remainder >= divisor - remainder {
        quotient + digits.signum()
    } else {
        quotient
    };
    Decimal::try_from_i128_with_scale(rounded, MAX_SCALE).ok()
}

fn is_decimal_notation(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

/// Serde adapter: balances travel as JSON numbers. Whole values are written as integers.
pub mod balance {
    use super::*;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let normalized = value.normalize();
        if normalized.scale() == 0 {
            if let Some(n) = normalized.to_i64() {
                return serializer.serialize_i64(n);
            }
        }
        let f = normalized
            .to_f64()
            .ok_or_else(|| S::Error::custom(format!("balance {} is not representable", value)))?;
        serializer.serialize_f64(f)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        parse_balance(&raw).ok_or_else(|| D::Error::custom(format!("invalid balance: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numbers_and_decimal_strings() {
        assert_eq!(parse_balance(&json!(100.5)), Some(Decimal::new(1005, 1)));
        assert_eq!(parse_balance(&json!(200)), Some(Decimal::from(200)));
        assert_eq!(parse_balance(&json!("-12.75")), Some(Decimal::new(-1275, 2)));
        assert_eq!(parse_balance(&json!("  42 ")), Some(Decimal::from(42)));
        assert_eq!(parse_balance(&json!(".5")), Some(Decimal::new(5, 1)));
        assert_eq!(parse_balance(&json!("1e3")), Some(Decimal::from(1000)));
    }

    #[test]
    fn rejects_partial_and_non_numeric_values() {
        for bad in [
            json!("12abc"),
            json!(""),
            json!("NaN"),
            json!("Infinity"),
            json!("."),
            json!("1e"),
            json!("1_000"),
            json!(true),
            json!(null),
            json!([1]),
            json!({"amount": 1}),
        ] {
            assert_eq!(parse_balance(&bad), None, "{} should be rejected", bad);
        }
    }

    #[test]
    fn rejects_out_of_range_magnitudes() {
        assert_eq!(parse_balance(&json!(1e300)), None);
        assert_eq!(parse_balance(&json!("1e29")), None);
        assert_eq!(parse_balance(&json!("1e28")), Some(Decimal::from_i128_with_scale(10i128.pow(28), 0)));
    }

    #[test]
    fn tiny_magnitudes_round_to_the_finest_fraction() {
        assert_eq!(parse_balance(&json!("-2.5e-3")), Some(Decimal::new(-25, 4)));
        assert_eq!(parse_balance(&json!("1.5e-28")), Some(Decimal::new(2, 28)));
        assert_eq!(parse_balance(&json!("-1.5e-28")), Some(Decimal::new(-2, 28)));
        assert_eq!(parse_balance(&json!(1e-30)), Some(Decimal::ZERO));
        assert_eq!(parse_balance(&json!("7e-400")), Some(Decimal::ZERO));
    }

    #[test]
    fn whole_balances_serialize_as_integers() {
        let account = Account {
            id: 1,
            name: "Alice".into(),
            balance: Decimal::new(20000, 2),
        };
        assert_eq!(
            serde_json::to_value(&account).unwrap(),
            json!({"id": 1, "name": "Alice", "balance": 200})
        );
    }

    #[test]
    fn fractional_balances_serialize_as_floats() {
        let account = Account {
            id: 7,
            name: "Bob".into(),
            balance: Decimal::new(10050, 2),
        };
        assert_eq!(
            serde_json::to_string(&account).unwrap(),
            r#"{"id":7,"name":"Bob","balance":100.5}"#
        );
    }

    #[test]
    fn account_round_trips_through_json() {
        let parsed: Account = serde_json::from_str(r#"{"id":3,"name":"Carol","balance":-5.25}"#).unwrap();
        assert_eq!(parsed.balance, Decimal::new(-525, 2));
    }

    #[test]
    fn input_ignores_unknown_fields() {
        let input: AccountInput = serde_json::from_value(json!({"id": 9, "name": "Dan", "balance": "1"})).unwrap();
        assert_eq!(input.name.as_deref(), Some("Dan"));
        assert_eq!(input.balance, Some(json!("1")));
    }
}
