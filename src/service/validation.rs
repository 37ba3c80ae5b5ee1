//! Request validation for account payloads.

use crate::error::AppError;
use crate::model::{parse_balance, AccountInput, NewAccount};

pub struct AccountValidator;

impl AccountValidator {
    /// Validate a create/update body. Name must be a non-empty string and balance a parseable number.
    pub fn validate(input: AccountInput) -> Result<NewAccount, AppError> {
        let name = match input.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(AppError::BadRequest("name is required".into())),
        };
        let raw = input
            .balance
            .ok_or_else(|| AppError::BadRequest("balance is required".into()))?;
        let balance = parse_balance(&raw)
            .ok_or_else(|| AppError::BadRequest(format!("balance must be a number, got {}", raw)))?;
        Ok(NewAccount { name, balance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn input(value: serde_json::Value) -> AccountInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_name_and_numeric_balance() {
        let account = AccountValidator::validate(input(json!({"name": "Alice", "balance": 100.50}))).unwrap();
        assert_eq!(account.name, "Alice");
        assert_eq!(account.balance, Decimal::new(1005, 1));
    }

    #[test]
    fn accepts_string_balance_and_negative_values() {
        let account = AccountValidator::validate(input(json!({"name": "Overdrawn", "balance": "-40.25"}))).unwrap();
        assert_eq!(account.balance, Decimal::new(-4025, 2));
    }

    #[test]
    fn rejects_missing_or_empty_name() {
        for body in [json!({"balance": 1}), json!({"name": "", "balance": 1}), json!({"name": null, "balance": 1})] {
            let err = AccountValidator::validate(input(body)).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[test]
    fn rejects_missing_or_unparseable_balance() {
        for body in [
            json!({"name": "Alice"}),
            json!({"name": "Alice", "balance": null}),
            json!({"name": "Alice", "balance": "12abc"}),
            json!({"name": "Alice", "balance": "abc"}),
            json!({"name": "Alice", "balance": false}),
        ] {
            let err = AccountValidator::validate(input(body)).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }
}
