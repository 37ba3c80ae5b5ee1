//! Account CRUD handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::Store;
use crate::model::{Account, AccountId, AccountInput, NewAccount};
use crate::service::AccountValidator;
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Json,
};

/// Path ids that are not integers cannot name a stored row.
fn parse_id(id_str: &str) -> Result<AccountId, AppError> {
    id_str.trim().parse().map_err(|_| AppError::NotFound)
}

fn validated_body(payload: Result<Json<AccountInput>, JsonRejection>) -> Result<NewAccount, AppError> {
    let Json(input) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    AccountValidator::validate(input)
}

pub async fn list(Store(store): Store) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = store
        .list()
        .await
        .map_err(|e| AppError::internal("Error fetching accounts", e))?;
    Ok(Json(accounts))
}

pub async fn read(Store(store): Store, Path(id_str): Path<String>) -> Result<Json<Account>, AppError> {
    let id = parse_id(&id_str)?;
    let account = store
        .get(id)
        .await
        .map_err(|e| AppError::internal("Error fetching account", e))?
        .ok_or(AppError::NotFound)?;
    Ok(Json(account))
}

pub async fn create(
    Store(store): Store,
    payload: Result<Json<AccountInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let new_account = validated_body(payload)?;
    let account = store
        .create(&new_account)
        .await
        .map_err(|e| AppError::internal("Error creating account", e))?;
    tracing::info!(id = account.id, "account created");
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn update(
    Store(store): Store,
    Path(id_str): Path<String>,
    payload: Result<Json<AccountInput>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let changes = validated_body(payload)?;
    let id = parse_id(&id_str)?;
    let account = store
        .update(id, &changes)
        .await
        .map_err(|e| AppError::internal("Error updating account", e))?
        .ok_or(AppError::NotFound)?;
    Ok(Json(account))
}

pub async fn delete(Store(store): Store, Path(id_str): Path<String>) -> Result<String, AppError> {
    let id = parse_id(&id_str)?;
    let deleted = store
        .delete(id)
        .await
        .map_err(|e| AppError::internal("Error deleting account", e))?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(format!("Account with ID {} deleted successfully", id))
}

#[cfg(test)]
mod tests {
    use super::parse_id;
    use crate::error::AppError;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("17").unwrap(), 17);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound)));
        assert!(matches!(parse_id("1.5"), Err(AppError::NotFound)));
    }
}
