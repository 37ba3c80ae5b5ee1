//! HTTP client for the gateway's `/api/accounts` endpoints.

use async_trait::async_trait;
use fintech_gateway::{Account, AccountId, NewAccount};
use reqwest::header::ACCEPT;
use reqwest::Response;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/accounts";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Error Code: {status}\nBackend Message: {message}")]
    Status { status: u16, message: String },
    #[error("Error: unreadable response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Remote operations the console needs.
#[async_trait]
pub trait AccountsApi: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Account>>;
    async fn get(&self, id: AccountId) -> ClientResult<Account>;
    async fn create(&self, account: &NewAccount) -> ClientResult<Account>;
    async fn update(&self, id: AccountId, account: &NewAccount) -> ClientResult<Account>;
    /// Returns the gateway's confirmation text.
    async fn delete(&self, id: AccountId) -> ClientResult<String>;
}

#[derive(Clone, Debug)]
pub struct HttpAccountsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAccountsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: AccountId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn checked(res: Response) -> ClientResult<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let message = res.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AccountsApi for HttpAccountsClient {
    async fn list(&self) -> ClientResult<Vec<Account>> {
        let res = self
            .client
            .get(&self.base_url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ClientError::Http)?;
        Self::checked(res).await?.json().await.map_err(ClientError::Decode)
    }

    async fn get(&self, id: AccountId) -> ClientResult<Account> {
        let res = self
            .client
            .get(self.item_url(id))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ClientError::Http)?;
        Self::checked(res).await?.json().await.map_err(ClientError::Decode)
    }

    async fn create(&self, account: &NewAccount) -> ClientResult<Account> {
        let res = self
            .client
            .post(&self.base_url)
            .json(account)
            .send()
            .await
            .map_err(ClientError::Http)?;
        Self::checked(res).await?.json().await.map_err(ClientError::Decode)
    }

    async fn update(&self, id: AccountId, account: &NewAccount) -> ClientResult<Account> {
        let res = self
            .client
            .put(self.item_url(id))
            .json(account)
            .send()
            .await
            .map_err(ClientError::Http)?;
        Self::checked(res).await?.json().await.map_err(ClientError::Decode)
    }

    async fn delete(&self, id: AccountId) -> ClientResult<String> {
        let res = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(ClientError::Http)?;
        Self::checked(res).await?.text().await.map_err(ClientError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let client = HttpAccountsClient::new("http://localhost:3000/api/accounts/");
        assert_eq!(client.base_url(), "http://localhost:3000/api/accounts");
        assert_eq!(client.item_url(4), "http://localhost:3000/api/accounts/4");
    }

    #[test]
    fn status_errors_read_like_backend_messages() {
        let err = ClientError::Status {
            status: 404,
            message: "Account not found".into(),
        };
        assert_eq!(err.to_string(), "Error Code: 404\nBackend Message: Account not found");
        assert_eq!(err.status(), Some(404));
    }
}
