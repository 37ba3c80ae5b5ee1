//! Console state: the displayed account list and a single add/edit form.
//!
//! The form is always bound to its own draft, never to a displayed row, so edits in
//! progress do not show up in the list. After a successful save the list is re-read
//! from the gateway rather than patched locally.

use crate::client::{AccountsApi, ClientError};
use fintech_gateway::model::parse_decimal_str;
use fintech_gateway::{Account, AccountId, NewAccount};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Request(#[from] ClientError),
    #[error("'{0}' is not a valid balance")]
    InvalidDraft(String),
    #[error("no add or edit form is open")]
    NotEditing,
}

/// Unsaved form contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub balance: Decimal,
}

impl Draft {
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            balance: Decimal::ZERO,
        }
    }

    pub fn from_account(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            balance: account.balance,
        }
    }

    pub fn to_payload(&self) -> NewAccount {
        NewAccount {
            name: self.name.clone(),
            balance: self.balance,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Form hidden.
    Browsing,
    Adding(Draft),
    Editing { id: AccountId, draft: Draft },
}

/// Asks the user before a destructive request is sent.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

pub struct Console<A> {
    api: A,
    accounts: Vec<Account>,
    mode: Mode,
    last_error: Option<String>,
}

impl<A: AccountsApi> Console<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            accounts: Vec::new(),
            mode: Mode::Browsing,
            last_error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_form_visible(&self) -> bool {
        !matches!(self.mode, Mode::Browsing)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.mode {
            Mode::Browsing => None,
            Mode::Adding(draft) | Mode::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match &mut self.mode {
            Mode::Browsing => None,
            Mode::Adding(draft) | Mode::Editing { draft, .. } => Some(draft),
        }
    }

    /// Replace the list with the gateway's current rows. On failure the old list stays.
    pub async fn refresh(&mut self) -> Result<(), ConsoleError> {
        tracing::debug!("fetching accounts");
        match self.api.list().await {
            Ok(accounts) => {
                tracing::info!(count = accounts.len(), "accounts fetched");
                self.accounts = accounts;
                Ok(())
            }
            Err(e) => Err(self.surface("fetch accounts", e)),
        }
    }

    pub fn open_add_form(&mut self) {
        self.mode = Mode::Adding(Draft::blank());
        tracing::debug!("opening add form");
    }

    /// Re-read one row from the gateway and open the form on a copy of it.
    /// The listed row is replaced with the fresh one; the form stays as it was on failure.
    pub async fn edit_account(&mut self, id: AccountId) -> Result<(), ConsoleError> {
        let result = self.api.get(id).await;
        let account = result.map_err(|e| self.surface("fetch account", e))?;
        if let Some(row) = self.accounts.iter_mut().find(|a| a.id == id) {
            *row = account.clone();
        }
        self.mode = Mode::Editing {
            id,
            draft: Draft::from_account(&account),
        };
        tracing::debug!(id, "opening edit form");
        Ok(())
    }

    /// Hide the form and discard the draft.
    pub fn cancel_form(&mut self) {
        self.mode = Mode::Browsing;
        tracing::debug!("form cancelled");
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ConsoleError> {
        let draft = self.draft_mut().ok_or(ConsoleError::NotEditing)?;
        draft.name = name.into();
        Ok(())
    }

    /// Parse and store a balance typed by the user. Unparseable text leaves the draft untouched.
    pub fn set_balance(&mut self, text: &str) -> Result<(), ConsoleError> {
        let balance = parse_decimal_str(text.trim()).ok_or_else(|| ConsoleError::InvalidDraft(text.to_string()))?;
        let draft = self.draft_mut().ok_or(ConsoleError::NotEditing)?;
        draft.balance = balance;
        Ok(())
    }

    /// Create in add mode, update in edit mode. On failure the form and draft stay as they were.
    pub async fn save_account(&mut self) -> Result<Account, ConsoleError> {
        let (action, result) = match &self.mode {
            Mode::Browsing => return Err(ConsoleError::NotEditing),
            Mode::Adding(draft) => {
                let payload = draft.to_payload();
                tracing::info!(name = %payload.name, "creating account");
                ("create account", self.api.create(&payload).await)
            }
            Mode::Editing { id, draft } => {
                let (id, payload) = (*id, draft.to_payload());
                tracing::info!(id, name = %payload.name, "updating account");
                ("update account", self.api.update(id, &payload).await)
            }
        };
        let saved = result.map_err(|e| self.surface(action, e))?;
        self.last_error = None;
        self.cancel_form();
        // Save already succeeded; a failed reload is surfaced through last_error.
        let _ = self.refresh().await;
        Ok(saved)
    }

    /// Delete after explicit confirmation, then reload the list.
    pub async fn delete_account<C: Confirm>(
        &mut self,
        id: AccountId,
        confirm: &mut C,
    ) -> Result<DeleteOutcome, ConsoleError> {
        let prompt = format!("Are you sure you want to delete the account with ID {}?", id);
        if !confirm.confirm(&prompt) {
            return Ok(DeleteOutcome::Declined);
        }
        tracing::info!(id, "deleting account");
        let result = self.api.delete(id).await;
        let confirmation = result.map_err(|e| self.surface("delete account", e))?;
        tracing::info!(id, %confirmation, "account deleted");
        self.last_error = None;
        let _ = self.refresh().await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Text view: the table, then the form when open, then the last failure.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let name_width = self
            .accounts
            .iter()
            .map(|a| a.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);
        let _ = writeln!(out, "{:>6}  {:<name_width$}  {:>14}", "ID", "NAME", "BALANCE");
        if self.accounts.is_empty() {
            let _ = writeln!(out, "  (no accounts)");
        }
        for account in &self.accounts {
            let _ = writeln!(
                out,
                "{:>6}  {:<name_width$}  {:>14}",
                account.id,
                account.name,
                account.balance.normalize()
            );
        }
        match &self.mode {
            Mode::Browsing => {}
            Mode::Adding(draft) => {
                let _ = writeln!(out, "\n[new account] name: {:?}  balance: {}", draft.name, draft.balance.normalize());
            }
            Mode::Editing { id, draft } => {
                let _ = writeln!(
                    out,
                    "\n[editing account {}] name: {:?}  balance: {}",
                    id,
                    draft.name,
                    draft.balance.normalize()
                );
            }
        }
        if let Some(error) = &self.last_error {
            let _ = writeln!(out, "\n! {}", error.replace('\n', " | "));
        }
        out
    }

    fn surface(&mut self, action: &str, error: ClientError) -> ConsoleError {
        tracing::error!(action, "HTTP Error: {}", error);
        self.last_error = Some(error.to_string());
        ConsoleError::Request(error)
    }
}
