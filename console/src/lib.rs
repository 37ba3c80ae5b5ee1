//! Account console: list and edit accounts held by the gateway.

pub mod client;
pub mod commands;
pub mod console;

pub use client::{AccountsApi, ClientError, HttpAccountsClient, DEFAULT_API_URL};
pub use commands::Command;
pub use console::{Confirm, Console, ConsoleError, DeleteOutcome, Draft, Mode};
