//! Command implementations. Each builds a view-model from the shared
//! state, runs one operation, and prints its notices before any result.

use generix_storefront::{ClientError, ConfigError, Notice};
use thiserror::Error;

use crate::output;

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod orders;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Not signed in. Run `gx login` and set GENERIX_API_TOKEN to the printed token.")]
    SignedOut,
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Print the view-model's notices, then hand back the operation's result.
fn settle<T>(notices: Vec<Notice>, result: generix_storefront::Result<T>) -> Result<T> {
    output::notices(&notices);
    Ok(result?)
}
