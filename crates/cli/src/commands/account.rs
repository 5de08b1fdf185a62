//! Sign-in, sign-up, and profile commands.

use generix_core::Registration;
use generix_storefront::AppState;

use super::{CommandError, Result, settle};
use crate::output;

/// Sign in and print the token. The token is not stored; export it as
/// `GENERIX_API_TOKEN` for later commands.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<()> {
    let mut account = state.account();
    let signed_in = account.login(email, password).await;
    let token = settle(account.drain_notices(), signed_in)?;

    if let Some(user) = account.user() {
        output::user(user);
    }
    output::line(&format!("GENERIX_API_TOKEN={token}"));
    Ok(())
}

pub async fn whoami(state: &AppState) -> Result<()> {
    if !state.credentials().is_signed_in() {
        return Err(CommandError::SignedOut);
    }

    let mut account = state.account();
    let refreshed = account.refresh().await.map(|_| ());
    settle(account.drain_notices(), refreshed)?;
    if let Some(user) = account.user() {
        output::user(user);
    }
    Ok(())
}

pub async fn register(state: &AppState, form: &Registration) -> Result<()> {
    let mut account = state.account();
    let registered = account.register(form).await;
    settle(account.drain_notices(), registered)
}
