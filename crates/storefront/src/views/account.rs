//! Sign-in, sign-up, and profile.

use generix_core::{Registration, User};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::api::AccountGateway;
use crate::credentials::CredentialStore;
use crate::error::{Result, clear_sentry_user, failure_breadcrumb, set_sentry_user};
use crate::notice::{Notice, Notices};

const BREADCRUMB: &str = "account";

/// Account operations against the shared credential store.
pub struct AccountViewModel<G> {
    gateway: G,
    credentials: CredentialStore,
    user: Option<User>,
    notices: Notices,
}

impl<G: AccountGateway> AccountViewModel<G> {
    pub fn new(gateway: G, credentials: CredentialStore) -> Self {
        Self {
            gateway,
            credentials,
            user: None,
            notices: Notices::new(),
        }
    }

    /// The user loaded by the last successful [`login`](Self::login) or
    /// [`refresh`](Self::refresh).
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Sign in, store the token, and load the user's details.
    ///
    /// Returns the access token so the caller can persist it; where it is
    /// kept between runs is up to the front end.
    ///
    /// # Errors
    ///
    /// Returns the gateway error. The credential store is left unchanged when
    /// the login itself fails.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<String> {
        let token = match self.gateway.login(email.trim(), password).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "Login failed");
                failure_breadcrumb(BREADCRUMB, "login", &err);
                self.notices
                    .error("Authentication failed. Check your login details and try again.");
                return Err(err);
            }
        };

        self.credentials.set(SecretString::from(token.clone()));
        self.notices.success("Login successful. Welcome to Generix Drugstore!");
        self.refresh().await?;
        Ok(token)
    }

    /// Reload the signed-in user's details.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<&User> {
        match self.gateway.details().await {
            Ok(user) => {
                set_sentry_user(&user.id, Some(&user.email));
                info!(user_id = %user.id, is_admin = user.is_admin, "Loaded user details");
                Ok(&*self.user.insert(user))
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch user details");
                failure_breadcrumb(BREADCRUMB, "details", &err);
                self.notices.error("Failed to fetch user details");
                Err(err)
            }
        }
    }

    /// Forget the token and the loaded user.
    pub fn logout(&mut self) {
        self.credentials.clear();
        self.user = None;
        clear_sentry_user();
    }

    /// Validate and submit a registration form.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for an invalid form (no request is
    /// made) or for a server-side rejection, otherwise the gateway error.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&mut self, form: &Registration) -> Result<()> {
        if let Err(err) = form.validate() {
            self.notices.error(err.to_string());
            return Err(err.into());
        }

        match self.gateway.register(form).await {
            Ok(_) => {
                self.notices.success("Registration successful. Thank you for registering!");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Registration failed");
                failure_breadcrumb(BREADCRUMB, "register", &err);
                self.notices.error(
                    err.server_message()
                        .map_or_else(|| err.to_string(), ToString::to_string),
                );
                Err(err)
            }
        }
    }
}
