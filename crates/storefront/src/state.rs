//! Shared client state: configuration, credentials, gateway, and caches.

use std::sync::Arc;

use crate::api::HttpGateway;
use crate::cache::ProductCache;
use crate::config::StorefrontConfig;
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::views::{
    AccountViewModel, AdminViewModel, CartViewModel, CatalogViewModel, OrderHistoryViewModel,
};

/// Everything the view-models share.
///
/// Cheaply cloneable via `Arc`. View-models built from the same state use
/// one credential store and one product cache, so signing in through
/// [`account`](Self::account) authorizes every other view-model.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    credentials: CredentialStore,
    gateway: HttpGateway,
    products: ProductCache,
}

impl AppState {
    /// Create the shared state. A token in the configuration signs the
    /// client in from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let credentials = config
            .api
            .token
            .clone()
            .map_or_else(CredentialStore::new, CredentialStore::with_token);
        let gateway = HttpGateway::new(&config.api, credentials.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                credentials,
                gateway,
                products: ProductCache::new(),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    #[must_use]
    pub fn gateway(&self) -> &HttpGateway {
        &self.inner.gateway
    }

    #[must_use]
    pub fn products(&self) -> &ProductCache {
        &self.inner.products
    }

    #[must_use]
    pub fn cart(&self) -> CartViewModel<HttpGateway> {
        CartViewModel::new(self.inner.gateway.clone(), self.inner.config.api.currency)
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogViewModel<HttpGateway> {
        CatalogViewModel::new(self.inner.gateway.clone(), self.inner.products.clone())
    }

    #[must_use]
    pub fn orders(&self) -> OrderHistoryViewModel<HttpGateway> {
        OrderHistoryViewModel::new(self.inner.gateway.clone(), self.inner.products.clone())
    }

    #[must_use]
    pub fn admin(&self) -> AdminViewModel<HttpGateway> {
        AdminViewModel::new(self.inner.gateway.clone(), self.inner.products.clone())
    }

    #[must_use]
    pub fn account(&self) -> AccountViewModel<HttpGateway> {
        AccountViewModel::new(self.inner.gateway.clone(), self.inner.credentials.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    #[test]
    fn test_token_in_config_signs_in() {
        let api = ApiConfig::new("http://localhost:4000").unwrap().with_token("abc");
        let state = AppState::new(StorefrontConfig::for_api(api)).unwrap();
        assert!(state.credentials().is_signed_in());
        assert!(state.gateway().credentials().is_signed_in());
    }

    #[test]
    fn test_no_token_starts_signed_out() {
        let api = ApiConfig::new("http://localhost:4000").unwrap();
        let state = AppState::new(StorefrontConfig::for_api(api)).unwrap();
        assert!(!state.credentials().is_signed_in());
    }
}
