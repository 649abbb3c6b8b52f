//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::db::StorefrontStore;
use crate::services::checkout::CheckoutService;
use crate::services::payment::{MockPaymentProcessor, PaymentProcessor};
use crate::services::suggestions::{CategorySuggester, ClaudeSuggester, SuggestionError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the store, catalog and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn StorefrontStore>,
    catalog: Catalog,
    checkout: CheckoutService,
    suggester: Option<Arc<dyn CategorySuggester>>,
}

impl AppState {
    /// Create application state with production collaborators.
    ///
    /// Uses the mock payment processor with the configured latency, and a
    /// Claude-backed suggester when an API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the suggestion client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        store: Arc<dyn StorefrontStore>,
    ) -> Result<Self, SuggestionError> {
        let payments = Arc::new(MockPaymentProcessor::new(config.payment_latency));
        let suggester = match &config.suggestions {
            Some(suggestions) => {
                Some(Arc::new(ClaudeSuggester::new(suggestions)?) as Arc<dyn CategorySuggester>)
            }
            None => None,
        };

        Ok(Self::builder(config, store)
            .payments(payments)
            .suggester(suggester)
            .build())
    }

    /// Start building state with explicit collaborators.
    #[must_use]
    pub fn builder(config: StorefrontConfig, store: Arc<dyn StorefrontStore>) -> AppStateBuilder {
        AppStateBuilder {
            payments: Arc::new(MockPaymentProcessor::new(config.payment_latency)),
            config,
            store,
            catalog: Catalog::builtin(),
            suggester: None,
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the persistence store.
    #[must_use]
    pub fn store(&self) -> &dyn StorefrontStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the checkout workflow.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// The category suggester, if configured.
    #[must_use]
    pub fn suggester(&self) -> Option<&dyn CategorySuggester> {
        self.inner.suggester.as_deref()
    }
}

/// Builder for [`AppState`], used by `main` and by tests.
pub struct AppStateBuilder {
    config: StorefrontConfig,
    store: Arc<dyn StorefrontStore>,
    payments: Arc<dyn PaymentProcessor>,
    catalog: Catalog,
    suggester: Option<Arc<dyn CategorySuggester>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn payments(mut self, payments: Arc<dyn PaymentProcessor>) -> Self {
        self.payments = payments;
        self
    }

    #[must_use]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn suggester(mut self, suggester: Option<Arc<dyn CategorySuggester>>) -> Self {
        self.suggester = suggester;
        self
    }

    #[must_use]
    pub fn build(self) -> AppState {
        let checkout = CheckoutService::new(Arc::clone(&self.store), self.payments);
        AppState {
            inner: Arc::new(AppStateInner {
                config: self.config,
                store: self.store,
                catalog: self.catalog,
                checkout,
                suggester: self.suggester,
            }),
        }
    }
}
