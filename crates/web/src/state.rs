//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::SiteConfig;
use crate::db::Database;
use crate::services::{EmailService, TokenService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database handle and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    db: Database,
    tokens: TokenService,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The token service is keyed from `config`. Without SMTP settings the
    /// email service is absent and newsletter sends are refused.
    #[must_use]
    pub fn new(config: SiteConfig, db: Database) -> Self {
        let tokens = TokenService::new(config.jwt_secret_bytes());
        let email = config.email().and_then(|email_config| {
            EmailService::new(email_config)
                .inspect_err(|e| tracing::warn!(error = %e, "SMTP relay rejected, email disabled"))
                .ok()
        });

        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                tokens,
                email,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database handle.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Get a reference to the session token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.inner.tokens.clone()
    }
}
