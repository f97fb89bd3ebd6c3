//! Error type definitions for the cover proxy

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Metadata provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors raised while talking to a cover metadata provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Non-success status from the provider
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Transport failure (connect, timeout, TLS, body read)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Token exchange or bearer token rejected
    #[error("Authentication failed: {provider} - {message}")]
    AuthenticationFailed { provider: String, message: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {provider} - {message}")]
    Parse { provider: String, message: String },

    /// Provider is missing credentials or endpoints
    #[error("Provider not configured: {message}")]
    NotConfigured { message: String },
}

impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl ProviderError {
    pub fn auth_failed<S: Into<String>, M: Into<String>>(provider: S, message: M) -> Self {
        Self::AuthenticationFailed {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn parse<S: Into<String>, M: Into<String>>(provider: S, message: M) -> Self {
        Self::Parse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn not_configured<S: Into<String>>(message: S) -> Self {
        Self::NotConfigured {
            message: message.into(),
        }
    }

    /// True for a 401/403 from the provider, which invalidates any cached token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status == 401 || *status == 403)
            || matches!(self, Self::AuthenticationFailed { .. })
    }
}
