//! Centralized error handling for the cover proxy
//!
//! # Error Categories
//!
//! - **Provider Errors**: upstream metadata API failures (IGDB, RAWG, Twitch auth)
//! - **Validation Errors**: bad input at the HTTP boundary
//! - **Configuration Errors**: missing credentials or invalid settings
//!
//! Per-identifier provider failures never reach the HTTP layer as errors; the
//! cover cache turns them into `null` entries. `AppError` covers everything
//! that does fail a request.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for provider Results
pub type ProviderResult<T> = Result<T, ProviderError>;
