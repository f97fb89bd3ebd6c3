//! Web handlers module
//!
//! Thin handlers that validate at the boundary and delegate to the cover cache.

pub mod covers;
pub mod health;
