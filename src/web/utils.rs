//! Web utility functions

use axum::http::{Method, Uri};
use tracing::{info, warn};

/// Log the completion of an HTTP request
pub fn log_response(method: &Method, uri: &Uri, status: u16, request_id: &str, duration_ms: u64) {
    if status >= 400 {
        warn!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %request_id,
            duration_ms = duration_ms,
            "HTTP request completed with error"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %request_id,
            duration_ms = duration_ms,
            "HTTP request completed"
        );
    }
}
