//! URL utilities for cover URLs and log-safe upstream URLs

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::config::defaults::COVER_URL_SCHEME;

static SENSITIVE_QUERY_PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([?&](?:key|api_key|client_secret|access_token|token)=)[^&]*")
        .expect("valid credential regex")
});

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Turn a provider cover URL into an absolute one
    ///
    /// IGDB hands back protocol-relative URLs such as
    /// `//images.igdb.com/igdb/image/upload/t_thumb/co1r76.jpg`; those get the
    /// fixed `https:` prefix. Bare `host/path` values get `https://`. When a
    /// non-empty `size` is given the IGDB `t_thumb` size token is swapped for
    /// `t_{size}`.
    ///
    /// ```rust
    /// use game_cover_proxy::utils::url::UrlUtils;
    ///
    /// assert_eq!(
    ///     UrlUtils::normalize_cover_url("//images.igdb.com/igdb/image/upload/t_thumb/co1.jpg", Some("cover_big")),
    ///     "https://images.igdb.com/igdb/image/upload/t_cover_big/co1.jpg"
    /// );
    /// assert_eq!(
    ///     UrlUtils::normalize_cover_url("https://media.rawg.io/media/games/a.jpg", None),
    ///     "https://media.rawg.io/media/games/a.jpg"
    /// );
    /// ```
    pub fn normalize_cover_url(raw: &str, size: Option<&str>) -> String {
        let trimmed = raw.trim();

        let absolute = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else if trimmed.starts_with("//") {
            format!("{COVER_URL_SCHEME}{trimmed}")
        } else {
            format!("{COVER_URL_SCHEME}//{}", trimmed.trim_start_matches('/'))
        };

        match size.map(str::trim).filter(|s| !s.is_empty()) {
            Some(size) => absolute.replacen("/t_thumb/", &format!("/t_{size}/"), 1),
            None => absolute,
        }
    }

    /// Join a base URL with a path segment, tolerating a missing trailing slash on the base
    pub fn join(base: &str, path: &str) -> Result<String, url::ParseError> {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let joined = Url::parse(&base)?.join(path.trim_start_matches('/'))?;
        Ok(joined.to_string())
    }

    /// Mask API keys and secrets in a URL (or error message containing one) before logging
    pub fn obfuscate_credentials(url: &str) -> String {
        SENSITIVE_QUERY_PARAMS
            .replace_all(url, "${1}****")
            .into_owned()
    }
}
