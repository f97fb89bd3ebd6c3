/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
pub const DEFAULT_MAX_IDS_PER_REQUEST: usize = 500;

// Outbound HTTP client defaults
pub const DEFAULT_CONNECT_TIMEOUT: &str = "10s";
pub const DEFAULT_UPSTREAM_TIMEOUT: &str = "15s";

// Cover cache defaults
pub const DEFAULT_COVER_SIZE: &str = "cover_big";
/// Scheme prepended to protocol-relative cover URLs
pub const COVER_URL_SCHEME: &str = "https:";

// Provider defaults
pub const DEFAULT_IGDB_BASE_URL: &str = "https://api.igdb.com/v4";
pub const DEFAULT_TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const DEFAULT_RAWG_BASE_URL: &str = "https://api.rawg.io/api";
/// Tokens are refreshed this many seconds before Twitch says they expire
pub const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

// Environment overrides for provider secrets
pub const ENV_IGDB_CLIENT_ID: &str = "IGDB_CLIENT_ID";
pub const ENV_IGDB_CLIENT_SECRET: &str = "IGDB_CLIENT_SECRET";
pub const ENV_IGDB_ACCESS_TOKEN: &str = "IGDB_ACCESS_TOKEN";
pub const ENV_RAWG_API_KEY: &str = "RAWG_API_KEY";
