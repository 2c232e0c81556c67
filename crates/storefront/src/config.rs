//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront gateway
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `WOOCOMMERCE_URL` - WordPress origin hosting WooCommerce (e.g., <https://shop.example.com>)
//! - `WOOCOMMERCE_CONSUMER_KEY` - REST API consumer key (`ck_...`)
//! - `WOOCOMMERCE_CONSUMER_SECRET` - REST API consumer secret (`cs_...`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_ALLOWED_ORIGINS` - Comma-separated CORS origins for the browser frontend
//! - `WOOCOMMERCE_API_VERSION` - REST namespace (default: wc/v3)
//! - `WOOCOMMERCE_CURRENCY` - Store currency code (default: USD)
//! - `WOOCOMMERCE_CACHE_TTL_SECONDS` - Catalogue cache TTL (default: 300)
//! - `CHECKOUT_IDEMPOTENCY_TTL_SECONDS` - Idempotency key retention (default: 3600)
//! - `CHECKOUT_LOCK_TTL_SECONDS` - Order submit lock TTL (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use wicker_core::CurrencyCode;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront gateway
    pub base_url: String,
    /// Browser origins allowed to call the API (CORS)
    pub allowed_origins: Vec<String>,
    /// Session signing secret
    pub session_secret: SecretString,
    /// WooCommerce REST API configuration
    pub woocommerce: WooCommerceConfig,
    /// Checkout guard tunables
    pub checkout: CheckoutConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// WooCommerce REST API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct WooCommerceConfig {
    /// WordPress origin hosting WooCommerce (no trailing slash)
    pub url: String,
    /// REST namespace under /wp-json (e.g., wc/v3)
    pub api_version: String,
    /// Consumer key (identifies the API client; not sensitive by itself)
    pub consumer_key: String,
    /// Consumer secret (Basic auth password, server-side only)
    pub consumer_secret: SecretString,
    /// Store currency; WooCommerce reports amounts as bare decimal strings
    pub currency: CurrencyCode,
    /// TTL for cached catalogue reads
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for WooCommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceConfig")
            .field("url", &self.url)
            .field("api_version", &self.api_version)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("currency", &self.currency)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Checkout guard tunables.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// How long a replayed Idempotency-Key returns the stored response
    pub idempotency_ttl: Duration,
    /// How long a session's order submit lock is held at most
    pub order_lock_ttl: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            idempotency_ttl: Duration::from_secs(3600),
            order_lock_ttl: Duration::from_secs(30),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let allowed_origins = get_optional_env("STOREFRONT_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let session_secret = get_validated_secret("STOREFRONT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "STOREFRONT_SESSION_SECRET")?;

        let woocommerce = WooCommerceConfig::from_env()?;
        let checkout = CheckoutConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_env_f32("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = get_env_f32("SENTRY_TRACES_SAMPLE_RATE", 0.1)?;

        Ok(Self {
            host,
            port,
            base_url,
            allowed_origins,
            session_secret,
            woocommerce,
            checkout,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl WooCommerceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_required_env("WOOCOMMERCE_URL")?
            .trim_end_matches('/')
            .to_string();

        // Reject obviously broken origins early instead of at first request
        url::Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("WOOCOMMERCE_URL".to_string(), e.to_string()))?;

        let currency = get_env_or_default("WOOCOMMERCE_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("WOOCOMMERCE_CURRENCY".to_string(), e))?;

        let cache_ttl_seconds = get_env_u64("WOOCOMMERCE_CACHE_TTL_SECONDS", 300)?;

        Ok(Self {
            url,
            api_version: get_env_or_default("WOOCOMMERCE_API_VERSION", "wc/v3"),
            consumer_key: get_required_env("WOOCOMMERCE_CONSUMER_KEY")?,
            consumer_secret: get_validated_secret("WOOCOMMERCE_CONSUMER_SECRET")?,
            currency,
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
        })
    }
}

impl CheckoutConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            idempotency_ttl: Duration::from_secs(get_env_u64(
                "CHECKOUT_IDEMPOTENCY_TTL_SECONDS",
                3600,
            )?),
            order_lock_ttl: Duration::from_secs(get_env_u64("CHECKOUT_LOCK_TTL_SECONDS", 30)?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable as u64 with a default value.
fn get_env_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Get an environment variable as f32 with a default value.
fn get_env_f32(key: &str, default: f32) -> Result<f32, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_session_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_ok());
    }

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            allowed_origins: vec!["http://localhost:5173".to_string()],
            session_secret: SecretString::from("x".repeat(32)),
            woocommerce: WooCommerceConfig {
                url: "https://shop.test".to_string(),
                api_version: "wc/v3".to_string(),
                consumer_key: "ck_0123456789abcdef".to_string(),
                consumer_secret: SecretString::from("cs_fedcba9876543210"),
                currency: CurrencyCode::USD,
                cache_ttl: Duration::from_secs(300),
            },
            checkout: CheckoutConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_woocommerce_config_debug_redacts_secrets() {
        let config = test_config().woocommerce;
        let debug_output = format!("{config:?}");

        // Public fields should be visible
        assert!(debug_output.contains("https://shop.test"));
        assert!(debug_output.contains("ck_0123456789abcdef"));

        // Secret fields should be redacted
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("cs_fedcba9876543210"));
    }

    #[test]
    fn test_checkout_config_defaults() {
        let config = CheckoutConfig::default();
        assert_eq!(config.idempotency_ttl, Duration::from_secs(3600));
        assert_eq!(config.order_lock_ttl, Duration::from_secs(30));
    }
}
