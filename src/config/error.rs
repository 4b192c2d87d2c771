//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address")]
    InvalidSocketAddress,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Database URL scheme does not match the configured driver")]
    InvalidDatabaseUrl,

    #[error("Pool max_connections must be at least 1")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Invalid Stripe webhook secret format")]
    InvalidStripeWebhookSecret,

    #[error("Plex admin user id must be positive")]
    InvalidAdminUserId,

    #[error("At least one shared library must be configured")]
    NoSharedLibraries,

    #[error("Plex API URLs must use HTTPS in production")]
    PlexUrlMustBeHttps,

    #[error("Invite code length must be between 6 and 32")]
    InvalidCodeLength,
}
