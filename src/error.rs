//! # Error Types
//!
//! Error handling for every multiaddr operation.
//!
//! This module defines all error variants that can occur while building the
//! protocol registry, transcoding between the text and binary forms, applying
//! structural operations, and resolving name addresses.
//!
//! ## Error Categories
//! - **Registry Errors**: unknown names or codes, duplicate registrations
//! - **Codec Errors**: malformed values, truncated or overflowing varints, bad lengths
//! - **Structural Errors**: an address that does not have the required shape
//! - **Resolution Errors**: missing resolvers, failures passed through from a resolver
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use multiaddr_core::error::{MultiaddrError, Result};
//! use multiaddr_core::Multiaddr;
//! use tracing::{error, info};
//!
//! fn parse(text: &str) -> Result<Multiaddr> {
//!     text.parse::<Multiaddr>()
//! }
//!
//! match parse("/nope/1") {
//!     Ok(addr) => info!(%addr, "Parsed address"),
//!     Err(MultiaddrError::UnknownProtocol(name)) => error!(%name, "Unknown protocol"),
//!     Err(e) => error!(error = %e, "Parse failed"),
//! }
//! ```

use thiserror::Error;

/// Boxed error produced by an external resolver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Resolver set errors
    pub const ERR_RESOLVERS_WRITE_LOCK: &str = "Failed to acquire write lock on resolver set";
    pub const ERR_RESOLVERS_READ_LOCK: &str = "Failed to acquire read lock on resolver set";

    /// Text form errors
    pub const ERR_MISSING_LEADING_SLASH: &str = "multiaddr must start with '/'";
    pub const ERR_MISSING_VALUE: &str = "protocol requires an address value";
    pub const ERR_EMPTY_VALUE: &str = "address value cannot be empty";
    pub const ERR_SLASH_IN_VALUE: &str = "address value cannot contain '/'";
    pub const ERR_INVALID_UTF8: &str = "address value is not valid UTF-8";
    pub const ERR_INVALID_PERCENT: &str = "invalid percent-encoding";

    /// Numeric value errors
    pub const ERR_INVALID_PORT: &str = "port must be a decimal integer between 0 and 65535";
    pub const ERR_ONION_PORT: &str = "onion port must be between 1 and 65535";
}

/// MultiaddrError is the primary error type for all multiaddr operations
#[derive(Error, Debug)]
pub enum MultiaddrError {
    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("Invalid protocol code: {0}")]
    InvalidProtocol(u64),

    #[error("Invalid address format: {0}")]
    InvalidFormat(String),

    #[error("Unexpected end of input")]
    Truncated,

    #[error("Varint overflow")]
    Overflow,

    #[error("Varint is not minimally encoded")]
    NonMinimalVarint,

    #[error("Invalid address length: {0}")]
    InvalidAddressLength(String),

    #[error("Not a thin waist address: {0}")]
    NotThinWaist(String),

    #[error("Duplicate protocol: {0}")]
    DuplicateProtocol(String),

    #[error("Protocol registry already installed")]
    RegistryAlreadyInstalled,

    #[error("No available resolver for {0}")]
    NoResolver(String),

    #[error("Resolver error: {0}")]
    Resolver(#[source] BoxError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using MultiaddrError
pub type Result<T> = std::result::Result<T, MultiaddrError>;
