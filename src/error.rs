//! Error types for the kvcache library.
//!
//! A missing key is not an error anywhere in this crate: lookups return
//! `Option` and `None` is the normal negative result. The only failure the
//! library can report is invalid construction input, via [`ConfigError`].
//!
//! ## Example Usage
//!
//! ```
//! use std::time::Duration;
//!
//! use kvcache::error::ConfigError;
//! use kvcache::policy::write_through::WriteThroughCache;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache: Result<WriteThroughCache<String, i32>, ConfigError> =
//!     WriteThroughCache::try_new(Duration::from_secs(5));
//! assert!(cache.is_ok());
//!
//! // A zero period is caught without panicking
//! let bad = WriteThroughCache::<String, i32>::try_new(Duration::ZERO);
//! assert!(bad.is_err());
//! ```

use std::fmt;

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`LruCache::try_new`](crate::policy::lru::LruCache::try_new) and
/// [`WriteThroughCache::try_new`](crate::policy::write_through::WriteThroughCache::try_new).
/// Carries a human-readable description of which parameter failed
/// validation.
///
/// # Example
///
/// ```
/// use kvcache::policy::lru::LruCache;
///
/// let err = LruCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_message() {
        let err = ConfigError::new("capacity must be at least 1");
        assert_eq!(err.to_string(), "capacity must be at least 1");
    }

    #[test]
    fn message_accessor_round_trips() {
        let err = ConfigError::new(String::from("ttl must be non-zero"));
        assert_eq!(err.message(), "ttl must be non-zero");
    }

    #[test]
    fn implements_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        let err = ConfigError::new("bad input");
        assert_error(&err);
    }
}
