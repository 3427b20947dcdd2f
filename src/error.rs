//! Error types for LDAP operations.
//!
//! ## Security Note
//!
//! Error messages must not leak sensitive information like
//! bind credentials or directory contents.

use thiserror::Error;

/// Errors surfaced by LDAP operations.
///
/// The variants distinguish "the operation failed" from the normal
/// "no data" outcomes, which are reported as `Ok(None)` or an empty
/// result set by the operations themselves.
#[derive(Debug, Error)]
pub enum LdapError {
    /// Invalid endpoint or request parameters.
    #[error("LDAP configuration error: {0}")]
    Configuration(String),

    /// Endpoint unreachable or protocol negotiation failure.
    #[error("LDAP connection failed: {0}")]
    Connection(String),

    /// Bind rejected (bad credential) or the bind itself failed.
    ///
    /// Distinct from a search that matches zero entries, which is a
    /// normal outcome and not an error.
    #[error("LDAP authentication failed: {0}")]
    Authentication(String),

    /// A page request or result read failed mid-search.
    ///
    /// The whole call is aborted; results accumulated before the fault
    /// are discarded rather than returned, so callers never mistake a
    /// truncated result set for a complete one.
    #[error("LDAP search failed: {0}")]
    Search(String),

    /// The target record shape rejected an attribute assignment.
    ///
    /// Aborts the enclosing call; entries are never silently skipped.
    #[error("record construction failed: {0}")]
    Construction(String),

    /// Underlying ldap3 error.
    #[error("LDAP error: {0}")]
    Ldap3(#[from] ldap3::LdapError),
}

impl LdapError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Creates a search error.
    #[must_use]
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Creates a record construction error.
    #[must_use]
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Checks if this is a connection-related error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Checks if this is an authentication failure.
    #[must_use]
    pub const fn is_authentication_error(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

/// Result type for LDAP operations.
pub type LdapResult<T> = Result<T, LdapError>;
