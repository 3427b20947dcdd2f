//! Endpoint and search request descriptors.
//!
//! ## Security Note
//!
//! Encrypted transport (`ldaps://`) is the default. A plaintext
//! endpoint must be requested explicitly via the builder.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LdapError, LdapResult};

/// Default client-side cap on the number of returned entries.
pub const DEFAULT_RESULT_LIMIT: usize = 1000;

/// Default page size for paged searches.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

// ============================================================================
// Search Scope
// ============================================================================

/// How far a search descends from its base entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchScope {
    /// Search only the base entry itself.
    Base,
    /// Search the immediate children of the base entry.
    OneLevel,
    /// Search the base entry and its entire subtree.
    #[default]
    Subtree,
}

impl SearchScope {
    /// Converts to the ldap3 scope.
    #[must_use]
    pub fn to_ldap3(&self) -> ldap3::Scope {
        match self {
            Self::Base => ldap3::Scope::Base,
            Self::OneLevel => ldap3::Scope::OneLevel,
            Self::Subtree => ldap3::Scope::Subtree,
        }
    }
}

// ============================================================================
// Endpoint Configuration
// ============================================================================

/// Connection descriptor for a directory endpoint.
///
/// Immutable after construction. The descriptor itself is read-only
/// and safely shared across concurrent calls; each operation opens and
/// exclusively owns its own connection for its duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Directory URL (`ldaps://host:port`, or `ldap://host:port` for a
    /// plaintext endpoint).
    pub url: String,

    /// Whether the transport is encrypted.
    pub secure: bool,

    /// Connection timeout, passed through to the LDAP client unchanged.
    pub connect_timeout: Duration,

    /// Per-operation read timeout, passed through unchanged.
    pub read_timeout: Duration,
}

impl EndpointConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> EndpointConfigBuilder {
        EndpointConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> LdapResult<()> {
        let url_lower = self.url.to_lowercase();
        let (scheme, rest) = if let Some(rest) = url_lower.strip_prefix("ldaps://") {
            ("ldaps", rest)
        } else if let Some(rest) = url_lower.strip_prefix("ldap://") {
            ("ldap", rest)
        } else {
            return Err(LdapError::config(
                "URL must start with ldap:// or ldaps://",
            ));
        };

        if rest.is_empty() {
            return Err(LdapError::config("URL is missing a host"));
        }

        if self.secure && scheme != "ldaps" {
            return Err(LdapError::config(
                "secure endpoint requires an ldaps:// URL",
            ));
        }
        if !self.secure && scheme != "ldap" {
            return Err(LdapError::config(
                "plaintext endpoint requires an ldap:// URL",
            ));
        }

        Ok(())
    }
}

/// Builder for [`EndpointConfig`].
#[derive(Debug)]
pub struct EndpointConfigBuilder {
    url: Option<String>,
    secure: bool,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl Default for EndpointConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointConfigBuilder {
    /// Creates a new builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: None,
            secure: true,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the directory URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets whether the transport is encrypted (default: true).
    #[must_use]
    pub const fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-operation read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns an error if the URL is missing, has an unsupported
    /// scheme, or does not agree with the security flag.
    pub fn build(self) -> LdapResult<EndpointConfig> {
        let config = EndpointConfig {
            url: self.url.ok_or_else(|| LdapError::config("url is required"))?,
            secure: self.secure,
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Search Request
// ============================================================================

/// Parameters of one paged search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Base distinguished name the search starts from.
    pub base_dn: String,

    /// Search filter, passed through to the directory verbatim.
    pub filter: String,

    /// Search scope.
    pub scope: SearchScope,

    /// Client-side cap on returned entries. `None` means unbounded.
    ///
    /// Enforced across page boundaries: page requests stop the moment
    /// the cap is reached, even if the server has more pages.
    pub result_limit: Option<usize>,

    /// Number of entries requested per page.
    pub page_size: usize,

    /// Explicit attribute list. When absent, typed searches request
    /// the target shape's attribute names.
    pub attributes: Option<Vec<String>>,
}

impl SearchRequest {
    /// Creates a request with default scope, limit, and page size.
    #[must_use]
    pub fn new(base_dn: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            base_dn: base_dn.into(),
            filter: filter.into(),
            scope: SearchScope::Subtree,
            result_limit: Some(DEFAULT_RESULT_LIMIT),
            page_size: DEFAULT_PAGE_SIZE,
            attributes: None,
        }
    }

    /// Sets the search scope.
    #[must_use]
    pub const fn scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the result cap.
    #[must_use]
    pub const fn result_limit(mut self, limit: usize) -> Self {
        self.result_limit = Some(limit);
        self
    }

    /// Removes the result cap entirely.
    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.result_limit = None;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets an explicit attribute list, overriding the target shape's.
    #[must_use]
    pub fn attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Validates the request.
    pub fn validate(&self) -> LdapResult<()> {
        if self.base_dn.is_empty() {
            return Err(LdapError::config("base_dn cannot be empty"));
        }
        if self.filter.is_empty() {
            return Err(LdapError::config("filter cannot be empty"));
        }
        if self.page_size == 0 {
            return Err(LdapError::config("page_size must be positive"));
        }
        if self.page_size > i32::MAX as usize {
            return Err(LdapError::config("page_size exceeds the protocol maximum"));
        }
        Ok(())
    }
}

/// Escapes special characters in LDAP filter values.
///
/// Filters themselves are passed through verbatim; this helper is for
/// callers interpolating untrusted values into a filter.
#[must_use]
pub fn ldap_escape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\5c"),
            '*' => result.push_str("\\2a"),
            '(' => result.push_str("\\28"),
            ')' => result.push_str("\\29"),
            '\0' => result.push_str("\\00"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_endpoint_requires_ldaps() {
        let result = EndpointConfig::builder()
            .url("ldap://directory.example.com:389")
            .build();

        assert!(matches!(result, Err(LdapError::Configuration(_))));
    }

    #[test]
    fn accepts_ldaps_url() {
        let config = EndpointConfig::builder()
            .url("ldaps://directory.example.com:636")
            .build()
            .unwrap();

        assert!(config.secure);
        assert_eq!(config.url, "ldaps://directory.example.com:636");
    }

    #[test]
    fn plaintext_must_be_explicit() {
        let config = EndpointConfig::builder()
            .url("ldap://localhost:389")
            .secure(false)
            .build()
            .unwrap();

        assert!(!config.secure);

        // Flag and scheme must agree in the other direction too.
        let result = EndpointConfig::builder()
            .url("ldaps://localhost:636")
            .secure(false)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_host() {
        let result = EndpointConfig::builder().url("ldaps://").build();
        assert!(result.is_err());
    }

    #[test]
    fn request_defaults() {
        let req = SearchRequest::new("dc=example,dc=com", "(sn=Doe)");

        assert_eq!(req.scope, SearchScope::Subtree);
        assert_eq!(req.result_limit, Some(DEFAULT_RESULT_LIMIT));
        assert_eq!(req.page_size, DEFAULT_PAGE_SIZE);
        assert!(req.attributes.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn request_validation() {
        let req = SearchRequest::new("", "(cn=x)");
        assert!(req.validate().is_err());

        let req = SearchRequest::new("dc=example,dc=com", "");
        assert!(req.validate().is_err());

        let req = SearchRequest::new("dc=example,dc=com", "(cn=x)").page_size(0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn unbounded_request() {
        let req = SearchRequest::new("dc=example,dc=com", "(cn=x)").unbounded();
        assert_eq!(req.result_limit, None);
    }

    #[test]
    fn scope_conversion() {
        assert!(matches!(SearchScope::Base.to_ldap3(), ldap3::Scope::Base));
        assert!(matches!(
            SearchScope::OneLevel.to_ldap3(),
            ldap3::Scope::OneLevel
        ));
        assert!(matches!(
            SearchScope::Subtree.to_ldap3(),
            ldap3::Scope::Subtree
        ));
    }

    #[test]
    fn ldap_escape_special_chars() {
        assert_eq!(ldap_escape("john*"), "john\\2a");
        assert_eq!(ldap_escape("(admin)"), "\\28admin\\29");
        assert_eq!(ldap_escape("user\\name"), "user\\5cname");
        assert_eq!(ldap_escape("normal"), "normal");
    }
}
