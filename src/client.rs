//! Client facade over the directory operations.
//!
//! Every public operation opens its own connection, owns it for the
//! duration of the call, and releases it exactly once on every exit
//! path. The client itself holds only the immutable endpoint
//! descriptor and may be shared across concurrent calls.

use crate::codegen::generate_java_class;
use crate::config::{EndpointConfig, SearchRequest};
use crate::connection::LdapSession;
use crate::error::LdapResult;
use crate::model::AttributeModel;
use crate::search;

/// Directory client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct LdapClient {
    config: EndpointConfig,
}

impl LdapClient {
    /// Creates a client for a validated endpoint configuration.
    #[must_use]
    pub const fn new(config: EndpointConfig) -> Self {
        Self { config }
    }

    /// Returns the endpoint configuration.
    #[must_use]
    pub const fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Authenticates by binding as `base_dn` and mapping the first
    /// entry the filter matches under that same base.
    ///
    /// Identity and search root are deliberately the same value, so
    /// the base is expected to be a leaf entry such as a user's DN.
    ///
    /// Zero matches under a valid bind yield `Ok(None)`, which is not
    /// an error; a rejected bind is
    /// [`LdapError::Authentication`](crate::LdapError::Authentication).
    pub async fn authenticate<T: AttributeModel>(
        &self,
        base_dn: &str,
        filter: &str,
        secret: &str,
    ) -> LdapResult<Option<T>> {
        let mut session =
            LdapSession::open_authenticated(&self.config, base_dn, secret).await?;
        let outcome = search::run_first_match::<T>(&mut session, base_dn, filter).await;
        session.close().await;
        outcome
    }

    /// Runs a paged search, mapping every returned entry onto `T`.
    ///
    /// At most `result_limit` records are returned regardless of how
    /// pages fall; an unbounded request walks the directory until the
    /// server stops issuing continuation cookies. All-or-nothing: a
    /// fault on any page discards everything gathered so far.
    pub async fn search<T: AttributeModel>(
        &self,
        request: &SearchRequest,
    ) -> LdapResult<Vec<T>> {
        request.validate()?;
        let mut session = LdapSession::open(&self.config).await?;
        let outcome = search::run_search::<T>(&mut session, request).await;
        session.close().await;
        outcome
    }

    /// Convenience search with default limit, page size, and scope.
    pub async fn search_with_defaults<T: AttributeModel>(
        &self,
        base_dn: &str,
        filter: &str,
    ) -> LdapResult<Vec<T>> {
        self.search(&SearchRequest::new(base_dn, filter)).await
    }

    /// Collects the distinct attribute names observed across all
    /// entries the request matches, in no particular order.
    pub async fn distinct_attributes(
        &self,
        request: &SearchRequest,
    ) -> LdapResult<Vec<String>> {
        request.validate()?;
        let mut session = LdapSession::open(&self.config).await?;
        let outcome = search::run_distinct_attributes(&mut session, request).await;
        session.close().await;
        outcome
    }

    /// Emits a Java class definition inferred from the attribute names
    /// the request matches.
    ///
    /// Discovered names are sorted before emission so repeated runs
    /// against the same directory produce identical text.
    pub async fn generate_class(
        &self,
        request: &SearchRequest,
        class_name: &str,
    ) -> LdapResult<String> {
        let mut attributes = self.distinct_attributes(request).await?;
        attributes.sort();
        Ok(generate_java_class(&attributes, class_name))
    }
}
