//! Scoped LDAP session management.
//!
//! Each operation opens one session, owns it exclusively for the
//! duration of the call, and closes it on every exit path. There is no
//! pooling, retry, or session reuse.

use std::time::Duration;

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};

use crate::config::EndpointConfig;
use crate::error::{LdapError, LdapResult};

/// A single LDAP connection scoped to one operation.
pub struct LdapSession {
    ldap: Ldap,
    read_timeout: Duration,
}

impl LdapSession {
    /// Opens an unauthenticated session to the endpoint.
    ///
    /// The connection driver is spawned on the runtime; any transport
    /// fault it hits after setup is logged and surfaces through the
    /// next operation on the session.
    pub async fn open(config: &EndpointConfig) -> LdapResult<Self> {
        let settings = LdapConnSettings::new().set_conn_timeout(config.connect_timeout);

        let (conn, ldap) = LdapConnAsync::with_settings(settings, &config.url)
            .await
            .map_err(|e| LdapError::connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!("LDAP connection driver error: {e}");
            }
        });

        Ok(Self {
            ldap,
            read_timeout: config.read_timeout,
        })
    }

    /// Opens a session bound as `principal`.
    ///
    /// ## Security
    ///
    /// The secret is passed through as UTF-8 text and never logged.
    /// A rejected bind surfaces [`LdapError::Authentication`], distinct
    /// from the connection failure raised when the endpoint is
    /// unreachable.
    pub async fn open_authenticated(
        config: &EndpointConfig,
        principal: &str,
        secret: &str,
    ) -> LdapResult<Self> {
        let mut session = Self::open(config).await?;

        let bind = session.ldap.simple_bind(principal, secret).await;
        let outcome = match bind {
            Ok(result) => result
                .success()
                .map(|_| ())
                .map_err(|e| LdapError::authentication(format!("bind rejected: {e}"))),
            Err(e) => Err(LdapError::authentication(e.to_string())),
        };

        match outcome {
            Ok(()) => Ok(session),
            Err(e) => {
                session.close().await;
                Err(e)
            }
        }
    }

    /// Returns a mutable handle to the underlying connection.
    #[must_use]
    pub fn ldap_mut(&mut self) -> &mut Ldap {
        &mut self.ldap
    }

    /// Returns the read timeout to apply to operations on this session.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Unbinds and closes the session.
    ///
    /// Cleanup failures are logged and suppressed so they never mask a
    /// primary error or an already-successful result.
    pub async fn close(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            tracing::warn!("error closing LDAP connection: {e}");
        }
    }
}
