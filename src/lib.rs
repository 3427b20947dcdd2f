//! # ldap-utility
//!
//! Thin utility layer over a directory-service client: bind-based
//! authentication, paginated subtree search with a client-side result
//! cap, attribute-to-record mapping, and a class-shape generator for
//! observed attribute names.
//!
//! Built on `ldap3`. Every operation opens and exclusively owns its
//! own connection; there is no pooling, caching, or retry.
//!
//! ## Example
//!
//! ```no_run
//! use ldap_utility::{AttributeModel, EndpointConfig, LdapClient, LdapResult, SearchRequest};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     cn: Option<String>,
//!     sn: Option<String>,
//!     mail: Option<String>,
//! }
//!
//! impl AttributeModel for Person {
//!     fn attribute_names() -> &'static [&'static str] {
//!         &["cn", "sn", "mail"]
//!     }
//!
//!     fn set_attribute(&mut self, name: &str, value: String) -> LdapResult<()> {
//!         match name {
//!             "cn" => self.cn = Some(value),
//!             "sn" => self.sn = Some(value),
//!             "mail" => self.mail = Some(value),
//!             _ => {}
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> LdapResult<()> {
//! let config = EndpointConfig::builder()
//!     .url("ldaps://directory.example.com:636")
//!     .build()?;
//! let client = LdapClient::new(config);
//!
//! let request = SearchRequest::new("dc=example,dc=com", "(sn=Doe)");
//! let people: Vec<Person> = client.search(&request).await?;
//! # let _ = people;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod codegen;
pub mod config;
pub mod connection;
pub mod error;
pub mod model;
pub mod search;

pub use client::LdapClient;
pub use codegen::generate_java_class;
pub use config::{
    ldap_escape, EndpointConfig, SearchRequest, SearchScope, DEFAULT_PAGE_SIZE,
    DEFAULT_RESULT_LIMIT,
};
pub use connection::LdapSession;
pub use error::{LdapError, LdapResult};
pub use model::{map_entry, AttributeModel};
pub use search::LdapEntry;
