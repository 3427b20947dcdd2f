//! Attribute-to-record mapping.
//!
//! A record type declares the directory attributes it is interested in
//! by implementing [`AttributeModel`]: a static ordered list of
//! attribute names plus a "set field by name" capability, resolved once
//! per shape. Typed searches request exactly these attributes and map
//! each returned entry onto a fresh record.

use crate::error::LdapResult;
use crate::search::LdapEntry;

/// A record shape that directory entries can be mapped onto.
///
/// Field values are conceptually strings; multi-valued attributes
/// degrade to their first value.
///
/// ## Example
///
/// ```
/// use ldap_utility::{AttributeModel, LdapResult};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     cn: Option<String>,
///     sn: Option<String>,
///     mail: Option<String>,
/// }
///
/// impl AttributeModel for Person {
///     fn attribute_names() -> &'static [&'static str] {
///         &["cn", "sn", "mail"]
///     }
///
///     fn set_attribute(&mut self, name: &str, value: String) -> LdapResult<()> {
///         match name {
///             "cn" => self.cn = Some(value),
///             "sn" => self.sn = Some(value),
///             "mail" => self.mail = Some(value),
///             _ => {}
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait AttributeModel: Default {
    /// Attribute names this shape maps, in declaration order.
    ///
    /// This list doubles as the attribute set requested from the
    /// directory when no explicit list is given.
    fn attribute_names() -> &'static [&'static str];

    /// Assigns one attribute value to the corresponding field.
    ///
    /// ## Errors
    ///
    /// An implementation that cannot accept the assignment returns
    /// [`LdapError::Construction`](crate::LdapError::Construction),
    /// which aborts the enclosing search: entries are never silently
    /// skipped.
    fn set_attribute(&mut self, name: &str, value: String) -> LdapResult<()>;
}

/// Maps a directory entry onto a fresh record.
///
/// For each name in the shape's attribute list, the entry's first value
/// under that exact name is assigned; an absent attribute leaves the
/// field at its default and is not an error. Entry attributes outside
/// the shape are ignored.
pub fn map_entry<T: AttributeModel>(entry: &LdapEntry) -> LdapResult<T> {
    let mut record = T::default();

    for name in T::attribute_names() {
        match entry.attr_first(name) {
            Some(value) => record.set_attribute(name, value.to_string())?,
            None => {
                tracing::debug!(attribute = *name, dn = %entry.dn, "attribute absent on entry");
            }
        }
    }

    Ok(record)
}
