//! Paged search engine and attribute discovery.
//!
//! The engine issues one search request per page, attaching the simple
//! paged results control (RFC 2696). The server-issued continuation
//! cookie is carried from each response into the next request, and a
//! client-side result cap is enforced independently of the page size:
//! consumption stops mid-page the moment the cap is reached, and no
//! further page is requested.
//!
//! A transport or protocol fault on any page aborts the whole call;
//! results accumulated before the fault are discarded.

use std::collections::HashSet;

use ldap3::controls::{Control, ControlParser, ControlType, PagedResults, RawControl};
use ldap3::SearchEntry;

use crate::config::SearchRequest;
use crate::connection::LdapSession;
use crate::error::{LdapError, LdapResult};
use crate::model::{map_entry, AttributeModel};

/// A directory entry with parsed attributes.
#[derive(Debug, Clone)]
pub struct LdapEntry {
    /// Distinguished Name.
    pub dn: String,

    /// Attributes (all values are multi-valued).
    pub attributes: std::collections::HashMap<String, Vec<String>>,
}

impl LdapEntry {
    /// Creates an entry from an ldap3 search entry.
    #[must_use]
    pub fn from_search_entry(entry: SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attributes: entry.attrs,
        }
    }

    /// Gets the first value of an attribute.
    #[must_use]
    pub fn attr_first(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Checks if the entry has an attribute.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

// ============================================================================
// Pagination state
// ============================================================================

/// Tracks the continuation cookie and the running total against the
/// result cap across page requests.
#[derive(Debug)]
struct PageCursor {
    limit: Option<usize>,
    emitted: usize,
    cookie: Vec<u8>,
}

impl PageCursor {
    fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            emitted: 0,
            cookie: Vec::new(),
        }
    }

    /// Cookie to attach to the next page request (empty on the first).
    fn cookie(&self) -> &[u8] {
        &self.cookie
    }

    /// How many entries of a freshly delivered page may be consumed.
    fn budget(&self, page_len: usize) -> usize {
        match self.limit {
            None => page_len,
            Some(limit) => page_len.min(limit.saturating_sub(self.emitted)),
        }
    }

    /// Records a consumed page and the server's follow-up cookie.
    ///
    /// Returns `true` when another page must be requested: the cap is
    /// not reached and the server handed back a non-empty cookie.
    fn absorb(&mut self, consumed: usize, next_cookie: Vec<u8>) -> bool {
        self.emitted += consumed;
        if let Some(limit) = self.limit {
            if self.emitted >= limit {
                return false;
            }
        }
        if next_cookie.is_empty() {
            return false;
        }
        self.cookie = next_cookie;
        true
    }
}

/// Extracts the continuation cookie from a page response's controls.
fn paged_cookie(ctrls: &[Control]) -> Option<Vec<u8>> {
    for Control(ctype, raw) in ctrls {
        if matches!(ctype, Some(ControlType::PagedResults)) {
            if let Some(val) = &raw.val {
                let response: PagedResults = PagedResults::parse(val);
                return Some(response.cookie);
            }
        }
    }
    None
}

// ============================================================================
// Paged walk
// ============================================================================

/// Runs the paged search loop, feeding consumed entries to `consume`
/// in server-delivered order.
async fn paged_walk<F>(
    session: &mut LdapSession,
    request: &SearchRequest,
    attributes: &[&str],
    mut consume: F,
) -> LdapResult<()>
where
    F: FnMut(LdapEntry) -> LdapResult<()>,
{
    let mut cursor = PageCursor::new(request.result_limit);
    let scope = request.scope.to_ldap3();
    let page_size = request.page_size as i32;
    let read_timeout = session.read_timeout();

    loop {
        let control: RawControl = PagedResults {
            size: page_size,
            cookie: cursor.cookie().to_vec(),
        }
        .into();

        let result = session
            .ldap_mut()
            .with_timeout(read_timeout)
            .with_controls(vec![control])
            .search(&request.base_dn, scope, &request.filter, attributes.to_vec())
            .await
            .map_err(|e| LdapError::search(format!("page request failed: {e}")))?;

        let (entries, response) = result
            .success()
            .map_err(|e| LdapError::search(format!("page request rejected: {e}")))?;

        let budget = cursor.budget(entries.len());
        tracing::debug!(
            delivered = entries.len(),
            consumed = budget,
            "search page processed"
        );

        for result_entry in entries.into_iter().take(budget) {
            let entry = LdapEntry::from_search_entry(SearchEntry::construct(result_entry));
            consume(entry)?;
        }

        let next_cookie = paged_cookie(&response.ctrls).unwrap_or_default();
        if !cursor.absorb(budget, next_cookie) {
            return Ok(());
        }
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Searches the directory and maps every consumed entry onto `T`.
///
/// Result order is the concatenation of server-delivered per-page
/// order; no entry is mapped twice.
pub(crate) async fn run_search<T: AttributeModel>(
    session: &mut LdapSession,
    request: &SearchRequest,
) -> LdapResult<Vec<T>> {
    let attributes: Vec<&str> = match &request.attributes {
        Some(list) => list.iter().map(String::as_str).collect(),
        None => T::attribute_names().to_vec(),
    };

    let mut records = Vec::new();
    paged_walk(session, request, &attributes, |entry| {
        records.push(map_entry::<T>(&entry)?);
        Ok(())
    })
    .await?;

    Ok(records)
}

/// Collects the set of distinct attribute names observed across all
/// consumed entries.
///
/// Requests all attributes regardless of the request's explicit list.
/// The returned list carries no ordering guarantee.
pub(crate) async fn run_distinct_attributes(
    session: &mut LdapSession,
    request: &SearchRequest,
) -> LdapResult<Vec<String>> {
    let mut names: HashSet<String> = HashSet::new();
    paged_walk(session, request, &["*"], |entry| {
        names.extend(entry.attributes.into_keys());
        Ok(())
    })
    .await?;

    Ok(names.into_iter().collect())
}

/// Performs one unpaged subtree search and maps the first match.
///
/// Zero matches yield `Ok(None)`; any further matches beyond the first
/// are ignored.
pub(crate) async fn run_first_match<T: AttributeModel>(
    session: &mut LdapSession,
    base_dn: &str,
    filter: &str,
) -> LdapResult<Option<T>> {
    let attributes = T::attribute_names().to_vec();
    let read_timeout = session.read_timeout();

    let result = session
        .ldap_mut()
        .with_timeout(read_timeout)
        .search(base_dn, ldap3::Scope::Subtree, filter, attributes)
        .await
        .map_err(|e| LdapError::search(format!("search failed: {e}")))?;

    let (entries, _response) = result
        .success()
        .map_err(|e| LdapError::search(format!("search rejected: {e}")))?;

    match entries.into_iter().next() {
        Some(result_entry) => {
            let entry = LdapEntry::from_search_entry(SearchEntry::construct(result_entry));
            Ok(Some(map_entry(&entry)?))
        }
        None => {
            tracing::debug!(base_dn, "no directory object matched the filter");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Drives a cursor over synthetic pages, returning the number of
    /// consumed entries and issued page requests. A non-empty cookie is
    /// handed back after every page except the last.
    fn drive(pages: &[usize], limit: Option<usize>) -> (usize, usize) {
        let mut cursor = PageCursor::new(limit);
        let mut consumed = 0;
        let mut requests = 0;

        for (i, page_len) in pages.iter().enumerate() {
            requests += 1;
            let budget = cursor.budget(*page_len);
            consumed += budget;

            let next_cookie = if i + 1 < pages.len() {
                vec![0x01]
            } else {
                Vec::new()
            };
            if !cursor.absorb(budget, next_cookie) {
                break;
            }
        }

        (consumed, requests)
    }

    #[test]
    fn cap_spans_page_boundary() {
        // Three pages of two; cap of three stops mid-second page and
        // never requests the third.
        let (consumed, requests) = drive(&[2, 2, 2], Some(3));
        assert_eq!(consumed, 3);
        assert_eq!(requests, 2);
    }

    #[test]
    fn unbounded_walks_to_empty_cookie() {
        let (consumed, requests) = drive(&[2, 2, 2], None);
        assert_eq!(consumed, 6);
        assert_eq!(requests, 3);
    }

    #[test]
    fn cap_reached_exactly_at_page_end() {
        // No extra page request once the cap is met, cookie or not.
        let (consumed, requests) = drive(&[2, 2, 2], Some(4));
        assert_eq!(consumed, 4);
        assert_eq!(requests, 2);
    }

    #[test]
    fn page_size_one() {
        let (consumed, requests) = drive(&[1, 1, 1, 1], Some(2));
        assert_eq!(consumed, 2);
        assert_eq!(requests, 2);
    }

    #[test]
    fn page_larger_than_dataset() {
        let (consumed, requests) = drive(&[5], Some(1000));
        assert_eq!(consumed, 5);
        assert_eq!(requests, 1);
    }

    #[test]
    fn zero_cap_consumes_nothing() {
        let (consumed, requests) = drive(&[3, 3], Some(0));
        assert_eq!(consumed, 0);
        assert_eq!(requests, 1);
    }

    #[test]
    fn entry_accessors() {
        let entry = LdapEntry {
            dn: "cn=john,ou=users,dc=example,dc=com".to_string(),
            attributes: HashMap::from([
                ("cn".to_string(), vec!["John Doe".to_string()]),
                (
                    "mail".to_string(),
                    vec!["john@example.com".to_string(), "jd@example.com".to_string()],
                ),
            ]),
        };

        assert_eq!(entry.attr_first("cn"), Some("John Doe"));
        assert_eq!(entry.attr_first("mail"), Some("john@example.com"));
        assert_eq!(entry.attr_first("missing"), None);
        assert!(entry.has_attr("cn"));
        assert!(!entry.has_attr("missing"));
    }

    #[test]
    fn attribute_union_is_page_size_independent() {
        // Six entries with overlapping attribute sets, consumed under
        // page layouts of size 1, 2, and larger than the dataset.
        let dataset: Vec<Vec<&str>> = vec![
            vec!["cn", "sn"],
            vec!["cn", "mail"],
            vec!["objectClass"],
            vec!["cn", "userPassword"],
            vec!["sn"],
            vec!["mail", "objectClass"],
        ];

        let union_for = |page_len: usize| -> HashSet<String> {
            let mut cursor = PageCursor::new(Some(1000));
            let mut names: HashSet<String> = HashSet::new();
            let pages: Vec<&[Vec<&str>]> = dataset.chunks(page_len).collect();

            for (i, page) in pages.iter().enumerate() {
                let budget = cursor.budget(page.len());
                for attrs in page.iter().take(budget) {
                    names.extend(attrs.iter().map(|a| (*a).to_string()));
                }
                let next_cookie = if i + 1 < pages.len() {
                    vec![0x01]
                } else {
                    Vec::new()
                };
                if !cursor.absorb(budget, next_cookie) {
                    break;
                }
            }
            names
        };

        let expected: HashSet<String> = ["cn", "sn", "mail", "objectClass", "userPassword"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();

        assert_eq!(union_for(1), expected);
        assert_eq!(union_for(2), expected);
        assert_eq!(union_for(100), expected);
    }
}
