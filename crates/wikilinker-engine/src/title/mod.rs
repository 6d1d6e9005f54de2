//! # Page titles
//!
//! A [`Title`] identifies a page: namespace, database key, optional section
//! fragment and optional interwiki prefix. Titles are built by
//! [`crate::Site`], which owns the namespace table and knows how to parse
//! user-supplied text.
//!
//! ## Modules
//!
//! - **`namespace`**: `Namespace` numbers and the per-site `Namespaces` table
//! - **`parser`**: validation and splitting of title text
//! - **`special`**: special page registry and alias resolution

pub mod namespace;
pub mod parser;
pub mod special;

pub use namespace::{Namespace, Namespaces};
pub use parser::TitleError;
pub use special::SpecialPages;

use std::cmp::Ordering;
use std::fmt;

use crate::config::LinkerConfig;
use crate::html::escape_id;
use crate::url::{Protocol, Query, append_query, expand_url, urlencode};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title {
    namespace: Namespace,
    /// Localized namespace name in key form, empty for the main namespace.
    ns_text: String,
    dbkey: String,
    fragment: String,
    interwiki: String,
}

impl Title {
    pub(crate) fn from_parts(
        namespace: Namespace,
        ns_text: &str,
        dbkey: &str,
        fragment: &str,
        interwiki: &str,
    ) -> Self {
        Self {
            namespace,
            ns_text: ns_text.to_string(),
            dbkey: dbkey.replace(' ', "_"),
            fragment: fragment.replace('_', " "),
            interwiki: interwiki.to_string(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Page name with underscores, without namespace.
    pub fn dbkey(&self) -> &str {
        &self.dbkey
    }

    /// Page name with spaces, without namespace.
    pub fn text(&self) -> String {
        self.dbkey.replace('_', " ")
    }

    /// Localized namespace name with spaces.
    pub fn ns_text(&self) -> String {
        self.ns_text.replace('_', " ")
    }

    pub fn interwiki(&self) -> &str {
        &self.interwiki
    }

    pub fn is_external(&self) -> bool {
        !self.interwiki.is_empty()
    }

    pub fn is_special_page(&self) -> bool {
        self.namespace == Namespace::SPECIAL
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn has_fragment(&self) -> bool {
        !self.fragment.is_empty()
    }

    /// Copy of this title pointing at another section. A leading `#` is
    /// ignored.
    pub fn with_fragment(&self, fragment: &str) -> Self {
        let mut out = self.clone();
        out.fragment = fragment.trim_start_matches('#').replace('_', " ");
        out
    }

    pub fn without_fragment(&self) -> Self {
        self.with_fragment("")
    }

    /// Same namespace, different page name, no fragment.
    pub fn renamed(&self, dbkey: &str) -> Self {
        Self::from_parts(self.namespace, &self.ns_text, dbkey, "", &self.interwiki)
    }

    fn prefix(&self, name: &str) -> String {
        let mut out = String::new();
        if !self.interwiki.is_empty() {
            out.push_str(&self.interwiki);
            out.push(':');
        }
        if !self.ns_text.is_empty() {
            out.push_str(&self.ns_text);
            out.push(':');
        }
        out.push_str(name);
        out
    }

    /// `Namespace:Page_name` (with interwiki prefix when external).
    pub fn prefixed_dbkey(&self) -> String {
        self.prefix(&self.dbkey)
    }

    /// `Namespace:Page name` (with interwiki prefix when external).
    pub fn prefixed_text(&self) -> String {
        self.prefix(&self.dbkey).replace('_', " ")
    }

    /// Prefixed text plus `#fragment` when there is one.
    pub fn full_text(&self) -> String {
        let mut text = self.prefixed_text();
        if self.has_fragment() {
            text.push('#');
            text.push_str(&self.fragment);
        }
        text
    }

    /// URL-encoded page name, without namespace.
    pub fn partial_url(&self) -> String {
        urlencode(&self.dbkey)
    }

    /// `#anchor` form of the fragment, or an empty string.
    pub fn fragment_for_url(&self) -> String {
        if self.fragment.is_empty() {
            String::new()
        } else {
            format!("#{}", escape_id(&self.fragment))
        }
    }

    /// Server-relative URL of the page, without fragment.
    pub fn local_url(&self, config: &LinkerConfig, query: &Query) -> String {
        self.local_url_cgi(config, &query.to_cgi())
    }

    /// [`Title::local_url`] with an already encoded query string.
    pub fn local_url_cgi(&self, config: &LinkerConfig, cgi: &str) -> String {
        if let Some(pattern) = config.interwiki_url(&self.interwiki) {
            let mut name = String::new();
            if !self.ns_text.is_empty() {
                name.push_str(&self.ns_text);
                name.push(':');
            }
            name.push_str(&self.dbkey);
            let url = pattern.replace("$1", &urlencode(&name));
            return append_query(&url, cgi);
        }

        let dbkey = urlencode(&self.prefixed_dbkey());
        if cgi.is_empty() {
            config.article_path.replace("$1", &dbkey)
        } else {
            format!("{}?title={dbkey}&{cgi}", config.script)
        }
    }

    /// Absolute URL, including the fragment.
    pub fn full_url(&self, config: &LinkerConfig, query: &Query, protocol: Protocol) -> String {
        let url = expand_url(&self.local_url(config, query), protocol, &config.server);
        format!("{url}{}", self.fragment_for_url())
    }

    /// URL for an `href`: local unless external or a protocol is forced.
    /// A fragment-only title yields just `#fragment`.
    pub fn link_url(&self, config: &LinkerConfig, query: &Query, protocol: Protocol) -> String {
        if self.is_external() || protocol != Protocol::Relative {
            return self.full_url(config, query, protocol);
        }
        let base = if self.dbkey.is_empty() && self.has_fragment() {
            String::new()
        } else {
            self.local_url(config, query)
        };
        format!("{base}{}", self.fragment_for_url())
    }
}

impl Ord for Title {
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.dbkey.cmp(&other.dbkey))
            .then_with(|| self.interwiki.cmp(&other.interwiki))
            .then_with(|| self.fragment.cmp(&other.fragment))
    }
}

impl PartialOrd for Title {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_text())
    }
}
