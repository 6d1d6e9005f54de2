//! # HTML helpers
//!
//! Escaping and element building shared by every renderer in the crate.
//!
//! ## Modules
//!
//! - **`attribs`**: `Attribs`, an ordered attribute list with class merging
//!   and suppression, plus `element` / `raw_element` builders
//!
//! ## Escaping rules
//!
//! All user-controlled text that ends up in an attribute value goes through
//! [`escape`] (or [`Attribs::expand`], which calls it). Link text passed to
//! the renderer as HTML is *not* escaped again; callers own that contract.

pub mod attribs;

pub use attribs::{Attribs, element, raw_element};

use regex::Regex;
use std::sync::OnceLock;

fn entity_regex() -> &'static Regex {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);")
            .expect("Invalid entity regex")
    })
}

fn section_whitespace_regex() -> &'static Regex {
    static SECTION_WS_REGEX: OnceLock<Regex> = OnceLock::new();
    SECTION_WS_REGEX.get_or_init(|| Regex::new(r"[ _]+").expect("Invalid whitespace regex"))
}

/// Escapes `&`, `<`, `>` and `"`.
pub fn escape(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

/// Escapes like [`escape`] and also encodes single quotes as `&#039;`.
pub fn escape_quotes(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).replace('\'', "&#039;")
}

/// Escapes like [`escape_quotes`] but leaves existing character references
/// (`&amp;`, `&#160;`, `&#x2013;`) as they are.
pub fn escape_preserving_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for m in entity_regex().find_iter(s) {
        out.push_str(&escape_quotes(&s[last..m.start()]));
        out.push_str(m.as_str());
        last = m.end();
    }
    out.push_str(&escape_quotes(&s[last..]));
    out
}

/// Sanitises free text (edit summaries) for inline display.
///
/// Character references are decoded first so that `&eacute;` and `é`
/// produce identical output, then everything is escaped.
pub fn escape_allow_entities(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    escape_quotes(&decoded)
}

/// Encodes a section name for use in an `id` or URL fragment.
///
/// Spaces become underscores, everything outside `[A-Za-z0-9_.-]` is
/// percent-encoded and then `%` is rewritten to `.` (colons stay readable).
pub fn escape_id(s: &str) -> String {
    let underscored = s.replace(' ', "_");
    urlencoding::encode(&underscored)
        .replace("%3A", ":")
        .replace("%3a", ":")
        .replace('%', ".")
}

/// Collapses runs of spaces and underscores to a single space and trims.
pub fn normalize_section_name_whitespace(section: &str) -> String {
    section_whitespace_regex()
        .replace_all(section, " ")
        .trim()
        .to_string()
}
