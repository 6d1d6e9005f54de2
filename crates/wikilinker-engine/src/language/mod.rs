//! # Language bundles
//!
//! A [`Language`] is a static mapping from message keys to localized strings,
//! plus the namespace names, special page aliases and link trail pattern of
//! one language. Bundles are TOML documents; `en` and `tet` are compiled in,
//! others can be loaded from disk. Every bundle except `en` falls back to
//! another bundle (by default `en`) for anything it does not define.
//!
//! ## Modules
//!
//! - **`message`**: `Message`, parameter substitution and output forms

pub mod message;

pub use message::Message;

use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::title::Namespace;

const EN_BUNDLE: &str = include_str!("../../languages/en.toml");
const TET_BUNDLE: &str = include_str!("../../languages/tet.toml");

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("Failed to read language bundle at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse language bundle {name}: {source}")]
    Parse {
        name: String,
        source: toml::de::Error,
    },

    #[error("Unknown namespace key '{key}' in language bundle {code}")]
    UnknownNamespace { code: String, key: String },

    #[error("Invalid link trail pattern in language bundle {code}: {source}")]
    LinkTrail { code: String, source: regex::Error },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

#[derive(Debug, Deserialize)]
struct Bundle {
    code: String,
    fallback: Option<String>,
    #[serde(default)]
    dir: Direction,
    link_trail: Option<String>,
    #[serde(default)]
    namespaces: BTreeMap<String, String>,
    #[serde(default)]
    namespace_aliases: BTreeMap<String, String>,
    #[serde(default)]
    special_page_aliases: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    messages: HashMap<String, String>,
}

/// A loaded language bundle with its fallback chain.
#[derive(Debug, Clone)]
pub struct Language {
    code: String,
    dir: Direction,
    link_trail: Option<Regex>,
    namespace_names: BTreeMap<Namespace, String>,
    namespace_aliases: Vec<(String, Namespace)>,
    special_page_aliases: BTreeMap<String, Vec<String>>,
    messages: HashMap<String, String>,
    fallback: Option<Box<Language>>,
    site_name: String,
}

impl Language {
    /// Loads one of the compiled-in bundles.
    pub fn builtin(code: &str) -> Result<Self, LanguageError> {
        let source = match code {
            "en" => EN_BUNDLE,
            "tet" => TET_BUNDLE,
            other => return Err(LanguageError::UnknownLanguage(other.to_string())),
        };
        Self::from_toml_str(code, source)
    }

    /// Loads a bundle file. Its fallback must be a compiled-in bundle.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, LanguageError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LanguageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&path.display().to_string(), &content)
    }

    /// Parses a bundle. `name` is only used in error messages.
    pub fn from_toml_str(name: &str, source: &str) -> Result<Self, LanguageError> {
        let bundle: Bundle = toml::from_str(source).map_err(|source| LanguageError::Parse {
            name: name.to_string(),
            source,
        })?;

        let fallback_code = match bundle.fallback.as_deref() {
            Some(code) => Some(code.to_string()),
            None if bundle.code != "en" => Some("en".to_string()),
            None => None,
        };
        let fallback = match fallback_code {
            Some(code) if code != bundle.code => Some(Box::new(Self::builtin(&code)?)),
            _ => None,
        };

        let mut namespace_names = BTreeMap::new();
        for (key, name) in bundle.namespaces {
            let ns = Namespace::from_key(&key).ok_or_else(|| LanguageError::UnknownNamespace {
                code: bundle.code.clone(),
                key: key.clone(),
            })?;
            namespace_names.insert(ns, name);
        }

        let mut namespace_aliases = Vec::new();
        for (alias, key) in bundle.namespace_aliases {
            let ns = Namespace::from_key(&key).ok_or_else(|| LanguageError::UnknownNamespace {
                code: bundle.code.clone(),
                key: key.clone(),
            })?;
            namespace_aliases.push((alias, ns));
        }

        let link_trail = bundle
            .link_trail
            .map(|pattern| {
                Regex::new(&pattern).map_err(|source| LanguageError::LinkTrail {
                    code: bundle.code.clone(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            code: bundle.code,
            dir: bundle.dir,
            link_trail,
            namespace_names,
            namespace_aliases,
            special_page_aliases: bundle.special_page_aliases,
            messages: bundle.messages,
            fallback,
            site_name: "MediaWiki".to_string(),
        })
    }

    /// Sets the value substituted for `{{SITENAME}}`, down the fallback chain.
    pub fn with_site_name(mut self, site_name: &str) -> Self {
        self.set_site_name(site_name);
        self
    }

    fn set_site_name(&mut self, site_name: &str) {
        self.site_name = site_name.to_string();
        if let Some(fallback) = self.fallback.as_mut() {
            fallback.set_site_name(site_name);
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn is_rtl(&self) -> bool {
        self.dir == Direction::Rtl
    }

    /// `right` for left-to-right languages, `left` otherwise.
    pub fn align_end(&self) -> &'static str {
        if self.is_rtl() { "left" } else { "right" }
    }

    pub fn arrow(&self) -> &'static str {
        if self.is_rtl() { "←" } else { "→" }
    }

    /// Unicode directional mark matching the language direction.
    pub fn dir_mark(&self) -> &'static str {
        if self.is_rtl() { "\u{200F}" } else { "\u{200E}" }
    }

    /// Pattern splitting a link trail into the part glued to the link and
    /// the remainder.
    pub fn link_trail(&self) -> &Regex {
        static DEFAULT_TRAIL: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
        match (&self.link_trail, &self.fallback) {
            (Some(trail), _) => trail,
            (None, Some(fallback)) => fallback.link_trail(),
            (None, None) => DEFAULT_TRAIL.get_or_init(|| {
                Regex::new(r"(?s)^([a-z]+)(.*)$").expect("Invalid link trail regex")
            }),
        }
    }

    pub fn namespace_name(&self, ns: Namespace) -> Option<&str> {
        self.namespace_names
            .get(&ns)
            .map(String::as_str)
            .or_else(|| self.fallback.as_ref()?.namespace_name(ns))
    }

    /// Namespace aliases of this language and its fallbacks.
    pub fn namespace_aliases(&self) -> Vec<(String, Namespace)> {
        let mut aliases = self
            .fallback
            .as_ref()
            .map(|f| f.namespace_aliases())
            .unwrap_or_default();
        aliases.extend(self.namespace_aliases.iter().cloned());
        aliases
    }

    /// Localized aliases of a special page, first one preferred.
    pub fn special_page_aliases(&self, canonical: &str) -> Vec<String> {
        let mut aliases = self
            .special_page_aliases
            .get(canonical)
            .cloned()
            .unwrap_or_default();
        if let Some(fallback) = &self.fallback {
            for alias in fallback.special_page_aliases(canonical) {
                if !aliases.contains(&alias) {
                    aliases.push(alias);
                }
            }
        }
        aliases
    }

    /// Raw message text, searching the fallback chain.
    pub fn message_text(&self, key: &str) -> Option<&str> {
        self.messages
            .get(key)
            .map(String::as_str)
            .or_else(|| self.fallback.as_ref()?.message_text(key))
    }

    pub fn msg(&self, key: &str) -> Message<'_> {
        Message::new(self, key)
    }

    /// Formats an integer with thousands separators.
    pub fn format_num(&self, n: i64) -> String {
        let digits = n.unsigned_abs().to_string();
        let grouped = group_thousands(&digits);
        if n < 0 { format!("-{grouped}") } else { grouped }
    }

    /// Formats a non-negative decimal, dropping trailing zeros.
    fn format_decimal(&self, value: f64, precision: usize) -> String {
        let formatted = format!("{value:.precision$}");
        let (int_part, frac_part) = match formatted.split_once('.') {
            Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
            None => (formatted.clone(), String::new()),
        };
        let grouped = group_thousands(&int_part);
        if frac_part.is_empty() {
            grouped
        } else {
            format!("{grouped}.{frac_part}")
        }
    }

    /// Formats a byte count with the largest fitting unit (B, KB, MB, GB).
    pub fn format_size(&self, size: u64) -> String {
        const UNITS: [&str; 4] = ["size-bytes", "size-kilobytes", "size-megabytes", "size-gigabytes"];
        let mut value = size as f64;
        let mut index = 0;
        while value >= 1024.0 && index < UNITS.len() - 1 {
            value /= 1024.0;
            index += 1;
        }
        let precision = index.saturating_sub(1);
        let number = self.format_decimal(value, precision);
        self.msg(UNITS[index]).raw_param(number).text()
    }

    /// Joins items with the localized pipe separator.
    pub fn pipe_list(&self, items: &[String]) -> String {
        items.join(&self.msg("pipe-separator").escaped())
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn builtin_bundles_parse() {
        let en = Language::builtin("en").unwrap();
        let tet = Language::builtin("tet").unwrap();
        assert_eq!(en.code(), "en");
        assert_eq!(tet.code(), "tet");
    }

    #[test]
    fn unknown_builtin_is_an_error() {
        assert!(matches!(
            Language::builtin("xx"),
            Err(LanguageError::UnknownLanguage(code)) if code == "xx"
        ));
    }

    #[test]
    fn tetun_messages_fall_back_to_english() {
        let tet = Language::builtin("tet").unwrap();
        assert_eq!(tet.message_text("talkpagelinktext"), Some("Diskusaun"));
        assert_eq!(tet.message_text("moredotdotdot"), Some("Barak liu..."));
        assert_eq!(tet.message_text("contribslink"), Some("contribs"));
        assert_eq!(tet.message_text("no-such-message"), None);
    }

    #[test]
    fn tetun_namespaces_override_english() {
        let tet = Language::builtin("tet").unwrap();
        assert_eq!(tet.namespace_name(Namespace::CATEGORY), Some("Kategoría"));
        assert_eq!(tet.namespace_name(Namespace::SPECIAL), Some("Espesiál"));
        assert!(
            tet.namespace_aliases()
                .contains(&("Image".to_string(), Namespace::FILE))
        );
    }

    #[test]
    fn tetun_inherits_link_trail_and_special_aliases() {
        let tet = Language::builtin("tet").unwrap();
        let caps = tet.link_trail().captures("abc def").unwrap();
        assert_eq!(&caps[1], "abc");
        assert_eq!(&caps[2], " def");
        assert_eq!(tet.special_page_aliases("Contributions")[0], "Contributions");
    }

    #[test]
    fn bundle_with_unknown_namespace_key_is_rejected() {
        let source = "code = \"xx\"\n[namespaces]\nnowhere = \"Nowhere\"\n";
        assert!(matches!(
            Language::from_toml_str("xx", source),
            Err(LanguageError::UnknownNamespace { key, .. }) if key == "nowhere"
        ));
    }

    #[test]
    fn rtl_bundle_flips_direction_helpers() {
        let source = "code = \"he\"\ndir = \"rtl\"\n";
        let he = Language::from_toml_str("he", source).unwrap();
        assert!(he.is_rtl());
        assert_eq!(he.align_end(), "left");
        assert_eq!(he.arrow(), "←");
        assert_eq!(he.dir_mark(), "\u{200F}");
    }

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(-1234567, "-1,234,567")]
    fn format_num_groups_thousands(#[case] n: i64, #[case] expected: &str) {
        let en = Language::builtin("en").unwrap();
        assert_eq!(en.format_num(n), expected);
    }

    #[rstest]
    #[case(512, "512 B")]
    #[case(2048, "2 KB")]
    #[case(1536, "2 KB")]
    #[case(5 * 1024 * 1024 + 300 * 1024, "5.3 MB")]
    #[case(3 * 1024 * 1024 * 1024, "3 GB")]
    fn format_size_picks_unit(#[case] size: u64, #[case] expected: &str) {
        let en = Language::builtin("en").unwrap();
        assert_eq!(en.format_size(size), expected);
    }
}
