use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::title::Namespace;

/// Rendering settings consumed by [`crate::Linker`] and title URL building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    /// Server prefix, possibly protocol-relative (`//wiki.example.org`).
    pub server: String,
    pub sitename: String,
    /// Project namespace name; defaults to the site name.
    pub meta_namespace: Option<String>,
    /// Content language code.
    pub language: String,
    pub article_path: String,
    pub script: String,
    pub style_path: String,
    pub upload_path: String,
    pub enable_uploads: bool,
    pub upload_missing_file_url: Option<String>,
    pub upload_navigation_url: Option<String>,
    pub responsive_images: bool,
    pub svg_max_size: u32,
    pub thumb_limits: Vec<u32>,
    pub thumb_upright: f64,
    /// Index into `thumb_limits` used when no width option is given.
    pub default_thumb_size: usize,
    /// Edits counted for rollback link text; 0 disables the count.
    pub show_rollback_edit_count: u32,
    pub miser_mode: bool,
    pub disable_anon_talk: bool,
    pub no_follow_links: bool,
    pub no_follow_domain_exceptions: Vec<String>,
    pub no_follow_ns_exceptions: Vec<Namespace>,
    pub namespaces_with_subpages: Vec<Namespace>,
    pub content_namespaces: Vec<Namespace>,
    /// Interwiki prefix to URL pattern (`$1` is the page name).
    pub interwiki: BTreeMap<String, String>,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            server: "//localhost".to_string(),
            sitename: "MediaWiki".to_string(),
            meta_namespace: None,
            language: "en".to_string(),
            article_path: "/wiki/$1".to_string(),
            script: "/index.php".to_string(),
            style_path: "/skins".to_string(),
            upload_path: "/images".to_string(),
            enable_uploads: false,
            upload_missing_file_url: None,
            upload_navigation_url: None,
            responsive_images: true,
            svg_max_size: 2048,
            thumb_limits: vec![120, 150, 180, 200, 250, 300],
            thumb_upright: 0.75,
            default_thumb_size: 2,
            show_rollback_edit_count: 10,
            miser_mode: false,
            disable_anon_talk: false,
            no_follow_links: true,
            no_follow_domain_exceptions: Vec::new(),
            no_follow_ns_exceptions: Vec::new(),
            namespaces_with_subpages: vec![
                Namespace::TALK,
                Namespace::USER,
                Namespace::USER_TALK,
                Namespace::PROJECT,
                Namespace::PROJECT_TALK,
                Namespace::FILE_TALK,
                Namespace::MEDIAWIKI,
                Namespace::MEDIAWIKI_TALK,
                Namespace::TEMPLATE,
                Namespace::TEMPLATE_TALK,
                Namespace::HELP,
                Namespace::HELP_TALK,
                Namespace::CATEGORY_TALK,
            ],
            content_namespaces: vec![Namespace::MAIN],
            interwiki: BTreeMap::new(),
        }
    }
}

impl LinkerConfig {
    pub fn meta_namespace(&self) -> String {
        self.meta_namespace
            .clone()
            .unwrap_or_else(|| self.sitename.replace(' ', "_"))
    }

    pub fn has_subpages(&self, ns: Namespace) -> bool {
        self.namespaces_with_subpages.contains(&ns)
    }

    pub fn is_content_namespace(&self, ns: Namespace) -> bool {
        self.content_namespaces.contains(&ns)
    }

    /// URL pattern for an interwiki prefix, matched case-insensitively.
    pub fn interwiki_url(&self, prefix: &str) -> Option<&str> {
        let prefix = prefix.to_lowercase();
        self.interwiki
            .iter()
            .find(|(k, _)| k.to_lowercase() == prefix)
            .map(|(_, v)| v.as_str())
    }

    /// Thumbnail width for a width option, falling back to the default index.
    pub fn thumb_limit(&self, width_option: Option<usize>) -> u32 {
        width_option
            .and_then(|i| self.thumb_limits.get(i))
            .or_else(|| self.thumb_limits.get(self.default_thumb_size))
            .copied()
            .unwrap_or(180)
    }
}
