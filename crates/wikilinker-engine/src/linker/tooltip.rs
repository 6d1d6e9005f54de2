use regex::Regex;
use std::sync::OnceLock;

use super::Linker;
use crate::html::{Attribs, escape};

fn legacy_accesskey_hint_regex() -> &'static Regex {
    static LEGACY_HINT_REGEX: OnceLock<Regex> = OnceLock::new();
    LEGACY_HINT_REGEX.get_or_init(|| Regex::new(r" ?\[alt-.\]$").expect("Invalid access key hint regex"))
}

impl Linker<'_> {
    /// `title` attribute text for interface element `name`, from the
    /// `tooltip-<name>` message. `with_access` appends the access key as
    /// `[k]`. A tooltip of `-` means none.
    pub fn title_attrib(&self, name: &str, with_access: bool) -> Option<String> {
        let message = self.site.language().msg(&format!("tooltip-{name}"));
        let mut tooltip = if message.exists() {
            let text = message.text();
            let text = legacy_accesskey_hint_regex().replace(&text, "").into_owned();
            (text != "-").then_some(text)
        } else {
            None
        };

        if with_access && let Some(key) = self.accesskey(name) {
            tooltip = Some(match tooltip {
                Some(text) if !text.is_empty() => format!("{text} [{key}]"),
                _ => format!("[{key}]"),
            });
        }
        tooltip
    }

    /// Access key for interface element `name`, from `accesskey-<name>`.
    pub fn accesskey(&self, name: &str) -> Option<String> {
        let message = self.site.language().msg(&format!("accesskey-{name}"));
        if !message.exists() {
            return None;
        }
        let key = message.plain();
        (!key.is_empty() && key != "-").then_some(key)
    }

    /// `title` and `accesskey` attributes for an element; missing ones are
    /// suppressed.
    pub fn tooltip_and_accesskey_attribs(&self, name: &str) -> Attribs {
        let mut attribs = Attribs::new();
        match self.title_attrib(name, true) {
            Some(title) => attribs.set("title", title),
            None => attribs.suppress("title"),
        }
        match self.accesskey(name) {
            Some(key) => attribs.set("accesskey", key),
            None => attribs.suppress("accesskey"),
        }
        attribs
    }

    /// ` title="..."` attribute string, or an empty string.
    pub fn tooltip(&self, name: &str, with_access: bool) -> String {
        match self.title_attrib(name, with_access) {
            Some(title) => format!(" title=\"{}\"", escape(&title)),
            None => String::new(),
        }
    }
}
