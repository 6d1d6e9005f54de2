use super::escape;

const VOID_ELEMENTS: &[&str] = &["area", "br", "col", "hr", "img", "input", "link", "meta"];

/// Ordered list of HTML attributes.
///
/// A `None` value marks the attribute as suppressed: it survives merging (so
/// it can cancel a default) but is never rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribs {
    entries: Vec<(String, Option<String>)>,
}

impl Attribs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Attribs::set`].
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder form of [`Attribs::suppress`].
    pub fn without(mut self, key: &str) -> Self {
        self.suppress(key);
        self
    }

    /// Sets a value, keeping the original position when the key exists.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.put(key, Some(value.into()));
    }

    /// Marks an attribute as suppressed.
    pub fn suppress(&mut self, key: &str) {
        self.put(key, None);
    }

    fn put(&mut self, key: &str, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Merges `custom` over `defaults`.
    ///
    /// Custom values replace defaults in place and new keys are appended.
    /// When both sides carry a class the token lists are unioned, defaults
    /// first.
    pub fn merge(defaults: &Attribs, custom: &Attribs) -> Attribs {
        let mut out = defaults.clone();
        for (key, value) in &custom.entries {
            out.put(key, value.clone());
        }
        if let (Some(a), Some(b)) = (defaults.get("class"), custom.get("class"))
            && a != b
        {
            out.set("class", unique_tokens(&format!("{a} {b}")));
        }
        out
    }

    /// Renders the attributes as ` key="value"` pairs.
    pub fn expand(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            let Some(value) = value else { continue };
            let value = if key == "class" {
                let tokens = unique_tokens(value);
                if tokens.is_empty() {
                    continue;
                }
                tokens
            } else {
                value.clone()
            };
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&encode_attribute_value(&value));
            out.push('"');
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attribs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attribs = Attribs::new();
        for (k, v) in iter {
            attribs.set(&k.into(), v);
        }
        attribs
    }
}

fn unique_tokens(value: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for token in value.split_whitespace() {
        if !seen.contains(&token) {
            seen.push(token);
        }
    }
    seen.join(" ")
}

fn encode_attribute_value(value: &str) -> String {
    escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

/// Builds an element whose contents are escaped text.
pub fn element(tag: &str, attribs: &Attribs, text: &str) -> String {
    raw_element(tag, attribs, &html_escape::encode_text(text))
}

/// Builds an element whose contents are already HTML.
pub fn raw_element(tag: &str, attribs: &Attribs, html: &str) -> String {
    if VOID_ELEMENTS.contains(&tag) {
        return format!("<{tag}{} />", attribs.expand());
    }
    format!("<{tag}{}>{html}</{tag}>", attribs.expand())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_preserves_insertion_order() {
        let attribs = Attribs::new()
            .with("href", "/wiki/Foo")
            .with("class", "new")
            .with("title", "Foo");
        assert_eq!(
            attribs.expand(),
            r#" href="/wiki/Foo" class="new" title="Foo""#
        );
    }

    #[test]
    fn expand_escapes_values_and_skips_suppressed() {
        let attribs = Attribs::new()
            .with("title", "a \"quoted\" <tag>\nline")
            .without("class");
        assert_eq!(
            attribs.expand(),
            r#" title="a &quot;quoted&quot; &lt;tag&gt;&#10;line""#
        );
    }

    #[test]
    fn merge_unions_classes_and_overrides_others() {
        let defaults = Attribs::new().with("class", "new stub").with("title", "Foo");
        let custom = Attribs::new()
            .with("class", "mw-userlink new")
            .with("title", "Bar")
            .with("rel", "x");
        let merged = Attribs::merge(&defaults, &custom);
        assert_eq!(merged.get("class"), Some("new stub mw-userlink"));
        assert_eq!(merged.get("title"), Some("Bar"));
        assert_eq!(merged.get("rel"), Some("x"));
    }

    #[test]
    fn merge_suppression_cancels_default() {
        let defaults = Attribs::new().with("title", "Foo");
        let custom = Attribs::new().without("title");
        let merged = Attribs::merge(&defaults, &custom);
        assert!(merged.contains_key("title"));
        assert_eq!(merged.get("title"), None);
        assert_eq!(merged.expand(), "");
    }

    #[test]
    fn void_elements_self_close() {
        let attribs = Attribs::new().with("src", "/a.png").with("alt", "a");
        assert_eq!(
            raw_element("img", &attribs, "ignored"),
            r#"<img src="/a.png" alt="a" />"#
        );
    }

    #[test]
    fn element_escapes_text() {
        assert_eq!(
            element("span", &Attribs::new(), "<b>"),
            "<span>&lt;b&gt;</span>"
        );
    }
}
