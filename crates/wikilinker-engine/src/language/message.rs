use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::Language;
use crate::html::{escape_preserving_entities, escape_quotes};

fn param_regex() -> &'static Regex {
    static PARAM_REGEX: OnceLock<Regex> = OnceLock::new();
    PARAM_REGEX.get_or_init(|| Regex::new(r"\$(\d+)").expect("Invalid param regex"))
}

fn plural_regex() -> &'static Regex {
    static PLURAL_REGEX: OnceLock<Regex> = OnceLock::new();
    PLURAL_REGEX.get_or_init(|| {
        Regex::new(r"\{\{PLURAL:\s*([^|}]*?)\s*\|([^}]*)\}\}").expect("Invalid plural regex")
    })
}

#[derive(Debug, Clone)]
enum Param {
    Text(String),
    Raw(String),
    Num(i64),
}

/// A message lookup with its parameters, rendered on demand.
///
/// Parameters are numbered from `$1` in the order they are added.
#[derive(Debug, Clone)]
pub struct Message<'a> {
    language: &'a Language,
    key: String,
    params: Vec<Param>,
}

impl<'a> Message<'a> {
    pub fn new(language: &'a Language, key: &str) -> Self {
        Self {
            language,
            key: key.to_string(),
            params: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Adds a plain text parameter; escaped along with the message.
    pub fn param(mut self, value: impl Into<String>) -> Self {
        self.params.push(Param::Text(value.into()));
        self
    }

    /// Adds an HTML parameter that is inserted as is in every output form.
    pub fn raw_param(mut self, value: impl Into<String>) -> Self {
        self.params.push(Param::Raw(value.into()));
        self
    }

    /// Adds a number, formatted for the language and usable by `PLURAL`.
    pub fn num_param(mut self, value: i64) -> Self {
        self.params.push(Param::Num(value));
        self
    }

    pub fn exists(&self) -> bool {
        self.language.message_text(&self.key).is_some()
    }

    /// Whether the message is missing or renders to nothing (or a lone `-`).
    pub fn is_disabled(&self) -> bool {
        match self.language.message_text(&self.key) {
            None => true,
            Some(text) => text.is_empty() || text == "-",
        }
    }

    /// Message text with parameters and magic words expanded.
    pub fn text(&self) -> String {
        match self.language.message_text(&self.key) {
            Some(template) => {
                let expanded = self.expand_magic(template);
                self.substitute(&expanded, |p| p.to_string())
            }
            None => format!("<{}>", self.key),
        }
    }

    /// Message text with parameters substituted and nothing else touched.
    pub fn plain(&self) -> String {
        match self.language.message_text(&self.key) {
            Some(template) => self.substitute(template, |p| p.to_string()),
            None => format!("<{}>", self.key),
        }
    }

    /// HTML-safe output. Existing character references in the message are
    /// kept; raw parameters are inserted after escaping.
    pub fn escaped(&self) -> String {
        match self.language.message_text(&self.key) {
            Some(template) => {
                let expanded = escape_preserving_entities(&self.expand_magic(template));
                self.substitute(&expanded, escape_quotes)
            }
            None => format!("&lt;{}&gt;", escape_quotes(&self.key)),
        }
    }

    /// HTML output where the message itself is trusted markup and only
    /// text parameters are escaped.
    pub fn parse(&self) -> String {
        match self.language.message_text(&self.key) {
            Some(template) => {
                let expanded = self.expand_magic(template);
                self.substitute(&expanded, escape_quotes)
            }
            None => format!("&lt;{}&gt;", escape_quotes(&self.key)),
        }
    }

    /// [`Message::parse`] wrapped in a paragraph.
    pub fn parse_as_block(&self) -> String {
        format!("<p>{}\n</p>", self.parse())
    }

    fn param_at(&self, index: usize) -> Option<&Param> {
        index.checked_sub(1).and_then(|i| self.params.get(i))
    }

    /// Replaces `$N`. Text parameters pass through `text_filter`.
    fn substitute(&self, template: &str, text_filter: impl Fn(&str) -> String) -> String {
        param_regex()
            .replace_all(template, |caps: &Captures| {
                let index = caps[1].parse::<usize>().unwrap_or(0);
                match self.param_at(index) {
                    Some(Param::Text(s)) => text_filter(s),
                    Some(Param::Raw(s)) => s.clone(),
                    Some(Param::Num(n)) => self.language.format_num(*n),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn expand_magic(&self, template: &str) -> String {
        let with_plurals = plural_regex().replace_all(template, |caps: &Captures| {
            let count = self.plural_count(&caps[1]);
            let forms: Vec<&str> = caps[2].split('|').collect();
            let form = if count == 1 || forms.len() == 1 {
                forms[0]
            } else {
                forms[1]
            };
            form.to_string()
        });
        with_plurals.replace("{{SITENAME}}", self.language.site_name())
    }

    fn plural_count(&self, selector: &str) -> i64 {
        let value = match selector.strip_prefix('$') {
            Some(index) => match index.parse::<usize>().ok().and_then(|i| self.param_at(i)) {
                Some(Param::Num(n)) => return *n,
                Some(Param::Text(s)) | Some(Param::Raw(s)) => s.clone(),
                None => String::new(),
            },
            None => selector.to_string(),
        };
        value.replace(',', "").trim().parse().unwrap_or(0)
    }
}
