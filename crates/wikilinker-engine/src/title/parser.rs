use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::{Namespace, Namespaces, Title};
use crate::config::LinkerConfig;

const MAX_KEY_BYTES: usize = 255;
const MAX_SPECIAL_KEY_BYTES: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("Title is empty")]
    Empty,

    #[error("Title contains illegal character {0:?}")]
    IllegalCharacter(char),

    #[error("Title contains a percent-encoded sequence")]
    PercentEncoded,

    #[error("Title is a relative path")]
    RelativePath,

    #[error("Title contains a signature (~~~)")]
    Signature,

    #[error("Title is longer than {0} bytes")]
    TooLong(usize),

    #[error("Title starts with a colon after its namespace")]
    LeadingColon,
}

fn whitespace_regex() -> &'static Regex {
    static WS_REGEX: OnceLock<Regex> = OnceLock::new();
    WS_REGEX.get_or_init(|| Regex::new(r"[ _\u{A0}\u{3000}]+").expect("Invalid title whitespace regex"))
}

fn prefix_regex() -> &'static Regex {
    static PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();
    PREFIX_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^(.+?)_*:_*(.*)$").expect("Invalid title prefix regex")
    })
}

fn percent_regex() -> &'static Regex {
    static PERCENT_REGEX: OnceLock<Regex> = OnceLock::new();
    PERCENT_REGEX.get_or_init(|| Regex::new(r"%[0-9A-Fa-f]{2}").expect("Invalid percent regex"))
}

fn is_illegal(c: char) -> bool {
    matches!(c, '<' | '>' | '[' | ']' | '|' | '{' | '}') || c.is_control()
}

fn is_relative_path(key: &str) -> bool {
    key == "."
        || key == ".."
        || key.starts_with("./")
        || key.starts_with("../")
        || key.contains("/./")
        || key.contains("/../")
        || key.ends_with("/.")
        || key.ends_with("/..")
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parses title text such as `Talk:Main Page#History`.
///
/// `default_ns` applies when the text carries no namespace prefix.
pub fn parse(
    text: &str,
    default_ns: Namespace,
    namespaces: &Namespaces,
    config: &LinkerConfig,
) -> Result<Title, TitleError> {
    let decoded = html_escape::decode_html_entities(text);
    let mut key = whitespace_regex()
        .replace_all(&decoded, "_")
        .trim_matches('_')
        .to_string();
    if key.is_empty() {
        return Err(TitleError::Empty);
    }

    let mut namespace = default_ns;
    let mut interwiki = String::new();

    if let Some(rest) = key.strip_prefix(':') {
        namespace = Namespace::MAIN;
        key = rest.trim_start_matches('_').to_string();
    }

    if let Some(caps) = prefix_regex().captures(&key) {
        let prefix = caps[1].to_string();
        let rest = caps[2].to_string();
        if let Some(ns) = namespaces.lookup(&prefix) {
            namespace = ns;
            key = rest;
            if ns != Namespace::MAIN && key.starts_with(':') {
                return Err(TitleError::LeadingColon);
            }
        } else if config.interwiki_url(&prefix).is_some() {
            interwiki = prefix.to_lowercase();
            namespace = Namespace::MAIN;
            key = rest;
        }
    }

    let mut fragment = String::new();
    if let Some(pos) = key.find('#') {
        fragment = key[pos + 1..].to_string();
        key = key[..pos].trim_end_matches('_').to_string();
    }

    if let Some(c) = key.chars().find(|c| is_illegal(*c)) {
        return Err(TitleError::IllegalCharacter(c));
    }
    if percent_regex().is_match(&key) {
        return Err(TitleError::PercentEncoded);
    }
    if key.contains('.') && is_relative_path(&key) {
        return Err(TitleError::RelativePath);
    }
    if key.contains("~~~") {
        return Err(TitleError::Signature);
    }

    let max = if namespace == Namespace::SPECIAL {
        MAX_SPECIAL_KEY_BYTES
    } else {
        MAX_KEY_BYTES
    };
    if key.len() > max {
        return Err(TitleError::TooLong(max));
    }

    if interwiki.is_empty() {
        key = ucfirst(&key);
    }

    if key.is_empty()
        && interwiki.is_empty()
        && (namespace != Namespace::MAIN || fragment.is_empty())
    {
        return Err(TitleError::Empty);
    }

    let ns_text = if interwiki.is_empty() {
        namespaces.name(namespace)
    } else {
        ""
    };
    Ok(Title::from_parts(namespace, ns_text, &key, &fragment, &interwiki))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use rstest::rstest;

    fn parse_en(text: &str) -> Result<Title, TitleError> {
        let lang = Language::builtin("en").unwrap();
        let namespaces = Namespaces::new(&lang, "OSHWiki");
        let mut config = LinkerConfig::default();
        config
            .interwiki
            .insert("wikipedia".to_string(), "https://en.wikipedia.org/wiki/$1".to_string());
        parse(text, Namespace::MAIN, &namespaces, &config)
    }

    #[test]
    fn namespace_and_fragment_are_split() {
        let title = parse_en("talk: main_page#History notes").unwrap();
        assert_eq!(title.namespace(), Namespace::TALK);
        assert_eq!(title.prefixed_dbkey(), "Talk:Main_page");
        assert_eq!(title.fragment(), "History notes");
    }

    #[test]
    fn first_letter_is_capitalised() {
        let title = parse_en("ázaro").unwrap();
        assert_eq!(title.dbkey(), "Ázaro");
    }

    #[test]
    fn leading_colon_forces_prefix_lookup_from_main() {
        let title = parse_en(":Category:Chemicals").unwrap();
        assert_eq!(title.namespace(), Namespace::CATEGORY);
        assert_eq!(title.dbkey(), "Chemicals");
    }

    #[test]
    fn entities_are_decoded() {
        let title = parse_en("Caf&eacute;&#32;menu").unwrap();
        assert_eq!(title.dbkey(), "Café_menu");
    }

    #[test]
    fn fragment_only_title_is_valid() {
        let title = parse_en("#Overview").unwrap();
        assert_eq!(title.prefixed_text(), "");
        assert_eq!(title.fragment(), "Overview");
    }

    #[test]
    fn interwiki_prefix_is_recognised() {
        let title = parse_en("Wikipedia:risk assessment").unwrap();
        assert_eq!(title.interwiki(), "wikipedia");
        assert_eq!(title.dbkey(), "risk_assessment");
    }

    #[test]
    fn unknown_prefix_stays_in_key() {
        let title = parse_en("Nowhere:Page").unwrap();
        assert_eq!(title.namespace(), Namespace::MAIN);
        assert_eq!(title.dbkey(), "Nowhere:Page");
    }

    #[rstest]
    #[case("", TitleError::Empty)]
    #[case(" _ ", TitleError::Empty)]
    #[case("Talk:", TitleError::Empty)]
    #[case("Foo<bar>", TitleError::IllegalCharacter('<'))]
    #[case("A[[B]]", TitleError::IllegalCharacter('['))]
    #[case("Foo|Bar", TitleError::IllegalCharacter('|'))]
    #[case("100%25 sure", TitleError::PercentEncoded)]
    #[case("..", TitleError::RelativePath)]
    #[case("../Sibling", TitleError::RelativePath)]
    #[case("A/./B", TitleError::RelativePath)]
    #[case("Signed ~~~~", TitleError::Signature)]
    #[case("Talk::Foo", TitleError::LeadingColon)]
    fn invalid_titles_are_rejected(#[case] text: &str, #[case] expected: TitleError) {
        assert_eq!(parse_en(text), Err(expected));
    }

    #[test]
    fn over_long_keys_are_rejected() {
        let text = "x".repeat(256);
        assert_eq!(parse_en(&text), Err(TitleError::TooLong(255)));
        assert!(parse_en(&"x".repeat(255)).is_ok());
    }
}
