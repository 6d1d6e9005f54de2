//! URL encoding and query-string helpers.

use std::fmt;

/// Scheme to use when a full URL is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    /// Server-relative or protocol-relative, whatever the server uses.
    #[default]
    Relative,
    Http,
    Https,
}

/// Percent-encodes a page key for use in a path.
///
/// Punctuation that is safe and common in titles (`;:@$!*(),/~`) stays
/// readable.
pub fn urlencode(s: &str) -> String {
    const KEEP: &[(&str, &str)] = &[
        ("%3B", ";"),
        ("%3A", ":"),
        ("%40", "@"),
        ("%24", "$"),
        ("%21", "!"),
        ("%2A", "*"),
        ("%28", "("),
        ("%29", ")"),
        ("%2C", ","),
        ("%2F", "/"),
        ("%7E", "~"),
    ];
    let mut encoded = form_encode(s);
    for (from, to) in KEEP {
        encoded = encoded.replace(from, to);
    }
    encoded
}

/// `application/x-www-form-urlencoded` encoding: spaces become `+`.
pub fn form_encode(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

/// Decodes percent escapes, keeping the input when it is not valid UTF-8.
pub fn percent_decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

fn form_decode(s: &str) -> String {
    percent_decode(&s.replace('+', " "))
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a parameter, keeping its position when it already exists.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.params.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Encodes as `k=v&k2=v2`.
    pub fn to_cgi(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parses a `k=v&k2=v2` string. Keys without `=` get an empty value.
    pub fn from_cgi(query: &str) -> Self {
        let mut out = Query::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            out.set(&form_decode(k), form_decode(v));
        }
        out
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cgi())
    }
}

/// Appends an encoded query string, before any fragment.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let (base, fragment) = match url.find('#') {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{query}{fragment}")
}

/// Turns a server-relative or protocol-relative URL into a full one.
///
/// `server` is the configured server, which may itself be
/// protocol-relative (`//wiki.example.org`). With [`Protocol::Relative`] a
/// protocol-relative result is left as is.
pub fn expand_url(url: &str, protocol: Protocol, server: &str) -> String {
    let absolute = if url.starts_with('/') && !url.starts_with("//") {
        format!("{server}{url}")
    } else {
        url.to_string()
    };
    match (absolute.strip_prefix("//"), protocol) {
        (Some(rest), Protocol::Http) => format!("http://{rest}"),
        (Some(rest), Protocol::Https) => format!("https://{rest}"),
        _ => absolute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Main_Page", "Main_Page")]
    #[case("Foo/Bar:Baz", "Foo/Bar:Baz")]
    #[case("Espesiál:Upload", "Espesi%C3%A1l:Upload")]
    #[case("A&B?", "A%26B%3F")]
    fn urlencode_keeps_title_punctuation(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(urlencode(input), expected);
    }

    #[test]
    fn query_round_trips_through_cgi() {
        let query = Query::new()
            .with("action", "edit")
            .with("from", "Some User");
        assert_eq!(query.to_cgi(), "action=edit&from=Some+User");
        assert_eq!(Query::from_cgi(&query.to_cgi()), query);
    }

    #[test]
    fn query_set_keeps_position() {
        let mut query = Query::new().with("a", "1").with("b", "2");
        query.set("a", "3");
        assert_eq!(query.to_cgi(), "a=3&b=2");
    }

    #[rstest]
    #[case("/wiki/Foo", "a=1", "/wiki/Foo?a=1")]
    #[case("/index.php?title=Foo", "a=1", "/index.php?title=Foo&a=1")]
    #[case("/wiki/Foo#Bar", "a=1", "/wiki/Foo?a=1#Bar")]
    #[case("/wiki/Foo", "", "/wiki/Foo")]
    fn append_query_cases(#[case] url: &str, #[case] query: &str, #[case] expected: &str) {
        assert_eq!(append_query(url, query), expected);
    }

    #[test]
    fn expand_url_applies_protocol_to_relative_server() {
        let server = "//test.oshwiki.eu";
        assert_eq!(
            expand_url("/wiki/Foo", Protocol::Http, server),
            "http://test.oshwiki.eu/wiki/Foo"
        );
        assert_eq!(
            expand_url("/wiki/Foo", Protocol::Https, server),
            "https://test.oshwiki.eu/wiki/Foo"
        );
        assert_eq!(
            expand_url("/wiki/Foo", Protocol::Relative, server),
            "//test.oshwiki.eu/wiki/Foo"
        );
        assert_eq!(
            expand_url("https://other.org/x", Protocol::Http, server),
            "https://other.org/x"
        );
    }
}
