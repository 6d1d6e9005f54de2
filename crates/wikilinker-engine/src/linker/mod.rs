//! # Link renderer
//!
//! [`Linker`] turns titles, files, revisions and edit summaries into HTML
//! fragments. It holds no state of its own: everything it consults (page
//! existence, files, histories, the viewer's rights) is borrowed from the
//! collaborators it was built with.
//!
//! ## Modules
//!
//! - **`image`**: embedded images, thumbnails, media and upload links
//! - **`user`**: user links and user tool links
//! - **`comment`**: edit summary formatting (autocomments, inline links)
//! - **`toc`**: table of contents and headline markup
//! - **`rollback`**: rollback links and edit counting
//! - **`lists`**: templates-used and hidden-category lists, sizes
//! - **`tooltip`**: tooltip and access key attributes
//! - **`revdelete`**: revision deletion links
//!
//! ## Failure convention
//!
//! Rendering never fails. Input that cannot be turned into a title renders
//! as `<!-- ERROR -->` followed by the supplied label.

pub mod comment;
pub mod image;
pub mod lists;
pub mod revdelete;
pub mod rollback;
pub mod toc;
pub mod tooltip;
pub mod user;

pub use image::{ImageHtml, ImageLink};
pub use lists::MoreLink;
pub use rollback::{RollbackEditCount, RollbackOptions};
pub use toc::TocSection;

use crate::html::{Attribs, escape, raw_element};
use crate::models::{
    FileRepo, NoFiles, NoHistory, NoUsers, PageLookup, RevisionHistory, UserDirectory, Viewer,
};
use crate::site::Site;
use crate::title::{Namespace, Title};
use crate::url::{Protocol, Query, append_query, percent_decode};

/// Sentinel emitted in place of a link whose target is not a valid title.
pub const ERROR_MARKER: &str = "<!-- ERROR -->";

/// How [`Linker::link`] should treat its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Treat the target as existing without looking it up.
    pub known: bool,
    /// Treat the target as missing without looking it up.
    pub broken: bool,
    /// Emit no `class` attribute.
    pub noclasses: bool,
    /// Keep the article path and append the query to it.
    pub force_article_path: bool,
    pub protocol: Protocol,
}

impl LinkOptions {
    pub fn known() -> Self {
        Self {
            known: true,
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// `known` and `noclasses`, the defaults of [`Linker::link_known`].
    pub fn known_noclasses() -> Self {
        Self::known().noclasses()
    }

    pub fn noclasses(mut self) -> Self {
        self.noclasses = true;
        self
    }

    pub fn force_article_path(mut self) -> Self {
        self.force_article_path = true;
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }
}

/// HTML renderer for links and related page furniture.
pub struct Linker<'a> {
    site: &'a Site,
    pages: &'a dyn PageLookup,
    viewer: &'a Viewer,
    files: &'a dyn FileRepo,
    history: &'a dyn RevisionHistory,
    users: &'a dyn UserDirectory,
    current_title: Option<&'a Title>,
}

impl<'a> Linker<'a> {
    /// A renderer with no files, histories or users.
    pub fn new(site: &'a Site, pages: &'a dyn PageLookup, viewer: &'a Viewer) -> Self {
        Self {
            site,
            pages,
            viewer,
            files: &NoFiles,
            history: &NoHistory,
            users: &NoUsers,
            current_title: None,
        }
    }

    pub fn with_files(mut self, files: &'a dyn FileRepo) -> Self {
        self.files = files;
        self
    }

    pub fn with_history(mut self, history: &'a dyn RevisionHistory) -> Self {
        self.history = history;
        self
    }

    pub fn with_users(mut self, users: &'a dyn UserDirectory) -> Self {
        self.users = users;
        self
    }

    /// Page being rendered; decides `rel="nofollow"` on external links.
    pub fn with_current_title(mut self, title: &'a Title) -> Self {
        self.current_title = Some(title);
        self
    }

    pub fn site(&self) -> &'a Site {
        self.site
    }

    pub fn viewer(&self) -> &'a Viewer {
        self.viewer
    }

    /// Whether a link to `title` should render as an existing page.
    pub fn is_known(&self, title: &Title) -> bool {
        if title.is_external() {
            return true;
        }
        match title.namespace() {
            Namespace::SPECIAL => self.site.special_pages().resolve_alias(title.dbkey()).is_some(),
            Namespace::MAIN if title.dbkey().is_empty() => true,
            Namespace::MEDIA => self.files.find_file(title).is_some(),
            Namespace::MEDIAWIKI => {
                let key = lcfirst(title.dbkey());
                self.site.language().message_text(&key).is_some() || self.pages.exists(title)
            }
            _ => self.pages.exists(title),
        }
    }

    /// Renders an anchor to `target`.
    ///
    /// `html` is used as link contents verbatim; without it the escaped
    /// prefixed text (or fragment) is shown. Custom attributes are merged
    /// over the computed ones; a suppressed custom attribute removes the
    /// computed one. `href` cannot be overridden.
    pub fn link(
        &self,
        target: &Title,
        html: Option<&str>,
        custom_attribs: &Attribs,
        query: &Query,
        options: LinkOptions,
    ) -> String {
        let target = self.normalise_special_page(target);

        let mut options = options;
        if !options.known && !options.broken {
            if self.is_known(&target) {
                options.known = true;
            } else {
                options.broken = true;
            }
        }

        let href = if options.force_article_path && !query.is_empty() {
            let href = self.link_url(&target, Query::new(), options);
            append_query(&href, &query.to_cgi())
        } else {
            self.link_url(&target, query.clone(), options)
        };

        let mut attribs = Attribs::new().with("href", href);
        for (key, value) in self.link_attribs(&target, custom_attribs, options).iter() {
            if let Some(value) = value {
                attribs.set(key, value);
            }
        }

        let text = match html {
            Some(html) => html.to_string(),
            None => self.link_text(&target),
        };
        raw_element("a", &attribs, &text)
    }

    /// [`Linker::link`] with the target as text. Invalid titles render as
    /// the error marker followed by `html`.
    pub fn link_text_target(
        &self,
        target: &str,
        html: Option<&str>,
        custom_attribs: &Attribs,
        query: &Query,
        options: LinkOptions,
    ) -> String {
        match self.site.new_title(target) {
            Ok(title) => self.link(&title, html, custom_attribs, query, options),
            Err(err) => {
                log::debug!("Cannot link to {target:?}: {err}");
                format!("{ERROR_MARKER}{}", html.unwrap_or(""))
            }
        }
    }

    /// Link to a page known to exist, without classes.
    pub fn link_known(
        &self,
        target: &Title,
        html: Option<&str>,
        custom_attribs: &Attribs,
        query: &Query,
    ) -> String {
        self.link(target, html, custom_attribs, query, LinkOptions::known_noclasses())
    }

    /// Link with default attributes, query and options.
    pub(crate) fn simple_link(&self, target: &Title, html: Option<&str>) -> String {
        self.link(target, html, &Attribs::new(), &Query::new(), LinkOptions::default())
    }

    fn link_url(&self, target: &Title, mut query: Query, options: LinkOptions) -> String {
        let target = if options.broken && target.has_fragment() {
            target.without_fragment()
        } else {
            target.clone()
        };
        let has_action = query.get("action").is_some_and(|a| !a.is_empty());
        if options.broken && !has_action && !target.is_special_page() {
            query.set("action", "edit");
            query.set("redlink", "1");
        }
        target.link_url(self.site.config(), &query, options.protocol)
    }

    fn link_attribs(&self, target: &Title, custom: &Attribs, options: LinkOptions) -> Attribs {
        let mut defaults = Attribs::new();
        if !options.noclasses {
            let mut classes = Vec::new();
            if options.broken {
                classes.push("new");
            }
            if target.is_external() {
                classes.push("extiw");
            }
            if !options.broken {
                let colour = self.link_colour(target, self.viewer.stub_threshold);
                if !colour.is_empty() {
                    classes.push(colour);
                }
            }
            if !classes.is_empty() {
                defaults.set("class", classes.join(" "));
            }
        }

        let prefixed = target.prefixed_text();
        if prefixed.is_empty() {
            // Fragment-only links get no title.
        } else if options.known {
            defaults.set("title", prefixed);
        } else {
            let title = self
                .site
                .language()
                .msg("red-link-title")
                .param(prefixed)
                .text();
            defaults.set("title", title);
        }

        Attribs::merge(&defaults, custom)
            .iter()
            .filter(|(key, value)| *key != "href" && value.is_some())
            .filter_map(|(key, value)| value.map(|v| (key.to_string(), v.to_string())))
            .collect()
    }

    fn link_text(&self, target: &Title) -> String {
        let prefixed = target.prefixed_text();
        if prefixed.is_empty() && target.has_fragment() {
            escape(target.fragment())
        } else {
            escape(&prefixed)
        }
    }

    /// `mw-redirect` for redirects, `stub` for short content pages, or
    /// an empty string.
    pub fn link_colour(&self, title: &Title, threshold: u64) -> &'static str {
        let Some(status) = self.pages.status(title) else {
            return "";
        };
        if status.redirect {
            "mw-redirect"
        } else if threshold > 0
            && self.site.config().is_content_namespace(title.namespace())
            && status.length < threshold
        {
            "stub"
        } else {
            ""
        }
    }

    /// ` class=".." title=".."` for an interwiki link. The title text may be
    /// percent-encoded; control characters become spaces.
    pub fn interwiki_link_attributes(&self, title: &str, class: &str) -> String {
        let decoded: String = percent_decode(title)
            .chars()
            .map(|c| if (c as u32) < 0x20 { ' ' } else { c })
            .collect();
        link_attributes_internal(&decoded, class)
    }

    /// ` class=".." title=".."` for a percent-encoded local page name.
    pub fn internal_link_attributes(&self, title: &str, class: &str) -> String {
        let decoded = percent_decode(title).replace('_', " ");
        link_attributes_internal(&decoded, class)
    }

    /// ` class=".." title=".."` for a title; `title_text` overrides the
    /// prefixed text.
    pub fn internal_link_attributes_obj(
        &self,
        target: &Title,
        class: &str,
        title_text: Option<&str>,
    ) -> String {
        let text = match title_text {
            Some(text) => text.to_string(),
            None => target.prefixed_text(),
        };
        link_attributes_internal(&text, class)
    }

    /// Bold, unlinked rendering of the current page.
    pub fn make_self_link(&self, target: &Title, html: &str, trail: &str, prefix: &str) -> String {
        let html = if html.is_empty() {
            escape(&target.prefixed_text())
        } else {
            html.to_string()
        };
        let (inside, trail) = self.split_trail(trail);
        format!("<strong class=\"selflink\">{prefix}{html}{inside}</strong>{trail}")
    }

    /// Splits text following a link into the part that joins the link text
    /// (per the language's link trail) and the rest.
    pub fn split_trail(&self, trail: &str) -> (String, String) {
        if trail.is_empty() {
            return (String::new(), String::new());
        }
        match self.site.language().link_trail().captures(trail) {
            Some(caps) => (
                caps.get(1).map_or("", |m| m.as_str()).to_string(),
                caps.get(2).map_or("", |m| m.as_str()).to_string(),
            ),
            None => (String::new(), trail.to_string()),
        }
    }

    /// Human readable explanation of an invalid title.
    pub fn invalid_title_description(&self, ns: Namespace, text: &str) -> String {
        let language = self.site.language();
        let namespaces = self.site.namespaces();
        if namespaces.exists(ns) {
            let name = if ns == Namespace::MAIN {
                language.msg("blanknamespace").text()
            } else {
                namespaces.formatted_name(ns)
            };
            language
                .msg("invalidtitle-knownnamespace")
                .param(ns.id().to_string())
                .param(name)
                .param(text)
                .text()
        } else {
            language
                .msg("invalidtitle-unknownnamespace")
                .param(ns.id().to_string())
                .param(text)
                .text()
        }
    }

    /// Rewrites a special page title to its canonical localized name,
    /// keeping the fragment. Other titles are returned unchanged.
    pub fn normalise_special_page(&self, title: &Title) -> Title {
        if !title.is_special_page() {
            return title.clone();
        }
        match self.site.special_pages().resolve_alias(title.dbkey()) {
            Some((name, subpage)) => self
                .site
                .special_title(name, subpage.as_deref())
                .with_fragment(title.fragment()),
            None => title.clone(),
        }
    }

    /// `<img>` for an external image URL; the alt text defaults to the
    /// file name part of the URL.
    pub fn make_external_image(&self, url: &str, alt: &str) -> String {
        let alt = if alt.is_empty() {
            url.rsplit_once('/').map_or(url, |(_, name)| name)
        } else {
            alt
        };
        raw_element("img", &Attribs::new().with("src", url).with("alt", alt), "")
    }

    /// Anchor to an external URL with `external` classes.
    ///
    /// `rel="nofollow"` is added unless disabled for the site, for the
    /// namespace of `title` (or the current page) or for the URL's domain.
    pub fn make_external_link(
        &self,
        url: &str,
        text: &str,
        escape_text: bool,
        link_type: &str,
        attribs: &Attribs,
        title: Option<&Title>,
    ) -> String {
        let mut class = "external".to_string();
        if !link_type.is_empty() {
            class.push(' ');
            class.push_str(link_type);
        }
        if let Some(custom) = attribs.get("class")
            && !custom.is_empty()
        {
            class.push(' ');
            class.push_str(custom);
        }

        let mut attribs = attribs.clone();
        attribs.set("class", class);
        match self.external_link_rel(url, title.or(self.current_title)) {
            Some(rel) => attribs.set("rel", rel),
            None => attribs.suppress("rel"),
        }
        attribs.set("href", url);

        let text = if escape_text {
            escape(text)
        } else {
            text.to_string()
        };
        raw_element("a", &attribs, &text)
    }

    pub(crate) fn external_link_rel(&self, url: &str, title: Option<&Title>) -> Option<&'static str> {
        let config = self.site.config();
        let ns_exempt = title.is_some_and(|t| config.no_follow_ns_exceptions.contains(&t.namespace()));
        let domain_exempt = url_matches_domains(url, &config.no_follow_domain_exceptions);
        (config.no_follow_links && !ns_exempt && !domain_exempt).then_some("nofollow")
    }

    /// Known link to a special page labelled with message `key` (default:
    /// the lowercased page name).
    pub fn special_link(&self, name: &str, key: Option<&str>) -> String {
        let key = key.map_or_else(|| name.to_lowercase(), str::to_string);
        let text = self.site.language().msg(&key).escaped();
        let target = self.site.special_title(name, None);
        self.link_known(&target, Some(&text), &Attribs::new(), &Query::new())
    }
}

fn link_attributes_internal(title: &str, class: &str) -> String {
    let mut out = String::new();
    if !class.is_empty() {
        out.push_str(&format!(" class=\"{}\"", escape(class)));
    }
    if !title.is_empty() {
        out.push_str(&format!(" title=\"{}\"", escape(title)));
    }
    out
}

fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether the host of `url` is one of `domains` or a subdomain of one.
fn url_matches_domains(url: &str, domains: &[String]) -> bool {
    let rest = url.split_once("//").map_or(url, |(_, rest)| rest);
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .rsplit('@')
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .to_lowercase();
    domains.iter().any(|domain| {
        let domain = domain.to_lowercase();
        host == domain || host.ends_with(&format!(".{domain}"))
    })
}
