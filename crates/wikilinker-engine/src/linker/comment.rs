use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::{LinkOptions, Linker};
use crate::html::{Attribs, escape_allow_entities, normalize_section_name_whitespace};
use crate::models::Revision;
use crate::title::{Namespace, Title};
use crate::url::{Query, percent_decode};

fn autocomment_regex() -> &'static Regex {
    static AUTOCOMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    AUTOCOMMENT_REGEX.get_or_init(|| {
        Regex::new(r"(.*)/\*\s*(.*?)\s*\*/(.*)").expect("Invalid autocomment regex")
    })
}

fn comment_link_regex() -> &'static Regex {
    static COMMENT_LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_LINK_REGEX.get_or_init(|| {
        Regex::new(
            r"(?x)
            \[\[
            :?                          # optional leading colon
            ([^\]|]+)                   # 1: target
            (?:\|
                ((?:\]?[^\]|])*)        # 2: last piped text
            )*
            \]\]
            ([^\[]*)                    # 3: text up to the next link
            ",
        )
        .expect("Invalid comment link regex")
    })
}

fn trailing_slashes_regex() -> &'static Regex {
    static TRAILING_SLASHES_REGEX: OnceLock<Regex> = OnceLock::new();
    TRAILING_SLASHES_REGEX.get_or_init(|| Regex::new(r"/+$").expect("Invalid slash regex"))
}

impl Linker<'_> {
    /// Renders an edit summary as inline HTML.
    ///
    /// Newlines become spaces, the text is escaped (valid character
    /// references are kept), `/* section */` becomes a section link and
    /// `[[links]]` become anchors. Section links point at `title` or, with
    /// `local`, at the current page.
    pub fn format_comment(&self, comment: &str, title: Option<&Title>, local: bool) -> String {
        let comment = escape_allow_entities(&comment.replace('\n', " "));
        let comment = self.format_autocomments(&comment, title, local);
        self.format_links_in_comment(&comment, title, local)
    }

    /// Converts the `/* section */` marker of an escaped summary.
    pub fn format_autocomments(&self, comment: &str, title: Option<&Title>, local: bool) -> String {
        autocomment_regex()
            .replace_all(comment, |caps: &Captures| {
                self.autocomment(&caps[1], &caps[2], &caps[3], title, local)
            })
            .into_owned()
    }

    fn autocomment(&self, pre: &str, auto: &str, post: &str, title: Option<&Title>, local: bool) -> String {
        let language = self.site.language();
        let mut link = String::new();
        if let Some(title) = title {
            let section = auto.replace("[[:", "").replace("[[", "").replace("]]", "");
            let section = normalize_section_name_whitespace(&section);
            let section_title = if local {
                self.site.new_title(&format!("#{section}")).ok()
            } else {
                self.site
                    .make_title_safe(title.namespace(), &title.text(), &section)
            };
            if let Some(section_title) = section_title {
                link = self.link(
                    &section_title,
                    Some(language.arrow()),
                    &Attribs::new(),
                    &Query::new(),
                    LinkOptions::default().noclasses(),
                );
            }
        }

        let mut pre = pre.to_string();
        if !pre.is_empty() {
            pre.push_str(&language.msg("autocomment-prefix").escaped());
        }
        let mut auto = auto.to_string();
        if !post.is_empty() {
            auto.push_str(&language.msg("colon-separator").escaped());
        }
        format!(
            "{pre}{link}{}<span dir=\"auto\"><span class=\"autocomment\">{auto}</span>{post}</span>",
            language.dir_mark()
        )
    }

    /// Converts `[[target|text]]trail` links of an escaped summary.
    ///
    /// `[[Media:x]]` links point straight at the file. Targets that are not
    /// valid titles are left as they are.
    pub fn format_links_in_comment(&self, comment: &str, title: Option<&Title>, local: bool) -> String {
        comment_link_regex()
            .replace_all(comment, |caps: &Captures| {
                self.comment_link(caps, title, local)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn comment_link(&self, caps: &Captures, context: Option<&Title>, local: bool) -> Option<String> {
        let whole = &caps[0];
        let mut target = caps[1].to_string();
        if target.contains('%') {
            target = percent_decode(&target)
                .replace('<', "&lt;")
                .replace('>', "&gt;");
        }
        let text = match caps.get(2).map(|m| m.as_str()).filter(|t| !t.is_empty()) {
            Some(text) => text.to_string(),
            None => target.clone(),
        };
        let link_end = whole.find("]]")? + 2;

        if let Some(file_name) = self.media_link_target(&target) {
            let file_title = self.site.make_title_safe(Namespace::FILE, file_name, "")?;
            let link = self.make_media_link(&file_title, &text, None);
            return Some(format!("{link}{}", &whole[link_end..]));
        }

        let trail = self
            .site
            .language()
            .link_trail()
            .captures(&caps[3])
            .and_then(|m| m.get(1))
            .map_or("", |m| m.as_str());
        let target = target.strip_prefix(':').unwrap_or(&target);
        let (inside, rest_of_trail) = self.split_trail(trail);

        let mut link_text = text;
        let link_target = self.normalize_subpage_link(context, target, &mut link_text);
        let mut title = match self.site.new_title(&link_target) {
            Ok(title) => title,
            Err(err) => {
                log::debug!("Invalid link target {link_target:?} in comment: {err}");
                return None;
            }
        };
        if title.text().is_empty() && !title.is_external() && !local {
            if let Some(context) = context {
                title = context.with_fragment(title.fragment());
            }
        }

        let link = self.simple_link(&title, Some(&format!("{link_text}{inside}")));
        Some(format!(
            "{link}{rest_of_trail}{}",
            &whole[link_end + trail.len()..]
        ))
    }

    /// File name of a `Media:` link, accepting the canonical and the
    /// localized namespace name.
    fn media_link_target<'t>(&self, target: &'t str) -> Option<&'t str> {
        let (prefix, name) = target.split_once(':')?;
        let localized = self.site.namespaces().name(Namespace::MEDIA);
        (prefix.eq_ignore_ascii_case("Media") || prefix.eq_ignore_ascii_case(localized)).then_some(name)
    }

    /// Resolves subpage link syntax relative to `context`.
    ///
    /// - `/Sub` becomes `Context/Sub`
    /// - `/Sub/` does the same and shows `Sub` as the link text
    /// - `../` and `../Sibling` climb from `Context/Current`
    ///
    /// Only applies in namespaces with subpages. `text` is filled in when
    /// empty.
    pub fn normalize_subpage_link(&self, context: Option<&Title>, target: &str, text: &mut String) -> String {
        let Some(context) = context.filter(|c| self.site.config().has_subpages(c.namespace())) else {
            return target.to_string();
        };

        let (target, suffix) = match target.find('#') {
            Some(hash) => (&target[..hash], &target[hash..]),
            None => (target, ""),
        };
        let target = target.trim();

        if let Some(stripped) = target.strip_prefix('/') {
            // Trailing slashes are matched on the whole target, so a lone
            // `/` leaves nothing to show.
            let (shown, noslash) = match trailing_slashes_regex().find(target) {
                Some(m) => {
                    let noslash = &stripped[..m.start().saturating_sub(1)];
                    (noslash, noslash)
                }
                None => (target, stripped),
            };
            if text.is_empty() {
                *text = format!("{shown}{suffix}");
            }
            return format!("{}/{}{suffix}", context.prefixed_text(), noslash.trim());
        }

        let mut dotdot = 0;
        let mut nodotdot = target;
        while let Some(rest) = nodotdot.strip_prefix("../") {
            dotdot += 1;
            nodotdot = rest;
        }
        if dotdot == 0 {
            return target.to_string() + suffix;
        }

        let context_text = context.prefixed_text();
        let parts: Vec<&str> = context_text.split('/').collect();
        if parts.len() <= dotdot {
            return target.to_string() + suffix;
        }
        let mut ret = parts[..parts.len() - dotdot].join("/");
        let mut nodotdot = nodotdot.to_string();
        if nodotdot.ends_with('/') {
            nodotdot.pop();
            if text.is_empty() {
                *text = format!("{nodotdot}{suffix}");
            }
        }
        let nodotdot = nodotdot.trim();
        if !nodotdot.is_empty() {
            ret.push('/');
            ret.push_str(nodotdot);
        }
        ret.push_str(suffix);
        ret
    }

    /// Edit summary wrapped in `<span class="comment">(...)</span>`, or
    /// nothing for an empty (or `*`) summary.
    pub fn comment_block(&self, comment: &str, title: Option<&Title>, local: bool) -> String {
        if comment.is_empty() || comment == "*" {
            return String::new();
        }
        let formatted = self.format_comment(comment, title, local);
        let wrapped = self
            .site
            .language()
            .msg("parentheses")
            .raw_param(formatted)
            .escaped();
        format!(" <span class=\"comment\">{wrapped}</span>")
    }

    /// Comment block of a revision, respecting comment deletion.
    pub fn rev_comment(&self, rev: &Revision, local: bool, is_public: bool) -> String {
        if rev.comment.is_empty() {
            return String::new();
        }
        let hidden = (is_public && rev.is_deleted(Revision::DELETED_COMMENT))
            || !rev.user_can(Revision::DELETED_COMMENT, self.viewer);
        let block = if hidden {
            format!(
                " <span class=\"comment\">{}</span>",
                self.site.language().msg("rev-deleted-comment").escaped()
            )
        } else {
            self.comment_block(&rev.comment, Some(&rev.title), local)
        };
        if rev.is_deleted(Revision::DELETED_COMMENT) {
            format!(" <span class=\"history-deleted\">{block}</span>")
        } else {
            block
        }
    }

    /// `(1,234 bytes)` or `(empty)` for a revision size.
    pub fn format_revision_size(&self, size: u64) -> String {
        let language = self.site.language();
        let text = if size == 0 {
            language.msg("historyempty").escaped()
        } else {
            let bytes = language.msg("nbytes").num_param(size as i64).escaped();
            language.msg("parentheses").raw_param(bytes).escaped()
        };
        format!("<span class=\"history-size\">{text}</span>")
    }
}
