use serde::{Deserialize, Serialize};

use super::Linker;
use crate::language::Language;

/// One entry of a page's section tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocSection {
    /// Nesting depth, starting at 1.
    #[serde(alias = "toclevel")]
    pub level: u32,
    /// Headline HTML.
    pub line: String,
    /// Outline number such as `2.1`.
    pub number: String,
    pub anchor: String,
    /// Section index used for `tocsection-N`; `T-` prefixed for transcluded
    /// sections.
    #[serde(default)]
    pub index: Option<String>,
}

impl TocSection {
    pub fn new(level: u32, line: &str, number: &str, anchor: &str) -> Self {
        Self {
            level,
            line: line.to_string(),
            number: number.to_string(),
            anchor: anchor.to_string(),
            index: None,
        }
    }

    pub fn with_index(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }
}

impl Linker<'_> {
    /// Opens a TOC sublevel.
    pub fn toc_indent() -> &'static str {
        "\n<ul>"
    }

    /// Closes the current line and `level` sublevels.
    pub fn toc_unindent(level: usize) -> String {
        format!("</li>\n{}", "</ul>\n</li>\n".repeat(level))
    }

    pub fn toc_line(anchor: &str, tocline: &str, tocnumber: &str, level: u32, section_index: Option<&str>) -> String {
        let mut classes = format!("toclevel-{level}");
        if let Some(index) = section_index {
            classes.push_str(&format!(" tocsection-{index}"));
        }
        format!(
            "\n<li class=\"{classes}\"><a href=\"#{anchor}\"><span class=\"tocnumber\">{tocnumber}</span> <span class=\"toctext\">{tocline}</span></a>"
        )
    }

    pub fn toc_line_end() -> &'static str {
        "</li>\n"
    }

    /// Wraps list markup in the TOC table. The heading uses `lang`, or the
    /// site language.
    pub fn toc_list(&self, toc: &str, lang: Option<&Language>) -> String {
        let title = lang.unwrap_or(self.site.language()).msg("toc").escaped();
        format!(
            "<table id=\"toc\" class=\"toc\"><tr><td><div id=\"toctitle\"><h2>{title}</h2></div>\n{toc}</ul>\n</td></tr></table>\n"
        )
    }

    /// Full TOC table for a section tree; empty when there are no sections.
    ///
    /// A section may only be one level deeper than the one before it. Deeper
    /// jumps are nested as a single level so every `<ul>` and `<li>` stays
    /// balanced; the `toclevel-N` class keeps the declared level.
    pub fn generate_toc(&self, sections: &[TocSection]) -> String {
        if sections.is_empty() {
            return String::new();
        }

        let mut toc = String::new();
        let mut last_level = 0usize;
        for section in sections {
            let level = (section.level.max(1) as usize).min(last_level + 1);
            if level > last_level {
                toc.push_str(Self::toc_indent());
            } else if level < last_level {
                toc.push_str(&Self::toc_unindent(last_level - level));
            } else {
                toc.push_str(Self::toc_line_end());
            }
            toc.push_str(&Self::toc_line(
                &section.anchor,
                &section.line,
                &section.number,
                section.level,
                section.index.as_deref(),
            ));
            last_level = level;
        }
        toc.push_str(&Self::toc_unindent(last_level - 1));
        self.toc_list(&toc, None)
    }

    /// `<hN>` headline with an edit link and the anchor on the headline
    /// span. `attribs` is everything after the tag name, up to and
    /// including `>`.
    pub fn make_headline(
        level: u8,
        attribs: &str,
        anchor: &str,
        html: &str,
        link: &str,
        legacy_anchor: Option<&str>,
    ) -> String {
        let headline = format!(
            "<h{level}{attribs}{link} <span class=\"mw-headline\" id=\"{anchor}\">{html}</span></h{level}>"
        );
        match legacy_anchor {
            Some(legacy) => format!("<div id=\"{legacy}\"></div>{headline}"),
            None => headline,
        }
    }
}
