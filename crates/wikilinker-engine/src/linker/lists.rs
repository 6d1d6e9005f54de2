use super::{LinkOptions, Linker};
use crate::html::{Attribs, escape};
use crate::title::Title;
use crate::url::Query;

/// Trailing "More..." entry of a templates list.
#[derive(Debug, Clone, PartialEq)]
pub enum MoreLink {
    /// Link to this page labelled with the `moredotdotdot` message.
    Title(Title),
    /// Ready-made HTML.
    Html(String),
}

impl Linker<'_> {
    /// The "templates used on this page" box shown below edit forms.
    ///
    /// Templates are listed sorted, each with an edit (or view source) link
    /// and its protection level. Nothing is rendered for an empty list.
    pub fn format_templates(
        &self,
        templates: &[Title],
        preview: bool,
        section: bool,
        more: Option<&MoreLink>,
    ) -> String {
        if templates.is_empty() {
            return String::new();
        }
        let language = self.site.language();

        let key = if preview {
            "templatesusedpreview"
        } else if section {
            "templatesusedsection"
        } else {
            "templatesused"
        };
        let mut out = format!(
            "<div class=\"mw-templatesUsedExplanation\">{}</div><ul>\n",
            language
                .msg(key)
                .num_param(templates.len() as i64)
                .parse_as_block()
        );

        let mut sorted = templates.to_vec();
        sorted.sort();
        for template in &sorted {
            let status = self.pages.status(template);
            let protected = match &status {
                Some(s) if s.is_restricted_to("sysop") => language.msg("template-protected").parse(),
                Some(s) if s.is_restricted_to("autoconfirmed") => {
                    language.msg("template-semiprotected").parse()
                }
                _ => String::new(),
            };
            let can_edit = status.unwrap_or_default().user_can_edit(self.viewer);
            let edit_text = language
                .msg(if can_edit { "editlink" } else { "viewsourcelink" })
                .text();
            let edit_link = self.link(
                template,
                Some(&edit_text),
                &Attribs::new(),
                &Query::new().with("action", "edit"),
                LinkOptions::default(),
            );
            let separator = language.msg("word-separator").escaped();
            out.push_str(&format!(
                "<li>{}{separator}{}{separator}{protected}</li>",
                self.simple_link(template, None),
                language.msg("parentheses").raw_param(edit_link).escaped(),
            ));
        }

        match more {
            Some(MoreLink::Title(title)) => {
                let text = language.msg("moredotdotdot").parse();
                out.push_str(&format!("<li>{}</li>", self.simple_link(title, Some(&text))));
            }
            Some(MoreLink::Html(html)) if !html.is_empty() => {
                out.push_str(&format!("<li>{html}</li>"));
            }
            _ => {}
        }

        out.push_str("</ul>");
        out
    }

    /// The "hidden categories" box. Hidden categories always exist, so
    /// their links are not looked up.
    pub fn format_hidden_categories(&self, categories: &[Title]) -> String {
        if categories.is_empty() {
            return String::new();
        }
        let mut out = format!(
            "<div class=\"mw-hiddenCategoriesExplanation\">{}</div><ul>\n",
            self.site
                .language()
                .msg("hiddencategories")
                .num_param(categories.len() as i64)
                .parse_as_block()
        );
        for category in categories {
            let link = self.link(category, None, &Attribs::new(), &Query::new(), LinkOptions::known());
            out.push_str(&format!("<li>{link}</li>\n"));
        }
        out.push_str("</ul>");
        out
    }

    /// Byte count with a unit (`12 KB`), escaped for HTML.
    pub fn format_size(&self, size: u64) -> String {
        escape(&self.site.language().format_size(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Viewer;
    use crate::tests::{english_site, sample_pages};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_lists_render_nothing() {
        let site = english_site();
        let pages = sample_pages();
        let viewer = Viewer::new();
        let linker = Linker::new(&site, &pages, &viewer);
        assert_eq!(linker.format_templates(&[], false, false, None), "");
        assert_eq!(linker.format_hidden_categories(&[]), "");
    }

    #[test]
    fn hidden_categories_are_known_links() {
        let site = english_site();
        let pages = sample_pages();
        let viewer = Viewer::new();
        let linker = Linker::new(&site, &pages, &viewer);
        let hidden = site.new_title("Category:Maintenance").unwrap();
        assert_eq!(
            linker.format_hidden_categories(&[hidden]),
            "<div class=\"mw-hiddenCategoriesExplanation\"><p>This page is a member of 1 hidden category:\n</p></div><ul>\n<li><a href=\"/wiki/Category:Maintenance\" title=\"Category:Maintenance\">Category:Maintenance</a></li>\n</ul>"
        );
    }

    #[test]
    fn sizes_use_units() {
        let site = english_site();
        let pages = sample_pages();
        let viewer = Viewer::new();
        let linker = Linker::new(&site, &pages, &viewer);
        assert_eq!(linker.format_size(512), "512 B");
        assert_eq!(linker.format_size(3 * 1024 * 1024), "3 MB");
    }
}
