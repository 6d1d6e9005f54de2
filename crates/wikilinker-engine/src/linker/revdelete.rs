use super::{LinkOptions, Linker};
use crate::html::{Attribs, raw_element};
use crate::models::Revision;
use crate::title::Title;
use crate::url::Query;

impl Linker<'_> {
    /// Revision deletion link for `rev`, a disabled one when the revision
    /// is suppressed beyond the viewer's rights, or nothing when the viewer
    /// can neither hide revisions nor see deleted ones.
    ///
    /// Revisions are addressed by id; archived entries without one fall
    /// back to their timestamp.
    pub fn rev_delete_link_for(&self, rev: &Revision, title: &Title) -> String {
        let can_hide = self.viewer.is_allowed("deleterevision");
        if !can_hide && !(rev.visibility() != 0 && self.viewer.is_allowed("deletedhistory")) {
            return String::new();
        }

        if !rev.user_can(Revision::DELETED_RESTRICTED, self.viewer) {
            return self.rev_delete_link_disabled(can_hide);
        }

        let query = match rev.id {
            Some(id) => Query::new()
                .with("type", "revision")
                .with("target", title.prefixed_dbkey())
                .with("ids", id.to_string()),
            None => Query::new()
                .with("type", "archive")
                .with("target", title.prefixed_dbkey())
                .with("ids", rev.timestamp.as_str()),
        };
        self.rev_delete_link(&query, rev.is_deleted(Revision::DELETED_RESTRICTED), can_hide)
    }

    /// `(show/hide)` link to the revision deletion page; `restricted`
    /// renders it in bold, `delete = false` shows only `(show)`.
    pub fn rev_delete_link(&self, query: &Query, restricted: bool, delete: bool) -> String {
        let language = self.site.language();
        let html = language.msg(delete_message(delete)).escaped();
        let target = self.site.special_title("Revisiondelete", None);
        let link = self.link(&target, Some(&html), &Attribs::new(), query, LinkOptions::known_noclasses());
        let tag = if restricted { "strong" } else { "span" };
        raw_element(
            tag,
            &Attribs::new().with("class", "mw-revdelundel-link"),
            &language.msg("parentheses").raw_param(link).escaped(),
        )
    }

    /// Greyed-out variant of [`Linker::rev_delete_link`].
    pub fn rev_delete_link_disabled(&self, delete: bool) -> String {
        let language = self.site.language();
        let html = language.msg(delete_message(delete)).escaped();
        raw_element(
            "span",
            &Attribs::new().with("class", "mw-revdelundel-link"),
            &language.msg("parentheses").raw_param(html).escaped(),
        )
    }
}

fn delete_message(delete: bool) -> &'static str {
    if delete { "rev-delundel" } else { "rev-showdeleted" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Viewer;
    use crate::tests::{english_site, sample_pages};
    use pretty_assertions::assert_eq;

    #[test]
    fn readers_get_nothing() {
        let site = english_site();
        let pages = sample_pages();
        let viewer = Viewer::new();
        let linker = Linker::new(&site, &pages, &viewer);
        let page = site.new_title("Noise").unwrap();
        let rev = Revision::new(page.clone(), 1, "Alice").with_id(42);
        assert_eq!(linker.rev_delete_link_for(&rev, &page), "");
    }

    #[test]
    fn admins_link_by_revision_id() {
        let site = english_site();
        let pages = sample_pages();
        let viewer = Viewer::new().with_right("deleterevision");
        let linker = Linker::new(&site, &pages, &viewer);
        let page = site.new_title("Noise").unwrap();
        let rev = Revision::new(page.clone(), 1, "Alice").with_id(42);
        assert_eq!(
            linker.rev_delete_link_for(&rev, &page),
            "<span class=\"mw-revdelundel-link\">(<a href=\"/index.php?title=Special:RevisionDelete&amp;type=revision&amp;target=Noise&amp;ids=42\" title=\"Special:RevisionDelete\">show/hide</a>)</span>"
        );
    }

    #[test]
    fn archived_revisions_use_timestamp() {
        let site = english_site();
        let pages = sample_pages();
        let viewer = Viewer::new().with_right("deleterevision");
        let linker = Linker::new(&site, &pages, &viewer);
        let page = site.new_title("Noise").unwrap();
        let rev = Revision::new(page.clone(), 1, "Alice").with_timestamp("20130102030405");
        assert!(
            linker
                .rev_delete_link_for(&rev, &page)
                .contains("type=archive&amp;target=Noise&amp;ids=20130102030405")
        );
    }

    #[test]
    fn suppressed_revisions_get_disabled_link() {
        let site = english_site();
        let pages = sample_pages();
        let viewer = Viewer::new().with_right("deletedhistory");
        let linker = Linker::new(&site, &pages, &viewer);
        let page = site.new_title("Noise").unwrap();
        let rev = Revision::new(page.clone(), 1, "Alice")
            .with_id(42)
            .with_deleted(Revision::DELETED_USER | Revision::DELETED_RESTRICTED);
        assert_eq!(
            linker.rev_delete_link_for(&rev, &page),
            "<span class=\"mw-revdelundel-link\">(show)</span>"
        );
    }
}
