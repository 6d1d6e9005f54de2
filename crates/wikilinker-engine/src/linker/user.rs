use super::{LinkOptions, Linker};
use crate::html::{Attribs, escape};
use crate::models::Revision;
use crate::title::Namespace;
use crate::url::Query;

impl Linker<'_> {
    /// Leave out the block link.
    pub const TOOL_LINKS_NOBLOCK: u8 = 1;
    /// Add an e-mail link for registered users.
    pub const TOOL_LINKS_EMAIL: u8 = 2;

    /// Link to a user page, or to the contributions of an anonymous user.
    pub fn user_link(&self, user_id: u64, user_name: &str, alt_name: Option<&str>) -> String {
        let page = if user_id == 0 {
            self.site.special_title("Contributions", Some(user_name))
        } else {
            self.site.make_title(Namespace::USER, user_name)
        };
        let text = escape(alt_name.unwrap_or(user_name));
        self.link(
            &page,
            Some(&text),
            &Attribs::new().with("class", "mw-userlink"),
            &Query::new(),
            LinkOptions::default(),
        )
    }

    /// `(talk | contribs | block)` links after a user name.
    ///
    /// With `red_contribs` the contributions link is shown as missing for
    /// users without edits; `edits` skips the edit count lookup.
    pub fn user_tool_links(
        &self,
        user_id: u64,
        user_text: &str,
        red_contribs: bool,
        flags: u8,
        edits: Option<u64>,
    ) -> String {
        let config = self.site.config();
        let language = self.site.language();
        let talkable = !(config.disable_anon_talk && user_id == 0);
        let blockable = flags & Self::TOOL_LINKS_NOBLOCK == 0;
        let add_email = flags & Self::TOOL_LINKS_EMAIL != 0 && user_id != 0;

        let mut items = Vec::new();
        if talkable {
            items.push(self.user_talk_link(user_id, user_text));
        }
        if user_id != 0 {
            let mut attribs = Attribs::new();
            if red_contribs {
                let edits = edits.or_else(|| self.users.edit_count(user_id));
                if edits == Some(0) {
                    attribs.set("class", "new");
                }
            }
            let contribs = self.site.special_title("Contributions", Some(user_text));
            let text = language.msg("contribslink").escaped();
            items.push(self.link(&contribs, Some(&text), &attribs, &Query::new(), LinkOptions::default()));
        }
        if blockable && self.viewer.is_allowed("block") {
            items.push(self.block_link(user_id, user_text));
        }
        if add_email && self.viewer.can_send_email {
            items.push(self.email_link(user_id, user_text));
        }

        if items.is_empty() {
            return String::new();
        }
        format!(
            "{}<span class=\"mw-usertoollinks\">{}</span>",
            language.msg("word-separator").plain(),
            language
                .msg("parentheses")
                .raw_param(language.pipe_list(&items))
                .escaped()
        )
    }

    /// [`Linker::user_tool_links`] with red contributions links.
    pub fn user_tool_links_red_contribs(&self, user_id: u64, user_text: &str, edits: Option<u64>) -> String {
        self.user_tool_links(user_id, user_text, true, 0, edits)
    }

    pub fn user_talk_link(&self, _user_id: u64, user_text: &str) -> String {
        let page = self.site.make_title(Namespace::USER_TALK, user_text);
        let text = self.site.language().msg("talkpagelinktext").escaped();
        self.simple_link(&page, Some(&text))
    }

    pub fn block_link(&self, _user_id: u64, user_text: &str) -> String {
        let page = self.site.special_title("Block", Some(user_text));
        let text = self.site.language().msg("blocklink").escaped();
        self.simple_link(&page, Some(&text))
    }

    pub fn email_link(&self, _user_id: u64, user_text: &str) -> String {
        let page = self.site.special_title("Emailuser", Some(user_text));
        let text = self.site.language().msg("emaillink").escaped();
        self.simple_link(&page, Some(&text))
    }

    /// User link for a revision, hidden when the user name was deleted and
    /// the viewer may not see it (or `is_public` is set).
    pub fn rev_user_link(&self, rev: &Revision, is_public: bool) -> String {
        let link = if self.can_show_rev_user(rev, is_public) {
            self.user_link(rev.user_id, &rev.user_text, None)
        } else {
            self.site.language().msg("rev-deleted-user").escaped()
        };
        if rev.is_deleted(Revision::DELETED_USER) {
            format!("<span class=\"history-deleted\">{link}</span>")
        } else {
            link
        }
    }

    /// [`Linker::rev_user_link`] followed by the user tool links.
    pub fn rev_user_tools(&self, rev: &Revision, is_public: bool) -> String {
        let link = if self.can_show_rev_user(rev, is_public) {
            format!(
                "{}{}{}",
                self.user_link(rev.user_id, &rev.user_text, None),
                self.site.language().msg("word-separator").plain(),
                self.user_tool_links(rev.user_id, &rev.user_text, false, 0, None)
            )
        } else {
            self.site.language().msg("rev-deleted-user").escaped()
        };
        if rev.is_deleted(Revision::DELETED_USER) {
            format!(" <span class=\"history-deleted\">{link}</span>")
        } else {
            link
        }
    }

    fn can_show_rev_user(&self, rev: &Revision, is_public: bool) -> bool {
        if is_public && rev.is_deleted(Revision::DELETED_USER) {
            return false;
        }
        rev.user_can(Revision::DELETED_USER, self.viewer)
    }
}
