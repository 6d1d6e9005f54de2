use super::{LinkOptions, Linker};
use crate::html::Attribs;
use crate::models::{RequestContext, Revision};
use crate::url::Query;

/// Special pages that never show rollback edit counts in miser mode.
const MISER_NO_COUNT_PAGES: [&str; 2] = ["Recentchanges", "Watchlist"];

/// Result of counting the edits a rollback would revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackEditCount {
    /// Edit counts are turned off for the site.
    Disabled,
    /// Verification failed: the author is the only contributor, or the
    /// revision to roll back to is deleted.
    Unavailable,
    Count(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollbackOptions {
    /// Only link when the rollback can succeed.
    pub verify: bool,
    /// Leave out the surrounding brackets.
    pub no_brackets: bool,
}

impl Default for RollbackOptions {
    fn default() -> Self {
        Self {
            verify: true,
            no_brackets: false,
        }
    }
}

impl Linker<'_> {
    /// `[rollback N edits]` link for the top revision of a page, or nothing
    /// when `verify` finds that the rollback cannot succeed.
    pub fn generate_rollback(&self, rev: &Revision, ctx: &RequestContext, options: RollbackOptions) -> String {
        let mut edit_count = None;
        if options.verify {
            match self.rollback_edit_count(rev, true) {
                RollbackEditCount::Unavailable => return String::new(),
                RollbackEditCount::Count(count) => edit_count = Some(count),
                RollbackEditCount::Disabled => {}
            }
        }

        let mut inner = self.build_rollback_link(rev, ctx, edit_count);
        if !options.no_brackets {
            inner = self.site.language().msg("brackets").raw_param(inner).plain();
        }
        format!("<span class=\"mw-rollback-link\">{inner}</span>")
    }

    /// Counts the consecutive latest edits by the author of `rev`, looking
    /// at most `show_rollback_edit_count + 1` revisions back.
    ///
    /// With `verify`, a page edited only by that author, or whose previous
    /// revision has deleted text or user, yields
    /// [`RollbackEditCount::Unavailable`].
    pub fn rollback_edit_count(&self, rev: &Revision, verify: bool) -> RollbackEditCount {
        let limit = self.site.config().show_rollback_edit_count;
        if limit == 0 {
            return RollbackEditCount::Disabled;
        }

        let mut edit_count = 0;
        let mut more_revs = false;
        for row in self.history.recent_revisions(&rev.title, limit as usize + 1) {
            if row.user_text != rev.user_text {
                if verify
                    && (row.deleted & Revision::DELETED_TEXT != 0
                        || row.deleted & Revision::DELETED_USER != 0)
                {
                    return RollbackEditCount::Unavailable;
                }
                more_revs = true;
                break;
            }
            edit_count += 1;
        }

        if verify && edit_count <= limit && !more_revs {
            return RollbackEditCount::Unavailable;
        }
        RollbackEditCount::Count(edit_count)
    }

    /// The rollback anchor itself, without brackets or wrapper.
    ///
    /// `edit_count` is looked up when not given. Counts above the site limit
    /// read "more than N".
    pub fn build_rollback_link(&self, rev: &Revision, ctx: &RequestContext, edit_count: Option<u32>) -> String {
        let config = self.site.config();
        let language = self.site.language();

        let mut query = Query::new()
            .with("action", "rollback")
            .with("from", rev.user_text.as_str())
            .with("token", self.viewer.edit_token.as_str());
        if ctx.bot {
            query.set("bot", "1");
            query.set("hidediff", "1");
        }

        let count_disabled = config.miser_mode
            && MISER_NO_COUNT_PAGES
                .iter()
                .any(|page| self.site.is_special(&ctx.title, page));

        let limit = config.show_rollback_edit_count;
        let html = if !count_disabled && limit > 0 {
            let edit_count = edit_count.unwrap_or_else(|| match self.rollback_edit_count(rev, false) {
                RollbackEditCount::Count(count) => count,
                _ => 0,
            });
            if edit_count > limit {
                language
                    .msg("rollbacklinkcount-morethan")
                    .num_param(i64::from(limit))
                    .parse()
            } else {
                language
                    .msg("rollbacklinkcount")
                    .num_param(i64::from(edit_count))
                    .parse()
            }
        } else {
            language.msg("rollbacklink").escaped()
        };

        let attribs = Attribs::new().with("title", language.msg("tooltip-rollback").text());
        self.link(&rev.title, Some(&html), &attribs, &query, LinkOptions::known_noclasses())
    }
}
