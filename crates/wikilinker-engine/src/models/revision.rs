use std::collections::BTreeMap;

use super::Viewer;
use crate::title::Title;

/// One page revision, as shown in histories and change lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    /// Missing for old archived entries, which are addressed by timestamp.
    pub id: Option<u64>,
    pub title: Title,
    /// 0 for anonymous edits.
    pub user_id: u64,
    pub user_text: String,
    pub comment: String,
    pub size: u64,
    pub timestamp: String,
    /// Bit field of `DELETED_*` flags.
    pub deleted: u8,
}

impl Revision {
    pub const DELETED_TEXT: u8 = 1;
    pub const DELETED_COMMENT: u8 = 2;
    pub const DELETED_USER: u8 = 4;
    pub const DELETED_RESTRICTED: u8 = 8;

    pub fn new(title: Title, user_id: u64, user_text: &str) -> Self {
        Self {
            id: None,
            title,
            user_id,
            user_text: user_text.to_string(),
            comment: String::new(),
            size: 0,
            timestamp: String::new(),
            deleted: 0,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    pub fn with_timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = timestamp.to_string();
        self
    }

    pub fn with_deleted(mut self, flags: u8) -> Self {
        self.deleted = flags;
        self
    }

    pub fn is_deleted(&self, field: u8) -> bool {
        self.deleted & field == field
    }

    /// Any deletion flag set.
    pub fn visibility(&self) -> u8 {
        self.deleted
    }

    /// Whether `viewer` may see `field` of this revision.
    pub fn user_can(&self, field: u8, viewer: &Viewer) -> bool {
        if self.deleted & field == 0 {
            return true;
        }
        let right = if self.deleted & Self::DELETED_RESTRICTED != 0 {
            "suppressrevision"
        } else if field & Self::DELETED_TEXT != 0 {
            "deletedtext"
        } else {
            "deletedhistory"
        };
        viewer.is_allowed(right)
    }
}

/// Recent history of a page, newest first.
pub trait RevisionHistory {
    fn recent_revisions(&self, page: &Title, limit: usize) -> Vec<Revision>;
}

/// History that has no revisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl RevisionHistory for NoHistory {
    fn recent_revisions(&self, _page: &Title, _limit: usize) -> Vec<Revision> {
        Vec::new()
    }
}

/// In-memory histories keyed by prefixed DB key.
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    pages: BTreeMap<String, Vec<Revision>>,
}

impl HistoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a revision as the newest one of its page.
    pub fn push(&mut self, revision: Revision) {
        self.pages
            .entry(revision.title.prefixed_dbkey())
            .or_default()
            .insert(0, revision);
    }
}

impl RevisionHistory for HistoryIndex {
    fn recent_revisions(&self, page: &Title, limit: usize) -> Vec<Revision> {
        self.pages
            .get(&page.prefixed_dbkey())
            .map(|revs| revs.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}
