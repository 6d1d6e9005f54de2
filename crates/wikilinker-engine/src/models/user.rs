use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::title::Title;

/// The user a page is being rendered for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewer {
    pub rights: BTreeSet<String>,
    /// Pages shorter than this many bytes are shown as stubs; 0 disables.
    pub stub_threshold: u64,
    pub can_send_email: bool,
    pub edit_token: String,
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_right(mut self, right: &str) -> Self {
        self.rights.insert(right.to_string());
        self
    }

    pub fn with_stub_threshold(mut self, threshold: u64) -> Self {
        self.stub_threshold = threshold;
        self
    }

    pub fn with_email(mut self) -> Self {
        self.can_send_email = true;
        self
    }

    pub fn with_edit_token(mut self, token: &str) -> Self {
        self.edit_token = token.to_string();
        self
    }

    pub fn is_allowed(&self, right: &str) -> bool {
        self.rights.contains(right)
    }
}

/// Edit count lookups for registered users.
pub trait UserDirectory {
    fn edit_count(&self, user_id: u64) -> Option<u64>;
}

/// Directory that knows no users.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUsers;

impl UserDirectory for NoUsers {
    fn edit_count(&self, _user_id: u64) -> Option<u64> {
        None
    }
}

/// Edit counts keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct UserIndex {
    edit_counts: BTreeMap<u64, u64>,
}

impl UserIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, user_id: u64, edits: u64) -> Self {
        self.edit_counts.insert(user_id, edits);
        self
    }
}

impl UserDirectory for UserIndex {
    fn edit_count(&self, user_id: u64) -> Option<u64> {
        self.edit_counts.get(&user_id).copied()
    }
}

/// Request state that affects rollback links.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Page being viewed.
    pub title: Title,
    /// The request asked for bot-flagged edits.
    pub bot: bool,
}

impl RequestContext {
    pub fn new(title: Title) -> Self {
        Self { title, bot: false }
    }

    pub fn with_bot(mut self, bot: bool) -> Self {
        self.bot = bot;
        self
    }
}
