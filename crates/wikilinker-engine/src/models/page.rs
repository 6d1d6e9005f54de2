use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Viewer;
use crate::title::Title;

/// What the renderer needs to know about an existing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageStatus {
    /// Page length in bytes.
    pub length: u64,
    pub redirect: bool,
    /// Groups required to edit the page (`sysop`, `autoconfirmed`).
    pub edit_restrictions: Vec<String>,
}

impl PageStatus {
    pub fn new(length: u64) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    pub fn redirect(mut self) -> Self {
        self.redirect = true;
        self
    }

    pub fn restricted_to(mut self, group: &str) -> Self {
        self.edit_restrictions.push(group.to_string());
        self
    }

    pub fn is_restricted_to(&self, group: &str) -> bool {
        self.edit_restrictions.iter().any(|r| r == group)
    }

    /// Whether `viewer` may edit a page with these restrictions.
    pub fn user_can_edit(&self, viewer: &Viewer) -> bool {
        if !viewer.is_allowed("edit") {
            return false;
        }
        self.edit_restrictions.iter().all(|group| match group.as_str() {
            "sysop" => viewer.is_allowed("editprotected"),
            "autoconfirmed" => viewer.is_allowed("editsemiprotected"),
            other => viewer.is_allowed(other),
        })
    }
}

/// Page existence lookups.
pub trait PageLookup {
    /// Status of the page, `None` when it does not exist.
    fn status(&self, title: &Title) -> Option<PageStatus>;

    fn exists(&self, title: &Title) -> bool {
        self.status(title).is_some()
    }
}

/// Pages keyed by prefixed DB key (`Talk:Main_Page`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageIndex {
    pages: BTreeMap<String, PageStatus>,
}

impl PageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prefixed_dbkey: &str, status: PageStatus) -> Self {
        self.insert(prefixed_dbkey, status);
        self
    }

    pub fn insert(&mut self, prefixed_dbkey: &str, status: PageStatus) {
        self.pages
            .insert(prefixed_dbkey.replace(' ', "_"), status);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageLookup for PageIndex {
    fn status(&self, title: &Title) -> Option<PageStatus> {
        self.pages.get(&title.prefixed_dbkey()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_index_parses_from_toml() {
        let index: PageIndex = toml::from_str(
            r#"
            "Main_Page" = { length = 1200 }
            "Old name" = { length = 40, redirect = true }
            "Template:Infobox" = { length = 900, edit_restrictions = ["sysop"] }
            "#,
        )
        .unwrap();
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn restrictions_gate_editing() {
        let editor = Viewer::new().with_right("edit");
        let admin = Viewer::new()
            .with_right("edit")
            .with_right("editprotected")
            .with_right("editsemiprotected");

        let open = PageStatus::new(10);
        let protected = PageStatus::new(10).restricted_to("sysop");
        let semi = PageStatus::new(10).restricted_to("autoconfirmed");

        assert!(open.user_can_edit(&editor));
        assert!(!protected.user_can_edit(&editor));
        assert!(!semi.user_can_edit(&editor));
        assert!(protected.user_can_edit(&admin));
        assert!(!open.user_can_edit(&Viewer::new()));
    }
}
