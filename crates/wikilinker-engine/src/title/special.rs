use std::collections::HashMap;

use crate::language::Language;

/// Special pages the renderer links to or recognises.
pub const CANONICAL_SPECIAL_PAGES: &[&str] = &[
    "Allpages",
    "Block",
    "Categories",
    "Contributions",
    "Emailuser",
    "Movepage",
    "Mypage",
    "Mytalk",
    "Preferences",
    "Randompage",
    "Recentchanges",
    "Revisiondelete",
    "Search",
    "Specialpages",
    "Upload",
    "Userlogin",
    "Version",
    "Watchlist",
    "Whatlinkshere",
];

/// Special page registry with the content language's aliases.
#[derive(Debug, Clone)]
pub struct SpecialPages {
    /// Case-folded alias to canonical name.
    aliases: HashMap<String, &'static str>,
    /// Canonical name to preferred localized name.
    local_names: HashMap<&'static str, String>,
}

impl SpecialPages {
    pub fn new(language: &Language) -> Self {
        let mut aliases = HashMap::new();
        let mut local_names = HashMap::new();
        for &name in CANONICAL_SPECIAL_PAGES {
            aliases.insert(fold(name), name);
            let localized = language.special_page_aliases(name);
            for alias in &localized {
                aliases.insert(fold(alias), name);
            }
            let preferred = localized
                .into_iter()
                .next()
                .unwrap_or_else(|| name.to_string());
            local_names.insert(name, preferred);
        }
        Self {
            aliases,
            local_names,
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.aliases.contains_key(&fold(name))
    }

    /// Splits `Alias/subpage` and resolves the alias to its canonical name.
    pub fn resolve_alias(&self, text: &str) -> Option<(&'static str, Option<String>)> {
        let (alias, subpage) = match text.split_once('/') {
            Some((alias, subpage)) => (alias, Some(subpage.to_string())),
            None => (text, None),
        };
        self.aliases
            .get(&fold(alias))
            .map(|&canonical| (canonical, subpage))
    }

    /// Localized page name for a canonical special page, with subpage.
    pub fn local_name(&self, name: &str, subpage: Option<&str>) -> String {
        let base = self
            .aliases
            .get(&fold(name))
            .and_then(|canonical| self.local_names.get(canonical))
            .cloned()
            .unwrap_or_else(|| name.to_string());
        match subpage {
            Some(sub) => format!("{base}/{sub}"),
            None => base,
        }
    }
}

fn fold(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SpecialPages {
        SpecialPages::new(&Language::builtin("tet").unwrap())
    }

    #[test]
    fn aliases_resolve_to_canonical_names() {
        let pages = registry();
        assert_eq!(
            pages.resolve_alias("contribs/Some_User"),
            Some(("Contributions", Some("Some_User".to_string())))
        );
        assert_eq!(pages.resolve_alias("RecentChanges"), Some(("Recentchanges", None)));
        assert_eq!(pages.resolve_alias("Nonexistent"), None);
    }

    #[test]
    fn local_name_uses_first_alias() {
        let pages = registry();
        assert_eq!(pages.local_name("Recentchanges", None), "RecentChanges");
        assert_eq!(
            pages.local_name("Contributions", Some("Some_User")),
            "Contributions/Some_User"
        );
        assert_eq!(pages.local_name("Block", None), "Block");
    }
}
