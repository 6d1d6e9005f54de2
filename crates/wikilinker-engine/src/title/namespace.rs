use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::language::Language;

/// A wiki namespace number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(pub i32);

impl Namespace {
    pub const MEDIA: Namespace = Namespace(-2);
    pub const SPECIAL: Namespace = Namespace(-1);
    pub const MAIN: Namespace = Namespace(0);
    pub const TALK: Namespace = Namespace(1);
    pub const USER: Namespace = Namespace(2);
    pub const USER_TALK: Namespace = Namespace(3);
    pub const PROJECT: Namespace = Namespace(4);
    pub const PROJECT_TALK: Namespace = Namespace(5);
    pub const FILE: Namespace = Namespace(6);
    pub const FILE_TALK: Namespace = Namespace(7);
    pub const MEDIAWIKI: Namespace = Namespace(8);
    pub const MEDIAWIKI_TALK: Namespace = Namespace(9);
    pub const TEMPLATE: Namespace = Namespace(10);
    pub const TEMPLATE_TALK: Namespace = Namespace(11);
    pub const HELP: Namespace = Namespace(12);
    pub const HELP_TALK: Namespace = Namespace(13);
    pub const CATEGORY: Namespace = Namespace(14);
    pub const CATEGORY_TALK: Namespace = Namespace(15);

    /// Bundle key, canonical name, namespace.
    const TABLE: &'static [(&'static str, &'static str, Namespace)] = &[
        ("media", "Media", Namespace::MEDIA),
        ("special", "Special", Namespace::SPECIAL),
        ("main", "", Namespace::MAIN),
        ("talk", "Talk", Namespace::TALK),
        ("user", "User", Namespace::USER),
        ("user_talk", "User_talk", Namespace::USER_TALK),
        ("project", "Project", Namespace::PROJECT),
        ("project_talk", "Project_talk", Namespace::PROJECT_TALK),
        ("file", "File", Namespace::FILE),
        ("file_talk", "File_talk", Namespace::FILE_TALK),
        ("mediawiki", "MediaWiki", Namespace::MEDIAWIKI),
        ("mediawiki_talk", "MediaWiki_talk", Namespace::MEDIAWIKI_TALK),
        ("template", "Template", Namespace::TEMPLATE),
        ("template_talk", "Template_talk", Namespace::TEMPLATE_TALK),
        ("help", "Help", Namespace::HELP),
        ("help_talk", "Help_talk", Namespace::HELP_TALK),
        ("category", "Category", Namespace::CATEGORY),
        ("category_talk", "Category_talk", Namespace::CATEGORY_TALK),
    ];

    pub fn id(self) -> i32 {
        self.0
    }

    /// Resolves a language bundle key such as `user_talk`.
    pub fn from_key(key: &str) -> Option<Namespace> {
        Self::TABLE
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, _, ns)| *ns)
    }

    /// The English name used in every language, if this is a core namespace.
    pub fn canonical_name(self) -> Option<&'static str> {
        Self::TABLE
            .iter()
            .find(|(_, _, ns)| *ns == self)
            .map(|(_, name, _)| *name)
    }

    pub fn is_talk(self) -> bool {
        self.0 > 0 && self.0 % 2 == 1
    }

    pub fn subject(self) -> Namespace {
        if self.is_talk() {
            Namespace(self.0 - 1)
        } else {
            self
        }
    }
}

/// Namespace names of one site, in the content language.
#[derive(Debug, Clone)]
pub struct Namespaces {
    names: BTreeMap<Namespace, String>,
    lookup: HashMap<String, Namespace>,
}

impl Namespaces {
    /// Builds the table from the content language and the project name.
    ///
    /// `$1` in a localized name (usually the project talk namespace) is
    /// replaced by `meta_namespace`.
    pub fn new(language: &Language, meta_namespace: &str) -> Self {
        let meta = meta_namespace.replace(' ', "_");
        let mut names = BTreeMap::new();
        for (_, canonical, ns) in Namespace::TABLE {
            let localized = match *ns {
                Namespace::PROJECT => meta.clone(),
                _ => language
                    .namespace_name(*ns)
                    .map(|name| name.replace("$1", &meta))
                    .unwrap_or_else(|| canonical.to_string()),
            };
            names.insert(*ns, localized);
        }

        let mut lookup = HashMap::new();
        for (_, canonical, ns) in Namespace::TABLE {
            if !canonical.is_empty() {
                lookup.insert(fold(canonical), *ns);
            }
        }
        for (alias, ns) in language.namespace_aliases() {
            lookup.insert(fold(&alias), ns);
        }
        for (ns, name) in &names {
            if !name.is_empty() {
                lookup.insert(fold(name), *ns);
            }
        }

        Self { names, lookup }
    }

    /// Localized name in key form (underscores), empty for the main namespace.
    pub fn name(&self, ns: Namespace) -> &str {
        self.names.get(&ns).map(String::as_str).unwrap_or("")
    }

    /// Localized name for display (spaces).
    pub fn formatted_name(&self, ns: Namespace) -> String {
        self.name(ns).replace('_', " ")
    }

    pub fn exists(&self, ns: Namespace) -> bool {
        self.names.contains_key(&ns)
    }

    /// Case-insensitive lookup of a namespace prefix.
    pub fn lookup(&self, prefix: &str) -> Option<Namespace> {
        self.lookup.get(&fold(prefix)).copied()
    }
}

fn fold(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn talk_namespaces_are_odd() {
        assert!(Namespace::USER_TALK.is_talk());
        assert!(!Namespace::USER.is_talk());
        assert!(!Namespace::SPECIAL.is_talk());
        assert_eq!(Namespace::CATEGORY_TALK.subject(), Namespace::CATEGORY);
    }

    #[test]
    fn tetun_names_and_canonical_aliases_resolve() {
        let tet = Language::builtin("tet").unwrap();
        let namespaces = Namespaces::new(&tet, "OSHWiki");

        assert_eq!(namespaces.name(Namespace::USER), "Uza-na'in");
        assert_eq!(namespaces.name(Namespace::PROJECT), "OSHWiki");
        assert_eq!(namespaces.name(Namespace::PROJECT_TALK), "Diskusaun_OSHWiki");
        assert_eq!(namespaces.formatted_name(Namespace::FILE_TALK), "Diskusaun Imajen");

        assert_eq!(namespaces.lookup("espesiál"), Some(Namespace::SPECIAL));
        assert_eq!(namespaces.lookup("Special"), Some(Namespace::SPECIAL));
        assert_eq!(namespaces.lookup("Image"), Some(Namespace::FILE));
        assert_eq!(namespaces.lookup("Diskusaun Kategoría"), Some(Namespace::CATEGORY_TALK));
        assert_eq!(namespaces.lookup("Nowhere"), None);
    }
}
