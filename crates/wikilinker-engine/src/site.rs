use crate::config::LinkerConfig;
use crate::language::{Language, LanguageError};
use crate::title::{Namespace, Namespaces, SpecialPages, Title, TitleError, parser};

/// Everything about one wiki that title handling needs: rendering settings,
/// content language, namespace table and special page registry.
#[derive(Debug, Clone)]
pub struct Site {
    config: LinkerConfig,
    language: Language,
    namespaces: Namespaces,
    special_pages: SpecialPages,
}

impl Site {
    /// Builds a site using the compiled-in bundle for `config.language`.
    pub fn new(config: LinkerConfig) -> Result<Self, LanguageError> {
        let language = Language::builtin(&config.language)?;
        Ok(Self::with_language(config, language))
    }

    pub fn with_language(config: LinkerConfig, language: Language) -> Self {
        let language = language.with_site_name(&config.sitename);
        let namespaces = Namespaces::new(&language, &config.meta_namespace());
        let special_pages = SpecialPages::new(&language);
        log::debug!(
            "Site '{}' ready with language '{}'",
            config.sitename,
            language.code()
        );
        Self {
            config,
            language,
            namespaces,
            special_pages,
        }
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    pub fn special_pages(&self) -> &SpecialPages {
        &self.special_pages
    }

    /// Parses user-supplied title text in the main namespace.
    pub fn new_title(&self, text: &str) -> Result<Title, TitleError> {
        self.new_title_in(text, Namespace::MAIN)
    }

    pub fn new_title_in(&self, text: &str, default_ns: Namespace) -> Result<Title, TitleError> {
        parser::parse(text, default_ns, &self.namespaces, &self.config)
    }

    /// Builds a title without validation.
    pub fn make_title(&self, ns: Namespace, dbkey: &str) -> Title {
        Title::from_parts(ns, self.namespaces.name(ns), dbkey, "", "")
    }

    /// Builds and validates a title, returning `None` when it is invalid.
    ///
    /// `text` is a page name within `ns`: a prefix in it such as `User:`
    /// stays part of the name unless `ns` is the main namespace.
    pub fn make_title_safe(&self, ns: Namespace, text: &str, fragment: &str) -> Option<Title> {
        let mut full = match self.namespaces.name(ns) {
            "" => text.to_string(),
            ns_name => format!("{ns_name}:{text}"),
        };
        if !fragment.is_empty() {
            full.push('#');
            full.push_str(fragment);
        }
        match parser::parse(&full, ns, &self.namespaces, &self.config) {
            Ok(title) => Some(title),
            Err(err) => {
                log::debug!("Rejected title {full:?} in namespace {}: {err}", ns.id());
                None
            }
        }
    }

    /// Title of a special page under its localized name.
    pub fn special_title(&self, name: &str, subpage: Option<&str>) -> Title {
        let local = self
            .special_pages
            .local_name(name, subpage.map(|s| s.replace(' ', "_")).as_deref());
        self.make_title(Namespace::SPECIAL, &local)
    }

    /// Whether `title` is the special page `canonical`, under any alias.
    pub fn is_special(&self, title: &Title, canonical: &str) -> bool {
        title.is_special_page()
            && self
                .special_pages
                .resolve_alias(title.dbkey())
                .is_some_and(|(name, _)| name.eq_ignore_ascii_case(canonical))
    }
}
