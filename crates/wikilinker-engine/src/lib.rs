pub mod config;
pub mod html;
pub mod language;
pub mod linker;
pub mod models;
pub mod site;
pub mod title;
pub mod url;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use config::LinkerConfig;
pub use html::{Attribs, element, escape, raw_element};
pub use language::{Language, LanguageError, Message};
pub use linker::{
    ERROR_MARKER, ImageHtml, ImageLink, LinkOptions, Linker, MoreLink, RollbackEditCount,
    RollbackOptions, TocSection,
};
pub use models::{
    Align, FileIndex, FileRepo, FrameParams, HandlerParams, HistoryIndex, MediaFile, NoFiles,
    NoHistory, NoUsers, PageIndex, PageLookup, PageStatus, RequestContext, Revision,
    RevisionHistory, Thumbnail, UserDirectory, UserIndex, Viewer,
};
pub use site::Site;
pub use title::{Namespace, Namespaces, SpecialPages, Title, TitleError};
pub use url::{Protocol, Query};
