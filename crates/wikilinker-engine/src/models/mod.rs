//! Data supplied to the renderer by the rest of the wiki: page existence,
//! media files, revisions, users and request state.
//!
//! Each lookup is a trait so callers can back it with whatever storage
//! they have; the in-memory `*Index` types cover tests and the CLI.

pub mod file;
pub mod page;
pub mod revision;
pub mod user;

pub use file::{Align, FileIndex, FileRepo, FrameParams, HandlerParams, MediaFile, NoFiles, Thumbnail};
pub use page::{PageIndex, PageLookup, PageStatus};
pub use revision::{HistoryIndex, NoHistory, Revision, RevisionHistory};
pub use user::{NoUsers, RequestContext, UserDirectory, UserIndex, Viewer};
