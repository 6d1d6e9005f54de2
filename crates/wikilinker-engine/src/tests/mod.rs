use crate::config::LinkerConfig;
use crate::models::{FileIndex, MediaFile, PageIndex, PageStatus};
use crate::site::Site;


/// English site named OSHWiki with a `wikipedia` interwiki prefix
pub fn english_site() -> Site {
    let mut config = LinkerConfig {
        sitename: "OSHWiki".to_string(),
        ..LinkerConfig::default()
    };
    config.interwiki.insert(
        "wikipedia".to_string(),
        "https://en.wikipedia.org/wiki/$1".to_string(),
    );
    Site::new(config).unwrap()
}

/// Same site with Tetun as its content language
pub fn tetun_site() -> Site {
    let config = LinkerConfig {
        sitename: "OSHWiki".to_string(),
        language: "tet".to_string(),
        ..LinkerConfig::default()
    };
    Site::new(config).unwrap()
}

/// Existing pages: articles of various lengths, a redirect, protected
/// templates and a user page
pub fn sample_pages() -> PageIndex {
    PageIndex::new()
        .with("Main_Page", PageStatus::new(5200))
        .with("Safety_data_sheet", PageStatus::new(12000))
        .with("SDS", PageStatus::new(40).redirect())
        .with("Noise", PageStatus::new(300))
        .with("Help:Getting_started", PageStatus::new(800))
        .with("User:Alice", PageStatus::new(150))
        .with("Template:Warning", PageStatus::new(900).restricted_to("sysop"))
        .with("Template:Caution", PageStatus::new(700).restricted_to("autoconfirmed"))
        .with("Template:Infobox", PageStatus::new(2400))
}

/// One bitmap, one vector file and a redirect to the bitmap
pub fn sample_files() -> FileIndex {
    FileIndex::new()
        .with(MediaFile::new("Warning sign.png", "/images/a/a1/Warning_sign.png", 600, 450))
        .with(MediaFile::new("Logo.svg", "/images/5/5e/Logo.svg", 200, 100).vectorized())
        .with_redirect("Old sign.png", "Warning sign.png")
}
