use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::title::Title;

/// An uploaded media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    /// File name in key form (`Warning_sign.png`).
    pub name: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub size: u64,
    /// Scalable formats such as SVG.
    #[serde(default)]
    pub vectorized: bool,
    /// Formats that are always rendered, even at full size.
    #[serde(default)]
    pub must_render: bool,
    #[serde(default = "default_true")]
    pub allow_inline_display: bool,
}

fn default_true() -> bool {
    true
}

impl MediaFile {
    pub fn new(name: &str, url: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.replace(' ', "_"),
            url: url.to_string(),
            width,
            height,
            size: 0,
            vectorized: false,
            must_render: false,
            allow_inline_display: true,
        }
    }

    pub fn vectorized(mut self) -> Self {
        self.vectorized = true;
        self.must_render = true;
        self
    }

    pub fn without_inline_display(mut self) -> Self {
        self.allow_inline_display = false;
        self
    }

    /// URL of a scaled copy: `<dir>/thumb/<name>/<width>px-<name>`.
    ///
    /// Vector files are rasterised, so their thumbnails get a `.png` suffix.
    pub fn thumb_url(&self, width: u32) -> String {
        let dir = self.url.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        let mut thumb_name = format!("{width}px-{}", self.name);
        if self.vectorized && !self.name.to_lowercase().ends_with(".png") {
            thumb_name.push_str(".png");
        }
        format!("{dir}/thumb/{}/{thumb_name}", self.name)
    }

    /// Dimensions scaled to fit `params`, never exceeding the requested box.
    pub fn scaled_size(&self, params: &HandlerParams) -> (u32, u32) {
        if self.width == 0 || self.height == 0 {
            return (params.width.unwrap_or(0), params.height.unwrap_or(0));
        }
        let ratio = f64::from(self.height) / f64::from(self.width);
        let mut width = params.width.unwrap_or(self.width);
        let mut height = (f64::from(width) * ratio).round() as u32;
        if let Some(max_height) = params.height
            && height > max_height
        {
            height = max_height;
            width = (f64::from(max_height) / ratio).round() as u32;
        }
        (width, height)
    }
}

/// A rendered (possibly scaled) image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Higher density variants keyed by density (`1.5`, `2`).
    pub responsive_urls: BTreeMap<String, String>,
}

impl Thumbnail {
    pub fn new(url: &str, width: u32, height: u32) -> Self {
        Self {
            url: url.to_string(),
            width,
            height,
            responsive_urls: BTreeMap::new(),
        }
    }

    /// `srcset` value, lowest density first.
    pub fn srcset(&self) -> Option<String> {
        if self.responsive_urls.is_empty() {
            return None;
        }
        let mut densities: Vec<(f64, &str, &str)> = self
            .responsive_urls
            .iter()
            .map(|(d, url)| (d.parse().unwrap_or(0.0), d.as_str(), url.as_str()))
            .collect();
        densities.sort_by(|a, b| a.0.total_cmp(&b.0));
        Some(
            densities
                .iter()
                .map(|(_, d, url)| format!("{url} {d}x"))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Image size request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Page of a multi-page document.
    pub page: Option<u32>,
}

impl HandlerParams {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    None,
    Left,
    Right,
    Center,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::None => "none",
            Align::Left => "left",
            Align::Right => "right",
            Align::Center => "center",
        }
    }

    pub fn from_name(name: &str) -> Option<Align> {
        match name {
            "none" => Some(Align::None),
            "left" => Some(Align::Left),
            "right" => Some(Align::Right),
            "center" => Some(Align::Center),
            _ => None,
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation options of an embedded image (`[[File:x|thumb|left|...]]`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameParams {
    pub align: Option<Align>,
    pub valign: Option<String>,
    pub alt: String,
    pub title: String,
    pub caption: String,
    pub class: String,
    pub thumbnail: bool,
    pub framed: bool,
    pub frameless: bool,
    pub border: bool,
    /// File whose image is used in place of a generated thumbnail.
    pub manual_thumb: Option<String>,
    /// Width factor for upright images; `Some(0.0)` means the site default.
    pub upright: Option<f64>,
    pub link_url: Option<String>,
    pub link_target: Option<String>,
    pub link_title: Option<Title>,
    pub no_link: bool,
}

/// Source of media files and their scaled renderings.
pub trait FileRepo {
    fn find_file(&self, title: &Title) -> Option<MediaFile>;

    /// The version of a file current at `timestamp`.
    fn find_file_version(&self, title: &Title, _timestamp: &str) -> Option<MediaFile> {
        self.find_file(title)
    }

    /// Target of a file redirect.
    fn check_redirect(&self, _title: &Title) -> Option<Title> {
        None
    }

    /// Scales `file` to fit `params`. Bitmaps are never scaled up.
    fn transform(&self, file: &MediaFile, params: &HandlerParams) -> Option<Thumbnail> {
        let (width, height) = file.scaled_size(params);
        if width == 0 {
            return None;
        }
        if !file.must_render && width >= file.width {
            return Some(Thumbnail::new(&file.url, file.width, file.height));
        }
        Some(Thumbnail::new(&file.thumb_url(width), width, height))
    }

    /// Thumbnail at the file's own size.
    fn unscaled_thumb(&self, file: &MediaFile, params: &HandlerParams) -> Option<Thumbnail> {
        let params = HandlerParams {
            width: Some(file.width),
            height: None,
            page: params.page,
        };
        self.transform(file, &params)
    }
}

/// Repository without files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFiles;

impl FileRepo for NoFiles {
    fn find_file(&self, _title: &Title) -> Option<MediaFile> {
        None
    }
}

/// Files keyed by name, with optional redirects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIndex {
    files: BTreeMap<String, MediaFile>,
    redirects: BTreeMap<String, String>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file: MediaFile) -> Self {
        self.files.insert(file.name.clone(), file);
        self
    }

    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects
            .insert(from.replace(' ', "_"), to.replace(' ', "_"));
        self
    }
}

impl FileRepo for FileIndex {
    fn find_file(&self, title: &Title) -> Option<MediaFile> {
        self.files.get(title.dbkey()).cloned()
    }

    fn check_redirect(&self, title: &Title) -> Option<Title> {
        self.redirects
            .get(title.dbkey())
            .map(|target| title.renamed(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{english_site, sample_files};

    #[test]
    fn bitmaps_are_not_scaled_up() {
        let repo = NoFiles;
        let file = MediaFile::new("Sign.png", "/images/a/ab/Sign.png", 400, 200);

        let small = repo.transform(&file, &HandlerParams::width(100)).unwrap();
        assert_eq!(small.url, "/images/a/ab/thumb/Sign.png/100px-Sign.png");
        assert_eq!((small.width, small.height), (100, 50));

        let large = repo.transform(&file, &HandlerParams::width(800)).unwrap();
        assert_eq!(large.url, "/images/a/ab/Sign.png");
        assert_eq!((large.width, large.height), (400, 200));
    }

    #[test]
    fn vector_files_are_always_rendered() {
        let repo = NoFiles;
        let file = MediaFile::new("Logo.svg", "/images/Logo.svg", 100, 100).vectorized();
        let thumb = repo.transform(&file, &HandlerParams::width(300)).unwrap();
        assert_eq!(thumb.url, "/images/thumb/Logo.svg/300px-Logo.svg.png");
        assert_eq!(thumb.width, 300);
    }

    #[test]
    fn height_limit_shrinks_width() {
        let file = MediaFile::new("Tall.png", "/images/Tall.png", 100, 400);
        let params = HandlerParams {
            width: Some(100),
            height: Some(200),
            page: None,
        };
        assert_eq!(file.scaled_size(&params), (50, 200));
    }

    #[test]
    fn srcset_lists_densities_in_order() {
        let mut thumb = Thumbnail::new("/a.png", 10, 10);
        thumb.responsive_urls.insert("2".into(), "/a2.png".into());
        thumb.responsive_urls.insert("1.5".into(), "/a15.png".into());
        assert_eq!(thumb.srcset().as_deref(), Some("/a15.png 1.5x, /a2.png 2x"));
    }

    #[test]
    fn file_index_finds_files_and_redirects() {
        let site = english_site();
        let files = sample_files();
        let sign = site.new_title("File:Warning sign.png").unwrap();
        let moved = site.new_title("File:Old sign.png").unwrap();

        assert_eq!(files.find_file(&sign).unwrap().width, 600);
        assert_eq!(
            files.check_redirect(&moved).map(|t| t.prefixed_dbkey()),
            Some("File:Warning_sign.png".to_string())
        );
    }
}
