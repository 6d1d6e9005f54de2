use super::Linker;
use crate::html::{Attribs, escape, escape_quotes, raw_element};
use crate::models::{Align, FrameParams, HandlerParams, MediaFile, Thumbnail};
use crate::title::{Namespace, Title};
use crate::url::{Protocol, Query, append_query, form_encode};

/// Where a rendered image links to.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageLink {
    /// No surrounding anchor.
    None,
    /// The file description page, with an extra query string.
    Description { query: String },
    /// A wiki page.
    Title(Title),
    /// An arbitrary URL, optionally with a target frame.
    Url {
        url: String,
        target: Option<String>,
    },
}

/// Presentation of a resolved thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHtml {
    pub alt: String,
    pub title: String,
    pub valign: Option<String>,
    pub img_class: String,
    pub link: ImageLink,
}

impl Default for ImageHtml {
    fn default() -> Self {
        Self {
            alt: String::new(),
            title: String::new(),
            valign: None,
            img_class: String::new(),
            link: ImageLink::Description {
                query: String::new(),
            },
        }
    }
}

fn round_to_ten(value: f64) -> u32 {
    ((value / 10.0).round() * 10.0) as u32
}

impl Linker<'_> {
    /// Renders an embedded image (`[[File:x|...]]`).
    ///
    /// Thumbnails and framed images are delegated to
    /// [`Linker::make_thumb_link`]. Missing files render as upload links.
    #[allow(clippy::too_many_arguments)]
    pub fn make_image_link(
        &self,
        title: &Title,
        file: Option<&MediaFile>,
        frame: &FrameParams,
        handler: &HandlerParams,
        time: Option<&str>,
        query: &str,
        width_option: Option<usize>,
    ) -> String {
        if let Some(file) = file
            && !file.allow_inline_display
        {
            log::debug!("{} does not allow inline display", title.prefixed_dbkey());
            return self.simple_link(title, None);
        }

        let config = self.site.config();
        let mut fp = frame.clone();
        let mut hp = *handler;

        let (prefix, postfix) = if fp.align == Some(Align::Center) {
            fp.align = Some(Align::None);
            ("<div class=\"center\">", "</div>")
        } else {
            ("", "")
        };

        if let Some(file) = file
            && hp.width.is_none()
        {
            let width = if hp.height.is_some() && file.vectorized {
                config.svg_max_size
            } else {
                file.width
            };
            hp.width = Some(width);

            if fp.thumbnail || fp.framed || fp.frameless || width == 0 {
                let limit = config.thumb_limit(width_option);
                if fp.upright == Some(0.0) {
                    fp.upright = Some(config.thumb_upright);
                }
                let pref_width = match fp.upright {
                    Some(upright) => round_to_ten(f64::from(limit) * upright),
                    None => limit,
                };
                if hp.height.is_none() && (width == 0 || pref_width < width || file.vectorized) {
                    hp.width = Some(pref_width);
                }
            }
        }

        if fp.thumbnail || fp.manual_thumb.is_some() || fp.framed {
            if fp.align.is_none() {
                fp.align = Some(if self.site.language().is_rtl() {
                    Align::Left
                } else {
                    Align::Right
                });
            }
            let thumb = self.make_thumb_link(title, file, &fp, &hp, time, query);
            return format!("{prefix}{thumb}{postfix}");
        }

        if let Some(file) = file
            && fp.frameless
            && file.width > 0
            && !file.must_render
            && hp.width.is_some_and(|w| w > file.width)
        {
            hp.width = Some(file.width);
        }

        let thumb = match file {
            Some(file) if hp.width.is_some() => self
                .files
                .transform(file, &hp)
                .map(|thumb| self.with_responsive_urls(file, thumb, &hp)),
            _ => None,
        };

        let mut s = match thumb {
            None => self.make_broken_image_link(title, &fp.title, "", time.is_some()),
            Some(thumb) => {
                let mut img_class = fp.class.clone();
                if fp.border {
                    if !img_class.is_empty() {
                        img_class.push(' ');
                    }
                    img_class.push_str("thumbborder");
                }
                let options = ImageHtml {
                    alt: fp.alt.clone(),
                    title: fp.title.clone(),
                    valign: fp.valign.clone(),
                    img_class,
                    link: self.image_link_target(&fp, query),
                };
                self.thumbnail_html(title, &thumb, &options)
            }
        };

        if let Some(align) = fp.align {
            s = format!("<div class=\"float{align}\">{s}</div>");
        }
        format!("{prefix}{s}{postfix}").replace('\n', " ")
    }

    fn image_link_target(&self, fp: &FrameParams, query: &str) -> ImageLink {
        if let Some(url) = fp.link_url.as_deref().filter(|u| !u.is_empty()) {
            ImageLink::Url {
                url: url.to_string(),
                target: fp.link_target.clone(),
            }
        } else if let Some(target) = &fp.link_title {
            ImageLink::Title(self.normalise_special_page(target))
        } else if fp.no_link {
            ImageLink::None
        } else {
            ImageLink::Description {
                query: query.to_string(),
            }
        }
    }

    /// Renders a framed thumbnail with caption and magnify icon.
    pub fn make_thumb_link(
        &self,
        title: &Title,
        file: Option<&MediaFile>,
        frame: &FrameParams,
        handler: &HandlerParams,
        time: Option<&str>,
        query: &str,
    ) -> String {
        let config = self.site.config();
        let mut exists = file.is_some();
        let mut hp = *handler;
        let align = frame.align.unwrap_or(Align::Right);

        if hp.width.is_none_or(|w| w == 0) {
            hp.width = Some(if frame.upright.is_some() { 130 } else { 180 });
        }
        let requested = hp.width.unwrap_or(180);

        let mut thumb = None;
        let mut desc_title = title.clone();
        let mut noscale = false;
        let mut outer_width = requested + 2;

        if let Some(file) = file {
            if let Some(manual) = &frame.manual_thumb {
                if let Some(manual_title) = self.site.make_title_safe(Namespace::FILE, manual, "") {
                    match self.files.find_file(&manual_title) {
                        Some(manual_file) => {
                            thumb = self.files.unscaled_thumb(&manual_file, &hp);
                            desc_title = manual_title;
                        }
                        None => exists = false,
                    }
                }
            } else if frame.framed {
                thumb = self.files.unscaled_thumb(file, &hp);
                noscale = true;
            } else {
                if file.width > 0 && !file.must_render && requested > file.width {
                    hp.width = Some(file.width);
                }
                thumb = self.files.transform(file, &hp);
            }
            outer_width = match &thumb {
                Some(thumb) => thumb.width + 2,
                None => hp.width.unwrap_or(requested) + 2,
            };
        }

        let mut url = title.local_url(config, &Query::from_cgi(query));
        if let Some(page) = hp.page {
            url = append_query(&url, &format!("page={}", form_encode(&page.to_string())));
        }

        let mut s = format!(
            "<div class=\"thumb t{align}\"><div class=\"thumbinner\" style=\"width:{outer_width}px;\">"
        );
        let zoom_icon = match (exists, thumb) {
            (false, _) => {
                s.push_str(&self.make_broken_image_link(title, &frame.title, "", time.is_some()));
                String::new()
            }
            (true, None) => {
                s.push_str(&self.site.language().msg("thumbnail_error").param("").escaped());
                String::new()
            }
            (true, Some(thumb)) => {
                let thumb = match file {
                    Some(file) if !noscale => self.with_responsive_urls(file, thumb, &hp),
                    _ => thumb,
                };
                let img_class = if frame.class.is_empty() {
                    "thumbimage".to_string()
                } else {
                    format!("{} thumbimage", frame.class)
                };
                let options = ImageHtml {
                    alt: frame.alt.clone(),
                    title: frame.title.clone(),
                    valign: None,
                    img_class,
                    link: self.image_link_target(frame, query),
                };
                s.push_str(&self.thumbnail_html(&desc_title, &thumb, &options));
                if frame.framed {
                    String::new()
                } else {
                    self.magnify_icon(&url)
                }
            }
        };
        s.push_str(&format!(
            "  <div class=\"thumbcaption\">{zoom_icon}{}</div></div></div>",
            frame.caption
        ));
        s.replace('\n', " ")
    }

    fn magnify_icon(&self, url: &str) -> String {
        let language = self.site.language();
        let rtl = if language.is_rtl() { "-rtl" } else { "" };
        let icon = raw_element(
            "img",
            &Attribs::new()
                .with(
                    "src",
                    format!(
                        "{}/common/images/magnify-clip{rtl}.png",
                        self.site.config().style_path
                    ),
                )
                .with("width", "15")
                .with("height", "11")
                .with("alt", ""),
            "",
        );
        let anchor = raw_element(
            "a",
            &Attribs::new()
                .with("href", url)
                .with("class", "internal")
                .with("title", language.msg("thumbnail-more").text()),
            &icon,
        );
        raw_element("div", &Attribs::new().with("class", "magnify"), &anchor)
    }

    /// Adds 1.5x and 2x variants when responsive images are enabled and
    /// the repository renders distinct files for them.
    fn with_responsive_urls(
        &self,
        file: &MediaFile,
        mut thumb: Thumbnail,
        hp: &HandlerParams,
    ) -> Thumbnail {
        if !self.site.config().responsive_images {
            return thumb;
        }
        let scale = |factor: f64| HandlerParams {
            width: hp.width.map(|w| (f64::from(w) * factor).round() as u32),
            height: hp.height.map(|h| (f64::from(h) * factor).round() as u32),
            page: hp.page,
        };
        for (density, factor) in [("1.5", 1.5), ("2", 2.0)] {
            if let Some(variant) = self.files.transform(file, &scale(factor))
                && variant.url != thumb.url
            {
                thumb.responsive_urls.insert(density.to_string(), variant.url);
            }
        }
        thumb
    }

    /// `<img>` for a resolved thumbnail, wrapped in an anchor per
    /// `options.link`. `file_title` is the file description page.
    pub fn thumbnail_html(&self, file_title: &Title, thumb: &Thumbnail, options: &ImageHtml) -> String {
        let config = self.site.config();
        let link = match &options.link {
            ImageLink::None => None,
            ImageLink::Url { url, target } => {
                let mut attribs = Attribs::new().with("href", url.as_str());
                if !options.title.is_empty() {
                    attribs.set("title", options.title.as_str());
                }
                if let Some(target) = target.as_deref().filter(|t| !t.is_empty()) {
                    attribs.set("target", target);
                }
                if let Some(rel) = self.external_link_rel(url, self.current_title) {
                    attribs.set("rel", rel);
                }
                Some(attribs)
            }
            ImageLink::Title(target) => {
                let title = if options.title.is_empty() {
                    target.full_text()
                } else {
                    options.title.clone()
                };
                Some(
                    Attribs::new()
                        .with("href", target.link_url(config, &Query::new(), Protocol::Relative))
                        .with("title", title),
                )
            }
            ImageLink::Description { query } => {
                let mut attribs = Attribs::new()
                    .with("href", file_title.local_url(config, &Query::from_cgi(query)))
                    .with("class", "image");
                if !options.title.is_empty() {
                    attribs.set("title", options.title.as_str());
                }
                Some(attribs)
            }
        };

        let mut img = Attribs::new()
            .with("alt", options.alt.as_str())
            .with("src", thumb.url.as_str())
            .with("width", thumb.width.to_string())
            .with("height", thumb.height.to_string());
        if let Some(valign) = options.valign.as_deref().filter(|v| !v.is_empty()) {
            img.set("style", format!("vertical-align: {valign}"));
        }
        if !options.img_class.is_empty() {
            img.set("class", options.img_class.as_str());
        }
        if let Some(srcset) = thumb.srcset() {
            img.set("srcset", srcset);
        }

        let img = raw_element("img", &img, "");
        match link {
            Some(attribs) => raw_element("a", &attribs, &img),
            None => img,
        }
    }

    /// Link for a file that cannot be shown: an upload link when uploads
    /// are possible, otherwise a plain link to the description page.
    ///
    /// `time` is set when a specific file version was requested; if the
    /// current version exists no upload link is offered.
    pub fn make_broken_image_link(&self, title: &Title, label: &str, query: &str, time: bool) -> String {
        let config = self.site.config();
        let label = if label.is_empty() {
            title.prefixed_text()
        } else {
            label.to_string()
        };
        let enc_label = escape(&label);
        let current_exists = time && self.files.find_file(title).is_some();
        let can_upload = config.upload_missing_file_url.is_some()
            || config.upload_navigation_url.is_some()
            || config.enable_uploads;

        if can_upload && !current_exists {
            if self.files.check_redirect(title).is_some() {
                return self.link_known(title, Some(&enc_label), &Attribs::new(), &Query::from_cgi(query));
            }
            let href = self.upload_url(title, query);
            return format!(
                "<a href=\"{}\" class=\"new\" title=\"{}\">{enc_label}</a>",
                escape(&href),
                escape_quotes(&title.prefixed_text())
            );
        }
        self.link_known(title, Some(&enc_label), &Attribs::new(), &Query::from_cgi(query))
    }

    /// Upload form URL preset to `dest`.
    pub fn upload_url(&self, dest: &Title, query: &str) -> String {
        let config = self.site.config();
        let mut q = format!("wpDestFile={}", dest.partial_url());
        if !query.is_empty() {
            q.push('&');
            q.push_str(query);
        }
        if let Some(url) = &config.upload_missing_file_url {
            append_query(url, &q)
        } else if let Some(url) = &config.upload_navigation_url {
            append_query(url, &q)
        } else {
            self.site
                .special_title("Upload", None)
                .local_url_cgi(config, &q)
        }
    }

    /// Direct link to a file (`[[Media:x]]`), looking up the file version
    /// at `time` when given.
    pub fn make_media_link(&self, title: &Title, html: &str, time: Option<&str>) -> String {
        let file = match time {
            Some(time) => self.files.find_file_version(title, time),
            None => self.files.find_file(title),
        };
        self.make_media_link_file(title, file.as_ref(), html)
    }

    /// Direct link to `file`, or an upload link when it is missing.
    pub fn make_media_link_file(&self, title: &Title, file: Option<&MediaFile>, html: &str) -> String {
        let (url, class) = match file {
            Some(file) => (file.url.clone(), "internal"),
            None => (self.upload_url(title, ""), "new"),
        };
        let alt = escape_quotes(&title.text());
        let html = if html.is_empty() { alt.as_str() } else { html };
        format!(
            "<a href=\"{}\" class=\"{class}\" title=\"{alt}\">{html}</a>",
            escape(&url)
        )
    }
}
