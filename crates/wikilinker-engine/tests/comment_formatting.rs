use pretty_assertions::assert_eq;
use rstest::rstest;
use wikilinker_engine::{FileIndex, LinkerConfig, Linker, MediaFile, PageIndex, PageStatus, Site, Viewer};

fn site() -> Site {
    Site::new(LinkerConfig::default()).unwrap()
}

fn pages() -> PageIndex {
    PageIndex::new()
        .with("Safety_data_sheet", PageStatus::new(12000))
        .with("Noise", PageStatus::new(3000))
        .with("User:Alice", PageStatus::new(100))
        .with("Talk:User:Bob", PageStatus::new(200))
}

#[test]
fn local_autocomment_links_to_fragment() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);
    let page = site.new_title("Safety data sheet").unwrap();

    assert_eq!(
        linker.format_comment("/* Hazards */", Some(&page), true),
        "<a href=\"#Hazards\">→</a>\u{200E}<span dir=\"auto\"><span class=\"autocomment\">Hazards</span></span>"
    );
}

#[test]
fn text_before_autocomment_gets_separator() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);
    let page = site.new_title("Safety data sheet").unwrap();

    assert_eq!(
        linker.format_comment("Added refs /* Sources */", Some(&page), false),
        "Added refs -&#32;<a href=\"/wiki/Safety_data_sheet#Sources\" title=\"Safety data sheet\">→</a>\u{200E}\
         <span dir=\"auto\"><span class=\"autocomment\">Sources</span></span>"
    );
}

#[test]
fn autocomment_links_stay_on_talk_page_of_prefixed_name() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);
    let page = site.new_title("Talk:User:Bob").unwrap();

    assert_eq!(
        linker.format_comment("/* Scope */", Some(&page), false),
        "<a href=\"/wiki/Talk:User:Bob#Scope\" title=\"Talk:User:Bob\">→</a>\u{200E}\
         <span dir=\"auto\"><span class=\"autocomment\">Scope</span></span>"
    );
}

#[test]
fn apostrophes_use_numeric_reference() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);

    assert_eq!(linker.format_comment("it's fixed", None, false), "it&#039;s fixed");
}

#[test]
fn autocomment_without_title_has_no_link() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);

    assert_eq!(
        linker.format_comment("/* Scope */", None, false),
        "\u{200E}<span dir=\"auto\"><span class=\"autocomment\">Scope</span></span>"
    );
}

#[test]
fn summary_text_is_escaped() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);

    assert_eq!(
        linker.format_comment("<script>alert(1)</script> &amp; more", None, false),
        "&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"
    );
}

#[test]
fn invalid_link_targets_stay_as_text() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);

    assert_eq!(
        linker.format_comment("see [[Foo<bar]]", None, false),
        "see [[Foo&lt;bar]]"
    );
}

#[test]
fn fragment_links_use_context_page() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);
    let page = site.new_title("Safety data sheet").unwrap();

    assert_eq!(
        linker.format_comment("[[#Scope]]", Some(&page), false),
        "<a href=\"/wiki/Safety_data_sheet#Scope\" title=\"Safety data sheet\">#Scope</a>"
    );
}

#[test]
fn subpage_links_resolve_against_context() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);
    let page = site.new_title("User:Alice").unwrap();

    assert_eq!(
        linker.format_comment("moved to [[/Sandbox]]", Some(&page), false),
        "moved to <a href=\"/index.php?title=User:Alice/Sandbox&amp;action=edit&amp;redlink=1\" class=\"new\" \
         title=\"User:Alice/Sandbox (page does not exist)\">/Sandbox</a>"
    );
}

#[test]
fn subpage_syntax_outside_subpage_namespaces_is_literal() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);
    let article = site.new_title("Noise").unwrap();
    let mut text = String::new();

    assert_eq!(linker.normalize_subpage_link(Some(&article), "/Sub", &mut text), "/Sub");
    assert_eq!(text, "");
}

#[test]
fn subpage_forms() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);
    let context = site.new_title("User:Alice/Drafts/Noise").unwrap();

    let mut text = String::new();
    assert_eq!(
        linker.normalize_subpage_link(Some(&context), "/Notes/", &mut text),
        "User:Alice/Drafts/Noise/Notes"
    );
    assert_eq!(text, "Notes");

    let mut text = String::new();
    assert_eq!(
        linker.normalize_subpage_link(Some(&context), "../Dust", &mut text),
        "User:Alice/Drafts/Dust"
    );
    assert_eq!(text, "");

    let mut text = String::new();
    assert_eq!(
        linker.normalize_subpage_link(Some(&context), "../../", &mut text),
        "User:Alice"
    );

    let mut text = String::new();
    assert_eq!(
        linker.normalize_subpage_link(Some(&context), "/", &mut text),
        "User:Alice/Drafts/Noise/"
    );
    assert_eq!(text, "");

    let mut text = String::new();
    assert_eq!(
        linker.normalize_subpage_link(Some(&context), "../../../../Too far", &mut text),
        "../../../../Too far"
    );
}

#[test]
fn media_links_point_at_the_file() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let files = FileIndex::new().with(MediaFile::new(
        "Warning sign.png",
        "/images/a/a1/Warning_sign.png",
        600,
        450,
    ));
    let linker = Linker::new(&site, &pages, &viewer).with_files(&files);

    assert_eq!(
        linker.format_comment("[[Media:Warning sign.png|the sign]] updated", None, false),
        "<a href=\"/images/a/a1/Warning_sign.png\" class=\"internal\" title=\"Warning sign.png\">the sign</a> updated"
    );
}

#[rstest]
#[case("[[media:Warning sign.png|the sign]]", true)]
#[case("[[MEDIA:Warning sign.png|the sign]]", true)]
#[case("[[ Media:Warning sign.png|the sign]]", false)]
#[case("[[Media :Warning sign.png|the sign]]", false)]
fn media_prefix_matching(#[case] summary: &str, #[case] is_media: bool) {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let files = FileIndex::new().with(MediaFile::new(
        "Warning sign.png",
        "/images/a/a1/Warning_sign.png",
        600,
        450,
    ));
    let linker = Linker::new(&site, &pages, &viewer).with_files(&files);

    let html = linker.format_comment(summary, None, false);

    assert_eq!(html.contains("href=\"/images/a/a1/Warning_sign.png\""), is_media, "{html}");
}

#[test]
fn comment_block_wraps_in_parentheses() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);

    assert_eq!(linker.comment_block("", None, false), "");
    assert_eq!(linker.comment_block("*", None, false), "");
    assert_eq!(
        linker.comment_block("typo fix", None, false),
        " <span class=\"comment\">(typo fix)</span>"
    );
}

#[test]
fn revision_sizes() {
    let site = site();
    let pages = pages();
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);

    assert_eq!(
        linker.format_revision_size(0),
        "<span class=\"history-size\">(empty)</span>"
    );
    assert_eq!(
        linker.format_revision_size(1),
        "<span class=\"history-size\">(1 byte)</span>"
    );
    assert_eq!(
        linker.format_revision_size(1234),
        "<span class=\"history-size\">(1,234 bytes)</span>"
    );
}
