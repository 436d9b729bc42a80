//! File extension → `Content-Type` for uploaded objects.

use std::path::Path;

/// Used for any extension missing from [`CONTENT_TYPES`].
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Known extensions (lowercase, no dot).
pub const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("xml", "text/xml"),
    ("js", "application/javascript"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("webm", "video/webm"),
    ("mp4", "video/mp4"),
    ("ogv", "video/ogg"),
    ("avi", "video/x-msvideo"),
    ("ogg", "audio/ogg"),
    ("mp3", "audio/mpeg"),
    ("mpeg", "audio/mpeg"),
];

/// Content type for `path`, matched on its extension ignoring ASCII case.
///
/// The table is the exact-match one; only the comparison is relaxed, so
/// `PHOTO.JPG` is served as `image/jpeg` rather than the default.
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, ct)| *ct)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("index.html", "text/html")]
    #[case("style.css", "text/css")]
    #[case("sitemap.xml", "text/xml")]
    #[case("app.js", "application/javascript")]
    #[case("cv.pdf", "application/pdf")]
    #[case("a.png", "image/png")]
    #[case("a.jpg", "image/jpeg")]
    #[case("a.jpeg", "image/jpeg")]
    #[case("a.gif", "image/gif")]
    #[case("logo.svg", "image/svg+xml")]
    #[case("a.webp", "image/webp")]
    #[case("clip.webm", "video/webm")]
    #[case("clip.mp4", "video/mp4")]
    #[case("clip.ogv", "video/ogg")]
    #[case("clip.avi", "video/x-msvideo")]
    #[case("song.ogg", "audio/ogg")]
    #[case("song.mp3", "audio/mpeg")]
    #[case("song.mpeg", "audio/mpeg")]
    fn table_extensions(#[case] file: &str, #[case] expected: &str) {
        assert_eq!(content_type_for(Path::new(file)), expected);
    }

    #[rstest]
    #[case("file.unknown")]
    #[case("README")]
    #[case(".htaccess")]
    #[case("archive.tar.gz")]
    fn unmatched_is_octet_stream(#[case] file: &str) {
        assert_eq!(content_type_for(Path::new(file)), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn extension_match_ignores_case() {
        assert_eq!(content_type_for(Path::new("PHOTO.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("Index.Html")), "text/html");
    }

    #[test]
    fn directory_components_do_not_matter() {
        assert_eq!(
            content_type_for(Path::new("img.png/inner/page.html")),
            "text/html"
        );
    }
}
