//! Best-effort media type detection.

/// Media types keyed by lowercase file extension.
///
/// Text formats (SVG, CSV, glTF JSON, CSS) cannot be recognised from magic bytes, so the
/// extension wins whenever it is known.
const EXTENSION_MEDIA_TYPES: &[(&str, &str)] = &[
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("csv", "text/csv"),
    ("json", "application/json"),
    ("gltf", "model/gltf+json"),
    ("glb", "model/gltf-binary"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("css", "text/css"),
    ("md", "text/markdown"),
];

/// Detects the media type of a payload from its path and, failing that, its bytes.
///
/// Returns `None` when neither the extension nor the content signature is recognised.
pub fn detect_media_type(path: &str, bytes: &[u8]) -> Option<&'static str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let from_extension = file_name
        .rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .and_then(|(_, ext)| {
            EXTENSION_MEDIA_TYPES
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(ext))
                .map(|(_, media_type)| *media_type)
        });

    from_extension.or_else(|| infer::get(bytes).map(|kind| kind.mime_type()))
}
