use std::path::Path;

/// Content type a file is uploaded with, inferred from its extension.
pub fn infer(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string())
}
