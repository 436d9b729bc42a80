//! Object keys for uploaded artifacts.

use std::path::{Component, Path};

/// Key for the artifact at `relative` (relative to the public root).
///
/// Components are joined with `/`, the optional prefix is prepended with a
/// `/` separator, and any `\` left over is turned into `/`.
pub fn object_key(prefix: Option<&str>, relative: &Path) -> String {
    let rel = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    let key = match prefix.map(|p| p.trim_end_matches(['/', '\\'])) {
        Some(p) if !p.is_empty() => format!("{p}/{rel}"),
        _ => rel,
    };
    key.replace('\\', "/")
}
