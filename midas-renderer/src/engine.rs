//! Tera rendering engine for archetypes.
//!
//! Each archetype file is registered under its file name, so Tera's
//! autoescaping applies to `.html`/`.htm`/`.xml` archetypes exactly as it
//! does for regular templates.

use std::path::{Path, PathBuf};

use tera::Tera;

use midas_core::Payload;

use crate::context::ArchetypeContext;
use crate::error::RenderError;

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn tera_err(template: &str, source: tera::Error) -> RenderError {
    RenderError::Tera {
        template: template.to_string(),
        source,
    }
}

/// Name an archetype is registered under: its file name, or a fixed fallback.
fn archetype_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archetype".to_string())
}

// ---------------------------------------------------------------------------
// ArchetypeRenderer
// ---------------------------------------------------------------------------

/// Renders archetype files against entry payloads.
///
/// Archetypes are read from disk on every call so edits made while a
/// long-running process is up are picked up without a restart.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchetypeRenderer;

impl ArchetypeRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the archetype at `archetype_path` with `Entry` bound to the
    /// payload's entry map.
    pub fn render(&self, archetype_path: &Path, payload: &Payload) -> Result<String, RenderError> {
        let source =
            std::fs::read_to_string(archetype_path).map_err(|e| io_err(archetype_path, e))?;
        let name = archetype_name(archetype_path);

        let mut tera = Tera::default();
        tera.add_raw_template(&name, &source)
            .map_err(|e| tera_err(&name, e))?;

        let ctx = ArchetypeContext::from_payload(payload).to_tera_context()?;
        tera.render(&name, &ctx).map_err(|e| tera_err(&name, e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn payload(title: &str) -> Payload {
        Payload::from_json(&format!(
            r#"{{"metadata":{{"model":"post"}},"entry":{{"Title":{},"id":7,"Body":"<b>hi</b>"}}}}"#,
            serde_json::to_string(title).unwrap()
        ))
        .unwrap()
    }

    #[test]
    fn renders_entry_fields() {
        let dir = TempDir::new().unwrap();
        let archetype = dir.path().join("post.md");
        std::fs::write(&archetype, "---\ntitle: {{ Entry.Title }}\nid: {{ Entry.id }}\n---\n").unwrap();

        let out = ArchetypeRenderer::new().render(&archetype, &payload("Hello")).unwrap();
        assert_eq!(out, "---\ntitle: Hello\nid: 7\n---\n");
    }

    #[test]
    fn html_archetypes_are_autoescaped() {
        let dir = TempDir::new().unwrap();
        let archetype = dir.path().join("post.html");
        std::fs::write(&archetype, "{{ Entry.Body }}|{{ Entry.Body | safe }}").unwrap();

        let out = ArchetypeRenderer::new().render(&archetype, &payload("x")).unwrap();
        assert_eq!(out, "&lt;b&gt;hi&lt;&#x2F;b&gt;|<b>hi</b>");
    }

    #[test]
    fn missing_archetype_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ArchetypeRenderer::new()
            .render(&dir.path().join("gone.html"), &payload("x"))
            .unwrap_err();
        assert!(err.is_not_found(), "got: {err}");
    }

    #[test]
    fn syntax_error_names_the_archetype() {
        let dir = TempDir::new().unwrap();
        let archetype = dir.path().join("broken.html");
        std::fs::write(&archetype, "{{ Entry.Title ").unwrap();

        let err = ArchetypeRenderer::new().render(&archetype, &payload("x")).unwrap_err();
        assert!(matches!(err, RenderError::Tera { ref template, .. } if template == "broken.html"));
    }
}
