//! # midas-renderer
//!
//! Tera-based engine that renders archetype files into entry pages from
//! validated CMS payloads.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use midas_core::Payload;
//! use midas_renderer::ArchetypeRenderer;
//!
//! fn render(payload: &Payload) {
//!     let renderer = ArchetypeRenderer::new();
//!     if let Ok(page) = renderer.render(Path::new("archetypes/post.html"), payload) {
//!         println!("{} bytes", page.len());
//!     }
//! }
//! ```

mod context;
pub mod engine;
pub mod error;

pub use engine::ArchetypeRenderer;
pub use error::RenderError;
