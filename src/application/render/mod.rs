//! Rich-text rendering.
//!
//! The renderer maps normalised content blocks to displayable [`Node`] trees.
//! It is pure apart from HTML sanitisation: text runs go through an Ammonia
//! allowlist and are embedded directly as trusted markup, never re-parsed.
//! Malformed or unrecognised content degrades to the closest safe rendering
//! instead of failing.

mod service;
mod types;

pub use service::{RichTextRenderService, render_service, safe_href};
pub use types::{Element, Node, RenderService, SanitizedHtml};
