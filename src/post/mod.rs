// src/post/mod.rs
// =============================================================================
// This module produces the files of the static site.
//
// Submodules:
// - slug: file/URL-safe names for writeups
// - render: the Quarto post, the included content, and the placeholder
// =============================================================================

mod render;
mod slug;

pub use render::{render_post, IncludedContent, RenderContext, DEFAULT_INCLUDE_PREFIX};
pub use slug::slugify;
