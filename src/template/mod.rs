//! Template context construction and placeholder substitution.
pub mod context;
pub mod renderer;

pub use context::{SUPPORTED_LANGS, TemplateContext};
pub use renderer::{render_structured, render_text};
