// src/formatting/mod.rs
//! Renders Notion blocks, properties, and databases into Markdown.

pub mod block_renderer;
pub mod databases;
mod properties;
mod rich_text;

pub use block_renderer::{BlockRenderer, ListCounter};
pub use databases::{escape_for_table, TableBuilder};
pub use properties::render_property;
pub use rich_text::render_rich_text;
