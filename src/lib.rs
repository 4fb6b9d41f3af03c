//! Page Blocks - content model for a block-based site builder
//!
//! This crate provides the block schema of site pages, the page store over a
//! REST content API, the block editor and page builder operations, and the
//! read-only page renderer with its panel-grid layout.

pub mod builder;
pub mod config;
pub mod core;
pub mod editor;
pub mod render;
pub mod store;
mod tests;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

// Re-export commonly used types
pub use crate::core::{Block, BlockCatalog, BlockKind, PageKey, PageSequence};
pub use builder::{PageBuilder, SaveStatus};
pub use config::ClientConfig;
pub use editor::{BlockEdit, BlockEditor, GridEdit};
pub use render::{RenderedPage, Renderer};
pub use store::{ContentApi, PageStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
