//! Core page-content types
//!
//! This module defines the block schema, page keys and sequences, the panel
//! grid model, editor control descriptions, the block catalog and page
//! validation.

pub mod block;
pub mod layout;
pub mod page;
pub mod parameter;
pub mod registry;
pub mod validation;

pub use block::{
    AudioBlock, Block, BlockError, BlockKind, ButtonAction, ButtonBlock, GalleryBlock, ImageBlock,
    TextBlock, VideoBlock,
};
pub use layout::{GridGeometry, Panel, PanelLayout, Placement, Rect};
pub use page::{Direction, PageKey, PageSequence, SequenceError};
pub use registry::{BlockCatalog, BlockTypeInfo};
pub use validation::{PageValidationResult, PageValidator};
