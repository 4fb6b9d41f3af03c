//! Block Catalog - the closed set of block kinds an editor can insert
//!
//! This module describes every block kind and builds its default value:
//! - Display metadata (name, description) for toolbars
//! - The controls each kind is edited through
//! - Default blocks for top-level insertion and for insertion inside a panel
//! - Lookup by wire type string and free-text search

use serde::Serialize;

use super::block::{
    AudioBlock, Block, BlockError, BlockKind, ButtonAction, ButtonBlock, GalleryBlock, ImageBlock,
    TextBlock, VideoBlock, DEFAULT_IMAGE_WIDTH, DEFAULT_VIDEO_WIDTH,
};
use super::layout::PanelLayout;
use super::parameter::{ControlSpec, WidgetType, IMAGE_WIDTH_RANGE, VIDEO_WIDTH_RANGE};

/// Width of an image inserted inside a panel.
pub const NESTED_IMAGE_WIDTH: u32 = 300;
/// Width of a video inserted inside a panel.
pub const NESTED_VIDEO_WIDTH: u32 = 480;

/// Catalog entry for one block kind
#[derive(Debug, Clone, Serialize)]
pub struct BlockTypeInfo {
    #[serde(rename = "type")]
    pub block_type: &'static str,
    #[serde(skip)]
    pub kind: BlockKind,
    pub name: &'static str,
    pub description: &'static str,
    pub controls: Vec<ControlSpec>,
    /// Whether the kind may be inserted inside a panel
    pub nestable: bool,
}

/// Catalog of insertable block kinds
#[derive(Debug, Clone)]
pub struct BlockCatalog {
    entries: Vec<BlockTypeInfo>,
}

impl BlockCatalog {
    /// The seven standard kinds, in toolbar order.
    pub fn standard() -> Self {
        Self {
            entries: BlockKind::ALL.iter().map(|kind| describe(*kind)).collect(),
        }
    }

    pub fn entries(&self) -> &[BlockTypeInfo] {
        &self.entries
    }

    pub fn get(&self, kind: BlockKind) -> Option<&BlockTypeInfo> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Find an entry by its wire type string
    pub fn lookup(&self, block_type: &str) -> Result<&BlockTypeInfo, BlockError> {
        let kind: BlockKind = block_type.parse()?;
        self.get(kind)
            .ok_or_else(|| BlockError::UnknownKind(block_type.to_string()))
    }

    /// Case-insensitive search over names, descriptions and type strings
    pub fn search(&self, query: &str) -> Vec<&BlockTypeInfo> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&query)
                    || e.description.to_lowercase().contains(&query)
                    || e.block_type.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Default block for top-level insertion.
    pub fn create(kind: BlockKind) -> Block {
        match kind {
            BlockKind::Text => Block::Text(TextBlock {
                content: "New text block".into(),
            }),
            BlockKind::Image => Block::Image(ImageBlock {
                url: String::new(),
                width: Some(DEFAULT_IMAGE_WIDTH),
            }),
            BlockKind::Video => Block::Video(VideoBlock {
                url: String::new(),
                width: Some(DEFAULT_VIDEO_WIDTH),
            }),
            BlockKind::Audio => Block::Audio(AudioBlock { url: String::new() }),
            BlockKind::Gallery => Block::Gallery(GalleryBlock {
                images: vec![String::new()],
            }),
            BlockKind::Button => Block::Button(default_button()),
            BlockKind::PanelLayout => Block::PanelLayout(PanelLayout::default()),
        }
    }

    /// Default block for insertion inside a panel.
    ///
    /// Panels are one level deep: `PanelLayout` is refused.
    pub fn create_nested(kind: BlockKind) -> Option<Block> {
        match kind {
            BlockKind::Text => Some(Block::Text(TextBlock {
                content: "New text".into(),
            })),
            BlockKind::Image => Some(Block::Image(ImageBlock {
                url: String::new(),
                width: Some(NESTED_IMAGE_WIDTH),
            })),
            BlockKind::Video => Some(Block::Video(VideoBlock {
                url: String::new(),
                width: Some(NESTED_VIDEO_WIDTH),
            })),
            BlockKind::PanelLayout => None,
            other => Some(Self::create(other)),
        }
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn default_button() -> ButtonBlock {
    ButtonBlock {
        label: "Contact me".into(),
        action: ButtonAction::Contact,
        url: String::new(),
        new_tab: false,
        subject: String::new(),
        message: String::new(),
    }
}

fn describe(kind: BlockKind) -> BlockTypeInfo {
    let (name, description, controls) = match kind {
        BlockKind::Text => (
            "Text",
            "Rich text with headings, lists, links and inline images",
            vec![ControlSpec::new("content", "Content", WidgetType::RichText)],
        ),
        BlockKind::Image => (
            "Image",
            "Single image that opens a full-screen preview on click",
            vec![
                ControlSpec::new("url", "Image URL", WidgetType::Input)
                    .with_placeholder("Image URL"),
                ControlSpec::new("width", "Width", WidgetType::Slider)
                    .with_range(IMAGE_WIDTH_RANGE)
                    .with_unit("px"),
                ControlSpec::new("file", "Upload", WidgetType::Upload),
            ],
        ),
        BlockKind::Video => (
            "Video",
            "Embedded video player",
            vec![
                ControlSpec::new("url", "Video URL", WidgetType::Input)
                    .with_placeholder("Video URL (.mp4, .webm, etc)"),
                ControlSpec::new("width", "Width", WidgetType::Slider)
                    .with_range(VIDEO_WIDTH_RANGE)
                    .with_unit("px"),
                ControlSpec::new("file", "Upload", WidgetType::Upload),
            ],
        ),
        BlockKind::Audio => (
            "Audio",
            "Embedded audio player",
            vec![
                ControlSpec::new("url", "Audio URL", WidgetType::Input)
                    .with_placeholder("Audio URL (.mp3, .ogg, etc)"),
                ControlSpec::new("file", "Upload", WidgetType::Upload),
            ],
        ),
        BlockKind::Gallery => (
            "Gallery",
            "Row of image thumbnails with full-screen preview",
            vec![ControlSpec::new("images", "Gallery Images", WidgetType::UrlList)],
        ),
        BlockKind::Button => (
            "Button",
            "Button that opens a URL or the prefilled contact form",
            vec![
                ControlSpec::new("label", "Label", WidgetType::Input)
                    .with_placeholder("Button label"),
                ControlSpec::new("action", "Action", WidgetType::Select),
                ControlSpec::new("url", "URL", WidgetType::Input)
                    .with_placeholder("https://example.com"),
                ControlSpec::new("newTab", "Open in new tab", WidgetType::Checkbox),
                ControlSpec::new("subject", "Prefill Subject", WidgetType::Input)
                    .with_placeholder("Subject"),
                ControlSpec::new("message", "Prefill Message", WidgetType::Input)
                    .with_placeholder("Message"),
            ],
        ),
        BlockKind::PanelLayout => (
            "Panel Grid",
            "Free-form grid of panels, each holding its own blocks",
            vec![ControlSpec::new("layout", "Panels", WidgetType::Grid)],
        ),
    };

    BlockTypeInfo {
        block_type: kind.as_str(),
        kind,
        name,
        description,
        controls,
        nestable: kind != BlockKind::PanelLayout,
    }
}
