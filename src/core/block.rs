//! Block schema and its tolerant wire format
//!
//! A page is an ordered sequence of blocks. Each block is one of seven known
//! variants, discriminated on the wire by a `"type"` field. Stored pages are
//! historical data written by older and newer editors, so reading never fails
//! on a single bad entry: anything that does not fit a known variant is kept
//! as [`Block::Unknown`] and written back verbatim.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::layout::PanelLayout;

/// Default image width in pixels.
pub const DEFAULT_IMAGE_WIDTH: u32 = 400;
/// Default video width in pixels.
pub const DEFAULT_VIDEO_WIDTH: u32 = 640;

/// One content unit within a page
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Image(ImageBlock),
    Video(VideoBlock),
    Audio(AudioBlock),
    Gallery(GalleryBlock),
    Button(ButtonBlock),
    PanelLayout(PanelLayout),
    /// Unrecognised or malformed entry, preserved as stored.
    Unknown(serde_json::Value),
}

/// Rich-text block; `content` is HTML markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoBlock {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBlock {
    #[serde(default)]
    pub url: String,
}

/// Ordered image URLs. Empty strings are placeholders the editor shows as
/// blank fields; the renderer skips them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryBlock {
    #[serde(default)]
    pub images: Vec<String>,
}

/// What a button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    /// Navigate to `url`
    Url,
    /// Open the contact form prefilled with `subject`/`message`
    Contact,
}

impl Default for ButtonAction {
    fn default() -> Self {
        ButtonAction::Contact
    }
}

/// Call-to-action button.
///
/// Switching `action` keeps the fields of the other action around; they are
/// simply not used until the action is switched back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonBlock {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub action: ButtonAction,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, rename = "newTab", skip_serializing_if = "std::ops::Not::not")]
    pub new_tab: bool,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// The closed set of block variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Text,
    Image,
    Video,
    Audio,
    Gallery,
    Button,
    PanelLayout,
}

impl BlockKind {
    /// Every kind, in toolbar order.
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::Audio,
        BlockKind::Gallery,
        BlockKind::Button,
        BlockKind::PanelLayout,
    ];

    /// The wire value of the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::Audio => "audio",
            BlockKind::Gallery => "gallery",
            BlockKind::Button => "button",
            BlockKind::PanelLayout => "panelLayout",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BlockError::UnknownKind(s.to_string()))
    }
}

impl Serialize for BlockKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Block {
    /// The variant of this block, or `None` for unknown entries.
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Block::Text(_) => Some(BlockKind::Text),
            Block::Image(_) => Some(BlockKind::Image),
            Block::Video(_) => Some(BlockKind::Video),
            Block::Audio(_) => Some(BlockKind::Audio),
            Block::Gallery(_) => Some(BlockKind::Gallery),
            Block::Button(_) => Some(BlockKind::Button),
            Block::PanelLayout(_) => Some(BlockKind::PanelLayout),
            Block::Unknown(_) => None,
        }
    }

    /// The raw `type` string, including the one carried by unknown entries.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Block::Unknown(raw) => raw.get("type").and_then(|t| t.as_str()),
            other => other.kind().map(|k| k.as_str()),
        }
    }

    pub fn is_panel_layout(&self) -> bool {
        matches!(self, Block::PanelLayout(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Block::Unknown(_))
    }

    /// Width to render at; absent or zero falls back to the variant default.
    pub fn effective_width(&self) -> Option<u32> {
        match self {
            Block::Image(image) => Some(
                image
                    .width
                    .filter(|w| *w > 0)
                    .unwrap_or(DEFAULT_IMAGE_WIDTH),
            ),
            Block::Video(video) => Some(
                video
                    .width
                    .filter(|w| *w > 0)
                    .unwrap_or(DEFAULT_VIDEO_WIDTH),
            ),
            _ => None,
        }
    }

    /// Media URL for image, video and audio blocks.
    pub fn media_url(&self) -> Option<&str> {
        match self {
            Block::Image(b) => Some(&b.url),
            Block::Video(b) => Some(&b.url),
            Block::Audio(b) => Some(&b.url),
            _ => None,
        }
    }

    /// Parse a stored page (a JSON array of blocks).
    pub fn parse_sequence(content: &str) -> Result<Vec<Block>, BlockError> {
        serde_json::from_str(content).map_err(|e| BlockError::Malformed(e.to_string()))
    }

    /// Encode a page as the single JSON array the content API stores.
    pub fn serialize_sequence(blocks: &[Block]) -> Result<String, BlockError> {
        serde_json::to_string(blocks).map_err(|e| BlockError::Encoding(e.to_string()))
    }
}

impl From<TextBlock> for Block {
    fn from(b: TextBlock) -> Self {
        Block::Text(b)
    }
}

impl From<ImageBlock> for Block {
    fn from(b: ImageBlock) -> Self {
        Block::Image(b)
    }
}

impl From<VideoBlock> for Block {
    fn from(b: VideoBlock) -> Self {
        Block::Video(b)
    }
}

impl From<AudioBlock> for Block {
    fn from(b: AudioBlock) -> Self {
        Block::Audio(b)
    }
}

impl From<GalleryBlock> for Block {
    fn from(b: GalleryBlock) -> Self {
        Block::Gallery(b)
    }
}

impl From<ButtonBlock> for Block {
    fn from(b: ButtonBlock) -> Self {
        Block::Button(b)
    }
}

impl From<PanelLayout> for Block {
    fn from(b: PanelLayout) -> Self {
        Block::PanelLayout(b)
    }
}

// ── Wire representation ─────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(tag = "type")]
enum TaggedRef<'a> {
    #[serde(rename = "text")]
    Text(&'a TextBlock),
    #[serde(rename = "image")]
    Image(&'a ImageBlock),
    #[serde(rename = "video")]
    Video(&'a VideoBlock),
    #[serde(rename = "audio")]
    Audio(&'a AudioBlock),
    #[serde(rename = "gallery")]
    Gallery(&'a GalleryBlock),
    #[serde(rename = "button")]
    Button(&'a ButtonBlock),
    #[serde(rename = "panelLayout")]
    PanelLayout(&'a PanelLayout),
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Tagged {
    #[serde(rename = "text")]
    Text(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "video")]
    Video(VideoBlock),
    #[serde(rename = "audio")]
    Audio(AudioBlock),
    #[serde(rename = "gallery")]
    Gallery(GalleryBlock),
    #[serde(rename = "button")]
    Button(ButtonBlock),
    #[serde(rename = "panelLayout")]
    PanelLayout(PanelLayout),
}

impl From<Tagged> for Block {
    fn from(tagged: Tagged) -> Self {
        match tagged {
            Tagged::Text(b) => Block::Text(b),
            Tagged::Image(b) => Block::Image(b),
            Tagged::Video(b) => Block::Video(b),
            Tagged::Audio(b) => Block::Audio(b),
            Tagged::Gallery(b) => Block::Gallery(b),
            Tagged::Button(b) => Block::Button(b),
            Tagged::PanelLayout(b) => Block::PanelLayout(b),
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = match self {
            Block::Text(b) => TaggedRef::Text(b),
            Block::Image(b) => TaggedRef::Image(b),
            Block::Video(b) => TaggedRef::Video(b),
            Block::Audio(b) => TaggedRef::Audio(b),
            Block::Gallery(b) => TaggedRef::Gallery(b),
            Block::Button(b) => TaggedRef::Button(b),
            Block::PanelLayout(b) => TaggedRef::PanelLayout(b),
            Block::Unknown(raw) => return raw.serialize(serializer),
        };
        tagged.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match Tagged::deserialize(&raw) {
            Ok(tagged) => Ok(tagged.into()),
            Err(e) => {
                tracing::debug!(
                    block_type = raw.get("type").and_then(|t| t.as_str()).unwrap_or("<none>"),
                    error = %e,
                    "keeping unrecognised block as-is"
                );
                Ok(Block::Unknown(raw))
            }
        }
    }
}

/// Block errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BlockError {
    /// `type` value outside the known set
    #[error("Unknown block type: {0}")]
    UnknownKind(String),

    /// Stored content is not a JSON array of blocks
    #[error("Malformed page content: {0}")]
    Malformed(String),

    /// Serialization failed
    #[error("Encoding failed: {0}")]
    Encoding(String),
}
