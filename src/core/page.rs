//! Page keys and the ordered block sequence of one page
//!
//! Insertion order is display order. Every structural operation here is
//! local; persistence happens wholesale through the page store.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::block::{Block, BlockKind, ImageBlock, TextBlock, DEFAULT_IMAGE_WIDTH};
use super::registry::BlockCatalog;

/// Key under which the `prices` page was stored before it was renamed.
pub const LEGACY_PRICES_KEY: &str = "bio";

/// Identifier of a site page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageKey {
    Home,
    Prices,
    Creations,
    Education,
    Work,
    Gallery,
    Contact,
    Arcade,
    Media,
    Sandbox,
    Socials,
    /// Any key outside the fixed set
    Custom(String),
}

impl PageKey {
    /// The fixed set of site pages, in menu order.
    pub const KNOWN: [PageKey; 11] = [
        PageKey::Home,
        PageKey::Prices,
        PageKey::Creations,
        PageKey::Education,
        PageKey::Work,
        PageKey::Gallery,
        PageKey::Contact,
        PageKey::Arcade,
        PageKey::Media,
        PageKey::Sandbox,
        PageKey::Socials,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PageKey::Home => "home",
            PageKey::Prices => "prices",
            PageKey::Creations => "creations",
            PageKey::Education => "education",
            PageKey::Work => "work",
            PageKey::Gallery => "gallery",
            PageKey::Contact => "contact",
            PageKey::Arcade => "arcade",
            PageKey::Media => "media",
            PageKey::Sandbox => "sandbox",
            PageKey::Socials => "socials",
            PageKey::Custom(key) => key,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PageKey::Custom(_))
    }

    /// Older key to fall back to when this page has no content.
    pub fn legacy_key(&self) -> Option<PageKey> {
        match self {
            PageKey::Prices => Some(PageKey::Custom(LEGACY_PRICES_KEY.to_string())),
            _ => None,
        }
    }

    /// Built-in content used when the remote record is empty.
    pub fn default_blocks(&self) -> Vec<Block> {
        match self {
            PageKey::Home => vec![Block::Text(TextBlock {
                content: "Welcome to your homepage! Edit this text.".into(),
            })],
            PageKey::Media => vec![Block::Text(TextBlock {
                content: "<h2>Media</h2><p>Add your videos, music, and photos here. \
                          Use the Gallery block for multiple images.</p>"
                    .into(),
            })],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PageKey::KNOWN
            .iter()
            .find(|key| key.as_str() == s)
            .cloned()
            .unwrap_or_else(|| PageKey::Custom(s.to_string())))
    }
}

impl From<&str> for PageKey {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(key) => key,
            Err(never) => match never {},
        }
    }
}

impl Serialize for PageKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PageKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(PageKey::from(s.as_str()))
    }
}

/// Direction for a single-step move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn offset(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// Ordered blocks of one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSequence {
    blocks: Vec<Block>,
}

impl PageSequence {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn has_panel_layout(&self) -> bool {
        self.blocks.iter().any(Block::is_panel_layout)
    }

    /// Append a default-initialised block; returns its index.
    ///
    /// A page holds at most one panel layout.
    pub fn add_block(&mut self, kind: BlockKind) -> Result<usize, SequenceError> {
        if kind == BlockKind::PanelLayout && self.has_panel_layout() {
            return Err(SequenceError::PanelLayoutExists);
        }
        self.blocks.push(BlockCatalog::create(kind));
        Ok(self.blocks.len() - 1)
    }

    /// Append one image block per URL, at the default width.
    pub fn append_images<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.blocks.len();
        self.blocks.extend(urls.into_iter().map(|url| {
            Block::Image(ImageBlock {
                url: url.into(),
                width: Some(DEFAULT_IMAGE_WIDTH),
            })
        }));
        self.blocks.len() - before
    }

    /// Replace the block at `index` with a new value.
    pub fn update_block(&mut self, index: usize, block: Block) -> Result<(), SequenceError> {
        let len = self.blocks.len();
        let slot = self
            .blocks
            .get_mut(index)
            .ok_or(SequenceError::IndexOutOfRange { index, len })?;
        *slot = block;
        Ok(())
    }

    pub fn delete_block(&mut self, index: usize) -> Result<Block, SequenceError> {
        if index >= self.blocks.len() {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.blocks.len(),
            });
        }
        Ok(self.blocks.remove(index))
    }

    /// Swap with the neighbour in `direction`. Returns `false` at the edges.
    pub fn move_block(&mut self, index: usize, direction: Direction) -> bool {
        let target = index as isize + direction.offset();
        if index >= self.blocks.len() || target < 0 || target as usize >= self.blocks.len() {
            return false;
        }
        self.blocks.swap(index, target as usize);
        true
    }

    /// Move one entry to an arbitrary position, shifting those in between.
    pub fn reorder(&mut self, source: usize, destination: usize) -> Result<(), SequenceError> {
        let len = self.blocks.len();
        if source >= len {
            return Err(SequenceError::IndexOutOfRange { index: source, len });
        }
        if destination >= len {
            return Err(SequenceError::IndexOutOfRange {
                index: destination,
                len,
            });
        }
        let block = self.blocks.remove(source);
        self.blocks.insert(destination, block);
        Ok(())
    }
}

impl From<Vec<Block>> for PageSequence {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

/// Structural operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("A Panel Grid already exists on this page.")]
    PanelLayoutExists,

    #[error("Block index {index} out of range (page has {len} blocks)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> PageSequence {
        PageSequence::new(
            items
                .iter()
                .map(|s| Block::Text(TextBlock {
                    content: s.to_string(),
                }))
                .collect(),
        )
    }

    #[test]
    fn test_page_key_parsing() {
        assert_eq!(PageKey::from("home"), PageKey::Home);
        assert_eq!(PageKey::from("socials"), PageKey::Socials);
        assert_eq!(PageKey::from("bio"), PageKey::Custom("bio".into()));
        assert_eq!(PageKey::Custom("bio".into()).to_string(), "bio");
    }

    #[test]
    fn test_page_key_serializes_as_string() {
        let json = serde_json::to_string(&PageKey::Prices).unwrap();
        assert_eq!(json, "\"prices\"");
        let back: PageKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PageKey::Prices);
    }

    #[test]
    fn test_only_prices_has_legacy_key() {
        assert_eq!(
            PageKey::Prices.legacy_key(),
            Some(PageKey::Custom(LEGACY_PRICES_KEY.into()))
        );
        assert_eq!(PageKey::Home.legacy_key(), None);
    }

    #[test]
    fn test_default_blocks() {
        assert_eq!(PageKey::Home.default_blocks().len(), 1);
        assert!(PageKey::Work.default_blocks().is_empty());
        assert!(PageKey::Custom("nope".into()).default_blocks().is_empty());
    }

    #[test]
    fn test_move_at_edges_is_noop() {
        let mut seq = texts(&["a", "b"]);
        assert!(!seq.move_block(0, Direction::Up));
        assert!(!seq.move_block(1, Direction::Down));
        assert!(!seq.move_block(7, Direction::Down));
        assert_eq!(seq, texts(&["a", "b"]));
    }

    #[test]
    fn test_reorder_shifts_between() {
        let mut seq = texts(&["a", "b", "c", "d"]);
        seq.reorder(0, 2).unwrap();
        assert_eq!(seq, texts(&["b", "c", "a", "d"]));
        seq.reorder(3, 0).unwrap();
        assert_eq!(seq, texts(&["d", "b", "c", "a"]));
    }

    #[test]
    fn test_reorder_out_of_range() {
        let mut seq = texts(&["a"]);
        assert_eq!(
            seq.reorder(0, 3),
            Err(SequenceError::IndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_append_images() {
        let mut seq = PageSequence::default();
        assert_eq!(seq.append_images(["a.png", "b.png"]), 2);
        assert_eq!(seq.get(1).and_then(Block::effective_width), Some(400));
    }

    #[test]
    fn test_second_panel_layout_rejected() {
        let mut seq = PageSequence::default();
        seq.add_block(BlockKind::PanelLayout).unwrap();
        let before = seq.clone();
        assert_eq!(
            seq.add_block(BlockKind::PanelLayout),
            Err(SequenceError::PanelLayoutExists)
        );
        assert_eq!(seq, before);
    }
}
