//! Page Renderer - read-only view of a stored page
//!
//! Turns a block sequence into a render tree for one measured container
//! width. Unknown blocks and panel grids nested inside a panel produce no
//! node. Clicks are modelled as [`Activation`] values that the host delivers
//! to an [`InteractionHandler`] it passes in explicitly.

pub mod html;

use serde::{Deserialize, Serialize};

use crate::core::block::{Block, ButtonAction, ButtonBlock};
use crate::core::layout::{GridGeometry, PanelLayout, Placement, Rect};

/// Width of one gallery thumbnail in pixels.
pub const GALLERY_THUMB_WIDTH: u32 = 180;
/// Smallest height of a panel grid container.
pub const PANEL_MIN_HEIGHT: f64 = 80.0;
/// Label of a button whose label is empty.
pub const DEFAULT_BUTTON_LABEL: &str = "Button";
/// Contact form title when the button has no subject.
pub const DEFAULT_CONTACT_TITLE: &str = "Contact";

/// Prefilled values for the contact form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPrefill {
    pub title: String,
    pub subject: String,
    pub message: String,
}

/// What a click asks the host to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Activation {
    /// Show `url` in the full-screen preview overlay
    Preview { url: String },
    Navigate { url: String, new_tab: bool },
    OpenContact(ContactPrefill),
}

impl Activation {
    /// Click behaviour of a button: navigate only for a `url` action with a
    /// non-empty URL, otherwise open the contact form.
    pub fn for_button(button: &ButtonBlock) -> Self {
        if button.action == ButtonAction::Url && !button.url.is_empty() {
            return Activation::Navigate {
                url: button.url.clone(),
                new_tab: button.new_tab,
            };
        }
        let title = if button.subject.is_empty() {
            DEFAULT_CONTACT_TITLE.to_string()
        } else {
            button.subject.clone()
        };
        Activation::OpenContact(ContactPrefill {
            title,
            subject: button.subject.clone(),
            message: button.message.clone(),
        })
    }
}

/// Capabilities the host grants the renderer
pub trait InteractionHandler {
    fn open_preview(&self, url: &str);
    fn navigate(&self, url: &str, new_tab: bool);
    fn open_contact(&self, prefill: &ContactPrefill);
}

/// Deliver `activation` to `handler`.
pub fn dispatch(activation: &Activation, handler: &dyn InteractionHandler) {
    match activation {
        Activation::Preview { url } => handler.open_preview(url),
        Activation::Navigate { url, new_tab } => handler.navigate(url, *new_tab),
        Activation::OpenContact(prefill) => handler.open_contact(prefill),
    }
}

/// Part of a node that was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    /// The node itself
    Node,
    /// One entry of a gallery
    Item(usize),
}

/// One rendered block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum RenderNode {
    /// Text markup, inserted as-is
    Html { markup: String },
    Image { url: String, width: u32 },
    Video { url: String, width: u32 },
    Audio { url: String },
    /// Non-empty gallery URLs only
    Gallery { images: Vec<String> },
    Button { label: String, on_click: Activation },
    Panels(PanelView),
}

impl RenderNode {
    pub fn activate(&self, target: Target) -> Option<Activation> {
        match (self, target) {
            (RenderNode::Image { url, .. }, Target::Node) if !url.is_empty() => {
                Some(Activation::Preview { url: url.clone() })
            }
            (RenderNode::Gallery { images }, Target::Item(i)) => images
                .get(i)
                .map(|url| Activation::Preview { url: url.clone() }),
            (RenderNode::Button { on_click, .. }, Target::Node) => Some(on_click.clone()),
            _ => None,
        }
    }
}

/// Absolutely positioned panel of a grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub id: String,
    pub rect: Rect,
    pub children: Vec<RenderNode>,
    #[serde(skip)]
    placement: Placement,
}

/// Rendered panel grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub regions: Vec<Region>,
    /// Container height in pixels
    pub height: f64,
    #[serde(skip)]
    cols: u32,
    #[serde(skip)]
    row_height: u32,
    #[serde(skip)]
    margin: [u32; 2],
}

impl PanelView {
    fn build(layout: &PanelLayout, width: f64) -> Self {
        let regions = layout
            .layout
            .iter()
            .map(|placement| Region {
                id: placement.id.clone(),
                rect: Rect::default(),
                children: layout
                    .panel_blocks(&placement.id)
                    .iter()
                    .filter_map(|b| Renderer::node(b, true, width))
                    .collect(),
                placement: placement.clone(),
            })
            .collect();

        let mut view = Self {
            regions,
            height: PANEL_MIN_HEIGHT,
            cols: layout.cols,
            row_height: layout.row_height,
            margin: layout.margin,
        };
        view.layout_regions(width);
        view
    }

    fn layout_regions(&mut self, width: f64) {
        let geometry = GridGeometry::new(self.cols, self.row_height, self.margin, width);
        let mut bottom: f64 = 0.0;
        for region in &mut self.regions {
            region.rect = geometry.rect(&region.placement);
            bottom = bottom.max(region.rect.bottom());
        }
        self.height = bottom.max(PANEL_MIN_HEIGHT);
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }
}

/// Address of a clickable node in a [`RenderedPage`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePath {
    /// Index into [`RenderedPage::nodes`]
    pub node: usize,
    /// Region id and child index, for nodes inside a panel grid
    #[serde(default)]
    pub panel: Option<(String, usize)>,
}

/// Render tree of one page at one container width
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub width: f64,
    pub nodes: Vec<RenderNode>,
}

impl RenderedPage {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Re-layout panel regions for a new container width. Returns `false`
    /// when the width did not change.
    pub fn resize(&mut self, width: f64) -> bool {
        if (width - self.width).abs() < f64::EPSILON {
            return false;
        }
        self.width = width;
        for node in &mut self.nodes {
            if let RenderNode::Panels(view) = node {
                view.layout_regions(width);
            }
        }
        true
    }

    pub fn node(&self, path: &NodePath) -> Option<&RenderNode> {
        let node = self.nodes.get(path.node)?;
        match (&path.panel, node) {
            (None, _) => Some(node),
            (Some((id, child)), RenderNode::Panels(view)) => view.region(id)?.children.get(*child),
            (Some(_), _) => None,
        }
    }

    pub fn activate(&self, path: &NodePath, target: Target) -> Option<Activation> {
        self.node(path)?.activate(target)
    }
}

/// Builds [`RenderedPage`]s
pub struct Renderer;

impl Renderer {
    pub fn render(blocks: &[Block], container_width: f64) -> RenderedPage {
        RenderedPage {
            width: container_width,
            nodes: blocks
                .iter()
                .filter_map(|b| Self::node(b, false, container_width))
                .collect(),
        }
    }

    fn node(block: &Block, nested: bool, width: f64) -> Option<RenderNode> {
        let node = match block {
            Block::Text(text) => RenderNode::Html {
                markup: text.content.clone(),
            },
            Block::Image(image) => RenderNode::Image {
                url: image.url.clone(),
                width: block.effective_width()?,
            },
            Block::Video(video) => RenderNode::Video {
                url: video.url.clone(),
                width: block.effective_width()?,
            },
            Block::Audio(audio) => RenderNode::Audio {
                url: audio.url.clone(),
            },
            Block::Gallery(gallery) => RenderNode::Gallery {
                images: gallery
                    .images
                    .iter()
                    .filter(|url| !url.is_empty())
                    .cloned()
                    .collect(),
            },
            Block::Button(button) => RenderNode::Button {
                label: if button.label.is_empty() {
                    DEFAULT_BUTTON_LABEL.to_string()
                } else {
                    button.label.clone()
                },
                on_click: Activation::for_button(button),
            },
            Block::PanelLayout(_) if nested => return None,
            Block::PanelLayout(layout) => RenderNode::Panels(PanelView::build(layout, width)),
            Block::Unknown(_) => return None,
        };
        Some(node)
    }
}
