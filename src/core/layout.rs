//! Panel grid model and geometry
//!
//! A panel layout places sub-panels on a column grid. Each placement is
//! addressed in grid units; [`GridGeometry`] turns those into pixel
//! rectangles for a measured container width.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::block::Block;

pub const DEFAULT_COLS: u32 = 12;
pub const DEFAULT_ROW_HEIGHT: u32 = 30;
pub const DEFAULT_MARGIN: [u32; 2] = [10, 10];

/// Width in grid columns of a freshly added placement.
pub const NEW_PLACEMENT_W: u32 = 4;
/// Height in grid rows of a freshly added placement.
pub const NEW_PLACEMENT_H: u32 = 6;

fn default_cols() -> u32 {
    DEFAULT_COLS
}

fn default_row_height() -> u32 {
    DEFAULT_ROW_HEIGHT
}

fn default_margin() -> [u32; 2] {
    DEFAULT_MARGIN
}

/// Grid-layout block: placements plus the nested block sequence of each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    #[serde(default = "default_cols")]
    pub cols: u32,
    #[serde(default = "default_row_height", rename = "rowHeight")]
    pub row_height: u32,
    #[serde(default = "default_margin")]
    pub margin: [u32; 2],
    #[serde(default)]
    pub layout: Vec<Placement>,
    #[serde(default)]
    pub panels: BTreeMap<String, Panel>,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            row_height: DEFAULT_ROW_HEIGHT,
            margin: DEFAULT_MARGIN,
            layout: Vec::new(),
            panels: BTreeMap::new(),
        }
    }
}

impl PanelLayout {
    /// First row below every occupied cell.
    pub fn next_free_row(&self) -> u32 {
        self.layout.iter().map(|p| p.y.saturating_add(p.h)).max().unwrap_or(0)
    }

    pub fn placement(&self, id: &str) -> Option<&Placement> {
        self.layout.iter().find(|p| p.id == id)
    }

    /// Nested blocks of a placement; missing panels read as empty.
    pub fn panel_blocks(&self, id: &str) -> &[Block] {
        self.panels
            .get(id)
            .map(|p| p.blocks.as_slice())
            .unwrap_or(&[])
    }

    /// Panel entries with no placement referring to them.
    pub fn orphaned_panels(&self) -> Vec<&str> {
        self.panels
            .keys()
            .filter(|id| self.placement(id).is_none())
            .map(|id| id.as_str())
            .collect()
    }

    pub fn geometry(&self, container_width: f64) -> GridGeometry {
        GridGeometry::new(self.cols, self.row_height, self.margin, container_width)
    }
}

/// Grid coordinates of one sub-panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(rename = "i")]
    pub id: String,
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub y: u32,
    #[serde(default = "one")]
    pub w: u32,
    #[serde(default = "one")]
    pub h: u32,
    /// Pinned placements cannot be dragged or resized.
    #[serde(default, rename = "static", skip_serializing_if = "std::ops::Not::not")]
    pub pinned: bool,
}

fn one() -> u32 {
    1
}

impl Placement {
    pub fn new(id: impl Into<String>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            pinned: false,
        }
    }
}

/// Nested content of one placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Absolute pixel rectangle inside the layout container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Pixel metrics of a grid for one container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub col_width: f64,
    pub row_height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl GridGeometry {
    /// Column width is `(width − (cols−1)·mx) / cols`, never below 1px.
    /// A zero-column grid spans the whole container with one column.
    pub fn new(cols: u32, row_height: u32, margin: [u32; 2], container_width: f64) -> Self {
        let margin_x = margin[0] as f64;
        let margin_y = margin[1] as f64;
        let col_width = if cols > 0 {
            let cols = cols as f64;
            ((container_width - (cols - 1.0) * margin_x) / cols).max(1.0)
        } else {
            container_width
        };

        Self {
            col_width,
            row_height: row_height as f64,
            margin_x,
            margin_y,
        }
    }

    pub fn rect(&self, placement: &Placement) -> Rect {
        let (x, y, w, h) = (
            placement.x as f64,
            placement.y as f64,
            placement.w as f64,
            placement.h as f64,
        );

        Rect {
            left: x * (self.col_width + self.margin_x),
            top: y * (self.row_height + self.margin_y),
            width: w * self.col_width + (w - 1.0) * self.margin_x,
            height: h * self.row_height + (h - 1.0) * self.margin_y,
        }
    }

    /// Height needed to show every placement.
    pub fn content_height(&self, placements: &[Placement]) -> f64 {
        placements
            .iter()
            .map(|p| self.rect(p).bottom())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_reference_geometry() {
        let geometry = GridGeometry::new(12, 30, [10, 10], 970.0);
        assert!(approx(geometry.col_width, 860.0 / 12.0));

        let rect = geometry.rect(&Placement::new("a", 0, 0, 4, 6));
        assert!(approx(rect.width, 4.0 * (860.0 / 12.0) + 30.0));
        assert!(approx(rect.height, 230.0));
        assert_eq!(rect.left, 0.0);
        assert_eq!(rect.top, 0.0);
    }

    #[test]
    fn test_offset_placement() {
        let geometry = GridGeometry::new(12, 30, [10, 10], 970.0);
        let rect = geometry.rect(&Placement::new("b", 4, 6, 2, 1));
        assert!(approx(rect.left, 4.0 * (geometry.col_width + 10.0)));
        assert!(approx(rect.top, 6.0 * 40.0));
        assert!(approx(rect.height, 30.0));
    }

    #[test]
    fn test_col_width_has_one_pixel_floor() {
        let geometry = GridGeometry::new(12, 30, [10, 10], 0.0);
        assert_eq!(geometry.col_width, 1.0);
    }

    #[test]
    fn test_zero_cols_spans_container() {
        let geometry = GridGeometry::new(0, 30, [10, 10], 500.0);
        assert_eq!(geometry.col_width, 500.0);
    }

    #[test]
    fn test_next_free_row() {
        let mut layout = PanelLayout::default();
        assert_eq!(layout.next_free_row(), 0);
        layout.layout.push(Placement::new("a", 0, 0, 4, 6));
        layout.layout.push(Placement::new("b", 4, 2, 4, 10));
        assert_eq!(layout.next_free_row(), 12);
    }

    #[test]
    fn test_orphaned_panels() {
        let mut layout = PanelLayout::default();
        layout.layout.push(Placement::new("a", 0, 0, 4, 6));
        layout.panels.insert("a".into(), Panel::default());
        layout.panels.insert("gone".into(), Panel::default());
        assert_eq!(layout.orphaned_panels(), vec!["gone"]);
    }

    #[test]
    fn test_placement_wire_names() {
        let mut placement = Placement::new("p1", 1, 2, 3, 4);
        placement.pinned = true;
        let value = serde_json::to_value(&placement).unwrap();
        assert_eq!(value["i"], "p1");
        assert_eq!(value["static"], true);

        placement.pinned = false;
        let value = serde_json::to_value(&placement).unwrap();
        assert!(value.get("static").is_none());
    }

    #[test]
    fn test_content_height() {
        let geometry = GridGeometry::new(12, 30, [10, 10], 970.0);
        let placements = vec![
            Placement::new("a", 0, 0, 4, 6),
            Placement::new("b", 0, 6, 4, 2),
        ];
        assert!(approx(geometry.content_height(&placements), 240.0 + 70.0));
    }
}
