//! Page validation
//!
//! Checks a block sequence against the page invariants before it is saved:
//! panel-layout uniqueness, placement/panel correspondence, nesting depth and
//! positive widths. Produces a `PageValidationResult`; callers decide what to
//! do with it. The builder only logs it, since stored pages are tolerated
//! even when they break these rules.

use std::collections::HashSet;

use serde::Serialize;

use super::block::{Block, ImageBlock, VideoBlock};
use super::layout::PanelLayout;

// ── Result types ────────────────────────────────────────────────────────────

/// A single validation issue with optional location and suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Index of the top-level block where the problem was found.
    pub block_index: Option<usize>,
    /// Human-readable description.
    pub message: String,
    /// Optional suggestion for how to fix it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Overall validation result.
#[derive(Debug, Clone, Serialize)]
pub struct PageValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl PageValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn add_error(&mut self, index: Option<usize>, message: impl Into<String>, suggestion: Option<&str>) {
        self.valid = false;
        self.errors.push(ValidationIssue {
            block_index: index,
            message: message.into(),
            suggestion: suggestion.map(|s| s.to_string()),
        });
    }

    fn add_warning(&mut self, index: Option<usize>, message: impl Into<String>, suggestion: Option<&str>) {
        self.warnings.push(ValidationIssue {
            block_index: index,
            message: message.into(),
            suggestion: suggestion.map(|s| s.to_string()),
        });
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// ── Validator ───────────────────────────────────────────────────────────────

/// Validates the block sequence of one page.
pub struct PageValidator;

impl PageValidator {
    pub fn validate(blocks: &[Block]) -> PageValidationResult {
        let mut result = PageValidationResult::ok();

        let grids: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_panel_layout())
            .map(|(i, _)| i)
            .collect();
        if grids.len() > 1 {
            result.add_error(
                grids.get(1).copied(),
                format!("Page has {} panel grids; at most one is allowed", grids.len()),
                Some("Move the panels into a single grid and delete the others"),
            );
        }

        for (index, block) in blocks.iter().enumerate() {
            Self::check_block(&mut result, index, block, false);
        }

        result
    }

    fn check_block(result: &mut PageValidationResult, index: usize, block: &Block, nested: bool) {
        match block {
            Block::Image(ImageBlock { width: Some(0), .. })
            | Block::Video(VideoBlock { width: Some(0), .. }) => {
                result.add_error(
                    Some(index),
                    "Width must be positive",
                    Some("Remove the width to use the default"),
                );
            }
            Block::PanelLayout(grid) => {
                if nested {
                    result.add_error(
                        Some(index),
                        "Panel grids cannot be nested inside a panel",
                        Some("Delete the inner grid"),
                    );
                } else {
                    Self::check_grid(result, index, grid);
                }
            }
            Block::Unknown(_) => {
                let name = block.type_name().unwrap_or("<missing>");
                result.add_warning(
                    Some(index),
                    format!("Block of unrecognised type '{}' will not be displayed", name),
                    None,
                );
            }
            Block::Text(_)
            | Block::Image(_)
            | Block::Video(_)
            | Block::Audio(_)
            | Block::Gallery(_)
            | Block::Button(_) => {}
        }
    }

    fn check_grid(result: &mut PageValidationResult, index: usize, grid: &PanelLayout) {
        if grid.cols == 0 {
            result.add_warning(
                Some(index),
                "Panel grid has zero columns",
                Some("Use the default of 12 columns"),
            );
        }

        let mut seen = HashSet::new();
        for placement in &grid.layout {
            if !seen.insert(placement.id.as_str()) {
                result.add_error(
                    Some(index),
                    format!("Duplicate panel id '{}'", placement.id),
                    None,
                );
            }
            if !grid.panels.contains_key(&placement.id) {
                result.add_error(
                    Some(index),
                    format!("Panel '{}' has no content entry", placement.id),
                    Some("Remove the panel and add it again"),
                );
            }
            if placement.w == 0 || placement.h == 0 {
                result.add_warning(
                    Some(index),
                    format!("Panel '{}' has zero size", placement.id),
                    None,
                );
            }
        }

        for orphan in grid.orphaned_panels() {
            result.add_warning(
                Some(index),
                format!("Panel content '{}' has no placement and is ignored", orphan),
                None,
            );
        }

        for panel in grid.panels.values() {
            for inner in &panel.blocks {
                Self::check_block(result, index, inner, true);
            }
        }
    }
}
