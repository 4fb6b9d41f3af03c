//! Panel grid edits
//!
//! Placement changes mirror what the grid widget reports on drag/resize stop;
//! pinned placements ignore them. Nested blocks are edited through the same
//! [`BlockEditor`] as top-level ones, one level deep.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BlockEdit, BlockEditor, EditError};
use crate::core::block::{Block, BlockKind};
use crate::core::layout::{Panel, PanelLayout, Placement, NEW_PLACEMENT_H, NEW_PLACEMENT_W};
use crate::core::registry::BlockCatalog;

/// One change to a panel layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum GridEdit {
    /// New empty panel under the lowest occupied row
    AddPlacement,
    RemovePlacement { id: String },
    TogglePin { id: String },
    DragStop { id: String, x: u32, y: u32 },
    ResizeStop { id: String, w: u32, h: u32 },
    AddNested { id: String, kind: BlockKind },
    UpdateNested { id: String, index: usize, block: Block },
    EditNested { id: String, index: usize, edit: Box<BlockEdit> },
    DeleteNested { id: String, index: usize },
}

impl GridEdit {
    pub fn name(&self) -> &'static str {
        match self {
            GridEdit::AddPlacement => "addPlacement",
            GridEdit::RemovePlacement { .. } => "removePlacement",
            GridEdit::TogglePin { .. } => "togglePin",
            GridEdit::DragStop { .. } => "dragStop",
            GridEdit::ResizeStop { .. } => "resizeStop",
            GridEdit::AddNested { .. } => "addNested",
            GridEdit::UpdateNested { .. } => "updateNested",
            GridEdit::EditNested { .. } => "editNested",
            GridEdit::DeleteNested { .. } => "deleteNested",
        }
    }
}

/// Fresh placement id.
pub fn new_placement_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Apply `edit` to `layout` in place. The caller works on a copy.
pub(crate) fn apply(layout: &mut PanelLayout, edit: GridEdit) -> Result<(), EditError> {
    match edit {
        GridEdit::AddPlacement => {
            let id = new_placement_id();
            let w = if layout.cols > 0 {
                NEW_PLACEMENT_W.min(layout.cols)
            } else {
                NEW_PLACEMENT_W
            };
            let y = layout.next_free_row();
            layout
                .layout
                .push(Placement::new(id.clone(), 0, y, w, NEW_PLACEMENT_H));
            layout.panels.insert(id, Panel::default());
        }

        GridEdit::RemovePlacement { id } => {
            let before = layout.layout.len();
            layout.layout.retain(|p| p.id != id);
            if layout.layout.len() == before {
                return Err(EditError::UnknownPanel(id));
            }
            layout.panels.remove(&id);
        }

        GridEdit::TogglePin { id } => {
            let placement = placement_mut(layout, &id)?;
            placement.pinned = !placement.pinned;
        }

        GridEdit::DragStop { id, x, y } => {
            let cols = layout.cols;
            let placement = placement_mut(layout, &id)?;
            if !placement.pinned {
                placement.x = if cols > 0 {
                    x.min(cols.saturating_sub(placement.w))
                } else {
                    x
                };
                placement.y = y;
            }
        }

        GridEdit::ResizeStop { id, w, h } => {
            let cols = layout.cols;
            let placement = placement_mut(layout, &id)?;
            if !placement.pinned {
                let max_w = if cols > 0 {
                    cols.saturating_sub(placement.x).max(1)
                } else {
                    u32::MAX
                };
                placement.w = w.clamp(1, max_w);
                placement.h = h.max(1);
            }
        }

        GridEdit::AddNested { id, kind } => {
            let block = BlockCatalog::create_nested(kind).ok_or(EditError::NestedPanelLayout)?;
            panel_mut(layout, &id)?.blocks.push(block);
        }

        GridEdit::UpdateNested { id, index, block } => {
            if block.is_panel_layout() {
                return Err(EditError::NestedPanelLayout);
            }
            *nested_mut(layout, &id, index)? = block;
        }

        GridEdit::EditNested { id, index, edit } => {
            let slot = nested_mut(layout, &id, index)?;
            let edited = BlockEditor::apply(slot, *edit)?;
            *slot = edited;
        }

        GridEdit::DeleteNested { id, index } => {
            let panel = panel_mut(layout, &id)?;
            if index >= panel.blocks.len() {
                return Err(EditError::IndexOutOfRange {
                    index,
                    len: panel.blocks.len(),
                });
            }
            panel.blocks.remove(index);
        }
    }

    Ok(())
}

fn placement_mut<'a>(layout: &'a mut PanelLayout, id: &str) -> Result<&'a mut Placement, EditError> {
    layout
        .layout
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| EditError::UnknownPanel(id.to_string()))
}

/// Panel content of a placed panel, created empty if it was missing.
fn panel_mut<'a>(layout: &'a mut PanelLayout, id: &str) -> Result<&'a mut Panel, EditError> {
    if layout.placement(id).is_none() {
        return Err(EditError::UnknownPanel(id.to_string()));
    }
    Ok(layout.panels.entry(id.to_string()).or_default())
}

fn nested_mut<'a>(
    layout: &'a mut PanelLayout,
    id: &str,
    index: usize,
) -> Result<&'a mut Block, EditError> {
    let panel = panel_mut(layout, id)?;
    let len = panel.blocks.len();
    panel
        .blocks
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { index, len })
}
