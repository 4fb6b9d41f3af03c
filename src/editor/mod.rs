//! Block Editor - immutable per-variant updates
//!
//! Every edit takes the current block and returns a fresh value; the input is
//! never touched. An edit aimed at the wrong variant is an error, and callers
//! keep the block they had.
//!
//! - Text, media, gallery and button field updates live here
//! - Panel grid edits live in [`grid`]
//! - Media uploads go through an [`Uploader`] and only replace the URL on success

pub mod grid;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::block::{Block, ButtonAction};
use crate::core::parameter::{IMAGE_WIDTH_RANGE, VIDEO_WIDTH_RANGE};
use crate::store::{MediaFile, StoreError, Uploader};

pub use grid::GridEdit;

/// One field-level change to a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum BlockEdit {
    /// Text markup
    SetContent(String),
    /// Image, video or audio source
    SetUrl(String),
    /// Image or video width, clamped to the slider range
    SetWidth(i64),
    SetImage { index: usize, url: String },
    /// Append an empty gallery slot
    AddImage,
    RemoveImage(usize),
    SetLabel(String),
    SetAction(ButtonAction),
    SetButtonUrl(String),
    SetNewTab(bool),
    SetSubject(String),
    SetMessage(String),
    Grid(GridEdit),
}

impl BlockEdit {
    pub fn name(&self) -> &'static str {
        match self {
            BlockEdit::SetContent(_) => "setContent",
            BlockEdit::SetUrl(_) => "setUrl",
            BlockEdit::SetWidth(_) => "setWidth",
            BlockEdit::SetImage { .. } => "setImage",
            BlockEdit::AddImage => "addImage",
            BlockEdit::RemoveImage(_) => "removeImage",
            BlockEdit::SetLabel(_) => "setLabel",
            BlockEdit::SetAction(_) => "setAction",
            BlockEdit::SetButtonUrl(_) => "setButtonUrl",
            BlockEdit::SetNewTab(_) => "setNewTab",
            BlockEdit::SetSubject(_) => "setSubject",
            BlockEdit::SetMessage(_) => "setMessage",
            BlockEdit::Grid(edit) => edit.name(),
        }
    }
}

/// Applies [`BlockEdit`]s
pub struct BlockEditor;

impl BlockEditor {
    pub fn apply(block: &Block, edit: BlockEdit) -> Result<Block, EditError> {
        let mut next = block.clone();

        match (&mut next, edit) {
            (Block::Text(text), BlockEdit::SetContent(content)) => text.content = content,

            (Block::Image(image), BlockEdit::SetUrl(url)) => image.url = url,
            (Block::Video(video), BlockEdit::SetUrl(url)) => video.url = url,
            (Block::Audio(audio), BlockEdit::SetUrl(url)) => audio.url = url,
            (Block::Image(image), BlockEdit::SetWidth(width)) => {
                image.width = Some(IMAGE_WIDTH_RANGE.clamp(width));
            }
            (Block::Video(video), BlockEdit::SetWidth(width)) => {
                video.width = Some(VIDEO_WIDTH_RANGE.clamp(width));
            }

            (Block::Gallery(gallery), BlockEdit::SetImage { index, url }) => {
                if let Some(slot) = gallery.images.get_mut(index) {
                    *slot = url;
                }
            }
            (Block::Gallery(gallery), BlockEdit::AddImage) => gallery.images.push(String::new()),
            (Block::Gallery(gallery), BlockEdit::RemoveImage(index)) => {
                if index < gallery.images.len() {
                    gallery.images.remove(index);
                }
            }

            (Block::Button(button), BlockEdit::SetLabel(label)) => button.label = label,
            (Block::Button(button), BlockEdit::SetAction(action)) => button.action = action,
            (Block::Button(button), BlockEdit::SetButtonUrl(url)) => button.url = url,
            (Block::Button(button), BlockEdit::SetNewTab(new_tab)) => button.new_tab = new_tab,
            (Block::Button(button), BlockEdit::SetSubject(subject)) => button.subject = subject,
            (Block::Button(button), BlockEdit::SetMessage(message)) => button.message = message,

            (Block::PanelLayout(layout), BlockEdit::Grid(edit)) => grid::apply(layout, edit)?,

            (_, edit) => {
                return Err(EditError::Mismatch {
                    edit: edit.name(),
                    block: block.type_name().unwrap_or("unknown").to_string(),
                })
            }
        }

        Ok(next)
    }
}

/// Upload `file` and point the media block at the returned URL.
///
/// On failure the caller's block is unchanged; nothing is written until the
/// uploader answers with a URL.
pub async fn upload_media(
    block: &Block,
    uploader: &dyn Uploader,
    file: MediaFile,
) -> Result<Block, EditError> {
    if block.media_url().is_none() {
        return Err(EditError::Mismatch {
            edit: "upload",
            block: block.type_name().unwrap_or("unknown").to_string(),
        });
    }

    let file_name = file.file_name.clone();
    match uploader.upload(file).await {
        Ok(url) => {
            debug!(file = %file_name, url = %url, "media uploaded");
            BlockEditor::apply(block, BlockEdit::SetUrl(url))
        }
        Err(e) => {
            warn!(file = %file_name, error = %e, "media upload failed");
            Err(EditError::Upload(e))
        }
    }
}

/// Edit errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Cannot apply {edit} to a {block} block")]
    Mismatch { edit: &'static str, block: String },

    #[error("Panel grids cannot be placed inside a panel")]
    NestedPanelLayout,

    #[error("No panel with id '{0}'")]
    UnknownPanel(String),

    #[error("Block index {index} out of range (panel has {len} blocks)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Upload failed: {0}")]
    Upload(StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{BlockKind, GalleryBlock, TextBlock};
    use crate::core::registry::BlockCatalog;

    fn gallery(urls: &[&str]) -> Block {
        Block::Gallery(GalleryBlock {
            images: urls.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_apply_returns_fresh_value() {
        let before = Block::Text(TextBlock {
            content: "old".into(),
        });
        let after = BlockEditor::apply(&before, BlockEdit::SetContent("new".into())).unwrap();
        assert_eq!(
            after,
            Block::Text(TextBlock {
                content: "new".into()
            })
        );
        assert_eq!(
            before,
            Block::Text(TextBlock {
                content: "old".into()
            })
        );
    }

    #[test]
    fn test_width_is_clamped() {
        let image = BlockCatalog::create(BlockKind::Image);
        let wide = BlockEditor::apply(&image, BlockEdit::SetWidth(5000)).unwrap();
        assert_eq!(wide.effective_width(), Some(1200));
        let narrow = BlockEditor::apply(&image, BlockEdit::SetWidth(-3)).unwrap();
        assert_eq!(narrow.effective_width(), Some(100));

        let video = BlockCatalog::create(BlockKind::Video);
        let small = BlockEditor::apply(&video, BlockEdit::SetWidth(10)).unwrap();
        assert_eq!(small.effective_width(), Some(240));
    }

    #[test]
    fn test_gallery_remove_keeps_order() {
        let block = gallery(&["a", "b", "c"]);
        let after = BlockEditor::apply(&block, BlockEdit::RemoveImage(1)).unwrap();
        assert_eq!(after, gallery(&["a", "c"]));
    }

    #[test]
    fn test_gallery_out_of_range_is_noop() {
        let block = gallery(&["a"]);
        assert_eq!(
            BlockEditor::apply(&block, BlockEdit::RemoveImage(4)).unwrap(),
            block
        );
        assert_eq!(
            BlockEditor::apply(
                &block,
                BlockEdit::SetImage {
                    index: 9,
                    url: "x".into()
                }
            )
            .unwrap(),
            block
        );
        assert_eq!(
            BlockEditor::apply(&block, BlockEdit::AddImage).unwrap(),
            gallery(&["a", ""])
        );
    }

    #[test]
    fn test_switching_action_keeps_latent_fields() {
        let button = BlockCatalog::create(BlockKind::Button);
        let button = BlockEditor::apply(&button, BlockEdit::SetSubject("Hi".into())).unwrap();
        let button = BlockEditor::apply(&button, BlockEdit::SetAction(ButtonAction::Url)).unwrap();
        let button =
            BlockEditor::apply(&button, BlockEdit::SetButtonUrl("https://x.y".into())).unwrap();
        let button =
            BlockEditor::apply(&button, BlockEdit::SetAction(ButtonAction::Contact)).unwrap();

        match button {
            Block::Button(b) => {
                assert_eq!(b.subject, "Hi");
                assert_eq!(b.url, "https://x.y");
                assert_eq!(b.action, ButtonAction::Contact);
            }
            other => panic!("expected button, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_edit_is_rejected() {
        let text = BlockCatalog::create(BlockKind::Text);
        let err = BlockEditor::apply(&text, BlockEdit::SetWidth(300)).unwrap_err();
        assert_eq!(
            err,
            EditError::Mismatch {
                edit: "setWidth",
                block: "text".into()
            }
        );
    }

    #[test]
    fn test_edit_json_shape() {
        let edit: BlockEdit =
            serde_json::from_str(r#"{"op":"setImage","value":{"index":0,"url":"a.png"}}"#).unwrap();
        assert_eq!(
            edit,
            BlockEdit::SetImage {
                index: 0,
                url: "a.png".into()
            }
        );
        let edit: BlockEdit = serde_json::from_str(r#"{"op":"addImage"}"#).unwrap();
        assert_eq!(edit, BlockEdit::AddImage);
    }
}
