//! Page Builder - the operator's editing session
//!
//! Owns the in-memory block sequence of every page, the selected page and
//! the save status. Structural edits are local until [`PageBuilder::save`]
//! writes the selected page wholesale. After every change the whole page map
//! is mirrored to the backup sink, if one is attached.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::core::block::{Block, BlockKind};
use crate::core::page::{Direction, PageKey, PageSequence, SequenceError};
use crate::core::validation::PageValidator;
use crate::editor::{self, BlockEdit, BlockEditor, EditError};
use crate::store::{
    BackupSink, ContentApi, LoadSource, MediaFile, PageStore, StoreError, Uploader,
};

/// Transient outcome of the last save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    /// `detail` is the raw failure text, e.g. the server's response body
    Failed { detail: String },
}

impl SaveStatus {
    /// Short label for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Saved => "Saved!",
            SaveStatus::Failed { .. } => "Save failed",
        }
    }
}

/// Editing session over a content API
pub struct PageBuilder<A> {
    store: PageStore<A>,
    pages: BTreeMap<PageKey, PageSequence>,
    selected: PageKey,
    status: SaveStatus,
    backup: Option<Box<dyn BackupSink>>,
}

impl<A: ContentApi> PageBuilder<A> {
    /// New session with every known page seeded from its built-in default
    /// and `home` selected. Nothing is loaded until [`select`](Self::select).
    pub fn new(api: A) -> Self {
        let pages = PageKey::KNOWN
            .iter()
            .map(|key| (key.clone(), PageSequence::new(key.default_blocks())))
            .collect();

        Self {
            store: PageStore::new(api),
            pages,
            selected: PageKey::Home,
            status: SaveStatus::Idle,
            backup: None,
        }
    }

    pub fn with_backup(mut self, sink: impl BackupSink + 'static) -> Self {
        self.backup = Some(Box::new(sink));
        self
    }

    pub fn store(&self) -> &PageStore<A> {
        &self.store
    }

    pub fn selected(&self) -> &PageKey {
        &self.selected
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn pages(&self) -> &BTreeMap<PageKey, PageSequence> {
        &self.pages
    }

    /// Blocks of the selected page.
    pub fn blocks(&self) -> &[Block] {
        self.pages
            .get(&self.selected)
            .map(PageSequence::blocks)
            .unwrap_or(&[])
    }

    /// Switch to `key` and replace its sequence with what the store loads.
    pub async fn select(&mut self, key: PageKey) -> LoadSource {
        let loaded = self.store.load(&key).await;
        debug!(page = %key, source = ?loaded.source, blocks = loaded.blocks.len(), "page selected");
        self.pages.insert(key.clone(), PageSequence::new(loaded.blocks));
        self.selected = key;
        self.mirror();
        loaded.source
    }

    /// Replace the selected page's sequence wholesale, e.g. from an import.
    pub fn replace_blocks(&mut self, blocks: Vec<Block>) {
        *self.current_mut() = PageSequence::new(blocks);
        self.mirror();
    }

    pub fn add_block(&mut self, kind: BlockKind) -> Result<usize, BuilderError> {
        let index = self.current_mut().add_block(kind)?;
        self.mirror();
        Ok(index)
    }

    pub fn delete_block(&mut self, index: usize) -> Result<Block, BuilderError> {
        let removed = self.current_mut().delete_block(index)?;
        self.mirror();
        Ok(removed)
    }

    /// Swap with a neighbour; `false` when already at that edge.
    pub fn move_block(&mut self, index: usize, direction: Direction) -> bool {
        let moved = self.current_mut().move_block(index, direction);
        if moved {
            self.mirror();
        }
        moved
    }

    pub fn reorder(&mut self, source: usize, destination: usize) -> Result<(), BuilderError> {
        self.current_mut().reorder(source, destination)?;
        self.mirror();
        Ok(())
    }

    pub fn update_block(&mut self, index: usize, block: Block) -> Result<(), BuilderError> {
        self.current_mut().update_block(index, block)?;
        self.mirror();
        Ok(())
    }

    /// Apply `edit` to the block at `index`; on error the block is unchanged.
    pub fn edit_block(&mut self, index: usize, edit: BlockEdit) -> Result<(), BuilderError> {
        let current = self.block_at(index)?;
        let edited = BlockEditor::apply(current, edit)?;
        self.update_block(index, edited)
    }

    pub fn append_images<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added = self.current_mut().append_images(urls);
        if added > 0 {
            self.mirror();
        }
        added
    }

    /// Upload `file` and point the media block at `index` at it.
    pub async fn upload_into(
        &mut self,
        index: usize,
        uploader: &dyn Uploader,
        file: MediaFile,
    ) -> Result<(), BuilderError> {
        let current = self.block_at(index)?.clone();
        let updated = editor::upload_media(&current, uploader, file).await?;
        self.update_block(index, updated)
    }

    /// Write the selected page and adopt the server's view of it.
    ///
    /// On failure the local sequence is left as it was and the status carries
    /// the failure text.
    pub async fn save(&mut self) -> Result<(), BuilderError> {
        let key = self.selected.clone();
        let blocks = self.blocks().to_vec();

        let report = PageValidator::validate(&blocks);
        for issue in &report.errors {
            warn!(page = %key, block = ?issue.block_index, "{}", issue.message);
        }
        for issue in &report.warnings {
            debug!(page = %key, block = ?issue.block_index, "{}", issue.message);
        }

        self.status = SaveStatus::Saving;
        match self.store.save(&key, &blocks).await {
            Ok(receipt) => {
                info!(page = %key, confirmed = receipt.confirmed, "save complete");
                self.pages.insert(key, PageSequence::new(receipt.blocks));
                self.status = SaveStatus::Saved;
                self.mirror();
                Ok(())
            }
            Err(e) => {
                warn!(page = %key, error = %e, "save failed");
                self.status = SaveStatus::Failed { detail: e.detail() };
                Err(e.into())
            }
        }
    }

    /// Back to [`SaveStatus::Idle`].
    pub fn clear_status(&mut self) {
        self.status = SaveStatus::Idle;
    }

    fn block_at(&self, index: usize) -> Result<&Block, BuilderError> {
        let blocks = self.blocks();
        blocks.get(index).ok_or(BuilderError::Sequence(SequenceError::IndexOutOfRange {
            index,
            len: blocks.len(),
        }))
    }

    fn current_mut(&mut self) -> &mut PageSequence {
        self.pages.entry(self.selected.clone()).or_default()
    }

    fn mirror(&self) {
        if let Some(sink) = &self.backup {
            if let Err(e) = sink.mirror(&self.pages) {
                warn!(error = %e, "page backup failed");
            }
        }
    }
}

/// Builder errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuilderError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBackup, MemoryContentApi};

    #[test]
    fn test_new_builder_seeds_defaults() {
        let builder = PageBuilder::new(MemoryContentApi::new());
        assert_eq!(builder.pages().len(), PageKey::KNOWN.len());
        assert_eq!(builder.selected(), &PageKey::Home);
        assert_eq!(builder.blocks(), PageKey::Home.default_blocks().as_slice());
        assert_eq!(builder.status(), &SaveStatus::Idle);
    }

    #[test]
    fn test_every_change_is_mirrored() {
        let backup = MemoryBackup::new();
        let mut builder = PageBuilder::new(MemoryContentApi::new()).with_backup(backup.clone());

        builder.add_block(BlockKind::Text).unwrap();
        builder.add_block(BlockKind::Image).unwrap();
        assert!(builder.move_block(2, Direction::Up));
        assert!(!builder.move_block(0, Direction::Up));
        builder.delete_block(0).unwrap();

        assert_eq!(backup.count(), 4);
        assert!(backup.latest().unwrap().contains("New text block"));
    }

    #[test]
    fn test_failed_edit_keeps_block() {
        let mut builder = PageBuilder::new(MemoryContentApi::new());
        let before = builder.blocks().to_vec();
        let err = builder.edit_block(0, BlockEdit::SetWidth(300)).unwrap_err();
        assert!(matches!(err, BuilderError::Edit(EditError::Mismatch { .. })));
        assert_eq!(builder.blocks(), before.as_slice());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(SaveStatus::Saved.label(), "Saved!");
        assert_eq!(
            SaveStatus::Failed {
                detail: "x".into()
            }
            .label(),
            "Save failed"
        );
    }
}
