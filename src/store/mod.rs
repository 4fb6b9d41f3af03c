//! Page Store - translation between block sequences and the content API
//!
//! Pages are persisted remotely as one opaque JSON string per page key. The
//! store reads them back tolerantly (anything unusable counts as "no content"
//! and falls back to the built-in default) and writes them wholesale, then
//! confirms the write with a public read so callers see what end users will
//! see.

pub mod backup;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::block::{Block, BlockError};
use crate::core::page::PageKey;

pub use backup::{BackupSink, FileBackup, MemoryBackup};
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpContentApi;
pub use memory::MemoryContentApi;

/// Credentials attached to a content API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credentials; the view end users get
    Public,
    /// Bearer token of the operator
    Operator,
}

/// Remote content API holding one serialized block sequence per page key
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Fetch the stored content for `key`. `Ok(None)` means no content.
    async fn fetch(&self, key: &str, access: Access) -> Result<Option<String>, StoreError>;

    /// Overwrite the stored content for `key`.
    async fn store(&self, key: &str, content: String) -> Result<(), StoreError>;
}

/// A local file handed to the upload collaborator
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Guess the MIME type from the file extension.
    pub fn guess_content_type(file_name: &str) -> &'static str {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" | "m4v" => "video/mp4",
            "webm" => "video/webm",
            "mov" => "video/quicktime",
            "mp3" => "audio/mpeg",
            "ogg" | "oga" => "audio/ogg",
            "wav" => "audio/wav",
            "m4a" => "audio/mp4",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// Upload collaborator: stores a file and returns the URL it is served at
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: MediaFile) -> Result<String, StoreError>;
}

/// Where a loaded sequence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    /// The page's own remote record
    Remote,
    /// The record of the page's retired key
    Legacy,
    /// Built-in default content
    Default,
}

/// Result of [`PageStore::load`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPage {
    pub blocks: Vec<Block>,
    pub source: LoadSource,
}

/// Result of a successful [`PageStore::save`]
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReceipt {
    /// The sequence callers should adopt as local state
    pub blocks: Vec<Block>,
    /// Whether `blocks` came from the confirmation read rather than the local copy
    pub confirmed: bool,
}

/// Page store over a content API
pub struct PageStore<A> {
    api: A,
}

impl<A: ContentApi> PageStore<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Load the sequence for `key`. Never fails: unusable remote content
    /// falls back to the legacy key (for `prices`) and then the default.
    pub async fn load(&self, key: &PageKey) -> LoadedPage {
        if let Some(blocks) = self.fetch_blocks(key, Access::Operator).await {
            debug!(page = %key, blocks = blocks.len(), "loaded page");
            return LoadedPage {
                blocks,
                source: LoadSource::Remote,
            };
        }

        if let Some(legacy) = key.legacy_key() {
            if let Some(blocks) = self.fetch_blocks(&legacy, Access::Public).await {
                info!(page = %key, legacy = %legacy, "loaded page from legacy key");
                return LoadedPage {
                    blocks,
                    source: LoadSource::Legacy,
                };
            }
        }

        debug!(page = %key, "no stored content, using default");
        LoadedPage {
            blocks: key.default_blocks(),
            source: LoadSource::Default,
        }
    }

    /// Overwrite the remote record for `key` with the whole sequence, then
    /// re-read it publicly.
    pub async fn save(&self, key: &PageKey, blocks: &[Block]) -> Result<SaveReceipt, StoreError> {
        let content = Block::serialize_sequence(blocks)?;
        let bytes = content.len();
        self.api.store(key.as_str(), content).await?;
        info!(page = %key, blocks = blocks.len(), bytes, "page saved");

        match self.fetch_blocks(key, Access::Public).await {
            Some(confirmed) => {
                if confirmed.as_slice() != blocks {
                    info!(page = %key, "server content differs from local copy, adopting server view");
                }
                Ok(SaveReceipt {
                    blocks: confirmed,
                    confirmed: true,
                })
            }
            None => {
                warn!(page = %key, "confirmation read returned no content, keeping local copy");
                Ok(SaveReceipt {
                    blocks: blocks.to_vec(),
                    confirmed: false,
                })
            }
        }
    }

    async fn fetch_blocks(&self, key: &PageKey, access: Access) -> Option<Vec<Block>> {
        match self.api.fetch(key.as_str(), access).await {
            Ok(Some(content)) if !content.is_empty() => match Block::parse_sequence(&content) {
                Ok(blocks) => Some(blocks),
                Err(e) => {
                    warn!(page = %key, error = %e, "stored content is not a block sequence");
                    None
                }
            },
            Ok(_) => None,
            Err(e) => {
                warn!(page = %key, error = %e, "page fetch failed");
                None
            }
        }
    }
}

/// Store errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Request never produced a response
    #[error("Network error: {0}")]
    Transport(String),

    /// Server answered with a failure status
    #[error("Request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Upload collaborator refused the file
    #[error("{0}")]
    Upload(String),

    /// Local backup could not be written
    #[error("Backup failed: {0}")]
    Backup(String),

    #[error(transparent)]
    Block(#[from] BlockError),
}

impl StoreError {
    /// Text shown to the operator: the raw response body for rejections.
    pub fn detail(&self) -> String {
        match self {
            StoreError::Rejected { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}
