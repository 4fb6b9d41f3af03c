//! In-process content API
//!
//! Holds page records in a shared map. Clones share the same records, so a
//! test can keep a handle while a builder owns another.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{Access, ContentApi, MediaFile, StoreError, Uploader};

#[derive(Debug, Default)]
struct Shared {
    pages: RwLock<HashMap<String, String>>,
    uploads: RwLock<Vec<MediaFile>>,
    writes: AtomicUsize,
    fail_writes: RwLock<Option<(u16, String)>>,
}

/// Content API backed by a map in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryContentApi {
    shared: Arc<Shared>,
}

impl MemoryContentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw record, bypassing the write counter.
    pub fn with_page(self, key: &str, content: impl Into<String>) -> Self {
        self.put(key, content);
        self
    }

    /// Replace a raw record, bypassing the write counter.
    pub fn put(&self, key: &str, content: impl Into<String>) {
        self.shared
            .pages
            .write()
            .insert(key.to_string(), content.into());
    }

    /// Raw stored content for `key`.
    pub fn content(&self, key: &str) -> Option<String> {
        self.shared.pages.read().get(key).cloned()
    }

    /// Number of successful `store` calls.
    pub fn writes(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }

    /// Files received through [`Uploader::upload`].
    pub fn uploads(&self) -> Vec<MediaFile> {
        self.shared.uploads.read().clone()
    }

    /// Make every following write fail with `status` and `body`; `None` restores writes.
    pub fn reject_writes(&self, rejection: Option<(u16, &str)>) {
        *self.shared.fail_writes.write() = rejection.map(|(status, body)| (status, body.to_string()));
    }
}

#[async_trait]
impl ContentApi for MemoryContentApi {
    async fn fetch(&self, key: &str, _access: Access) -> Result<Option<String>, StoreError> {
        Ok(self.content(key))
    }

    async fn store(&self, key: &str, content: String) -> Result<(), StoreError> {
        if let Some((status, body)) = self.shared.fail_writes.read().clone() {
            return Err(StoreError::Rejected { status, body });
        }
        self.shared.pages.write().insert(key.to_string(), content);
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Uploader for MemoryContentApi {
    async fn upload(&self, file: MediaFile) -> Result<String, StoreError> {
        if !(file.content_type.starts_with("video/") || file.content_type.starts_with("audio/")) {
            return Err(StoreError::Upload(
                "Only video and audio files are allowed".into(),
            ));
        }
        let mut uploads = self.shared.uploads.write();
        let url = format!("/uploads/{}-{}", uploads.len(), file.file_name);
        uploads.push(file);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_fetch() {
        let api = MemoryContentApi::new();
        assert_eq!(api.fetch("home", Access::Public).await.unwrap(), None);

        api.store("home", "[]".into()).await.unwrap();
        assert_eq!(
            api.fetch("home", Access::Public).await.unwrap().as_deref(),
            Some("[]")
        );
        assert_eq!(api.writes(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let api = MemoryContentApi::new();
        let other = api.clone();
        other.store("work", "[]".into()).await.unwrap();
        assert_eq!(api.content("work").as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_rejected_write_keeps_record() {
        let api = MemoryContentApi::new().with_page("home", "[]");
        api.reject_writes(Some((500, "boom")));
        let err = api.store("home", "[{}]".into()).await.unwrap_err();
        assert_eq!(err.detail(), "boom");
        assert_eq!(api.content("home").as_deref(), Some("[]"));
        assert_eq!(api.writes(), 0);
    }

    #[tokio::test]
    async fn test_upload_accepts_media_only() {
        let api = MemoryContentApi::new();
        let url = api
            .upload(MediaFile::new("clip.mp4", "video/mp4", vec![1, 2, 3]))
            .await
            .unwrap();
        assert!(url.ends_with("clip.mp4"));

        let err = api
            .upload(MediaFile::new("notes.txt", "text/plain", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Upload(_)));
        assert_eq!(api.uploads().len(), 1);
    }
}
