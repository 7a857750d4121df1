//! In-memory storage backend for testing

use crate::traits::{
    ObjectStat, ObjectStorage, ObjectStream, StorageError, StorageObject, StorageResult,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug, Clone)]
struct ObjectRecord {
    data: Vec<u8>,
    content_type: String,
    modified: DateTime<Utc>,
    tag: String,
}

impl ObjectRecord {
    fn stat(&self) -> ObjectStat {
        ObjectStat {
            content_type: self.content_type.clone(),
            size: self.data.len() as u64,
            tag: self.tag.clone(),
            modified: self.modified,
        }
    }
}

/// Storage backend that keeps objects in memory.
///
/// Mirrors the S3 backend's semantics: non-recursive listing, `NotFound` on
/// stat/get/delete of absent keys, silent replace on put.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, ObjectRecord>>>,
    versions: Arc<AtomicU64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an object directly (for test setup).
    pub fn set_object(&self, key: &str, content_type: &str, data: Vec<u8>) {
        let record = ObjectRecord {
            data,
            content_type: content_type.to_string(),
            modified: Utc::now(),
            tag: self.next_tag(),
        };
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), record);
    }

    /// Check if an object exists (for test assertions).
    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// Get object data (for test assertions).
    pub fn object_data(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).map(|r| r.data.clone())
    }

    /// Number of stored objects (for test assertions).
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    fn next_tag(&self) -> String {
        format!("\"{:016x}\"", self.versions.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StorageObject>> {
        let objects = self.objects.lock().unwrap();
        let mut listed: Vec<StorageObject> = objects
            .iter()
            .filter(|(key, _)| {
                key.starts_with(prefix) && !key[prefix.len()..].contains('/')
            })
            .map(|(key, record)| StorageObject {
                key: key.clone(),
                size: record.data.len() as u64,
                modified: record.modified,
                tag: Some(record.tag.clone()),
            })
            .collect();
        // HashMap order is arbitrary; S3 lists keys lexicographically.
        listed.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(listed)
    }

    async fn stat(&self, key: &str) -> StorageResult<ObjectStat> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(ObjectRecord::stat)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn get(&self, key: &str) -> StorageResult<(ObjectStat, ObjectStream)> {
        let record = self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        let stat = record.stat();
        let data = Bytes::from(record.data);
        let byte_stream = stream::once(async move { Ok(data) });
        Ok((stat, Box::pin(byte_stream)))
    }

    async fn put(
        &self,
        key: &str,
        content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<()> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        self.set_object(key, content_type, data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(())
    }
}
