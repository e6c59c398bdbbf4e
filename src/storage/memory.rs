//! In-memory blob store.
//!
//! Same observable behavior as the GridFS store: ids issued at channel
//! creation, objects visible only after close, identical content stored
//! twice gets two ids. Backs unit tests and storage-free local runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};
use mongodb::bson::oid::ObjectId;

use super::{BlobStore, BlobWriter, ByteStream, StorageError};

struct StoredObject {
    #[allow(dead_code)]
    filename: String,
    data: Vec<u8>,
}

type ObjectMap = Arc<Mutex<HashMap<ObjectId, StoredObject>>>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    objects: ObjectMap,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of finalized objects.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct MemoryWriter {
    id: ObjectId,
    filename: String,
    buffer: Vec<u8>,
    finished: bool,
    objects: ObjectMap,
}

#[async_trait]
impl BlobWriter for MemoryWriter {
    fn id(&self) -> ObjectId {
        self.id
    }

    async fn write(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        if !self.finished {
            self.finished = true;
            self.objects.lock().unwrap().insert(
                self.id,
                StoredObject {
                    filename: std::mem::take(&mut self.filename),
                    data: std::mem::take(&mut self.buffer),
                },
            );
        }
        Ok(())
    }

    async fn abort(&mut self) -> Result<(), StorageError> {
        self.finished = true;
        self.buffer.clear();
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn open_write(&self, filename: &str) -> Result<Box<dyn BlobWriter>, StorageError> {
        Ok(Box::new(MemoryWriter {
            id: ObjectId::new(),
            filename: filename.to_string(),
            buffer: Vec::new(),
            finished: false,
            objects: Arc::clone(&self.objects),
        }))
    }

    async fn put(&self, filename: &str, data: &[u8]) -> Result<ObjectId, StorageError> {
        let mut writer = self.open_write(filename).await?;
        let id = writer.id();
        writer.write(data).await?;
        writer.close().await?;
        Ok(id)
    }

    async fn open_read(&self, id: ObjectId) -> Result<ByteStream, StorageError> {
        let data = self
            .objects
            .lock()
            .unwrap()
            .get(&id)
            .map(|object| object.data.clone())
            .ok_or(StorageError::NotFound(id))?;

        Ok(stream::once(async move { Ok(Bytes::from(data)) }).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_all(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_put_then_read_roundtrip() {
        let store = MemoryStore::new();
        let id = store.put("clip.mp4", b"binary payload").await.unwrap();

        let stream = store.open_read(id).await.unwrap();
        assert_eq!(read_all(stream).await, b"binary payload");
    }

    #[tokio::test]
    async fn test_object_invisible_until_close() {
        let store = MemoryStore::new();
        let mut writer = store.open_write("staged.bin").await.unwrap();
        let id = writer.id();
        writer.write(b"partial").await.unwrap();

        assert!(matches!(
            store.open_read(id).await,
            Err(StorageError::NotFound(_))
        ));

        writer.close().await.unwrap();
        let stream = store.open_read(id).await.unwrap();
        assert_eq!(read_all(stream).await, b"partial");
    }

    #[tokio::test]
    async fn test_abort_discards_object() {
        let store = MemoryStore::new();
        let mut writer = store.open_write("doomed.bin").await.unwrap();
        let id = writer.id();
        writer.write(b"never stored").await.unwrap();
        writer.abort().await.unwrap();

        assert!(store.is_empty());
        assert!(matches!(
            store.open_read(id).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_content_gets_distinct_ids() {
        let store = MemoryStore::new();
        let first = store.put("same.txt", b"same bytes").await.unwrap();
        let second = store.put("same.txt", b"same bytes").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.open_read(ObjectId::new()).await,
            Err(StorageError::NotFound(_))
        ));
    }
}
