//! Blob storage layer
//!
//! Binary payloads live in a chunked store addressed by generated
//! `ObjectId`s. The store is handed to services as a trait object so request
//! handlers never touch a concrete driver, and tests can swap in
//! [`MemoryStore`].
//!
//! Objects are immutable once finalized: a write channel issues its id up
//! front, accepts appended chunks, and only `close` makes the object
//! readable. Ids are never reused, and uploading identical content twice
//! yields two distinct objects.

pub mod gridfs;
pub mod memory;

pub use gridfs::GridFsStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

/// Lazy, single-pass chunk stream over a stored object.
pub type ByteStream = BoxStream<'static, Result<Bytes, StorageError>>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no stored object with id {0}")]
    NotFound(ObjectId),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Open a writable channel for a new object. The object id is available
    /// immediately via [`BlobWriter::id`], before anything is durable.
    async fn open_write(&self, filename: &str) -> Result<Box<dyn BlobWriter>, StorageError>;

    /// Store a whole object in one call (open, write, close). Not
    /// transactionally atomic: a failure mid-write can leave orphaned
    /// chunks behind, invisible to readers.
    async fn put(&self, filename: &str, data: &[u8]) -> Result<ObjectId, StorageError>;

    /// Open a lazy byte stream over an existing object. Chunks are pulled on
    /// demand; the object is never materialized whole.
    async fn open_read(&self, id: ObjectId) -> Result<ByteStream, StorageError>;
}

/// Writable channel for a single new object.
///
/// Callers must finish with either `close` or `abort`; dropping an open
/// writer leaves a partial, unreadable object behind.
#[async_trait]
pub trait BlobWriter: Send {
    /// Identifier assigned when the channel was opened. The object is not
    /// readable under this id until [`close`](BlobWriter::close) succeeds.
    fn id(&self) -> ObjectId;

    /// Append a chunk. Chunk sizing is delegated to the underlying store.
    async fn write(&mut self, chunk: &[u8]) -> Result<(), StorageError>;

    /// Finalize the object, making it durable and readable.
    async fn close(&mut self) -> Result<(), StorageError>;

    /// Discard everything written so far and release the channel.
    async fn abort(&mut self) -> Result<(), StorageError>;
}
