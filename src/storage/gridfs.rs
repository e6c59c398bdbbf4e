//! GridFS-backed blob store.
//!
//! Wraps a [`GridFsBucket`]; chunking policy (chunk size, files/chunks
//! collections) is delegated to the bucket. Reads are bridged from the
//! driver's `futures`-flavored `AsyncRead` into a [`ByteStream`] so HTTP
//! responses can pull chunks without buffering the object.

use async_trait::async_trait;
use futures::io::AsyncWriteExt;
use futures::{StreamExt, TryStreamExt};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::Bson;
use mongodb::error::{ErrorKind, GridFsErrorKind};
use mongodb::gridfs::{GridFsBucket, GridFsUploadStream};
use mongodb::Database;
use tokio_util::compat::FuturesAsyncReadCompatExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::{BlobStore, BlobWriter, ByteStream, StorageError};

pub struct GridFsStore {
    bucket: GridFsBucket,
}

impl GridFsStore {
    pub fn new(db: Database) -> Self {
        Self {
            bucket: db.gridfs_bucket(None),
        }
    }
}

fn map_read_error(err: mongodb::error::Error, id: ObjectId) -> StorageError {
    match *err.kind {
        ErrorKind::GridFs(GridFsErrorKind::FileNotFound { .. }) => StorageError::NotFound(id),
        _ => StorageError::Backend(err.to_string()),
    }
}

pub struct GridFsWriter {
    id: ObjectId,
    stream: GridFsUploadStream,
}

#[async_trait]
impl BlobWriter for GridFsWriter {
    fn id(&self) -> ObjectId {
        self.id
    }

    async fn write(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.stream.write_all(chunk).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        AsyncWriteExt::close(&mut self.stream).await?;
        debug!(file_id = %self.id, "GridFS upload finalized");
        Ok(())
    }

    async fn abort(&mut self) -> Result<(), StorageError> {
        self.stream
            .abort()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))
    }
}

#[async_trait]
impl BlobStore for GridFsStore {
    async fn open_write(&self, filename: &str) -> Result<Box<dyn BlobWriter>, StorageError> {
        let stream = self
            .bucket
            .open_upload_stream(filename)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        // The bucket mints the id at channel creation, ahead of any write.
        let id = stream
            .id()
            .as_object_id()
            .ok_or_else(|| StorageError::Backend("bucket issued a non-ObjectId file id".to_string()))?;

        Ok(Box::new(GridFsWriter { id, stream }))
    }

    async fn put(&self, filename: &str, data: &[u8]) -> Result<ObjectId, StorageError> {
        let mut writer = self.open_write(filename).await?;
        let id = writer.id();
        if let Err(err) = writer.write(data).await {
            writer.abort().await.ok();
            return Err(err);
        }
        writer.close().await?;
        Ok(id)
    }

    async fn open_read(&self, id: ObjectId) -> Result<ByteStream, StorageError> {
        let stream = self
            .bucket
            .open_download_stream(Bson::ObjectId(id))
            .await
            .map_err(|e| map_read_error(e, id))?;

        Ok(ReaderStream::new(stream.compat())
            .map_err(StorageError::from)
            .boxed())
    }
}
