use std::sync::Arc;

use crate::ServiceResult;

pub type ArcStorageProbe = Arc<Box<dyn StorageProbe + Send + Sync + 'static>>;

/// Connectivity check for the storage backend.
#[async_trait::async_trait]
pub trait StorageProbe {
    /// Creates missing tables and runs a trivial query.
    async fn probe(&self) -> ServiceResult<()>;
    /// Connection string with credentials masked.
    fn describe(&self) -> String;
}
