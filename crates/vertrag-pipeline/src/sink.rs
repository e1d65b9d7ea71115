//! Provenance sink
//!
//! The completed run's record is handed to an opaque write-once sink
//! exactly once when the orchestrator reaches its terminal state. A
//! failing sink is logged and never fails the request.

use async_trait::async_trait;
use vertrag_core::GenerationRecord;

/// Write-once destination for completed generation records
#[async_trait]
pub trait ProvenanceSink: Send + Sync {
    /// Persist one record
    async fn record(&self, record: &GenerationRecord) -> anyhow::Result<()>;
}

/// Sink that discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl ProvenanceSink for NullSink {
    async fn record(&self, _record: &GenerationRecord) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<T: ProvenanceSink + ?Sized> ProvenanceSink for std::sync::Arc<T> {
    async fn record(&self, record: &GenerationRecord) -> anyhow::Result<()> {
        (**self).record(record).await
    }
}
