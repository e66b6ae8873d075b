use crate::errors::ExporterError;
use async_trait::async_trait;
use configs::{OtlpSinkConfigs, StdoutSinkConfigs};
use metrics::Snapshot;
#[cfg(test)]
use mockall::*;
use std::time::Duration;

///Destination for exported aggregate snapshots. Delivery may block or fail;
///the pipeline bounds it with the sink's timeout and never retries a batch
///on its own.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> String;
    async fn deliver(&self, batch: &Snapshot) -> Result<(), ExporterError>;
}

///Per-sink schedule limits, owned by exactly one pipeline entry.
#[derive(Debug, Clone)]
pub struct SinkSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub concurrency_limit: usize,
}

impl From<&OtlpSinkConfigs> for SinkSettings {
    fn from(cfg: &OtlpSinkConfigs) -> Self {
        SinkSettings {
            interval: Duration::from_millis(cfg.export_interval_ms),
            timeout: Duration::from_millis(cfg.export_timeout_ms),
            concurrency_limit: cfg.concurrency_limit.max(1),
        }
    }
}

impl From<&StdoutSinkConfigs> for SinkSettings {
    fn from(cfg: &StdoutSinkConfigs) -> Self {
        SinkSettings {
            interval: Duration::from_millis(cfg.export_interval_ms),
            timeout: Duration::from_millis(cfg.export_interval_ms),
            concurrency_limit: 1,
        }
    }
}
