use crate::{errors::ExporterError, sink::Sink};
use async_trait::async_trait;
use metrics::Snapshot;
use tracing::debug;

///Local/debug sink. Writes each batch as one JSON line to stdout.
#[derive(Default)]
pub struct StdoutSink;

#[async_trait]
impl Sink for StdoutSink {
    fn name(&self) -> String {
        "stdout".to_owned()
    }

    async fn deliver(&self, batch: &Snapshot) -> Result<(), ExporterError> {
        let line = serde_json::to_string(batch)
            .map_err(|err| ExporterError::DeliveryFailure(err.to_string()))?;

        println!("{line}");
        debug!(points = batch.point_count(), "stdout batch written");

        Ok(())
    }
}
