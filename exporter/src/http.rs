use crate::{errors::ExporterError, sink::Sink};
use async_trait::async_trait;
use configs::OtlpSinkConfigs;
use metrics::Snapshot;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

///Network sink. POSTs the JSON-serialized batch to the configured collector
///endpoint. The collector-side wire protocol is not this crate's concern;
///the body is the aggregate snapshot as serialized by the metrics crate.
pub struct HttpSink {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpSink {
    pub fn new(cfg: &OtlpSinkConfigs) -> Result<HttpSink, ExporterError> {
        let endpoint = Url::parse(&cfg.endpoint).map_err(|err| {
            error!(
                endpoint = cfg.endpoint,
                error = err.to_string(),
                "malformed sink endpoint"
            );
            ExporterError::InvalidEndpoint(cfg.endpoint.clone())
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.export_timeout_ms))
            .build()
            .map_err(|err| ExporterError::DeliveryFailure(err.to_string()))?;

        Ok(HttpSink { endpoint, client })
    }
}

#[async_trait]
impl Sink for HttpSink {
    fn name(&self) -> String {
        format!("http ({})", self.endpoint)
    }

    async fn deliver(&self, batch: &Snapshot) -> Result<(), ExporterError> {
        let res = self
            .client
            .post(self.endpoint.clone())
            .json(batch)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ExporterError::DeliveryTimeout
                } else {
                    ExporterError::DeliveryFailure(err.to_string())
                }
            })?;

        res.error_for_status()
            .map_err(|err| ExporterError::DeliveryFailure(err.to_string()))?;

        debug!(points = batch.point_count(), "batch accepted by collector");

        Ok(())
    }
}
