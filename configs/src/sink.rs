#[derive(Debug, Clone)]
pub struct OtlpSinkConfigs {
    ///Default: false
    pub enable: bool,
    ///Default: http://localhost:4318/v1/metrics
    pub endpoint: String,
    ///Default: 5000ms
    pub export_interval_ms: u64,
    ///Default: 5000ms
    pub export_timeout_ms: u64,
    ///Max deliveries in flight for this sink.
    ///
    ///Default: 1
    pub concurrency_limit: usize,
}

impl Default for OtlpSinkConfigs {
    fn default() -> Self {
        Self {
            enable: false,
            endpoint: "http://localhost:4318/v1/metrics".to_owned(),
            export_interval_ms: 5000,
            export_timeout_ms: 5000,
            concurrency_limit: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StdoutSinkConfigs {
    ///Default: true
    pub enable: bool,
    ///Default: 5000ms
    pub export_interval_ms: u64,
}

impl Default for StdoutSinkConfigs {
    fn default() -> Self {
        Self {
            enable: true,
            export_interval_ms: 5000,
        }
    }
}
