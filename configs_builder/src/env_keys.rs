pub(crate) const LOCAL_ENV_FILE_NAME: &str = ".env.local";
pub(crate) const DEV_ENV_FILE_NAME: &str = ".env.develop";
pub(crate) const STAGING_FILE_NAME: &str = ".env.staging";
pub(crate) const PROD_FILE_NAME: &str = ".env.prod";

pub(crate) const APP_NAME_ENV_KEY: &str = "APP_NAME";
pub(crate) const LOG_LEVEL_ENV_KEY: &str = "LOG_LEVEL";

pub(crate) const OTLP_ENDPOINT_ENV_KEY: &str = "OTLP_ENDPOINT";
pub(crate) const OTLP_EXPORT_INTERVAL_MS_ENV_KEY: &str = "OTLP_EXPORT_INTERVAL_MS";
pub(crate) const OTLP_EXPORT_TIMEOUT_MS_ENV_KEY: &str = "OTLP_EXPORT_TIMEOUT_MS";
pub(crate) const OTLP_CONCURRENCY_LIMIT_ENV_KEY: &str = "OTLP_CONCURRENCY_LIMIT";
pub(crate) const ENABLE_OTLP_SINK_ENV_KEY: &str = "ENABLE_OTLP_SINK";

pub(crate) const ENABLE_STDOUT_SINK_ENV_KEY: &str = "ENABLE_STDOUT_SINK";
pub(crate) const STDOUT_EXPORT_INTERVAL_MS_ENV_KEY: &str = "STDOUT_EXPORT_INTERVAL_MS";

pub(crate) const GENERATOR_INTERVAL_MS_ENV_KEY: &str = "GENERATOR_INTERVAL_MS";
pub(crate) const METRICS_PRESET_ENV_KEY: &str = "METRICS_PRESET";
