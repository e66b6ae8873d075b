use crate::{
    env_keys::{
        APP_NAME_ENV_KEY, DEV_ENV_FILE_NAME, ENABLE_OTLP_SINK_ENV_KEY, ENABLE_STDOUT_SINK_ENV_KEY,
        GENERATOR_INTERVAL_MS_ENV_KEY, LOCAL_ENV_FILE_NAME, LOG_LEVEL_ENV_KEY,
        METRICS_PRESET_ENV_KEY, OTLP_CONCURRENCY_LIMIT_ENV_KEY, OTLP_ENDPOINT_ENV_KEY,
        OTLP_EXPORT_INTERVAL_MS_ENV_KEY, OTLP_EXPORT_TIMEOUT_MS_ENV_KEY, PROD_FILE_NAME,
        STAGING_FILE_NAME, STDOUT_EXPORT_INTERVAL_MS_ENV_KEY,
    },
    errors::ConfigsError,
};
use configs::{AppConfigs, Configs, Environment};
use dotenvy::from_filename;
use std::{env, str::FromStr};
use tracing::error;
use url::Url;

///Loads the env file for the current environment, fills the config sections
///toggled on the builder from process environment variables, and initializes
///logging. A malformed collector endpoint is the only startup-fatal input.
#[derive(Default)]
pub struct ConfigBuilder {
    otlp_sink: bool,
    stdout_sink: bool,
    generator: bool,
}

impl ConfigBuilder {
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn otlp_sink(mut self) -> Self {
        self.otlp_sink = true;
        self
    }

    pub fn stdout_sink(mut self) -> Self {
        self.stdout_sink = true;
        self
    }

    pub fn generator(mut self) -> Self {
        self.generator = true;
        self
    }

    pub fn build(&self) -> Result<Configs, ConfigsError> {
        let env = Environment::from_rust_env();
        match env {
            Environment::Prod => {
                from_filename(PROD_FILE_NAME).ok();
            }
            Environment::Staging => {
                from_filename(STAGING_FILE_NAME).ok();
            }
            Environment::Dev => {
                from_filename(DEV_ENV_FILE_NAME).ok();
            }
            _ => {
                from_filename(LOCAL_ENV_FILE_NAME).ok();
            }
        }

        let mut cfg = Configs::default();
        self.fill_app(&mut cfg);

        match logging::setup(&cfg.app) {
            Err(_) => Err(ConfigsError::InternalError {}),
            _ => Ok(()),
        }?;

        cfg.otlp_sink.enable = self.otlp_sink;
        cfg.stdout_sink.enable = self.stdout_sink;
        cfg.generator.enable = self.generator;

        for (key, value) in env::vars() {
            if self.fill_otlp_sink(&mut cfg, &key, &value) {
                continue;
            };
            if self.fill_stdout_sink(&mut cfg, &key, &value) {
                continue;
            };
            if self.fill_generator(&mut cfg, &key, &value) {
                continue;
            };
        }

        cfg.apply_preset();

        if cfg.otlp_sink.enable {
            if let Err(err) = Url::parse(&cfg.otlp_sink.endpoint) {
                error!(
                    endpoint = cfg.otlp_sink.endpoint,
                    error = err.to_string(),
                    "malformed collector endpoint"
                );
                return Err(ConfigsError::InvalidEndpoint(cfg.otlp_sink.endpoint.clone()));
            }
        }

        Ok(cfg)
    }
}

impl ConfigBuilder {
    fn fill_app(&self, cfg: &mut Configs) {
        let env = Environment::from_rust_env();
        let name = env::var(APP_NAME_ENV_KEY).unwrap_or(cfg.app.name.clone());
        let log_level = env::var(LOG_LEVEL_ENV_KEY).unwrap_or("debug".to_owned());

        cfg.app = AppConfigs {
            name,
            env,
            log_level,
            enable_external_crates_logging: false,
        };
    }

    fn fill_otlp_sink(&self, cfg: &mut Configs, key: &str, value: &str) -> bool {
        match key {
            OTLP_ENDPOINT_ENV_KEY if self.otlp_sink => {
                cfg.otlp_sink.endpoint = value.to_owned();
                true
            }
            OTLP_EXPORT_INTERVAL_MS_ENV_KEY if self.otlp_sink => {
                cfg.otlp_sink.export_interval_ms =
                    value.parse().unwrap_or(cfg.otlp_sink.export_interval_ms);
                true
            }
            OTLP_EXPORT_TIMEOUT_MS_ENV_KEY if self.otlp_sink => {
                cfg.otlp_sink.export_timeout_ms =
                    value.parse().unwrap_or(cfg.otlp_sink.export_timeout_ms);
                true
            }
            OTLP_CONCURRENCY_LIMIT_ENV_KEY if self.otlp_sink => {
                cfg.otlp_sink.concurrency_limit =
                    value.parse().unwrap_or(cfg.otlp_sink.concurrency_limit);
                true
            }
            ENABLE_OTLP_SINK_ENV_KEY if self.otlp_sink => {
                cfg.otlp_sink.enable = value.parse().unwrap_or(cfg.otlp_sink.enable);
                true
            }
            _ => false,
        }
    }

    fn fill_stdout_sink(&self, cfg: &mut Configs, key: &str, value: &str) -> bool {
        match key {
            ENABLE_STDOUT_SINK_ENV_KEY if self.stdout_sink => {
                cfg.stdout_sink.enable = value.parse().unwrap_or(cfg.stdout_sink.enable);
                true
            }
            STDOUT_EXPORT_INTERVAL_MS_ENV_KEY if self.stdout_sink => {
                cfg.stdout_sink.export_interval_ms = value
                    .parse()
                    .unwrap_or(cfg.stdout_sink.export_interval_ms);
                true
            }
            _ => false,
        }
    }

    fn fill_generator(&self, cfg: &mut Configs, key: &str, value: &str) -> bool {
        match key {
            GENERATOR_INTERVAL_MS_ENV_KEY if self.generator => {
                cfg.generator.interval_ms = value.parse().unwrap_or(cfg.generator.interval_ms);
                true
            }
            METRICS_PRESET_ENV_KEY => {
                cfg.preset = configs::Preset::from_str(value).unwrap_or_default();
                true
            }
            _ => false,
        }
    }
}
