mod app;
mod configs;
mod environment;
mod generator;
mod preset;
mod sink;

pub use app::AppConfigs;
pub use configs::Configs;
pub use environment::Environment;
pub use generator::GeneratorConfigs;
pub use preset::Preset;
pub use sink::{OtlpSinkConfigs, StdoutSinkConfigs};
