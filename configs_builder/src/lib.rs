mod configs_builder;
mod env_keys;

pub mod errors;

pub use configs_builder::ConfigBuilder;
