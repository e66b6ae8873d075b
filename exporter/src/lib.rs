mod http;
mod pipeline;
mod sink;
mod stdout;

pub mod errors;

pub use http::HttpSink;
pub use pipeline::Pipeline;
pub use sink::{Sink, SinkSettings};
pub use stdout::StdoutSink;
