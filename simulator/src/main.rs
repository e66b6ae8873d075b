use configs_builder::ConfigBuilder;
use exporter::{HttpSink, Pipeline, StdoutSink};
use loadgen::CheckoutSimulator;
use metrics::Registry;
use std::{error::Error, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cfg = ConfigBuilder::new()
        .otlp_sink()
        .stdout_sink()
        .generator()
        .build()?;

    let registry = Registry::new();
    let mut pipeline = Pipeline::new(registry.clone());

    if cfg.stdout_sink.enable {
        pipeline.add_sink((&cfg.stdout_sink).into(), Arc::new(StdoutSink));
        debug!("stdout sink installed");
    }

    if cfg.otlp_sink.enable {
        let sink = HttpSink::new(&cfg.otlp_sink)?;
        pipeline.add_sink((&cfg.otlp_sink).into(), Arc::new(sink));
        debug!(endpoint = cfg.otlp_sink.endpoint, "collector sink installed");
    }

    pipeline.start()?;

    let token = CancellationToken::new();
    let generator = if cfg.generator.enable {
        let simulator = CheckoutSimulator::new(&registry)?;
        Some(simulator.start(
            Duration::from_millis(cfg.generator.interval_ms),
            token.clone(),
        )?)
    } else {
        None
    };

    info!(name = cfg.app.name, "simulator running, ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    info!("shutting down");
    token.cancel();
    if let Some(task) = generator {
        task.await?;
    }
    pipeline.stop().await;

    Ok(())
}
