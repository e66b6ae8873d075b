use crate::{
    errors::ExporterError,
    sink::{Sink, SinkSettings},
};
use metrics::{Reader, Registry, Snapshot};
use std::sync::Arc;
use tokio::{
    sync::Semaphore,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

struct SinkEntry {
    settings: SinkSettings,
    sink: Arc<dyn Sink>,
}

///Owns the configured sinks and one export task per sink. Sinks fire on
///independent timers: a slow delivery delays only that sink's next cycle,
///through its concurrency permit, never the other sinks or the recorders.
pub struct Pipeline {
    registry: Registry,
    entries: Vec<SinkEntry>,
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    started: bool,
}

impl Pipeline {
    pub fn new(registry: Registry) -> Pipeline {
        Pipeline {
            registry,
            entries: vec![],
            token: CancellationToken::new(),
            tasks: vec![],
            started: false,
        }
    }

    pub fn add_sink(&mut self, settings: SinkSettings, sink: Arc<dyn Sink>) {
        debug!(
            sink = sink.name(),
            interval_ms = settings.interval.as_millis() as u64,
            "sink registered"
        );
        self.entries.push(SinkEntry { settings, sink });
    }

    ///Spawns one export task per registered sink. Each task owns its own
    ///registry reader, so per-sink snapshot streams stay independent.
    pub fn start(&mut self) -> Result<(), ExporterError> {
        if self.started {
            return Err(ExporterError::AlreadyStarted);
        }
        self.started = true;

        for entry in self.entries.drain(..) {
            let reader = self.registry.reader();
            let token = self.token.clone();
            self.tasks.push(tokio::spawn(export_loop(
                entry.settings,
                entry.sink,
                reader,
                token,
            )));
        }

        Ok(())
    }

    ///Cancels every export timer and waits for the tasks to finish their
    ///best-effort final flush. Data that still fails to deliver here is lost.
    pub async fn stop(mut self) {
        self.token.cancel();
        for task in self.tasks.drain(..) {
            if let Err(err) = task.await {
                error!(error = err.to_string(), "export task panicked");
            }
        }
    }
}

async fn export_loop(
    settings: SinkSettings,
    sink: Arc<dyn Sink>,
    mut reader: Reader,
    token: CancellationToken,
) {
    let permits = Arc::new(Semaphore::new(settings.concurrency_limit));
    let mut ticker = time::interval_at(time::Instant::now() + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        export_cycle(&settings, &sink, &mut reader, &permits);
    }

    final_flush(&settings, &sink, &mut reader, &permits).await;
}

fn export_cycle(
    settings: &SinkSettings,
    sink: &Arc<dyn Sink>,
    reader: &mut Reader,
    permits: &Arc<Semaphore>,
) {
    let permit = match permits.clone().try_acquire_owned() {
        Ok(permit) => permit,
        Err(_) => {
            // the cycle's data is dropped, not queued behind the stuck
            // delivery and not merged into the next window
            let skipped = reader.collect();
            warn!(
                sink = sink.name(),
                points = skipped.point_count(),
                error = ExporterError::ConcurrencyLimitExceeded.to_string(),
                "export cycle skipped"
            );
            return;
        }
    };

    let batch = reader.collect();
    if batch.is_empty() {
        return;
    }

    let sink = sink.clone();
    let timeout = settings.timeout;
    tokio::spawn(async move {
        deliver(&sink, &batch, timeout).await;
        drop(permit);
    });
}

async fn final_flush(
    settings: &SinkSettings,
    sink: &Arc<dyn Sink>,
    reader: &mut Reader,
    permits: &Arc<Semaphore>,
) {
    // skipped when a delivery is still in flight, this is best effort only
    let Ok(_permit) = permits.try_acquire() else {
        warn!(sink = sink.name(), "final flush skipped");
        return;
    };

    let batch = reader.collect();
    if batch.is_empty() {
        return;
    }

    debug!(sink = sink.name(), "final flush");
    deliver(sink, &batch, settings.timeout).await;
}

async fn deliver(sink: &Arc<dyn Sink>, batch: &Snapshot, timeout: std::time::Duration) {
    match time::timeout(timeout, sink.deliver(batch)).await {
        Ok(Ok(())) => {
            debug!(
                sink = sink.name(),
                points = batch.point_count(),
                "batch delivered"
            );
        }
        Ok(Err(err)) => {
            error!(
                sink = sink.name(),
                points = batch.point_count(),
                error = err.to_string(),
                "batch dropped"
            );
        }
        Err(_) => {
            error!(
                sink = sink.name(),
                points = batch.point_count(),
                error = ExporterError::DeliveryTimeout.to_string(),
                "batch dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MockSink;
    use async_trait::async_trait;
    use metrics::{AttributeSet, InstrumentOptions, MetricPoints};
    use std::{
        sync::Mutex,
        time::Duration,
    };

    struct RecordingSink {
        delay: Duration,
        fail_first: Mutex<usize>,
        batches: Mutex<Vec<Snapshot>>,
    }

    impl RecordingSink {
        fn new(delay: Duration) -> Arc<RecordingSink> {
            Arc::new(RecordingSink {
                delay,
                fail_first: Mutex::new(0),
                batches: Mutex::new(vec![]),
            })
        }

        fn failing_first(count: usize) -> Arc<RecordingSink> {
            Arc::new(RecordingSink {
                delay: Duration::ZERO,
                fail_first: Mutex::new(count),
                batches: Mutex::new(vec![]),
            })
        }

        fn delivered_total(&self, name: &str) -> f64 {
            self.batches
                .lock()
                .unwrap()
                .iter()
                .flat_map(|b| b.metrics.iter())
                .filter(|m| m.name == name)
                .map(|m| match &m.points {
                    MetricPoints::Sum(points) => points.iter().map(|p| p.value).sum(),
                    _ => 0.0,
                })
                .sum()
        }

        fn batch_count(&self) -> usize {
            self.batches.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Sink for RecordingSink {
        fn name(&self) -> String {
            "recording".to_owned()
        }

        async fn deliver(&self, batch: &Snapshot) -> Result<(), ExporterError> {
            {
                let mut fail_first = self.fail_first.lock().unwrap();
                if *fail_first > 0 {
                    *fail_first -= 1;
                    return Err(ExporterError::DeliveryFailure("injected".to_owned()));
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.batches.lock().unwrap().push(batch.clone());
            Ok(())
        }
    }

    fn settings(interval_ms: u64) -> SinkSettings {
        SinkSettings {
            interval: Duration::from_millis(interval_ms),
            timeout: Duration::from_millis(1000),
            concurrency_limit: 1,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delivers_recorded_measurements_exactly_once() {
        let registry = Registry::new();
        let counter = registry
            .counter("checkout_events_total", InstrumentOptions::default())
            .unwrap();
        let sink = RecordingSink::new(Duration::ZERO);

        let mut pipeline = Pipeline::new(registry.clone());
        pipeline.add_sink(settings(20), sink.clone());
        pipeline.start().unwrap();

        counter.add(5.0, AttributeSet::empty()).unwrap();
        tokio::time::sleep(Duration::from_millis(90)).await;
        pipeline.stop().await;

        assert_eq!(sink.delivered_total("checkout_events_total"), 5.0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_snapshots_are_not_delivered() {
        let registry = Registry::new();
        registry
            .counter("checkout_events_total", InstrumentOptions::default())
            .unwrap();

        let mut sink = MockSink::new();
        sink.expect_name().return_const("mock".to_owned());
        sink.expect_deliver().never();

        let mut pipeline = Pipeline::new(registry);
        pipeline.add_sink(settings(10), Arc::new(sink));
        pipeline.start().unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        pipeline.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn slow_delivery_skips_the_cycle_and_drops_its_data() {
        let registry = Registry::new();
        let counter = registry
            .counter("checkout_events_total", InstrumentOptions::default())
            .unwrap();
        // delivery takes far longer than one export interval
        let sink = RecordingSink::new(Duration::from_millis(400));

        let mut pipeline = Pipeline::new(registry.clone());
        pipeline.add_sink(settings(40), sink.clone());
        pipeline.start().unwrap();

        counter.add(1.0, AttributeSet::empty()).unwrap();
        // first cycle picks up the 1.0 and blocks in delivery; these land in
        // cycles that must be skipped while that delivery is in flight
        tokio::time::sleep(Duration::from_millis(60)).await;
        counter.add(2.0, AttributeSet::empty()).unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        counter.add(4.0, AttributeSet::empty()).unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        pipeline.stop().await;
        // wait out the in-flight delivery before asserting
        tokio::time::sleep(Duration::from_millis(450)).await;

        assert_eq!(sink.delivered_total("checkout_events_total"), 1.0);
        assert_eq!(sink.batch_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delivery_failure_does_not_stop_future_cycles() {
        let registry = Registry::new();
        let counter = registry
            .counter("checkout_events_total", InstrumentOptions::default())
            .unwrap();
        let sink = RecordingSink::failing_first(1);

        let mut pipeline = Pipeline::new(registry.clone());
        pipeline.add_sink(settings(30), sink.clone());
        pipeline.start().unwrap();

        counter.add(1.0, AttributeSet::empty()).unwrap();
        tokio::time::sleep(Duration::from_millis(45)).await;
        // the first batch was dropped; later measurements still flow
        counter.add(2.0, AttributeSet::empty()).unwrap();
        tokio::time::sleep(Duration::from_millis(45)).await;
        pipeline.stop().await;

        assert_eq!(sink.delivered_total("checkout_events_total"), 2.0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stop_performs_a_best_effort_final_flush() {
        let registry = Registry::new();
        let counter = registry
            .counter("checkout_events_total", InstrumentOptions::default())
            .unwrap();
        let sink = RecordingSink::new(Duration::ZERO);

        let mut pipeline = Pipeline::new(registry.clone());
        // interval far beyond the test duration, only the flush can deliver
        pipeline.add_sink(settings(60_000), sink.clone());
        pipeline.start().unwrap();

        counter.add(3.0, AttributeSet::empty()).unwrap();
        pipeline.stop().await;

        assert_eq!(sink.delivered_total("checkout_events_total"), 3.0);
    }

    #[tokio::test]
    async fn start_twice_fails() {
        let mut pipeline = Pipeline::new(Registry::new());
        pipeline.add_sink(settings(1000), Arc::new(StdoutLike));

        pipeline.start().unwrap();
        assert_eq!(pipeline.start().err(), Some(ExporterError::AlreadyStarted));
        pipeline.stop().await;
    }

    struct StdoutLike;

    #[async_trait]
    impl Sink for StdoutLike {
        fn name(&self) -> String {
            "noop".to_owned()
        }

        async fn deliver(&self, _batch: &Snapshot) -> Result<(), ExporterError> {
            Ok(())
        }
    }
}
