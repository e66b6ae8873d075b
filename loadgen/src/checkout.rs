use crate::{errors::LoadGenError, task::PeriodicTask};
use metrics::{AttributeSet, Counter, Histogram, InstrumentOptions, Registry, ValueType};
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

pub const CHECKOUT_EVENTS_TOTAL: &str = "checkout_events_total";
pub const CHECKOUT_DURATION_SECONDS: &str = "checkout_duration_seconds";

///Synthetic checkout driver. Every firing counts one successful checkout and
///records a simulated checkout duration between 0.5s and 3.5s.
pub struct CheckoutSimulator {
    events: Counter,
    duration: Histogram,
}

impl CheckoutSimulator {
    pub fn new(registry: &Registry) -> Result<CheckoutSimulator, LoadGenError> {
        let events = registry
            .counter(
                CHECKOUT_EVENTS_TOTAL,
                InstrumentOptions {
                    description: Some("Counts the number of completed user checkouts".to_owned()),
                    unit: None,
                    value_type: ValueType::Int,
                },
            )
            .map_err(|err| LoadGenError::InstrumentError(err.to_string()))?;

        let duration = registry
            .histogram(
                CHECKOUT_DURATION_SECONDS,
                InstrumentOptions {
                    description: Some("Measures the duration of the checkout process".to_owned()),
                    unit: Some("s".to_owned()),
                    value_type: ValueType::Double,
                },
            )
            .map_err(|err| LoadGenError::InstrumentError(err.to_string()))?;

        Ok(CheckoutSimulator { events, duration })
    }

    pub fn checkout(&self) {
        let duration_s = rand::rng().random_range(0.5..3.5);

        if let Err(err) = self.events.add(
            1.0,
            AttributeSet::new([("checkout.status", "success"), ("user.tier", "premium")]),
        ) {
            error!(error = err.to_string(), "failure to count checkout");
        }

        self.duration.record(
            duration_s,
            AttributeSet::new([("checkout.step", "payment")]),
        );

        debug!(duration_s, "simulated checkout");
    }

    pub fn start(
        self,
        interval: Duration,
        token: CancellationToken,
    ) -> Result<JoinHandle<()>, LoadGenError> {
        PeriodicTask::spawn(interval, token, move || self.checkout())
    }
}
