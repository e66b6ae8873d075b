use crate::{
    errors::MetricsError,
    instruments::{
        Counter, CounterState, Histogram, HistogramState, InstrumentKind, InstrumentOptions,
        ValueType,
    },
    reader::Reader,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::debug;

pub(crate) struct InstrumentEntry {
    pub kind: InstrumentKind,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub value_type: ValueType,
    pub data: InstrumentData,
}

pub(crate) enum InstrumentData {
    Counter(Arc<Mutex<CounterState>>),
    Histogram(Arc<Mutex<HistogramState>>),
}

///Owner of every instrument created in this process (or test) scope.
///Constructed explicitly and shared by cloning, there is no global registry.
#[derive(Clone, Default)]
pub struct Registry {
    instruments: Arc<Mutex<HashMap<String, InstrumentEntry>>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    ///Idempotent get-or-create. Re-requesting a name returns a handle over
    ///the same aggregate state; a name already registered as a histogram
    ///fails with [`MetricsError::ConflictingInstrumentKind`].
    pub fn counter(&self, name: &str, opts: InstrumentOptions) -> Result<Counter, MetricsError> {
        let mut instruments = self.lock();

        if let Some(entry) = instruments.get(name) {
            return match &entry.data {
                InstrumentData::Counter(state) => Ok(Counter {
                    state: state.clone(),
                }),
                _ => Err(MetricsError::ConflictingInstrumentKind(name.to_owned())),
            };
        }

        debug!(instrument = name, "registering counter");

        let state = Arc::new(Mutex::new(CounterState::default()));
        instruments.insert(
            name.to_owned(),
            InstrumentEntry {
                kind: InstrumentKind::Counter,
                description: opts.description,
                unit: opts.unit,
                value_type: opts.value_type,
                data: InstrumentData::Counter(state.clone()),
            },
        );

        Ok(Counter { state })
    }

    pub fn histogram(
        &self,
        name: &str,
        opts: InstrumentOptions,
    ) -> Result<Histogram, MetricsError> {
        let mut instruments = self.lock();

        if let Some(entry) = instruments.get(name) {
            return match &entry.data {
                InstrumentData::Histogram(state) => Ok(Histogram {
                    state: state.clone(),
                }),
                _ => Err(MetricsError::ConflictingInstrumentKind(name.to_owned())),
            };
        }

        debug!(instrument = name, "registering histogram");

        let state = Arc::new(Mutex::new(HistogramState::default()));
        instruments.insert(
            name.to_owned(),
            InstrumentEntry {
                kind: InstrumentKind::Histogram,
                description: opts.description,
                unit: opts.unit,
                value_type: opts.value_type,
                data: InstrumentData::Histogram(state.clone()),
            },
        );

        Ok(Histogram { state })
    }

    ///Creates an independent delta cursor over this registry. Each sink owns
    ///one, so concurrent sinks never steal each other's measurements.
    pub fn reader(&self) -> Reader {
        Reader::new(self.clone())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, HashMap<String, InstrumentEntry>> {
        self.instruments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeSet;

    #[test]
    fn counter_get_or_create_is_idempotent() {
        let registry = Registry::new();

        let first = registry
            .counter("checkout_events_total", InstrumentOptions::default())
            .unwrap();
        let second = registry
            .counter("checkout_events_total", InstrumentOptions::default())
            .unwrap();

        first.add(2.0, AttributeSet::empty()).unwrap();
        second.add(3.0, AttributeSet::empty()).unwrap();

        // both handles mutate the same aggregate
        let state = first.state.lock().unwrap();
        assert_eq!(state.points[&AttributeSet::empty()], 5.0);
    }

    #[test]
    fn same_name_different_kind_conflicts() {
        let registry = Registry::new();

        registry
            .counter("checkout_events_total", InstrumentOptions::default())
            .unwrap();
        let res = registry.histogram("checkout_events_total", InstrumentOptions::default());

        assert_eq!(
            res.err(),
            Some(MetricsError::ConflictingInstrumentKind(
                "checkout_events_total".to_owned()
            ))
        );

        registry
            .histogram("checkout_duration_seconds", InstrumentOptions::default())
            .unwrap();
        let res = registry.counter("checkout_duration_seconds", InstrumentOptions::default());

        assert!(res.is_err());
    }

    #[test]
    fn options_are_kept_from_the_first_registration() {
        let registry = Registry::new();

        registry
            .histogram(
                "checkout_duration_seconds",
                InstrumentOptions {
                    description: Some("Measures the duration of the checkout process".to_owned()),
                    unit: Some("s".to_owned()),
                    value_type: ValueType::Double,
                },
            )
            .unwrap();

        let instruments = registry.lock();
        let entry = &instruments["checkout_duration_seconds"];
        assert_eq!(entry.unit.as_deref(), Some("s"));
        assert_eq!(entry.kind, InstrumentKind::Histogram);
    }
}
