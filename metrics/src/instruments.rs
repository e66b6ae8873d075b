use crate::{attributes::AttributeSet, errors::MetricsError};
use serde::Serialize;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

///Boundaries used when an instrument does not provide its own, matching the
///OTLP explicit-bucket defaults.
pub(crate) const DEFAULT_BUCKET_BOUNDS: [f64; 15] = [
    0.0, 5.0, 10.0, 25.0, 50.0, 75.0, 100.0, 250.0, 500.0, 750.0, 1000.0, 2500.0, 5000.0, 7500.0,
    10000.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    Counter,
    Histogram,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Int,
    #[default]
    Double,
}

#[derive(Debug, Clone, Default)]
pub struct InstrumentOptions {
    ///Default: no description
    pub description: Option<String>,
    ///Default: unitless
    pub unit: Option<String>,
    ///Default: ValueType::Double
    pub value_type: ValueType,
}

#[derive(Debug, Default)]
pub(crate) struct CounterState {
    pub points: HashMap<AttributeSet, f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct HistogramPoint {
    pub count: u64,
    pub sum: f64,
    pub bucket_counts: Vec<u64>,
}

#[derive(Debug)]
pub(crate) struct HistogramState {
    pub bounds: Vec<f64>,
    pub points: HashMap<AttributeSet, HistogramPoint>,
}

impl Default for HistogramState {
    fn default() -> Self {
        Self {
            bounds: DEFAULT_BUCKET_BOUNDS.to_vec(),
            points: HashMap::default(),
        }
    }
}

///Handle over a monotonic sum aggregate. Cloning is cheap and every clone
///obtained for the same instrument name mutates the same aggregate state.
#[derive(Clone)]
pub struct Counter {
    pub(crate) state: Arc<Mutex<CounterState>>,
}

impl Counter {
    pub fn add(&self, delta: f64, attributes: AttributeSet) -> Result<(), MetricsError> {
        if delta.is_nan() || delta < 0.0 {
            return Err(MetricsError::InvalidDelta);
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state.points.entry(attributes).or_insert(0.0) += delta;

        Ok(())
    }
}

///Handle over a distribution aggregate. Same sharing semantics as [`Counter`].
#[derive(Clone)]
pub struct Histogram {
    pub(crate) state: Arc<Mutex<HistogramState>>,
}

impl Histogram {
    pub fn record(&self, value: f64, attributes: AttributeSet) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let bucket = state
            .bounds
            .iter()
            .position(|bound| value <= *bound)
            .unwrap_or(state.bounds.len());
        let slots = state.bounds.len() + 1;

        let point = state
            .points
            .entry(attributes)
            .or_insert_with(|| HistogramPoint {
                bucket_counts: vec![0; slots],
                ..Default::default()
            });
        point.count += 1;
        point.sum += value;
        point.bucket_counts[bucket] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> Counter {
        Counter {
            state: Arc::new(Mutex::new(CounterState::default())),
        }
    }

    fn histogram() -> Histogram {
        Histogram {
            state: Arc::new(Mutex::new(HistogramState::default())),
        }
    }

    #[test]
    fn add_accumulates_per_attribute_set() {
        let counter = counter();
        let success = AttributeSet::new([("status", "success")]);
        let failed = AttributeSet::new([("status", "failed")]);

        counter.add(1.0, success.clone()).unwrap();
        counter.add(2.0, success.clone()).unwrap();
        counter.add(5.0, failed.clone()).unwrap();

        let state = counter.state.lock().unwrap();
        assert_eq!(state.points[&success], 3.0);
        assert_eq!(state.points[&failed], 5.0);
    }

    #[test]
    fn negative_add_fails_and_leaves_aggregate_unchanged() {
        let counter = counter();
        let attrs = AttributeSet::empty();

        counter.add(3.0, attrs.clone()).unwrap();
        let res = counter.add(-1.0, attrs.clone());

        assert_eq!(res, Err(MetricsError::InvalidDelta));
        assert_eq!(counter.state.lock().unwrap().points[&attrs], 3.0);
    }

    #[test]
    fn nan_add_is_rejected() {
        let counter = counter();
        let res = counter.add(f64::NAN, AttributeSet::empty());

        assert_eq!(res, Err(MetricsError::InvalidDelta));
    }

    #[test]
    fn record_fills_the_right_bucket() {
        let histogram = histogram();
        let attrs = AttributeSet::empty();

        histogram.record(3.0, attrs.clone());
        histogram.record(60.0, attrs.clone());
        histogram.record(-2.5, attrs.clone());
        histogram.record(99999.0, attrs.clone());

        let state = histogram.state.lock().unwrap();
        let point = &state.points[&attrs];
        assert_eq!(point.count, 4);
        assert_eq!(point.sum, 3.0 + 60.0 - 2.5 + 99999.0);
        // -2.5 and 3.0 land in the first two buckets, 60.0 in (50, 75]
        assert_eq!(point.bucket_counts[0], 1);
        assert_eq!(point.bucket_counts[1], 1);
        assert_eq!(point.bucket_counts[5], 1);
        // overflow bucket
        assert_eq!(point.bucket_counts[15], 1);
    }
}
