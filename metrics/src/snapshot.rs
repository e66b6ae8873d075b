use crate::{
    attributes::AttributeSet,
    instruments::{InstrumentKind, ValueType},
};
use serde::Serialize;

///Point-in-time read of every instrument's aggregate delta since the owning
///reader's previous collect. Sinks serialize this as the batch body.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub window_start_unix_ms: u64,
    pub taken_at_unix_ms: u64,
    pub metrics: Vec<MetricData>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.metrics
            .iter()
            .map(|m| match &m.points {
                MetricPoints::Sum(points) => points.len(),
                MetricPoints::Histogram(points) => points.len(),
            })
            .sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricData {
    pub name: String,
    pub kind: InstrumentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub value_type: ValueType,
    pub points: MetricPoints,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MetricPoints {
    Sum(Vec<SumPoint>),
    Histogram(Vec<HistogramDataPoint>),
}

#[derive(Debug, Clone, Serialize)]
pub struct SumPoint {
    pub attributes: AttributeSet,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramDataPoint {
    pub attributes: AttributeSet,
    pub count: u64,
    pub sum: f64,
    pub bounds: Vec<f64>,
    pub bucket_counts: Vec<u64>,
}
