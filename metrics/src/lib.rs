mod attributes;
mod instruments;
mod reader;
mod registry;
mod snapshot;

pub mod errors;

pub use attributes::{AttributeSet, Value};
pub use instruments::{Counter, Histogram, InstrumentKind, InstrumentOptions, ValueType};
pub use reader::Reader;
pub use registry::Registry;
pub use snapshot::{HistogramDataPoint, MetricData, MetricPoints, Snapshot, SumPoint};
