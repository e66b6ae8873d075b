use crate::{
    attributes::AttributeSet,
    instruments::HistogramPoint,
    registry::{InstrumentData, Registry},
    snapshot::{HistogramDataPoint, MetricData, MetricPoints, Snapshot, SumPoint},
};
use std::{
    collections::HashMap,
    sync::PoisonError,
    time::{SystemTime, UNIX_EPOCH},
};

///Delta cursor over a [`Registry`]. Every collect returns what was recorded
///since this reader's previous collect: a measurement recorded before the
///collect lands in that snapshot, one recorded after lands in the next, and
///none is ever counted twice for the same reader.
pub struct Reader {
    registry: Registry,
    window_start_ms: u64,
    seen_counters: HashMap<String, HashMap<AttributeSet, f64>>,
    seen_histograms: HashMap<String, HashMap<AttributeSet, HistogramPoint>>,
}

impl Reader {
    pub(crate) fn new(registry: Registry) -> Self {
        Reader {
            registry,
            window_start_ms: unix_ms(),
            seen_counters: HashMap::default(),
            seen_histograms: HashMap::default(),
        }
    }

    ///Takes the snapshot and advances the cursor. The caller decides what to
    ///do with the data; once returned it is never folded back, a dropped
    ///batch stays dropped.
    pub fn collect(&mut self) -> Snapshot {
        let taken_at_ms = unix_ms();
        let mut metrics = vec![];

        let instruments = self.registry.lock();
        for (name, entry) in instruments.iter() {
            let points = match &entry.data {
                InstrumentData::Counter(state) => {
                    let state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    let seen = self.seen_counters.entry(name.clone()).or_default();

                    let mut points = vec![];
                    for (attrs, total) in state.points.iter() {
                        let delta = total - seen.get(attrs).copied().unwrap_or(0.0);
                        if delta != 0.0 {
                            points.push(SumPoint {
                                attributes: attrs.clone(),
                                value: delta,
                            });
                        }
                        seen.insert(attrs.clone(), *total);
                    }

                    if points.is_empty() {
                        continue;
                    }
                    MetricPoints::Sum(points)
                }
                InstrumentData::Histogram(state) => {
                    let state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    let seen = self.seen_histograms.entry(name.clone()).or_default();

                    let mut points = vec![];
                    for (attrs, point) in state.points.iter() {
                        let prev = seen.get(attrs).cloned().unwrap_or_else(|| HistogramPoint {
                            bucket_counts: vec![0; point.bucket_counts.len()],
                            ..Default::default()
                        });

                        if point.count > prev.count {
                            points.push(HistogramDataPoint {
                                attributes: attrs.clone(),
                                count: point.count - prev.count,
                                sum: point.sum - prev.sum,
                                bounds: state.bounds.clone(),
                                bucket_counts: point
                                    .bucket_counts
                                    .iter()
                                    .zip(prev.bucket_counts.iter())
                                    .map(|(current, prev)| current - prev)
                                    .collect(),
                            });
                        }
                        seen.insert(attrs.clone(), point.clone());
                    }

                    if points.is_empty() {
                        continue;
                    }
                    MetricPoints::Histogram(points)
                }
            };

            metrics.push(MetricData {
                name: name.clone(),
                kind: entry.kind,
                description: entry.description.clone(),
                unit: entry.unit.clone(),
                value_type: entry.value_type,
                points,
            });
        }
        drop(instruments);

        let snapshot = Snapshot {
            window_start_unix_ms: self.window_start_ms,
            taken_at_unix_ms: taken_at_ms,
            metrics,
        };
        self.window_start_ms = taken_at_ms;

        snapshot
    }
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
