use std::str::FromStr;

///Named variants of the export/generation cadence. StressTest shortens the
///OTLP export and generator intervals far below the delivery timeout so the
///sink's concurrency limit is hit on purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Normal,
    StressTest,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stress" | "stress-test" | "stress_test" => Ok(Preset::StressTest),
            _ => Ok(Preset::Normal),
        }
    }
}
