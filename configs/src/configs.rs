use crate::{AppConfigs, GeneratorConfigs, OtlpSinkConfigs, Preset, StdoutSinkConfigs};

#[derive(Debug, Clone, Default)]
pub struct Configs {
    pub app: AppConfigs,
    pub otlp_sink: OtlpSinkConfigs,
    pub stdout_sink: StdoutSinkConfigs,
    pub generator: GeneratorConfigs,
    pub preset: Preset,
}

impl Configs {
    ///Rewrites the cadence fields covered by the selected preset. Fields the
    ///preset does not name keep their configured values.
    pub fn apply_preset(&mut self) {
        if self.preset == Preset::StressTest {
            self.otlp_sink.export_interval_ms = 100;
            self.generator.interval_ms = 100;
        }
    }
}
