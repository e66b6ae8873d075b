#[derive(Debug, Clone)]
pub struct GeneratorConfigs {
    ///Default: true
    pub enable: bool,
    ///Default: 3000ms
    pub interval_ms: u64,
}

impl Default for GeneratorConfigs {
    fn default() -> Self {
        Self {
            enable: true,
            interval_ms: 3000,
        }
    }
}
