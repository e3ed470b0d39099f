use std::io::Write;

/// Learner knobs that used to be global options, passed explicitly.
pub struct SynthConfig {
    /// When a cheaper representative takes over an equivalence class,
    /// also evict every cached expression that structurally contains a
    /// replaced member; such expressions can only compose into worse
    /// candidates.
    pub hyperaggressive_eviction: bool,
    /// Sink for reproducers of cost-model inversions.
    pub testcase_sink: Option<Box<dyn Write>>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig { hyperaggressive_eviction: true, testcase_sink: None }
    }
}
