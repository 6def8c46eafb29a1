use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Options forwarded to every transformer constructor.
///
/// Built in code or deserialized from a JSON object such as `{"ssr": {"enabled": false}}`.
/// Missing keys take their defaults and unknown keys are ignored, so one options document can
/// serve pipelines with different transformer sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub ssr: SsrOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SsrOptions {
    /// When `false` the pass leaves the document untouched and reports `disabled`.
    pub enabled: bool,
}

impl Default for SsrOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl OptimizerConfig {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|source| Error::InvalidConfig { source })
    }

    pub fn with_ssr_enabled(mut self, enabled: bool) -> Self {
        self.ssr.enabled = enabled;
        self
    }
}
