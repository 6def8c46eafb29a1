//! Document transformers run by the [`Pipeline`](crate::Pipeline).

mod boilerplate;
mod ssr;
mod transformed_flag;

pub use boilerplate::{
    AmpBoilerplateTransformer, RUNTIME_VERSION_KEY, RuntimeCss, RuntimeStyles, RuntimeStylesError,
    StaticRuntimeStyles, VERSION_ATTR,
};
pub use ssr::{
    BOILERPLATE_ATTR, Disqualification, DisqualifyReason, NO_BOILERPLATE_ATTR, OUTCOME_KEY,
    REPORT_KEY, RUNTIME_MARKER_ATTR, ServerSideRendering, SsrOutcome, SsrReport,
};
pub use transformed_flag::{AddTransformedFlag, TRANSFORMED_ATTR, TRANSFORMED_KEY};

use amp_dom::Document;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

use crate::{Error, Result};

pub const DEFAULT_FORMAT_VERSION: u32 = 1;

/// Per-run configuration shared (read-only) by every transformer.
#[derive(Debug, Clone)]
pub struct TransformParams {
    /// Version stamped into `transformed="self;v=N"`.
    pub format_version: u32,
    /// Runtime version (RTV) whose styles should be inlined; `None` selects the latest.
    pub runtime_version: Option<String>,
    pub runtime_styles: Option<Arc<dyn RuntimeStyles>>,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            format_version: DEFAULT_FORMAT_VERSION,
            runtime_version: None,
            runtime_styles: None,
        }
    }
}

impl TransformParams {
    pub fn with_runtime_styles(mut self, styles: Arc<dyn RuntimeStyles>) -> Self {
        self.runtime_styles = Some(styles);
        self
    }

    pub fn with_runtime_version(mut self, rtv: impl Into<String>) -> Self {
        self.runtime_version = Some(rtv.into());
        self
    }
}

/// Append-only results published by transformers for the ones that follow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassResults {
    entries: IndexMap<String, Value>,
}

impl PassResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `key`. Results are never overwritten.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(Error::ResultAlreadyPresent { key });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One step of the pipeline. Instances are created fresh for every run.
pub trait Transform: Send {
    fn name(&self) -> &'static str;

    /// Result keys that earlier transformers must have published.
    fn requires(&self) -> &'static [&'static str] {
        &[]
    }

    /// Result keys this transformer always publishes when it succeeds.
    fn provides(&self) -> &'static [&'static str] {
        &[]
    }

    fn transform<'a>(
        &'a mut self,
        doc: &'a mut Document,
        params: &'a TransformParams,
        results: &'a mut PassResults,
    ) -> BoxFuture<'a, Result<()>>;
}
