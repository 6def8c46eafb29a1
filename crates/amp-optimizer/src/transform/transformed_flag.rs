use amp_dom::Document;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::{PassResults, Transform, TransformParams};
use crate::Result;
use crate::config::OptimizerConfig;

pub const TRANSFORMED_ATTR: &str = "transformed";
pub const TRANSFORMED_KEY: &str = "transformed.flag";

/// Marks `<html transformed="self;v=N">` so caches and the runtime know the document was
/// optimized.
#[derive(Debug, Clone, Default)]
pub struct AddTransformedFlag;

impl AddTransformedFlag {
    pub const NAME: &'static str = "AddTransformedFlag";

    pub fn factory(_options: &OptimizerConfig) -> Box<dyn Transform> {
        Box::new(Self)
    }

    fn run(
        &self,
        doc: &mut Document,
        params: &TransformParams,
        results: &mut PassResults,
    ) -> Result<()> {
        let Some(html) = doc.first_child_by_tag(doc.root(), "html") else {
            return Ok(());
        };
        let flag = format!("self;v={}", params.format_version);
        doc.set_attr(html, TRANSFORMED_ATTR, flag.clone())?;
        results.insert(TRANSFORMED_KEY, Value::String(flag))
    }
}

impl Transform for AddTransformedFlag {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform<'a>(
        &'a mut self,
        doc: &'a mut Document,
        params: &'a TransformParams,
        results: &'a mut PassResults,
    ) -> BoxFuture<'a, Result<()>> {
        async move { self.run(doc, params, results) }.boxed()
    }
}
