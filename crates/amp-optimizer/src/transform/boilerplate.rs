//! Inlines the runtime's own CSS into the `<style amp-runtime>` marker left by server-side
//! rendering, so the first frame does not wait for `v0.css`.

use amp_dom::{Document, NodeId};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn};

use super::ssr::{OUTCOME_KEY, RUNTIME_MARKER_ATTR, SsrOutcome};
use super::{PassResults, Transform, TransformParams};
use crate::config::OptimizerConfig;
use crate::{Error, Result};

pub const VERSION_ATTR: &str = "i-amphtml-version";
pub const RUNTIME_VERSION_KEY: &str = "runtime.version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeCss {
    /// Runtime version (RTV) the styles belong to.
    pub version: String,
    pub css: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeStylesError {
    #[error("No runtime styles available for version {version}")]
    UnknownVersion { version: String },

    #[error("Fetching runtime styles failed: {message}")]
    Fetch { message: String },
}

/// Source of the runtime stylesheet (a CDN fetcher with its own cache in production).
///
/// Failures are reported to the caller, which falls back to leaving the marker empty; they never
/// abort the pipeline.
pub trait RuntimeStyles: std::fmt::Debug + Send + Sync {
    fn fetch<'a>(
        &'a self,
        runtime_version: Option<&'a str>,
    ) -> BoxFuture<'a, std::result::Result<RuntimeCss, RuntimeStylesError>>;
}

/// Serves one fixed stylesheet, e.g. one bundled with the build.
#[derive(Debug, Clone)]
pub struct StaticRuntimeStyles {
    css: RuntimeCss,
}

impl StaticRuntimeStyles {
    pub fn new(version: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            css: RuntimeCss {
                version: version.into(),
                css: css.into(),
            },
        }
    }
}

impl RuntimeStyles for StaticRuntimeStyles {
    fn fetch<'a>(
        &'a self,
        runtime_version: Option<&'a str>,
    ) -> BoxFuture<'a, std::result::Result<RuntimeCss, RuntimeStylesError>> {
        let out = match runtime_version {
            Some(version) if version != self.css.version => {
                Err(RuntimeStylesError::UnknownVersion {
                    version: version.to_string(),
                })
            }
            _ => Ok(self.css.clone()),
        };
        futures::future::ready(out).boxed()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AmpBoilerplateTransformer;

impl AmpBoilerplateTransformer {
    pub const NAME: &'static str = "AmpBoilerplateTransformer";

    pub fn factory(_options: &OptimizerConfig) -> Box<dyn Transform> {
        Box::new(Self)
    }

    async fn run(
        &self,
        doc: &mut Document,
        params: &TransformParams,
        results: &mut PassResults,
    ) -> Result<()> {
        let transformed = results.get_str(OUTCOME_KEY).is_some_and(|outcome| {
            outcome == SsrOutcome::BoilerplateKept.as_str()
                || outcome == SsrOutcome::BoilerplateRemoved.as_str()
        });
        let Some(marker) = find_runtime_marker(doc) else {
            if transformed {
                return Err(Error::MissingRuntimeMarker);
            }
            debug!("no runtime marker, skipping");
            return Ok(());
        };
        if doc.has_attr(marker, VERSION_ATTR) {
            debug!("runtime styles already inlined");
            return Ok(());
        }
        let Some(source) = params.runtime_styles.as_ref() else {
            debug!("no runtime styles source configured");
            return Ok(());
        };

        match source.fetch(params.runtime_version.as_deref()).await {
            Ok(RuntimeCss { version, css }) => {
                doc.set_attr(marker, VERSION_ATTR, version.clone())?;
                doc.insert_text(marker, css)?;
                results.insert(RUNTIME_VERSION_KEY, Value::String(version))?;
            }
            Err(err) => {
                // The runtime still loads v0.css itself; the page only paints a little later.
                warn!(%err, "runtime styles unavailable, leaving the marker empty");
            }
        }
        Ok(())
    }
}

impl Transform for AmpBoilerplateTransformer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requires(&self) -> &'static [&'static str] {
        &[OUTCOME_KEY]
    }

    fn transform<'a>(
        &'a mut self,
        doc: &'a mut Document,
        params: &'a TransformParams,
        results: &'a mut PassResults,
    ) -> BoxFuture<'a, Result<()>> {
        self.run(doc, params, results).boxed()
    }
}

fn find_runtime_marker(doc: &Document) -> Option<NodeId> {
    let html = doc.first_child_by_tag(doc.root(), "html")?;
    let head = doc.first_child_by_tag(html, "head")?;
    doc.children(head)
        .find(|&node| doc.has_tag(node, "style") && doc.has_attr(node, RUNTIME_MARKER_ATTR))
}
