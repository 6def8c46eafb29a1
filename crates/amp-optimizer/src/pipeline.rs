//! Ordered, configurable sequence of transformers sharing one document.

use amp_dom::Document;
use std::collections::HashMap;
use tracing::{Instrument, debug, debug_span};

use crate::config::OptimizerConfig;
use crate::transform::{
    AddTransformedFlag, AmpBoilerplateTransformer, PassResults, ServerSideRendering, Transform,
    TransformParams,
};
use crate::{Error, Result};

pub type TransformFactory = fn(options: &OptimizerConfig) -> Box<dyn Transform>;

/// How a pipeline entry is named in configuration.
#[derive(Debug, Clone)]
pub enum PassId {
    /// Looked up in the [`PassRegistry`].
    Named(String),
    Custom {
        name: &'static str,
        factory: TransformFactory,
    },
}

impl From<&str> for PassId {
    fn from(name: &str) -> Self {
        PassId::Named(name.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PassRegistry {
    factories: HashMap<&'static str, TransformFactory>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, factory: TransformFactory) {
        self.factories.insert(name, factory);
    }

    pub fn get(&self, name: &str) -> Option<TransformFactory> {
        self.factories.get(name).copied()
    }

    pub fn default_transformers() -> Self {
        let mut reg = Self::new();
        reg.insert(ServerSideRendering::NAME, ServerSideRendering::factory);
        reg.insert(
            AmpBoilerplateTransformer::NAME,
            AmpBoilerplateTransformer::factory,
        );
        reg.insert(AddTransformedFlag::NAME, AddTransformedFlag::factory);
        reg
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Execution order is significant: later transformers rely on earlier results.
    pub transformers: Vec<PassId>,
    pub options: OptimizerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            transformers: vec![
                ServerSideRendering::NAME.into(),
                AmpBoilerplateTransformer::NAME.into(),
                AddTransformedFlag::NAME.into(),
            ],
            options: OptimizerConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_transformers<I, P>(transformers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PassId>,
    {
        Self {
            transformers: transformers.into_iter().map(Into::into).collect(),
            options: OptimizerConfig::default(),
        }
    }

    pub fn with_options(mut self, options: OptimizerConfig) -> Self {
        self.options = options;
        self
    }
}

/// A resolved pipeline. It holds no per-document state, so one instance can serve any number of
/// documents, concurrently if the caller wishes.
#[derive(Debug, Clone)]
pub struct Pipeline {
    factories: Vec<(String, TransformFactory)>,
    options: OptimizerConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_registry(config, &PassRegistry::default_transformers())
    }

    pub fn with_registry(config: PipelineConfig, registry: &PassRegistry) -> Result<Self> {
        let mut factories = Vec::with_capacity(config.transformers.len());
        for id in config.transformers {
            let entry = match id {
                PassId::Named(name) => {
                    let Some(factory) = registry.get(&name) else {
                        return Err(Error::UnknownTransformer { name });
                    };
                    (name, factory)
                }
                PassId::Custom { name, factory } => (name.to_string(), factory),
            };
            factories.push(entry);
        }
        Ok(Self {
            factories,
            options: config.options,
        })
    }

    pub fn transformer_names(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|(name, _)| name.as_str())
    }

    /// Runs every transformer in order against `doc`.
    ///
    /// Transformers are instantiated for this run only and awaited one at a time. The first
    /// failure aborts the run; `doc` may then be partially transformed and must be discarded.
    #[tracing::instrument(skip_all, fields(transformers = self.factories.len()))]
    pub async fn run(&self, doc: &mut Document, params: &TransformParams) -> Result<PassResults> {
        let mut results = PassResults::new();
        for (_, factory) in &self.factories {
            let mut transformer = factory(&self.options);
            let name = transformer.name();

            for &key in transformer.requires() {
                if !results.contains(key) {
                    return Err(Error::MissingPrerequisite {
                        transformer: name,
                        key,
                    });
                }
            }

            debug!(transformer = name, "running transformer");
            transformer
                .transform(doc, params, &mut results)
                .instrument(debug_span!("transform", transformer = name))
                .await
                .map_err(|source| Error::Transform {
                    name,
                    source: Box::new(source),
                })?;

            for &key in transformer.provides() {
                if !results.contains(key) {
                    return Err(Error::ResultNotPublished {
                        transformer: name,
                        key,
                    });
                }
            }
        }
        Ok(results)
    }

    /// Synchronous variant of [`Pipeline::run`] (executor-free).
    pub fn run_sync(&self, doc: &mut Document, params: &TransformParams) -> Result<PassResults> {
        futures::executor::block_on(self.run(doc, params))
    }
}
