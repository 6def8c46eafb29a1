pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Dom(#[from] amp_dom::DomError),

    #[error("Unknown transformer: {name}")]
    UnknownTransformer { name: String },

    #[error("Transformer {transformer} requires `{key}`, which no earlier transformer provided")]
    MissingPrerequisite {
        transformer: &'static str,
        key: &'static str,
    },

    #[error("Transformer {transformer} did not publish `{key}`")]
    ResultNotPublished {
        transformer: &'static str,
        key: &'static str,
    },

    #[error("Transform result `{key}` was already published")]
    ResultAlreadyPresent { key: String },

    #[error("No <style amp-runtime> marker found although server-side rendering ran")]
    MissingRuntimeMarker,

    #[error("Invalid optimizer options: {source}")]
    InvalidConfig {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode transform result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Transformer {name} failed: {source}")]
    Transform {
        name: &'static str,
        #[source]
        source: Box<Error>,
    },
}
