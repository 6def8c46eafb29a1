#![forbid(unsafe_code)]

//! Build-time layout resolution and server-side rendering for AMP documents.
//!
//! Design goals:
//! - parity with the AMP runtime's static layout (same classes, styles and sizers, same number
//!   formatting)
//! - fail toward the slower-but-correct page: anything that cannot be resolved statically keeps
//!   the boilerplate instead of erroring
//! - runtime-agnostic async APIs (no specific executor required)
//!
//! The pieces, leaves first: [`length`] parses `width`/`height`, [`layout`] resolves the effective
//! layout, [`classify`] turns it into classes/styles/sizers, [`policy`] lists what blocks
//! boilerplate removal, [`transform::ServerSideRendering`] applies all of it to a document, and
//! [`Pipeline`] runs the configured transformers in order.

pub mod classify;
pub mod config;
pub mod error;
pub mod layout;
pub mod length;
mod number;
pub mod pipeline;
pub mod policy;
pub mod transform;

pub use classify::{LayoutClasses, classify};
pub use config::{OptimizerConfig, SsrOptions};
pub use error::{Error, Result};
pub use layout::{LayoutInput, LayoutType, ResolvedLayout, resolve};
pub use length::{CssLength, Unit};
pub use pipeline::{PassId, PassRegistry, Pipeline, PipelineConfig, TransformFactory};
pub use transform::{PassResults, Transform, TransformParams};

#[cfg(test)]
mod tests;
