//! Server-side rendering of AMP layouts.
//!
//! The AMP runtime hides the page behind the boilerplate (`<style amp-boilerplate>` plus its
//! `<noscript>` fallback) until it has computed and applied every component's layout. This
//! transformer applies those layouts at build time. When every component in the body could be
//! resolved, and nothing else needs the runtime before first paint, the boilerplate is removed
//! for the whole document. A single unresolved component keeps it: the decision is never made
//! per component.
//!
//! Phases:
//! 1. bail out when `<html i-amphtml-layout>` marks the document as already transformed;
//! 2. walk `<body>` depth-first (skipping `<template>` content), resolving and stamping layouts
//!    and collecting [`Disqualification`]s;
//! 3. insert `<style amp-runtime>` into `<head>` and mark `<html i-amphtml-layout>`;
//! 4. keep the boilerplate if anything disqualified the document, otherwise remove it and mark
//!    `<html i-amphtml-no-boilerplate>`.

use amp_dom::{Document, NodeId};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use super::{PassResults, Transform, TransformParams};
use crate::classify::{self, LAYOUT_ATTR};
use crate::config::OptimizerConfig;
use crate::layout::{self, LayoutInput, LayoutType};
use crate::{Result, policy};

pub const NO_BOILERPLATE_ATTR: &str = "i-amphtml-no-boilerplate";
pub const RUNTIME_MARKER_ATTR: &str = "amp-runtime";
pub const BOILERPLATE_ATTR: &str = "amp-boilerplate";

pub const OUTCOME_KEY: &str = "ssr.outcome";
pub const REPORT_KEY: &str = "ssr.report";

/// Attributes whose runtime behavior (media queries, `sizes`/`heights` breakpoints) cannot be
/// reproduced statically.
const DISQUALIFYING_ATTRS: &[&str] = &["heights", "media", "sizes"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SsrOutcome {
    Disabled,
    NoDocumentElement,
    AlreadyTransformed,
    BoilerplateKept,
    BoilerplateRemoved,
}

impl SsrOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            SsrOutcome::Disabled => "disabled",
            SsrOutcome::NoDocumentElement => "no-document-element",
            SsrOutcome::AlreadyTransformed => "already-transformed",
            SsrOutcome::BoilerplateKept => "boilerplate-kept",
            SsrOutcome::BoilerplateRemoved => "boilerplate-removed",
        }
    }

    /// Whether this run applied layouts and inserted the runtime marker.
    pub fn transformed(self) -> bool {
        matches!(
            self,
            SsrOutcome::BoilerplateKept | SsrOutcome::BoilerplateRemoved
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum DisqualifyReason {
    UnsupportedAttribute { attribute: &'static str },
    RenderDelayingElement,
    InvalidLength,
    UnsupportedLayout,
    RenderDelayingExtension { extension: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disqualification {
    pub tag: String,
    #[serde(flatten)]
    pub reason: DisqualifyReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SsrReport {
    pub outcome: SsrOutcome,
    /// Number of components whose layout was applied.
    pub resolved: usize,
    pub disqualifications: Vec<Disqualification>,
}

impl SsrReport {
    fn new(outcome: SsrOutcome) -> Self {
        Self {
            outcome,
            resolved: 0,
            disqualifications: Vec::new(),
        }
    }

    fn disqualify(&mut self, tag: &str, reason: DisqualifyReason) {
        trace!(tag, ?reason, "boilerplate removal disqualified");
        self.disqualifications.push(Disqualification {
            tag: tag.to_string(),
            reason,
        });
    }
}

#[derive(Debug, Clone)]
pub struct ServerSideRendering {
    enabled: bool,
}

impl Default for ServerSideRendering {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ServerSideRendering {
    pub const NAME: &'static str = "ServerSideRendering";

    pub fn new(options: &OptimizerConfig) -> Self {
        Self {
            enabled: options.ssr.enabled,
        }
    }

    pub fn factory(options: &OptimizerConfig) -> Box<dyn Transform> {
        Box::new(Self::new(options))
    }

    fn run(&self, doc: &mut Document, results: &mut PassResults) -> Result<()> {
        let report = self.apply(doc)?;
        debug!(
            outcome = report.outcome.as_str(),
            resolved = report.resolved,
            disqualified = report.disqualifications.len(),
            "server-side rendering finished"
        );
        results.insert(OUTCOME_KEY, Value::String(report.outcome.as_str().into()))?;
        results.insert(REPORT_KEY, serde_json::to_value(&report)?)?;
        Ok(())
    }

    /// Runs the transformation synchronously and reports which terminal state was reached.
    pub fn apply(&self, doc: &mut Document) -> Result<SsrReport> {
        if !self.enabled {
            return Ok(SsrReport::new(SsrOutcome::Disabled));
        }
        let Some(html) = doc.first_child_by_tag(doc.root(), "html") else {
            return Ok(SsrReport::new(SsrOutcome::NoDocumentElement));
        };
        if doc.has_attr(html, LAYOUT_ATTR) {
            return Ok(SsrReport::new(SsrOutcome::AlreadyTransformed));
        }

        let mut report = SsrReport::new(SsrOutcome::BoilerplateKept);
        if let Some(body) = doc.first_child_by_tag(html, "body") {
            traverse(doc, body, &mut report)?;
        }

        let head = insert_runtime_marker(doc, html)?;

        let extensions: Vec<String> = doc
            .children(head)
            .filter_map(|child| policy::render_delaying_extension(doc, child))
            .map(str::to_string)
            .collect();
        for extension in extensions {
            report.disqualify(
                "script",
                DisqualifyReason::RenderDelayingExtension { extension },
            );
        }

        if report.disqualifications.is_empty() {
            remove_boilerplate(doc, head)?;
            doc.set_attr(html, NO_BOILERPLATE_ATTR, "")?;
            report.outcome = SsrOutcome::BoilerplateRemoved;
        }
        Ok(report)
    }
}

impl Transform for ServerSideRendering {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn provides(&self) -> &'static [&'static str] {
        &[OUTCOME_KEY, REPORT_KEY]
    }

    fn transform<'a>(
        &'a mut self,
        doc: &'a mut Document,
        _params: &'a TransformParams,
        results: &'a mut PassResults,
    ) -> BoxFuture<'a, Result<()>> {
        async move { self.run(doc, results) }.boxed()
    }
}

fn traverse(doc: &mut Document, body: NodeId, report: &mut SsrReport) -> Result<()> {
    let end = doc.skip_subtree(body);
    let mut cursor = doc.first_child(body);
    while let Some(node) = cursor.filter(|n| Some(*n) != end) {
        // Template content is rendered later by the runtime with its own data.
        if doc.has_tag(node, "template") {
            cursor = doc.skip_subtree(node);
            continue;
        }
        if doc.tag(node).is_some_and(policy::is_custom_element) {
            visit_custom_element(doc, node, report)?;
        }
        cursor = doc.next_node(node);
    }
    Ok(())
}

fn visit_custom_element(
    doc: &mut Document,
    node: NodeId,
    report: &mut SsrReport,
) -> Result<()> {
    let Some(tag) = doc.tag(node).map(str::to_string) else {
        return Ok(());
    };

    for &attribute in DISQUALIFYING_ATTRS {
        if doc.has_attr(node, attribute) {
            report.disqualify(&tag, DisqualifyReason::UnsupportedAttribute { attribute });
        }
    }

    if policy::is_always_render_delaying(&tag) {
        report.disqualify(&tag, DisqualifyReason::RenderDelayingElement);
        return Ok(());
    }

    let input = LayoutInput {
        tag: &tag,
        layout: doc.attr(node, "layout"),
        width: doc.attr(node, "width"),
        height: doc.attr(node, "height"),
        sizes: doc.attr(node, "sizes"),
        heights: doc.attr(node, "heights"),
    };
    match layout::resolve(&input) {
        None => report.disqualify(&tag, DisqualifyReason::InvalidLength),
        Some(resolved) if resolved.layout == LayoutType::Unsupported => {
            report.disqualify(&tag, DisqualifyReason::UnsupportedLayout);
        }
        Some(resolved) => {
            classify::apply(doc, node, &resolved)?;
            report.resolved += 1;
        }
    }
    Ok(())
}

/// Inserts `<style amp-runtime>` as the first child of `<head>` (creating `<head>` if needed) and
/// marks the document as transformed. Returns the head element.
fn insert_runtime_marker(doc: &mut Document, html: NodeId) -> Result<NodeId> {
    let head = match doc.first_child_by_tag(html, "head") {
        Some(head) => head,
        None => {
            let head = doc.create_element("head", std::iter::empty::<(&str, &str)>());
            let first = doc.first_child(html);
            doc.insert_before(html, head, first)?;
            head
        }
    };
    let marker = doc.create_element("style", [(RUNTIME_MARKER_ATTR, "")]);
    let first = doc.first_child(head);
    doc.insert_before(head, marker, first)?;
    doc.set_attr(html, LAYOUT_ATTR, "")?;
    Ok(head)
}

fn is_boilerplate_style(doc: &Document, node: NodeId) -> bool {
    doc.has_tag(node, "style") && doc.has_attr(node, BOILERPLATE_ATTR)
}

fn remove_boilerplate(doc: &mut Document, head: NodeId) -> Result<()> {
    let doomed: Vec<NodeId> = doc
        .children(head)
        .filter(|&node| {
            is_boilerplate_style(doc, node)
                || (doc.has_tag(node, "noscript")
                    && doc.children(node).any(|c| is_boilerplate_style(doc, c)))
        })
        .collect();
    for node in doomed {
        doc.remove(node)?;
    }
    Ok(())
}
