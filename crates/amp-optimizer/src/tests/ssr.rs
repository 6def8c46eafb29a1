use amp_dom::{Document, element};
use serde_json::json;

use super::{body, by_id, child_tags, head, html, page};
use crate::OptimizerConfig;
use crate::transform::{
    BOILERPLATE_ATTR, Disqualification, DisqualifyReason, NO_BOILERPLATE_ATTR, RUNTIME_MARKER_ATTR,
    ServerSideRendering, SsrOutcome,
};

fn ssr(doc: &mut Document) -> crate::transform::SsrReport {
    ServerSideRendering::default().apply(doc).expect("ssr")
}

fn has_boilerplate(doc: &Document) -> bool {
    let head = head(doc);
    doc.descendants(head)
        .any(|n| doc.has_tag(n, "style") && doc.has_attr(n, BOILERPLATE_ATTR))
}

#[test]
fn resolvable_page_loses_its_boilerplate() {
    let mut doc = page(
        [],
        [element("amp-img")
            .attr("layout", "responsive")
            .attr("width", "400")
            .attr("height", "300")
            .attr("src", "a.jpg")],
    );

    let report = ssr(&mut doc);
    assert_eq!(report.outcome, SsrOutcome::BoilerplateRemoved);
    assert_eq!(report.resolved, 1);
    assert!(report.disqualifications.is_empty());

    let html = html(&doc);
    assert_eq!(
        doc.node_to_json_value(html),
        json!({
            "type": "element",
            "tag": "html",
            "attrs": { "amp": "", "i-amphtml-layout": "", "i-amphtml-no-boilerplate": "" },
            "children": [
                {
                    "type": "element",
                    "tag": "head",
                    "attrs": {},
                    "children": [
                        { "type": "element", "tag": "style", "attrs": { "amp-runtime": "" }, "children": [] },
                        { "type": "element", "tag": "meta", "attrs": { "charset": "utf-8" }, "children": [] },
                    ],
                },
                {
                    "type": "element",
                    "tag": "body",
                    "attrs": {},
                    "children": [{
                        "type": "element",
                        "tag": "amp-img",
                        "attrs": {
                            "class": "i-amphtml-layout-responsive i-amphtml-layout-size-defined",
                            "height": "300",
                            "i-amphtml-layout": "responsive",
                            "layout": "responsive",
                            "src": "a.jpg",
                            "width": "400",
                        },
                        "children": [{
                            "type": "element",
                            "tag": "i-amphtml-sizer",
                            "attrs": { "style": "display:block;padding-top:75%" },
                            "children": [],
                        }],
                    }],
                },
            ],
        })
    );
}

#[test]
fn second_run_is_a_no_op() {
    let mut doc = page(
        [],
        [element("amp-img").attr("width", "300").attr("height", "200")],
    );
    assert_eq!(ssr(&mut doc).outcome, SsrOutcome::BoilerplateRemoved);
    let once = doc.to_json_value();

    let again = ssr(&mut doc);
    assert_eq!(again.outcome, SsrOutcome::AlreadyTransformed);
    assert_eq!(again.resolved, 0);
    assert_eq!(doc.to_json_value(), once);
}

#[test]
fn kept_boilerplate_is_also_idempotent() {
    let mut doc = page([], [element("amp-audio").attr("src", "a.mp3")]);
    assert_eq!(ssr(&mut doc).outcome, SsrOutcome::BoilerplateKept);
    let once = doc.to_json_value();

    assert_eq!(ssr(&mut doc).outcome, SsrOutcome::AlreadyTransformed);
    assert_eq!(doc.to_json_value(), once);
}

#[test]
fn one_media_query_keeps_the_whole_boilerplate() {
    let mut doc = page(
        [],
        [
            element("amp-img")
                .attr("id", "plain")
                .attr("width", "300")
                .attr("height", "200"),
            element("amp-img")
                .attr("id", "media")
                .attr("media", "(min-width: 650px)")
                .attr("width", "300")
                .attr("height", "200"),
        ],
    );

    let report = ssr(&mut doc);
    assert_eq!(report.outcome, SsrOutcome::BoilerplateKept);
    assert_eq!(
        report.disqualifications,
        vec![Disqualification {
            tag: "amp-img".to_string(),
            reason: DisqualifyReason::UnsupportedAttribute { attribute: "media" },
        }]
    );
    assert!(has_boilerplate(&doc));

    // Layouts are still applied so the runtime has less to do.
    assert_eq!(report.resolved, 2);
    assert_eq!(doc.attr(by_id(&doc, "plain"), "i-amphtml-layout"), Some("fixed"));

    let html = html(&doc);
    assert!(doc.has_attr(html, "i-amphtml-layout"));
    assert!(!doc.has_attr(html, NO_BOILERPLATE_ATTR));
    let marker = doc.first_child(head(&doc)).expect("marker");
    assert!(doc.has_attr(marker, RUNTIME_MARKER_ATTR));
}

#[test]
fn report_serializes_with_flat_reasons() {
    let mut doc = page(
        [],
        [element("amp-img")
            .attr("sizes", "50vw")
            .attr("width", "400")
            .attr("height", "300")],
    );
    let report = ssr(&mut doc);
    assert_eq!(
        serde_json::to_value(&report).expect("serialize"),
        json!({
            "outcome": "boilerplate-kept",
            "resolved": 1,
            "disqualifications": [
                { "tag": "amp-img", "reason": "unsupported-attribute", "attribute": "sizes" },
            ],
        })
    );
}

#[test]
fn template_content_is_not_inspected() {
    let mut doc = page(
        [],
        [element("template").attr("type", "amp-mustache").child(
            element("amp-img")
                .attr("id", "templated")
                .attr("media", "(min-width: 650px)")
                .attr("width", "{{w}}")
                .attr("height", "{{h}}"),
        )],
    );

    let report = ssr(&mut doc);
    assert_eq!(report.outcome, SsrOutcome::BoilerplateRemoved);
    assert_eq!(report.resolved, 0);
    assert!(!doc.has_attr(by_id(&doc, "templated"), "i-amphtml-layout"));
}

#[test]
fn elements_after_a_template_are_still_visited() {
    let mut doc = page(
        [],
        [
            element("div").child(element("template").child(element("amp-img"))),
            element("amp-img")
                .attr("id", "after")
                .attr("width", "1")
                .attr("height", "1"),
        ],
    );
    let report = ssr(&mut doc);
    assert_eq!(report.resolved, 1);
    assert_eq!(doc.attr(by_id(&doc, "after"), "i-amphtml-layout"), Some("fixed"));
}

#[test]
fn amp_audio_keeps_the_boilerplate_without_a_head_declaration() {
    let mut doc = page([], [element("amp-audio").attr("id", "audio").attr("src", "a.mp3")]);

    let report = ssr(&mut doc);
    assert_eq!(report.outcome, SsrOutcome::BoilerplateKept);
    assert_eq!(
        report.disqualifications[0].reason,
        DisqualifyReason::RenderDelayingElement
    );
    assert!(has_boilerplate(&doc));
    assert!(!doc.has_attr(by_id(&doc, "audio"), "class"));
}

#[test]
fn render_delaying_extension_in_head_keeps_the_boilerplate() {
    let mut doc = page(
        [element("script")
            .attr("async", "")
            .attr("custom-element", "amp-experiment")
            .attr("src", "https://cdn.ampproject.org/v0/amp-experiment-0.1.js")],
        [element("amp-img").attr("width", "10").attr("height", "10")],
    );

    let report = ssr(&mut doc);
    assert_eq!(report.outcome, SsrOutcome::BoilerplateKept);
    assert_eq!(
        report.disqualifications,
        vec![Disqualification {
            tag: "script".to_string(),
            reason: DisqualifyReason::RenderDelayingExtension {
                extension: "amp-experiment".to_string(),
            },
        }]
    );
    assert!(has_boilerplate(&doc));
}

#[test]
fn other_extensions_do_not_block_removal() {
    let mut doc = page(
        [element("script")
            .attr("async", "")
            .attr("custom-element", "amp-carousel")],
        [],
    );
    assert_eq!(ssr(&mut doc).outcome, SsrOutcome::BoilerplateRemoved);
}

#[test]
fn unit_mismatch_is_left_to_the_runtime() {
    let mut doc = page(
        [],
        [element("amp-img")
            .attr("id", "img")
            .attr("layout", "responsive")
            .attr("width", "400px")
            .attr("height", "30em")],
    );

    let report = ssr(&mut doc);
    assert_eq!(report.outcome, SsrOutcome::BoilerplateKept);
    assert_eq!(
        report.disqualifications[0].reason,
        DisqualifyReason::UnsupportedLayout
    );
    let img = by_id(&doc, "img");
    assert!(!doc.has_attr(img, "i-amphtml-layout"));
    assert_eq!(doc.first_child(img), None);
}

#[test]
fn unparseable_length_keeps_the_boilerplate() {
    let mut doc = page([], [element("amp-img").attr("width", "wide").attr("height", "10")]);
    let report = ssr(&mut doc);
    assert_eq!(report.outcome, SsrOutcome::BoilerplateKept);
    assert_eq!(
        report.disqualifications[0].reason,
        DisqualifyReason::InvalidLength
    );
}

#[test]
fn plain_html_elements_are_ignored() {
    let mut doc = page(
        [],
        [element("div")
            .attr("media", "(min-width: 650px)")
            .attr("layout", "bogus")
            .child(element("img").attr("width", "wide"))],
    );
    assert_eq!(ssr(&mut doc).outcome, SsrOutcome::BoilerplateRemoved);
}

#[test]
fn missing_document_element_is_reported() {
    let mut doc = Document::from_element(element("div")).expect("valid document");
    let before = doc.to_json_value();
    assert_eq!(ssr(&mut doc).outcome, SsrOutcome::NoDocumentElement);
    assert_eq!(doc.to_json_value(), before);
}

#[test]
fn missing_head_is_created() {
    let mut doc = Document::from_element(
        element("html").child(
            element("body").child(element("amp-img").attr("width", "1").attr("height", "1")),
        ),
    )
    .expect("valid document");

    assert_eq!(ssr(&mut doc).outcome, SsrOutcome::BoilerplateRemoved);
    let html = html(&doc);
    assert_eq!(child_tags(&doc, html), vec!["head", "body"]);
    assert_eq!(child_tags(&doc, head(&doc)), vec!["style"]);
}

#[test]
fn disabled_pass_leaves_the_document_alone() {
    let options = OptimizerConfig::default().with_ssr_enabled(false);
    let mut doc = page([], [element("amp-img").attr("width", "1").attr("height", "1")]);
    let before = doc.to_json_value();

    let report = ServerSideRendering::new(&options).apply(&mut doc).expect("ssr");
    assert_eq!(report.outcome, SsrOutcome::Disabled);
    assert!(!report.outcome.transformed());
    assert_eq!(doc.to_json_value(), before);
}

#[test]
fn unrelated_noscript_survives_removal() {
    let mut doc = page(
        [element("noscript").child(element("link").attr("rel", "stylesheet"))],
        [],
    );
    assert_eq!(ssr(&mut doc).outcome, SsrOutcome::BoilerplateRemoved);
    assert_eq!(
        child_tags(&doc, head(&doc)),
        vec!["style", "meta", "noscript"]
    );
    assert!(!has_boilerplate(&doc));
}

#[test]
fn existing_body_children_keep_their_order() {
    let mut doc = page(
        [],
        [
            element("h1").text("Title"),
            element("amp-img").attr("width", "1").attr("height", "1"),
            element("p").text("Body"),
        ],
    );
    ssr(&mut doc);
    assert_eq!(child_tags(&doc, body(&doc)), vec!["h1", "amp-img", "p"]);
}

#[test]
fn overflowing_length_keeps_the_boilerplate() {
    let huge = "1".repeat(400);
    let mut doc = page(
        [],
        [element("amp-img")
            .attr("id", "img")
            .attr("width", huge)
            .attr("height", "10")],
    );

    let report = ssr(&mut doc);
    assert_eq!(report.outcome, SsrOutcome::BoilerplateKept);
    assert_eq!(
        report.disqualifications[0].reason,
        DisqualifyReason::InvalidLength
    );
    assert!(has_boilerplate(&doc));
    assert!(!doc.has_attr(by_id(&doc, "img"), "style"));
}

#[test]
fn percent_height_against_px_width_is_reported() {
    let mut doc = page(
        [],
        [element("amp-img")
            .attr("layout", "responsive")
            .attr("width", "300px")
            .attr("height", "50%")],
    );
    let report = ssr(&mut doc);
    assert_eq!(
        serde_json::to_value(&report).expect("serialize"),
        json!({
            "outcome": "boilerplate-kept",
            "resolved": 0,
            "disqualifications": [
                { "tag": "amp-img", "reason": "unsupported-layout" },
            ],
        })
    );
}
