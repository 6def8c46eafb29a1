use amp_dom::{Document, NodeId};
use serde::Serialize;

use crate::Result;
use crate::layout::{LayoutType, ResolvedLayout};
use crate::number::{js_number_to_string, round_to_fixed};

pub const SIZE_DEFINED_CLASS: &str = "i-amphtml-layout-size-defined";
pub const LAYOUT_ATTR: &str = "i-amphtml-layout";
pub const SIZER_TAG: &str = "i-amphtml-sizer";

/// What the runtime would stamp onto an element for its resolved layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LayoutClasses {
    pub classes: Vec<&'static str>,
    pub style: String,
    /// `padding-top` percentage of the aspect-ratio sizer (responsive layout only).
    pub sizer_padding_percent: Option<f64>,
}

fn layout_class(layout: LayoutType) -> Option<&'static str> {
    Some(match layout {
        LayoutType::Nodisplay => "i-amphtml-layout-nodisplay",
        LayoutType::Fixed => "i-amphtml-layout-fixed",
        LayoutType::FixedHeight => "i-amphtml-layout-fixed-height",
        LayoutType::Responsive => "i-amphtml-layout-responsive",
        LayoutType::Container => "i-amphtml-layout-container",
        LayoutType::Fill => "i-amphtml-layout-fill",
        LayoutType::FlexItem => "i-amphtml-layout-flex-item",
        LayoutType::Unsupported => return None,
    })
}

pub fn classify(resolved: &ResolvedLayout) -> LayoutClasses {
    let ResolvedLayout {
        layout,
        width,
        height,
    } = resolved;

    let Some(class) = layout_class(*layout) else {
        return LayoutClasses::default();
    };
    let mut out = LayoutClasses {
        classes: vec![class],
        ..Default::default()
    };
    if layout.is_size_defined() {
        out.classes.push(SIZE_DEFINED_CLASS);
    }

    match layout {
        LayoutType::Nodisplay => out.style.push_str("display:none;"),
        LayoutType::Fixed => {
            out.style = format!("width:{width};height:{height};");
        }
        LayoutType::FixedHeight => {
            out.style = format!("height:{height};");
        }
        LayoutType::Responsive => {
            out.sizer_padding_percent = Some(round_to_fixed(
                height.numeral / width.numeral * 100.0,
                4,
            ));
        }
        LayoutType::Fill | LayoutType::Container => {}
        LayoutType::FlexItem => {
            if width.is_set {
                out.style.push_str(&format!("width:{width};"));
            }
            if height.is_set {
                out.style.push_str(&format!("height:{height};"));
            }
        }
        LayoutType::Unsupported => {}
    }
    out
}

/// Stamps the classification of `resolved` onto `node`, inserting the sizer for responsive
/// layouts.
pub fn apply(
    doc: &mut Document,
    node: NodeId,
    resolved: &ResolvedLayout,
) -> Result<LayoutClasses> {
    let classified = classify(resolved);
    if classified.classes.is_empty() {
        return Ok(classified);
    }

    let joined = classified.classes.join(" ");
    let class = match doc.attr(node, "class").filter(|c| !c.trim().is_empty()) {
        Some(existing) => format!("{existing} {joined}"),
        None => joined,
    };
    doc.set_attr(node, "class", class)?;

    if !classified.style.is_empty() {
        let style = match doc.attr(node, "style") {
            Some(existing) => format!("{}{existing}", classified.style),
            None => classified.style.clone(),
        };
        doc.set_attr(node, "style", style)?;
    }
    doc.set_attr(node, LAYOUT_ATTR, resolved.layout.as_str())?;

    if let Some(padding) = classified.sizer_padding_percent {
        let sizer = doc.create_element(
            SIZER_TAG,
            [(
                "style",
                format!(
                    "display:block;padding-top:{}%",
                    js_number_to_string(padding)
                ),
            )],
        );
        let first = doc.first_child(node);
        doc.insert_before(node, sizer, first)?;
    }
    Ok(classified)
}
