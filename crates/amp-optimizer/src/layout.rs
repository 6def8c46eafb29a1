//! Static layout resolution for custom elements.
//!
//! This mirrors the AMP runtime's `applyStaticLayout` for the closed set of layouts that can be
//! computed without a browser. Resolution is referentially pure: the same attributes always
//! produce the same [`ResolvedLayout`].

use serde::Serialize;

use crate::length::{CssLength, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    Nodisplay,
    Fixed,
    FixedHeight,
    Responsive,
    Container,
    Fill,
    FlexItem,
    /// The attributes cannot be resolved statically; the runtime has to do it.
    Unsupported,
}

impl LayoutType {
    /// Parses an explicit `layout` attribute. Only the exact lower-case names are accepted.
    pub fn from_attr(raw: &str) -> Option<Self> {
        Some(match raw {
            "nodisplay" => LayoutType::Nodisplay,
            "fixed" => LayoutType::Fixed,
            "fixed-height" => LayoutType::FixedHeight,
            "responsive" => LayoutType::Responsive,
            "container" => LayoutType::Container,
            "fill" => LayoutType::Fill,
            "flex-item" => LayoutType::FlexItem,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutType::Nodisplay => "nodisplay",
            LayoutType::Fixed => "fixed",
            LayoutType::FixedHeight => "fixed-height",
            LayoutType::Responsive => "responsive",
            LayoutType::Container => "container",
            LayoutType::Fill => "fill",
            LayoutType::FlexItem => "flex-item",
            LayoutType::Unsupported => "unsupported",
        }
    }

    /// Layouts whose box size is fully determined by attributes, so the element's intrinsic
    /// sizing must be suppressed.
    pub fn is_size_defined(self) -> bool {
        match self {
            LayoutType::Fixed
            | LayoutType::FixedHeight
            | LayoutType::Responsive
            | LayoutType::FlexItem => true,
            LayoutType::Nodisplay
            | LayoutType::Container
            | LayoutType::Fill
            | LayoutType::Unsupported => false,
        }
    }
}

/// Default `width`/`height` for component kinds the runtime sizes implicitly.
#[derive(Debug, Clone, Copy)]
pub struct TagDefaults {
    pub tag: &'static str,
    pub width: CssLength,
    pub height: CssLength,
}

pub const TAG_DEFAULTS: &[TagDefaults] = &[
    TagDefaults {
        tag: "amp-analytics",
        width: CssLength::new(1.0, Unit::Px),
        height: CssLength::new(1.0, Unit::Px),
    },
    TagDefaults {
        tag: "amp-pixel",
        width: CssLength::new(1.0, Unit::Px),
        height: CssLength::new(1.0, Unit::Px),
    },
    TagDefaults {
        tag: "amp-audio",
        width: CssLength::AUTO,
        height: CssLength::AUTO,
    },
    TagDefaults {
        tag: "amp-social-share",
        width: CssLength::new(60.0, Unit::Px),
        height: CssLength::new(44.0, Unit::Px),
    },
];

pub fn tag_defaults(tag: &str) -> Option<&'static TagDefaults> {
    TAG_DEFAULTS.iter().find(|d| d.tag == tag)
}

/// The declared sizing attributes of one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LayoutInput<'a> {
    pub tag: &'a str,
    pub layout: Option<&'a str>,
    pub width: Option<&'a str>,
    pub height: Option<&'a str>,
    pub sizes: Option<&'a str>,
    pub heights: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLayout {
    pub layout: LayoutType,
    pub width: CssLength,
    pub height: CssLength,
}

/// Computes the effective layout, width and height of an element.
///
/// Returns `None` when `width` or `height` cannot be parsed; callers treat that exactly like
/// [`LayoutType::Unsupported`].
pub fn resolve(input: &LayoutInput<'_>) -> Option<ResolvedLayout> {
    let width = CssLength::parse(input.width, true);
    let height = CssLength::parse(input.height, true);
    if !width.is_valid || !height.is_valid {
        return None;
    }

    // `layout=""` is the same as no attribute at all.
    let declared = match input.layout.filter(|raw| !raw.is_empty()) {
        None => None,
        Some(raw) => match LayoutType::from_attr(raw) {
            Some(layout) => Some(layout),
            None => {
                return Some(ResolvedLayout {
                    layout: LayoutType::Unsupported,
                    width,
                    height,
                });
            }
        },
    };

    let defaults = tag_defaults(input.tag);
    let width = effective_width(declared, width, defaults);
    let height = effective_height(declared, height, defaults);

    let layout = match declared {
        Some(layout) => layout,
        None => infer_layout(
            &width,
            &height,
            input.sizes.is_some() || input.heights.is_some(),
        ),
    };

    Some(ResolvedLayout {
        layout: check_dimensions(layout, &width, &height),
        width,
        height,
    })
}

fn effective_width(
    declared: Option<LayoutType>,
    width: CssLength,
    defaults: Option<&TagDefaults>,
) -> CssLength {
    match (declared, defaults) {
        (None | Some(LayoutType::Fixed), Some(d)) if !width.is_set => d.width,
        _ => width,
    }
}

fn effective_height(
    declared: Option<LayoutType>,
    height: CssLength,
    defaults: Option<&TagDefaults>,
) -> CssLength {
    match (declared, defaults) {
        (None | Some(LayoutType::Fixed | LayoutType::FixedHeight), Some(d)) if !height.is_set => {
            d.height
        }
        _ => height,
    }
}

fn infer_layout(width: &CssLength, height: &CssLength, has_sizes: bool) -> LayoutType {
    if !width.is_set && !height.is_set {
        LayoutType::Container
    } else if height.is_set && (!width.is_set || width.is_auto) {
        LayoutType::FixedHeight
    } else if height.is_set && width.is_set && has_sizes {
        LayoutType::Responsive
    } else {
        LayoutType::Fixed
    }
}

/// Rejects dimension combinations the runtime would refuse for the chosen layout.
fn check_dimensions(layout: LayoutType, width: &CssLength, height: &CssLength) -> LayoutType {
    let ok = match layout {
        LayoutType::Fixed => width.is_definite() && height.is_definite(),
        LayoutType::FixedHeight => height.is_definite() && (!width.is_set || width.is_auto),
        LayoutType::Responsive => {
            width.is_definite()
                && height.is_definite()
                && width.numeral != 0.0
                && width.unit == height.unit
        }
        LayoutType::Nodisplay
        | LayoutType::Container
        | LayoutType::Fill
        | LayoutType::FlexItem
        | LayoutType::Unsupported => true,
    };
    if ok { layout } else { LayoutType::Unsupported }
}
