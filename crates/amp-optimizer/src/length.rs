//! CSS-length-like attribute values (`width="300"`, `height="50%"`, `width="auto"`).

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use crate::number::js_number_to_string;

fn length_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9]+(?:\.[0-9]+)?)(px|em|rem|vh|vw|vmin|vmax|%)?$").expect("valid regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Px,
    Em,
    Rem,
    Vh,
    Vw,
    Vmin,
    Vmax,
    Percent,
    /// Lengths without a numeral: unset, `auto`, `fluid` or unparseable input.
    Unitless,
}

impl Unit {
    fn from_suffix(suffix: Option<&str>) -> Self {
        match suffix {
            None | Some("px") => Unit::Px,
            Some("em") => Unit::Em,
            Some("rem") => Unit::Rem,
            Some("vh") => Unit::Vh,
            Some("vw") => Unit::Vw,
            Some("vmin") => Unit::Vmin,
            Some("vmax") => Unit::Vmax,
            Some("%") => Unit::Percent,
            Some(_) => Unit::Unitless,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Em => "em",
            Unit::Rem => "rem",
            Unit::Vh => "vh",
            Unit::Vw => "vw",
            Unit::Vmin => "vmin",
            Unit::Vmax => "vmax",
            Unit::Percent => "%",
            Unit::Unitless => "",
        }
    }
}

/// A parsed `width`/`height` attribute.
///
/// An invalid value is data, not an error: callers inspect [`CssLength::is_valid`] and fall back
/// to the safe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CssLength {
    pub numeral: f64,
    pub unit: Unit,
    pub is_set: bool,
    pub is_auto: bool,
    pub is_fluid: bool,
    pub is_valid: bool,
}

impl CssLength {
    /// An attribute that was not specified at all.
    pub const UNSET: CssLength = CssLength {
        numeral: 0.0,
        unit: Unit::Unitless,
        is_set: false,
        is_auto: false,
        is_fluid: false,
        is_valid: true,
    };

    pub const AUTO: CssLength = CssLength {
        numeral: 0.0,
        unit: Unit::Unitless,
        is_set: true,
        is_auto: true,
        is_fluid: false,
        is_valid: true,
    };

    /// A set, valid length.
    pub const fn new(numeral: f64, unit: Unit) -> Self {
        Self {
            numeral,
            unit,
            is_set: true,
            is_auto: false,
            is_fluid: false,
            is_valid: true,
        }
    }

    const fn invalid() -> Self {
        Self {
            numeral: 0.0,
            unit: Unit::Unitless,
            is_set: true,
            is_auto: false,
            is_fluid: false,
            is_valid: false,
        }
    }

    pub fn parse(raw: Option<&str>, allow_auto: bool) -> Self {
        let Some(raw) = raw else {
            return Self::UNSET;
        };
        match raw {
            "auto" => Self {
                is_valid: allow_auto,
                ..Self::AUTO
            },
            // `fluid` sizing is not among the layouts we can resolve statically.
            "fluid" => Self {
                is_fluid: true,
                ..Self::invalid()
            },
            _ => {
                let Some(caps) = length_regex().captures(raw) else {
                    return Self::invalid();
                };
                // Digit runs longer than `f64` can hold overflow to infinity.
                let numeral = caps[1].parse::<f64>().unwrap_or(f64::INFINITY);
                if !numeral.is_finite() {
                    return Self::invalid();
                }
                Self::new(numeral, Unit::from_suffix(caps.get(2).map(|m| m.as_str())))
            }
        }
    }

    /// Whether the length carries a concrete numeral (set, valid, not `auto`/`fluid`).
    pub fn is_definite(&self) -> bool {
        self.is_set && self.is_valid && !self.is_auto && !self.is_fluid
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_auto {
            return f.write_str("auto");
        }
        if !self.is_definite() {
            return Ok(());
        }
        write!(
            f,
            "{}{}",
            js_number_to_string(self.numeral),
            self.unit.suffix()
        )
    }
}
