//! Number formatting that matches the AMP runtime (V8) byte-for-byte.

/// JavaScript `Number.prototype.toString()` for the values we emit into inline styles.
pub(crate) fn js_number_to_string(mut v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if v == -0.0 {
        v = 0.0;
    }
    let mut buf = ryu_js::Buffer::new();
    buf.format_finite(v).to_string()
}

/// `parseFloat(v.toFixed(digits))` for non-negative ratios.
///
/// `toFixed` picks the larger candidate on exact ties, which `f64::round` (half away from zero)
/// reproduces for the positive values we feed it. Dividing the rounded integer by an exact power
/// of ten yields the same double `parseFloat` would produce from the decimal string.
pub(crate) fn round_to_fixed(v: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (v * scale).round() / scale
}
