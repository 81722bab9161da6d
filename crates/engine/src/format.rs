//! Locale-free result formatting

/// Integer-valued results at or above this magnitude fall back to the
/// shortest round-trip rendering instead of printing every digit.
const INTEGER_RENDER_LIMIT: f64 = 1e15;

/// Render a result for display.
///
/// Integer-valued results print without a fractional part (`5`, not `5.0`),
/// negative zero prints as `0`, and everything else uses the shortest
/// decimal that round-trips, with `.` as the separator.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_finite() && value.fract() == 0.0 && value.abs() < INTEGER_RENDER_LIMIT {
        return format!("{:.0}", value);
    }
    value.to_string()
}
