//! Converts a raw quantized TEC integer to a physical value.

/// Converts a raw map value to TECu (10^16 m⁻²), given the header's exponent.
/// IONEX stores TEC values as integers scaled by `10^exponent`.
pub fn to_physical(value: i64, exponent: i8) -> f64 {
    value as f64 * 10f64.powi(exponent as i32)
}
