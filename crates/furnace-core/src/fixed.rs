use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u32;

/// Convert an f64 to Fixed64. Use only for initialization, never in the tick.
/// `None` for NaN, infinities and values outside the Q32.32 range.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Option<Fixed64> {
    Fixed64::checked_from_num(v)
}

/// Convert Fixed64 to f64. Use only for display and data files.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Divide a nominal tick count by a rate multiplier, truncating toward zero.
///
/// A multiplier of 2.0 halves the tick count. Results beyond the Q32.32
/// integer range saturate at `i32::MAX`; a non-positive multiplier yields 0.
pub fn scale_ticks(nominal: Ticks, multiplier: Fixed64) -> Ticks {
    if multiplier <= Fixed64::ZERO {
        return 0;
    }
    let scaled = Fixed64::saturating_from_num(nominal)
        .checked_div(multiplier)
        .unwrap_or(Fixed64::MAX);
    // Non-negative here, so flooring is truncation toward zero.
    scaled.to_num::<i64>().clamp(0, Ticks::MAX as i64) as Ticks
}
