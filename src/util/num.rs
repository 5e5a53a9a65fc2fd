/// Converts an integer operand to a float for mixed or promoting arithmetic.
///
/// Integers beyond `2^53` are rounded to the nearest representable float,
/// exactly like a float literal of the same digits would be.
///
/// ## Example
/// ```
/// use seqcalc::util::num::int_to_float;
///
/// assert_eq!(int_to_float(-3), -3.0);
/// assert_eq!(int_to_float(9_007_199_254_740_993), 9_007_199_254_740_992.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn int_to_float(value: i64) -> f64 {
    value as f64
}

/// Number of elements of the closed range `{lower, upper}`.
///
/// ## Returns
/// - `Ok(len)`: The element count, `0` if `upper < lower`.
/// - `Err(count)`: The exact count if it does not fit into `usize`.
///
/// ## Example
/// ```
/// use seqcalc::util::num::range_len;
///
/// assert_eq!(range_len(1, 4), Ok(4));
/// assert_eq!(range_len(5, 5), Ok(1));
/// assert_eq!(range_len(5, 1), Ok(0));
/// assert_eq!(range_len(i64::MIN, i64::MAX), Err(1u128 << 64));
/// ```
pub fn range_len(lower: i64, upper: i64) -> Result<usize, u128> {
    let count = (i128::from(upper) - i128::from(lower) + 1).max(0);
    let count = u128::try_from(count).unwrap_or_default();
    usize::try_from(count).map_err(|_| count)
}

/// The element at `index` of a range starting at `lower`, if representable.
///
/// ## Example
/// ```
/// use seqcalc::util::num::range_element;
///
/// assert_eq!(range_element(-2, 3), Some(1));
/// assert_eq!(range_element(i64::MAX, 1), None);
/// ```
#[must_use]
pub fn range_element(lower: i64, index: usize) -> Option<i64> {
    u64::try_from(index).ok()
                        .and_then(|index| lower.checked_add_unsigned(index))
}

/// Formats a float so that it always reads as a float.
///
/// Integral values keep a trailing `.0`; everything else, including
/// infinities and NaN, uses the shortest representation that round-trips.
///
/// ## Example
/// ```
/// use seqcalc::util::num::format_float;
///
/// assert_eq!(format_float(0.5), "0.5");
/// assert_eq!(format_float(2.0), "2.0");
/// assert_eq!(format_float(-0.0), "-0.0");
/// assert_eq!(format_float(f64::INFINITY), "inf");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
