/// Numeric conversion and formatting helpers.
///
/// Conversions between `i64`, `usize` and `f64` used by the evaluator, range
/// length computation that cannot overflow, and the textual form of floats.
/// Every function that can lose information says so in its name or returns
/// an `Option`.
pub mod num;
