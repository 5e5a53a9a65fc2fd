use std::ops::Range;

/// Splits `0..len` into at most `workers` contiguous, disjoint slices.
///
/// Uses `n = min(workers, len)` slices of `len / n` indices each; the last
/// slice also takes the remainder. An empty input yields no slices.
///
/// # Example
/// ```
/// use seqcalc::interpreter::evaluator::partition::partition;
///
/// assert_eq!(partition(10, 3), vec![0..3, 3..6, 6..10]);
/// assert_eq!(partition(2, 8), vec![0..1, 1..2]);
/// assert!(partition(0, 4).is_empty());
/// ```
#[must_use]
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    let slices = workers.min(len);
    if slices == 0 {
        return Vec::new();
    }
    let per = len / slices;
    let ranges: Vec<_> = (0..slices).map(|j| {
                                         let start = j * per;
                                         let end = if j + 1 == slices { len } else { start + per };
                                         start..end
                                     })
                                    .collect();
    tracing::trace!(len, workers, slices, per, "partitioned bulk operation");
    ranges
}

/// Cuts `values` into the mutable sub-slices described by `ranges`.
///
/// `ranges` must be contiguous and ascending, as produced by [`partition`].
/// Each slice is paired with the index its first element has in `values`.
pub fn split_mut<'a, T>(values: &'a mut [T], ranges: &[Range<usize>]) -> Vec<(usize, &'a mut [T])> {
    let mut rest = values;
    let mut consumed = 0;
    let mut slices = Vec::with_capacity(ranges.len());
    for range in ranges {
        debug_assert_eq!(range.start, consumed, "ranges must be contiguous");
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        slices.push((range.start, head));
        rest = tail;
        consumed = range.end;
    }
    slices
}
