//! Least-loaded camera placement.

/// Returns the index of the smallest count. Ties go to the first minimum.
///
/// Returns `None` for an empty input.
#[must_use]
pub fn least_loaded<I>(counts: I) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    counts
        .into_iter()
        .enumerate()
        .min_by_key(|&(_, count)| count)
        .map(|(index, _)| index)
}
