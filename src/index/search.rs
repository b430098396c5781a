//! Binary search over sorted member arrays.
//!
//! Two primitives: [`find`] locates a single element equal to a key, and
//! [`equal_range`] recovers the contiguous run of elements equal to a *partial* key
//! (a prefix of the sort key, e.g. only the method name of a method sorted by name,
//! parameters and return type).
//!
//! `equal_range` never scans linearly. It first binary searches for any element of the
//! run, then binary searches independently to its left for the first element of the run
//! and to its right for one past the last. Elements left of the hit must compare
//! `<=` the key and elements right of it `>=`; anything else means the array was not
//! sorted with an order compatible with the partial key, which is a logic error in the
//! caller and trips a debug assertion.

use std::cmp::Ordering;

/// Find an element for which `cmp` returns [`Ordering::Equal`].
///
/// `cmp` reports how an element orders relative to the searched key.
pub(crate) fn find<T, F>(items: &[T], cmp: F) -> Option<&T>
where
    F: FnMut(&T) -> Ordering,
{
    items.binary_search_by(cmp).ok().map(|idx| &items[idx])
}

/// The sub-slice of elements for which `cmp` returns [`Ordering::Equal`].
///
/// `items` must be sorted consistently with `cmp`: every element ordering `Less` comes
/// before every `Equal`, which come before every `Greater`.
pub(crate) fn equal_range<T, F>(items: &[T], mut cmp: F) -> &[T]
where
    F: FnMut(&T) -> Ordering,
{
    let Ok(pos) = items.binary_search_by(&mut cmp) else {
        return &[];
    };

    // last entry before the matched set is somewhere in [0, pos)
    let start = items[..pos].partition_point(|item| {
        let res = cmp(item);
        debug_assert_ne!(res, Ordering::Greater, "unsorted entry left of match");
        res == Ordering::Less
    });

    // first entry past the matched set is somewhere in (pos, len]
    let end = pos
        + 1
        + items[pos + 1..].partition_point(|item| {
            let res = cmp(item);
            debug_assert_ne!(res, Ordering::Less, "unsorted entry right of match");
            res == Ordering::Equal
        });

    &items[start..end]
}
