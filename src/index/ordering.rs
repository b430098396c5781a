//! Member orderings.
//!
//! Every sorted member array of a [`crate::TypeIndex`] is sorted with the functions in
//! this module, and every lookup compares against a query key with the very same
//! functions. Binary search is only correct while those two uses agree, so the
//! element-vs-element orders below are all derived from the element-vs-key comparisons.
//!
//! | Kind | Key |
//! |------|-----|
//! | field | name |
//! | constructor | parameter types |
//! | method | name, then parameter types, then return type |

use std::cmp::Ordering;

use crate::index::Member;

/// Compare two parameter-type sequences.
///
/// Elements are compared pairwise up to the length of the shorter sequence; the first
/// difference decides. If one sequence is a prefix of the other, the shorter one sorts
/// first.
///
/// # Examples
///
/// ```rust
/// use std::cmp::Ordering;
/// use memberscope::compare_parameters;
///
/// assert_eq!(compare_parameters(&["int"], &["int", "int"]), Ordering::Less);
/// assert_eq!(compare_parameters(&["long"], &["int", "int"]), Ordering::Greater);
/// assert_eq!(compare_parameters::<&str, &str>(&[], &[]), Ordering::Equal);
/// ```
pub fn compare_parameters<L, R>(left: &[L], right: &[R]) -> Ordering
where
    L: AsRef<str>,
    R: AsRef<str>,
{
    for (l, r) in left.iter().zip(right) {
        match l.as_ref().cmp(r.as_ref()) {
            Ordering::Equal => {}
            decided => return decided,
        }
    }
    left.len().cmp(&right.len())
}

/// Field against a field name
pub(crate) fn field_key<H>(field: &Member<H>, name: &str) -> Ordering {
    field.name_or_empty().cmp(name)
}

/// Constructor against a parameter list
pub(crate) fn constructor_key<H, R: AsRef<str>>(ctor: &Member<H>, params: &[R]) -> Ordering {
    compare_parameters(ctor.parameters(), params)
}

/// Method against a name only
pub(crate) fn method_name_key<H>(method: &Member<H>, name: &str) -> Ordering {
    method.name_or_empty().cmp(name)
}

/// Method against a name and parameter list, return type ignored
pub(crate) fn method_overload_key<H, R: AsRef<str>>(
    method: &Member<H>,
    name: &str,
    params: &[R],
) -> Ordering {
    method_name_key(method, name).then_with(|| compare_parameters(method.parameters(), params))
}

/// Method against its full composite key
pub(crate) fn method_key<H, R: AsRef<str>>(
    method: &Member<H>,
    name: &str,
    params: &[R],
    return_type: &str,
) -> Ordering {
    method_overload_key(method, name, params)
        .then_with(|| method.return_or_empty().cmp(return_type))
}

pub(crate) fn field_order<H>(a: &Member<H>, b: &Member<H>) -> Ordering {
    field_key(a, b.name_or_empty())
}

pub(crate) fn constructor_order<H>(a: &Member<H>, b: &Member<H>) -> Ordering {
    constructor_key(a, b.parameters())
}

pub(crate) fn method_order<H>(a: &Member<H>, b: &Member<H>) -> Ordering {
    method_key(a, b.name_or_empty(), b.parameters(), b.return_or_empty())
}
