use thiserror::Error;

use crate::index::Permission;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors fall into three groups. Caller mistakes ([`Error::ScopeMismatch`]) and policy
/// failures ([`Error::AccessDenied`]) are raised before any index is built. Build failures
/// ([`Error::Provider`], [`Error::BuildPanicked`], [`Error::CyclicHierarchy`],
/// [`Error::RecursionLimit`]) are raised by the single thread that builds an entry and are
/// handed unchanged (cloned) to every thread that was waiting on that entry.
///
/// A failed build never leaves its placeholder behind: the next request for the same key
/// starts a fresh build.
///
/// # Examples
///
/// ```rust,no_run
/// use memberscope::{Error, IntrospectionRegistry, TypeProvider};
///
/// # fn example<P: TypeProvider>(registry: &IntrospectionRegistry<P>, ty: &P::Type) {
/// match registry.get_index(ty) {
///     Ok(index) => println!("{} methods", index.methods().len()),
///     Err(Error::AccessDenied(permission)) => eprintln!("not allowed: {permission}"),
///     Err(Error::Provider(message)) => eprintln!("type could not be described: {message}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A type was presented to a scope index that does not own it.
    ///
    /// Raised when a [`crate::ScopeIndex`] is queried directly with a type whose
    /// owning scope is a different one. This is a programming error and is never
    /// retried.
    ///
    /// # Fields
    ///
    /// * `expected` - Debug rendering of the scope that was queried
    /// * `found` - Debug rendering of the scope the provider reports for the type
    #[error("Type belongs to scope {found}, not to scope {expected}")]
    ScopeMismatch {
        /// The scope the index was built for
        expected: String,
        /// The scope the type actually belongs to
        found: String,
    },

    /// The configured [`crate::AccessGuard`] refused an operation.
    #[error("Access denied - {0}")]
    AccessDenied(Permission),

    /// The type provider failed to describe a type.
    ///
    /// Providers construct this variant themselves; the index propagates it to the
    /// building thread and every thread waiting on the same entry.
    #[error("Type provider failure - {0}")]
    Provider(String),

    /// The thread building an entry panicked before it could publish a result.
    #[error("Index build panicked while indexing {0}")]
    BuildPanicked(String),

    /// A type appeared in its own ancestor chain.
    #[error("Type {0} is its own ancestor")]
    CyclicHierarchy(String),

    /// Recursion limit reached.
    ///
    /// Parent chains are indexed recursively; chains deeper than
    /// [`crate::IndexConfig::max_hierarchy_depth`] are rejected with this error.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// A scope index needed its registry after the registry was dropped.
    #[error("The owning registry has been dropped")]
    RegistryDropped,
}
