//! Access control for introspective capabilities.
//!
//! A registry can describe the members of arbitrary types, so creating one and letting
//! one scope's index reach into another scope are both gated by an [`AccessGuard`].
//! The guard is a security boundary only: denying access never changes what an index
//! contains, it only stops the operation with [`Error::AccessDenied`].

use std::fmt;

use crate::{Error, Result};

/// A privileged operation an [`AccessGuard`] is asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Construct a new [`crate::IntrospectionRegistry`]
    CreateRegistry,
    /// Index a parent type that lives in a different scope than its child
    ResolveForeignScope,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::CreateRegistry => f.write_str("createRegistry"),
            Permission::ResolveForeignScope => f.write_str("resolveForeignScope"),
        }
    }
}

/// Policy deciding whether a privileged operation may proceed.
///
/// Any `Fn(Permission) -> bool` closure is a guard; returning `false` denies.
///
/// # Examples
///
/// ```rust
/// use memberscope::{AccessGuard, Error, Permission};
///
/// let no_foreign = |p: Permission| p != Permission::ResolveForeignScope;
/// assert!(no_foreign.check(Permission::CreateRegistry).is_ok());
/// assert_eq!(
///     no_foreign.check(Permission::ResolveForeignScope),
///     Err(Error::AccessDenied(Permission::ResolveForeignScope))
/// );
/// ```
pub trait AccessGuard: Send + Sync {
    /// Allow or deny `permission`.
    ///
    /// # Errors
    /// Returns [`Error::AccessDenied`] if the operation is not permitted.
    fn check(&self, permission: Permission) -> Result<()>;
}

/// Guard that permits everything; the default for new registries
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessGuard for AllowAll {
    fn check(&self, _permission: Permission) -> Result<()> {
        Ok(())
    }
}

impl<F> AccessGuard for F
where
    F: Fn(Permission) -> bool + Send + Sync,
{
    fn check(&self, permission: Permission) -> Result<()> {
        if self(permission) {
            Ok(())
        } else {
            Err(Error::AccessDenied(permission))
        }
    }
}
