//! The type-description collaborator the index is built on.

use std::{fmt::Debug, hash::Hash};

use crate::{index::DeclaredMembers, Result};

/// Describes runtime types to the index.
///
/// A `TypeProvider` is the only thing the index knows about the outside world. It
/// enumerates the members a type declares, names the type's parent and names the scope
/// that owns the type. Type and scope values are used directly as keys of concurrent
/// maps, so their `Eq`/`Hash` must express identity: either reference identity
/// (e.g. an `Arc` compared by pointer) or a canonical name.
///
/// # Contract
///
/// For a given type, every method must return the same answer for as long as the
/// owning scope is cached. The index calls [`TypeProvider::declared_members`] exactly
/// once per built entry and never caches a failed answer, so a provider may fail
/// transiently and be asked again later.
///
/// Failures are reported as [`crate::Error::Provider`] (or any other crate error) and
/// are propagated unchanged to every caller waiting on the same entry.
pub trait TypeProvider: Send + Sync + 'static {
    /// Identity of a type
    type Type: Clone + Eq + Hash + Debug + Send + Sync + 'static;
    /// Identity of a loading scope
    type Scope: Clone + Eq + Hash + Debug + Send + Sync + 'static;
    /// Opaque per-member handle the caller uses to read or invoke a member
    type Handle: Clone + Debug + Send + Sync + 'static;

    /// The fields, constructors and methods `ty` declares itself.
    ///
    /// # Errors
    /// Returns an error if the type cannot be described.
    fn declared_members(&self, ty: &Self::Type) -> Result<DeclaredMembers<Self::Handle>>;

    /// The parent of `ty`, or `None` at the top of a hierarchy.
    ///
    /// # Errors
    /// Returns an error if the parent cannot be resolved.
    fn parent_type(&self, ty: &Self::Type) -> Result<Option<Self::Type>>;

    /// The scope that owns `ty`.
    ///
    /// # Errors
    /// Returns an error if the scope cannot be resolved.
    fn owning_scope(&self, ty: &Self::Type) -> Result<Self::Scope>;
}
