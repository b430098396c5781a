//! Per-scope cache of type indexes.
//!
//! A [`ScopeIndex`] maps the types of one loading scope to their [`TypeIndex`]. Entries
//! are built lazily, on first request, and at most once: concurrent first requests for
//! the same type all receive the single index built by whichever request got there
//! first. Parents are indexed before their children; a parent in this scope comes from
//! this cache, a parent in another scope is resolved through the owning registry.
//!
//! # Invalidation
//!
//! [`ScopeIndex::drop_type`] removes one entry and nothing else. Indexes of subtypes that
//! were built against the dropped entry keep their parent link until they are dropped
//! themselves or the whole scope is dropped from the registry.

use std::{
    fmt,
    sync::{Arc, Weak},
};

use tracing::debug;

use crate::{
    index::{
        cache::OnceMap, registry::RegistryInner, IndexConfig, Permission, TypeIndex,
        TypeProvider,
    },
    Error, Result,
};

/// Concurrent cache of [`TypeIndex`] entries for the types of one scope
pub struct ScopeIndex<P: TypeProvider> {
    /// The scope identity
    scope: P::Scope,
    /// Describes the types of this scope
    provider: Arc<P>,
    /// Settings inherited from the registry
    config: IndexConfig,
    /// Built (or in-flight) type indexes
    types: OnceMap<P::Type, TypeIndex<P>>,
    /// Used only to resolve parents living in another scope
    registry: Weak<RegistryInner<P>>,
    /// Handed to each built `TypeIndex` as its owner link
    me: Weak<ScopeIndex<P>>,
}

impl<P: TypeProvider> ScopeIndex<P> {
    pub(crate) fn new(
        scope: P::Scope,
        provider: Arc<P>,
        config: IndexConfig,
        registry: Weak<RegistryInner<P>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| ScopeIndex {
            scope,
            provider,
            config,
            types: OnceMap::new(),
            registry,
            me: me.clone(),
        })
    }

    /// The scope this index caches types for
    pub fn scope(&self) -> &P::Scope {
        &self.scope
    }

    /// Get the index for `ty`, building it (and any missing ancestors) if necessary.
    ///
    /// # Errors
    /// Returns [`Error::ScopeMismatch`] if `ty` belongs to another scope (checked when
    /// [`IndexConfig::verify_scope`] is set), or any error raised while building.
    /// With verification off, a type from another scope is indexed and cached here as
    /// if this scope owned it; see [`IndexConfig::trusted`].
    pub fn get_or_build(&self, ty: &P::Type) -> Result<Arc<TypeIndex<P>>> {
        if self.config.verify_scope {
            let owner = self.provider.owning_scope(ty)?;
            if owner != self.scope {
                return Err(Error::ScopeMismatch {
                    expected: format!("{:?}", self.scope),
                    found: format!("{owner:?}"),
                });
            }
        }
        self.index_at(ty, 0)
    }

    /// The index for `ty` if it has already been built; never builds or waits
    pub fn get(&self, ty: &P::Type) -> Option<Arc<TypeIndex<P>>> {
        self.types.get(ty)
    }

    /// Remove the cached index for `ty`.
    ///
    /// Safe to call whether or not an entry exists. Returns `true` if one was removed.
    /// Indexes already handed out, including subtypes whose parent is `ty`, are not
    /// affected.
    pub fn drop_type(&self, ty: &P::Type) -> bool {
        let removed = self.types.remove(ty);
        if removed {
            debug!(scope = ?self.scope, ty = ?ty, "dropped type index");
        }
        removed
    }

    /// Number of built type indexes
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type index has been built yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get or build the index of a type already known to belong to this scope.
    ///
    /// `depth` is the distance from the type originally requested.
    pub(crate) fn index_at(&self, ty: &P::Type, depth: usize) -> Result<Arc<TypeIndex<P>>> {
        if depth > self.config.max_hierarchy_depth {
            return Err(Error::RecursionLimit(self.config.max_hierarchy_depth));
        }
        self.types.get_or_try_build(ty, || self.build(ty, depth))
    }

    fn build(&self, ty: &P::Type, depth: usize) -> Result<Arc<TypeIndex<P>>> {
        let members = self.provider.declared_members(ty)?;
        let parent = match self.provider.parent_type(ty)? {
            Some(parent) => Some(self.resolve_parent(&parent, depth + 1)?),
            None => None,
        };
        // a cached parent skips the descent, so its chain is checked here as well
        if let Some(parent) = &parent {
            if parent.hierarchy_depth() >= self.config.max_hierarchy_depth {
                return Err(Error::RecursionLimit(self.config.max_hierarchy_depth));
            }
        }

        let index = TypeIndex::build(
            ty.clone(),
            self.scope.clone(),
            self.me.clone(),
            members,
            parent,
        );
        debug!(
            scope = ?self.scope,
            ty = ?ty,
            parent = ?index.parent().map(|parent| parent.indexed_type()),
            fields = index.fields().len(),
            constructors = index.constructors().len(),
            methods = index.methods().len(),
            "built type index"
        );
        Ok(Arc::new(index))
    }

    fn resolve_parent(&self, parent: &P::Type, depth: usize) -> Result<Arc<TypeIndex<P>>> {
        let owner = self.provider.owning_scope(parent)?;
        if owner == self.scope {
            return self.index_at(parent, depth);
        }

        let registry = self.registry.upgrade().ok_or(Error::RegistryDropped)?;
        registry.check(Permission::ResolveForeignScope)?;
        registry.scope_index(&owner)?.index_at(parent, depth)
    }
}

impl<P: TypeProvider> fmt::Debug for ScopeIndex<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeIndex")
            .field("scope", &self.scope)
            .field("types", &self.types.len())
            .finish()
    }
}
