//! Root of the introspection index.
//!
//! This module provides the [`IntrospectionRegistry`], the entry point for member
//! lookups. It partitions the cache by loading scope: each scope the registry has seen
//! owns a [`ScopeIndex`], and each scope index owns the [`TypeIndex`] entries of its
//! types.
//!
//! # Key Components
//!
//! - [`IntrospectionRegistry`] - Cheap-to-clone handle over one registry
//! - [`RegistryBuilder`] - Configures and creates a registry
//!
//! # Thread Safety
//!
//! Both cache levels are concurrent maps whose entries are built at most once: a
//! caller that finds an entry under construction waits for it instead of building a
//! second copy. No lock is exposed to callers and lookups of built entries never
//! block.
//!
//! # Examples
//!
//! ```rust,no_run
//! use memberscope::{IntrospectionRegistry, TypeProvider};
//!
//! # fn example<P: TypeProvider>(provider: P, ty: &P::Type, scope: &P::Scope) -> memberscope::Result<()> {
//! let registry = IntrospectionRegistry::create(provider)?;
//!
//! let index = registry.get_index(ty)?;
//! if let Some(field) = index.field("name") {
//!     println!("found {field}");
//! }
//!
//! // The scope is being unloaded: forget everything built for it
//! registry.drop_scope(scope);
//! # Ok(())
//! # }
//! ```

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{
    index::{
        cache::OnceMap, AccessGuard, AllowAll, IndexConfig, Permission, ScopeIndex, TypeIndex,
        TypeProvider,
    },
    Result,
};

/// State shared by every handle to one registry; scope indexes hold it weakly
pub(crate) struct RegistryInner<P: TypeProvider> {
    provider: Arc<P>,
    config: IndexConfig,
    guard: Arc<dyn AccessGuard>,
    scopes: OnceMap<P::Scope, ScopeIndex<P>>,
}

impl<P: TypeProvider> RegistryInner<P> {
    pub(crate) fn check(&self, permission: Permission) -> Result<()> {
        self.guard.check(permission)
    }

    pub(crate) fn scope_index(self: &Arc<Self>, scope: &P::Scope) -> Result<Arc<ScopeIndex<P>>> {
        self.scopes.get_or_try_build(scope, || {
            debug!(scope = ?scope, "created scope index");
            Ok(ScopeIndex::new(
                scope.clone(),
                self.provider.clone(),
                self.config,
                Arc::downgrade(self),
            ))
        })
    }
}

/// A reflection-style index caching the declared members of types, organized by scope.
///
/// Registries are explicitly created and owned by the application; nothing is global.
/// Clones share the same caches. Whenever possible, one registry should be shared for
/// efficiency.
pub struct IntrospectionRegistry<P: TypeProvider> {
    inner: Arc<RegistryInner<P>>,
}

impl<P: TypeProvider> IntrospectionRegistry<P> {
    /// Create a new registry with the default configuration and no access restrictions.
    ///
    /// # Errors
    /// Never fails with the default guard; see [`RegistryBuilder::build`].
    pub fn create(provider: P) -> Result<Self> {
        Self::builder(provider).build()
    }

    /// Start configuring a new registry
    pub fn builder(provider: P) -> RegistryBuilder<P> {
        RegistryBuilder {
            provider,
            config: IndexConfig::default(),
            guard: Arc::new(AllowAll),
        }
    }

    /// Get the index for `ty`, building its scope index, its own index and any missing
    /// ancestor indexes on first use.
    ///
    /// # Errors
    /// Returns an error if the provider cannot resolve or describe `ty` or one of its
    /// ancestors, if the hierarchy is cyclic or too deep, or if an ancestor lives in
    /// another scope and the access guard denies [`Permission::ResolveForeignScope`].
    pub fn get_index(&self, ty: &P::Type) -> Result<Arc<TypeIndex<P>>> {
        let scope = self.inner.provider.owning_scope(ty)?;
        self.inner.scope_index(&scope)?.index_at(ty, 0)
    }

    /// Get the index for `scope`, creating an empty one on first use.
    ///
    /// # Errors
    /// Returns an error only if a concurrent creation of the same scope index failed.
    pub fn scope_index(&self, scope: &P::Scope) -> Result<Arc<ScopeIndex<P>>> {
        self.inner.scope_index(scope)
    }

    /// Drop a scope from the index so that it can be collected.
    ///
    /// Every type index owned by the scope is forgotten; indexes already handed out
    /// remain valid. Subtypes in other scopes that were built against types of this
    /// scope keep their parent links. A later [`IntrospectionRegistry::get_index`] for a
    /// type of this scope rebuilds from scratch, so old and new indexes may coexist.
    ///
    /// Returns `true` if the scope was cached.
    pub fn drop_scope(&self, scope: &P::Scope) -> bool {
        let removed = self.inner.scopes.remove(scope);
        if removed {
            debug!(scope = ?scope, "dropped scope index");
        }
        removed
    }

    /// Drop a single type from the index, e.g. after it has been redefined.
    ///
    /// Does nothing if the type's scope was never indexed. Returns `true` if an entry
    /// was removed.
    ///
    /// # Errors
    /// Returns an error if the provider cannot resolve the owning scope of `ty`.
    pub fn drop_type(&self, ty: &P::Type) -> Result<bool> {
        let scope = self.inner.provider.owning_scope(ty)?;
        Ok(self
            .inner
            .scopes
            .get(&scope)
            .is_some_and(|index| index.drop_type(ty)))
    }

    /// The provider describing types to this registry
    pub fn provider(&self) -> &P {
        &self.inner.provider
    }

    /// The configuration this registry was built with
    pub fn config(&self) -> &IndexConfig {
        &self.inner.config
    }

    /// Number of scope indexes currently cached
    pub fn scope_count(&self) -> usize {
        self.inner.scopes.len()
    }
}

impl<P: TypeProvider> Clone for IntrospectionRegistry<P> {
    fn clone(&self) -> Self {
        IntrospectionRegistry {
            inner: self.inner.clone(),
        }
    }
}

impl<P: TypeProvider> fmt::Debug for IntrospectionRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrospectionRegistry")
            .field("config", &self.inner.config)
            .field("scopes", &self.inner.scopes.len())
            .finish()
    }
}

/// Builder for an [`IntrospectionRegistry`]
pub struct RegistryBuilder<P: TypeProvider> {
    provider: P,
    config: IndexConfig,
    guard: Arc<dyn AccessGuard>,
}

impl<P: TypeProvider> RegistryBuilder<P> {
    /// Use `config` instead of [`IndexConfig::default`]
    #[must_use]
    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Consult `guard` for registry creation and cross-scope resolution
    #[must_use]
    pub fn access_guard(mut self, guard: impl AccessGuard + 'static) -> Self {
        self.guard = Arc::new(guard);
        self
    }

    /// Create the registry.
    ///
    /// # Errors
    /// Returns [`crate::Error::AccessDenied`] if the access guard denies
    /// [`Permission::CreateRegistry`].
    pub fn build(self) -> Result<IntrospectionRegistry<P>> {
        self.guard.check(Permission::CreateRegistry)?;
        Ok(IntrospectionRegistry {
            inner: Arc::new(RegistryInner {
                provider: Arc::new(self.provider),
                config: self.config,
                guard: self.guard,
                scopes: OnceMap::new(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test::{members, MockProvider},
        Error, Member,
    };

    fn provider() -> MockProvider {
        MockProvider::new()
            .with_type("Object", "boot", None, members([Member::field("hash", 1)]))
            .with_type(
                "Widget",
                "plugin",
                Some("Object"),
                members([Member::field("label", 2)]),
            )
    }

    #[test]
    fn test_create_denied() {
        let err = IntrospectionRegistry::builder(provider())
            .access_guard(|p: Permission| p != Permission::CreateRegistry)
            .build()
            .unwrap_err();
        assert_eq!(err, Error::AccessDenied(Permission::CreateRegistry));
    }

    #[test]
    fn test_foreign_scope_denied() {
        let registry = IntrospectionRegistry::builder(provider())
            .access_guard(|p: Permission| p != Permission::ResolveForeignScope)
            .build()
            .unwrap();

        // Object has no parent, so no foreign lookup is needed
        assert!(registry.get_index(&"Object").is_ok());
        assert_eq!(
            registry.get_index(&"Widget").unwrap_err(),
            Error::AccessDenied(Permission::ResolveForeignScope)
        );
        let plugin = registry.scope_index(&"plugin").unwrap();
        assert!(plugin.is_empty());
    }

    #[test]
    fn test_scopes_are_created_lazily() {
        let registry = IntrospectionRegistry::create(provider()).unwrap();
        assert_eq!(registry.scope_count(), 0);

        let widget = registry.get_index(&"Widget").unwrap();
        assert_eq!(registry.scope_count(), 2);
        assert_eq!(widget.scope_id(), &"plugin");
        assert_eq!(widget.parent().unwrap().scope_id(), &"boot");

        let again = registry.scope_index(&"plugin").unwrap();
        assert!(Arc::ptr_eq(&again, &widget.scope().unwrap()));
    }

    #[test]
    fn test_drop_type_without_scope_is_noop() {
        let registry = IntrospectionRegistry::create(provider()).unwrap();
        assert_eq!(registry.drop_type(&"Widget"), Ok(false));
        assert_eq!(registry.scope_count(), 0);

        registry.get_index(&"Widget").unwrap();
        assert_eq!(registry.drop_type(&"Widget"), Ok(true));
        assert!(matches!(
            registry.drop_type(&"Missing"),
            Err(Error::Provider(_))
        ));
    }

    #[test]
    fn test_clones_share_caches() {
        let registry = IntrospectionRegistry::create(provider()).unwrap();
        let other = registry.clone();
        let a = registry.get_index(&"Object").unwrap();
        let b = other.get_index(&"Object").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(other.provider().builds(), 1);
    }

    #[test]
    fn test_dropped_registry_orphans_scope() {
        let registry = IntrospectionRegistry::create(provider()).unwrap();
        let plugin = registry.scope_index(&"plugin").unwrap();
        drop(registry);

        assert_eq!(
            plugin.get_or_build(&"Widget").unwrap_err(),
            Error::RegistryDropped
        );
    }
}
