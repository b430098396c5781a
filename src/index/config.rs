//! Index configuration
//!
//! This module provides the knobs that control how strictly the index checks its
//! callers and its inputs while building entries.

/// Configuration for an [`crate::IntrospectionRegistry`] and the scope indexes it creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Check that a type handed directly to a [`crate::ScopeIndex`] really belongs to it.
    /// Costs one [`crate::TypeProvider::owning_scope`] call per lookup.
    pub verify_scope: bool,

    /// Maximum depth of a parent chain that will be indexed (default: 256).
    /// Deeper chains fail with [`crate::Error::RecursionLimit`].
    pub max_hierarchy_depth: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            verify_scope: true,
            max_hierarchy_depth: 256,
        }
    }
}

impl IndexConfig {
    /// Creates a configuration with every check enabled
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Creates a configuration for callers that only reach scope indexes through
    /// their registry, and therefore never present a type to the wrong scope.
    ///
    /// Without verification, [`crate::ScopeIndex::get_or_build`] indexes whatever it is
    /// given under its own scope. A type presented to the wrong scope is cached there:
    /// `drop_scope` on its real scope does not evict that entry, and
    /// [`crate::IntrospectionRegistry::get_index`] builds a second, unrelated index
    /// for it in the owning scope.
    #[must_use]
    pub fn trusted() -> Self {
        Self {
            verify_scope: false,
            max_hierarchy_depth: 256,
        }
    }

    /// Override the maximum hierarchy depth
    #[must_use]
    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }
}
