//! # memberscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the memberscope library. Import this module to get quick access to everything
//! needed to describe types to an index and query it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all memberscope operations
pub use crate::Error;

/// The result type used throughout memberscope
pub use crate::Result;

/// Configuration for registries and the scope indexes they create
pub use crate::index::IndexConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Root cache and its builder
pub use crate::index::{IntrospectionRegistry, RegistryBuilder};

/// Per-scope and per-type indexes
pub use crate::index::{Ancestors, ScopeIndex, TypeIndex};

// ================================================================================================
// Describing Types
// ================================================================================================

/// The collaborator trait and the member values it reports
pub use crate::index::{DeclaredMembers, Member, MemberKind, TypeName, TypeProvider};

/// Parameter-list ordering used by every index lookup
pub use crate::index::compare_parameters;

// ================================================================================================
// Access Control
// ================================================================================================

/// Guards for privileged operations
pub use crate::index::{AccessGuard, AllowAll, Permission};
