// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # memberscope
//!
//! A concurrent, scope-partitioned introspection index over the declared members of
//! runtime types.
//!
//! Given a type and the loading scope that owns it, `memberscope` builds (once) and
//! caches an immutable catalogue of the type's fields, constructors and methods,
//! sorted for binary search. Overloaded methods are recovered as contiguous ranges,
//! parent types are indexed first and linked, and whole scopes can be evicted when
//! they are unloaded.
//!
//! ## Features
//!
//! - **🔍 Fast lookups** - Exact field, constructor and method lookups in O(log n)
//! - **🧩 Overload resolution** - By name, by name and parameters, by name and arity
//! - **⚡ Build once** - Concurrent first requests share a single build per type
//! - **🛡️ Failure isolation** - A failed build is reported to every waiter and retried later
//! - **🗂️ Scoped eviction** - Drop a single type or an entire scope
//!
//! ## Quick Start
//!
//! Implement [`TypeProvider`] for whatever describes your types, then ask a registry:
//!
//! ```rust,no_run
//! use memberscope::prelude::*;
//!
//! # fn example<P: TypeProvider>(provider: P, ty: &P::Type) -> memberscope::Result<()> {
//! let registry = IntrospectionRegistry::create(provider)?;
//! let index = registry.get_index(ty)?;
//!
//! for overload in index.methods_named("put") {
//!     println!("{overload}");
//! }
//! if let Some(ctor) = index.constructor(&["int"]) {
//!     println!("{:?}", ctor.handle());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`index`] - Registry, scope and type indexes, members and orderings
//! - [`Error`] and [`Result`] - Error handling
//! - [`prelude`] - Convenient re-exports
//!
//! ## Logging
//!
//! Cache activity is reported through [`tracing`]: builds and drops at `debug`, cache
//! hits and waits at `trace`, failed builds at `warn`. No subscriber is installed by
//! this crate.

mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use memberscope::prelude::*;
///
/// fn methods_of<P: TypeProvider>(registry: &IntrospectionRegistry<P>, ty: &P::Type) -> Result<usize> {
///     Ok(registry.get_index(ty)?.methods().len())
/// }
/// ```
pub mod prelude;

/// Introspection index: registry, scope indexes and type indexes
///
/// # Key Types
///
/// - [`index::IntrospectionRegistry`] - Root cache keyed by scope
/// - [`index::ScopeIndex`] - Per-scope cache keyed by type
/// - [`index::TypeIndex`] - Sorted member snapshot of one type
/// - [`index::TypeProvider`] - Describes types to the index
pub mod index;

/// `memberscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `memberscope` Error type
///
/// Covers caller mistakes, access-policy denials and failed index builds.
pub use error::Error;

pub use index::{
    compare_parameters, AccessGuard, AllowAll, Ancestors, DeclaredMembers, IndexConfig,
    IntrospectionRegistry, Member, MemberKind, Permission, RegistryBuilder, ScopeIndex,
    TypeIndex, TypeName, TypeProvider,
};
