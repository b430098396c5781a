//! Introspection index over the declared members of runtime types.
//!
//! This module provides a two-level, build-once cache from types to immutable,
//! binary-searchable catalogues of their fields, constructors and methods.
//!
//! # Key Components
//!
//! - [`IntrospectionRegistry`]: Root cache, one [`ScopeIndex`] per loading scope
//! - [`ScopeIndex`]: Per-scope cache, one [`TypeIndex`] per type
//! - [`TypeIndex`]: Sorted snapshot of one type's own members, linked to its parent
//! - [`TypeProvider`]: The collaborator that describes types, parents and scopes
//! - [`Member`]: A declared field, constructor or method
//!
//! # Cache Architecture
//!
//! ```text
//! IntrospectionRegistry ──scope──▶ ScopeIndex ──type──▶ TypeIndex ──parent──▶ TypeIndex
//!                                                                (maybe in another scope)
//! ```
//!
//! - **Lazy**: nothing is indexed until a type is first requested
//! - **Build once**: concurrent first requests for a key share one build
//! - **Immutable entries**: a published `TypeIndex` never changes and needs no locking
//! - **Explicit eviction**: entries leave only through `drop_type` / `drop_scope`
//!
//! # Examples
//!
//! ```rust
//! use memberscope::{DeclaredMembers, IntrospectionRegistry, Member, Result, TypeProvider};
//!
//! struct Single;
//!
//! impl TypeProvider for Single {
//!     type Type = &'static str;
//!     type Scope = &'static str;
//!     type Handle = usize;
//!
//!     fn declared_members(&self, _ty: &&'static str) -> Result<DeclaredMembers<usize>> {
//!         Ok([
//!             Member::method("len", Vec::<&str>::new(), "int", 0),
//!             Member::method("get", ["int"], "char", 1),
//!         ]
//!         .into_iter()
//!         .collect())
//!     }
//!
//!     fn parent_type(&self, _ty: &&'static str) -> Result<Option<&'static str>> {
//!         Ok(None)
//!     }
//!
//!     fn owning_scope(&self, _ty: &&'static str) -> Result<&'static str> {
//!         Ok("main")
//!     }
//! }
//!
//! let registry = IntrospectionRegistry::create(Single)?;
//! let index = registry.get_index(&"String")?;
//! assert_eq!(*index.method("get", &["int"], "char").unwrap().handle(), 1);
//! # Ok::<(), memberscope::Error>(())
//! ```

mod access;
mod cache;
mod config;
mod member;
mod ordering;
mod provider;
mod registry;
mod scope;
mod search;
mod typeindex;

pub use access::{AccessGuard, AllowAll, Permission};
pub use config::IndexConfig;
pub use member::{DeclaredMembers, Member, MemberKind, TypeName};
pub use ordering::compare_parameters;
pub use provider::TypeProvider;
pub use registry::{IntrospectionRegistry, RegistryBuilder};
pub use scope::ScopeIndex;
pub use typeindex::{Ancestors, TypeIndex};
