//! Per-type member index.
//!
//! A [`TypeIndex`] is an immutable snapshot of the members one type declares itself,
//! sorted for binary search, plus a link to the index of its parent type and a weak
//! link to the [`ScopeIndex`] that owns it.
//!
//! # Lookups
//!
//! | Query | Key | Result |
//! |-------|-----|--------|
//! | [`TypeIndex::field`] | name | one field |
//! | [`TypeIndex::constructor`] | parameter types | one constructor |
//! | [`TypeIndex::method`] | name, parameter types, return type | one method |
//! | [`TypeIndex::methods_matching`] | name, parameter types | overloads differing only in return type |
//! | [`TypeIndex::methods_named`] | name | every overload |
//! | [`TypeIndex::methods_with_arity`] | name, parameter count | overloads of that arity |
//!
//! Exact lookups are a single binary search. Overload queries find one match and then
//! expand it in both directions with two further binary searches (see
//! `index::search`), so they cost O(log n) plus the size of the answer.
//!
//! # Inheritance
//!
//! Lookups only ever see the type's own members. Callers that want inherited members
//! walk [`TypeIndex::parent`] or [`TypeIndex::ancestors`] themselves and decide how
//! shadowing and overriding resolve.
//!
//! # Examples
//!
//! ```rust,no_run
//! use memberscope::{IntrospectionRegistry, TypeProvider};
//!
//! # fn example<P: TypeProvider>(registry: &IntrospectionRegistry<P>, ty: &P::Type) -> memberscope::Result<()> {
//! let index = registry.get_index(ty)?;
//!
//! for method in index.methods_named("toString") {
//!     println!("{method}");
//! }
//!
//! // First declaration of `count` along the hierarchy
//! let count = index.ancestors().find_map(|ancestor| ancestor.field("count"));
//! # Ok(())
//! # }
//! ```

use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::index::{
    ordering::{
        constructor_key, constructor_order, field_key, field_order, method_key,
        method_name_key, method_order, method_overload_key,
    },
    search::{equal_range, find},
    DeclaredMembers, Member, MemberKind, ScopeIndex, TypeProvider,
};

/// Immutable, binary-searchable index of one type's declared members
pub struct TypeIndex<P: TypeProvider> {
    /// The indexed type
    ty: P::Type,
    /// Identity of the owning scope
    scope_id: P::Scope,
    /// Owning scope index; weak so handed-out indexes never keep a dropped scope alive
    scope: Weak<ScopeIndex<P>>,
    /// Index of the parent type, `None` at the top of a hierarchy
    parent: Option<Arc<TypeIndex<P>>>,
    /// Number of ancestors
    depth: usize,
    /// Sorted by name
    fields: Vec<Member<P::Handle>>,
    /// Sorted by parameter types
    constructors: Vec<Member<P::Handle>>,
    /// Sorted by name, then parameter types, then return type
    methods: Vec<Member<P::Handle>>,
}

impl<P: TypeProvider> TypeIndex<P> {
    /// Sort `members` into a new index. Pure; safe to run redundantly.
    pub(crate) fn build(
        ty: P::Type,
        scope_id: P::Scope,
        scope: Weak<ScopeIndex<P>>,
        members: DeclaredMembers<P::Handle>,
        parent: Option<Arc<TypeIndex<P>>>,
    ) -> Self {
        let DeclaredMembers {
            mut fields,
            mut constructors,
            mut methods,
        } = members;

        fields.sort_by(field_order);
        constructors.sort_by(constructor_order);
        methods.sort_by(method_order);
        let depth = parent.as_ref().map_or(0, |parent| parent.depth + 1);

        TypeIndex {
            ty,
            scope_id,
            scope,
            parent,
            depth,
            fields,
            constructors,
            methods,
        }
    }

    /// The type this index describes
    pub fn indexed_type(&self) -> &P::Type {
        &self.ty
    }

    /// Identity of the scope that owns the indexed type
    pub fn scope_id(&self) -> &P::Scope {
        &self.scope_id
    }

    /// The owning scope index, if it is still cached by its registry
    pub fn scope(&self) -> Option<Arc<ScopeIndex<P>>> {
        self.scope.upgrade()
    }

    /// Index of the parent type
    pub fn parent(&self) -> Option<&Arc<TypeIndex<P>>> {
        self.parent.as_ref()
    }

    /// Number of ancestors above the indexed type, `0` at the top of a hierarchy
    pub fn hierarchy_depth(&self) -> usize {
        self.depth
    }

    /// This index followed by the index of each ancestor, nearest first
    pub fn ancestors(&self) -> Ancestors<'_, P> {
        Ancestors { next: Some(self) }
    }

    /// Get a field declared on this type.
    ///
    /// ## Arguments
    /// * 'name' - The field name
    ///
    /// ## Returns
    /// The field, or `None` if no field of that name is declared
    pub fn field(&self, name: &str) -> Option<&Member<P::Handle>> {
        find(&self.fields, |field| field_key(field, name))
    }

    /// All declared fields, sorted by name
    pub fn fields(&self) -> &[Member<P::Handle>] {
        &self.fields
    }

    /// Get a constructor declared on this type.
    ///
    /// ## Arguments
    /// * 'params' - The constructor parameter types
    ///
    /// ## Returns
    /// The constructor, or `None` if no constructor takes exactly these parameters
    pub fn constructor(&self, params: &[&str]) -> Option<&Member<P::Handle>> {
        find(&self.constructors, |ctor| constructor_key(ctor, params))
    }

    /// All declared constructors, sorted by parameter types
    pub fn constructors(&self) -> &[Member<P::Handle>] {
        &self.constructors
    }

    /// Get a method declared on this type by its full signature.
    ///
    /// ## Arguments
    /// * 'name' - The method name
    /// * 'params' - The parameter types
    /// * 'return_type' - The return type
    ///
    /// ## Returns
    /// The method, or `None` if no method has that exact signature
    pub fn method(
        &self,
        name: &str,
        params: &[&str],
        return_type: &str,
    ) -> Option<&Member<P::Handle>> {
        find(&self.methods, |method| {
            method_key(method, name, params, return_type)
        })
    }

    /// Get this type's own method with the same signature as `method`.
    ///
    /// `method` may come from anywhere (another index, a provider, a hand-built
    /// [`Member`]); only its name, parameter types and return type are used. Returns
    /// `None` if `method` is not a method or no such method is declared here.
    pub fn canonical_method<H>(&self, method: &Member<H>) -> Option<&Member<P::Handle>> {
        if method.kind() != MemberKind::Method {
            return None;
        }
        find(&self.methods, |own| {
            method_key(
                own,
                method.name_or_empty(),
                method.parameters(),
                method.return_or_empty(),
            )
        })
    }

    /// Methods with the given name and parameter types, whatever their return type.
    ///
    /// The result is a (possibly empty) sub-slice of [`TypeIndex::methods`], sorted by
    /// return type.
    pub fn methods_matching(&self, name: &str, params: &[&str]) -> &[Member<P::Handle>] {
        equal_range(&self.methods, |method| {
            method_overload_key(method, name, params)
        })
    }

    /// Every method with the given name.
    ///
    /// The result is a (possibly empty) sub-slice of [`TypeIndex::methods`], sorted by
    /// parameter types and then return type.
    pub fn methods_named(&self, name: &str) -> &[Member<P::Handle>] {
        equal_range(&self.methods, |method| method_name_key(method, name))
    }

    /// Methods with the given name that take exactly `count` parameters, in sorted order
    pub fn methods_with_arity(&self, name: &str, count: usize) -> Vec<&Member<P::Handle>> {
        self.methods_named(name)
            .iter()
            .filter(|method| method.arity() == count)
            .collect()
    }

    /// All declared methods, sorted by name, parameter types and return type
    pub fn methods(&self) -> &[Member<P::Handle>] {
        &self.methods
    }

    /// Number of declared members of `kind`
    pub fn len(&self, kind: MemberKind) -> usize {
        match kind {
            MemberKind::Field => self.fields.len(),
            MemberKind::Constructor => self.constructors.len(),
            MemberKind::Method => self.methods.len(),
        }
    }

    /// Returns `true` if the type declares no members at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.constructors.is_empty() && self.methods.is_empty()
    }
}

impl<P: TypeProvider> fmt::Debug for TypeIndex<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeIndex")
            .field("type", &self.ty)
            .field("scope", &self.scope_id)
            .field("parent", &self.parent.as_ref().map(|parent| &parent.ty))
            .field("fields", &self.fields.len())
            .field("constructors", &self.constructors.len())
            .field("methods", &self.methods.len())
            .finish()
    }
}

/// Iterator over a [`TypeIndex`] and its ancestors, see [`TypeIndex::ancestors`]
pub struct Ancestors<'a, P: TypeProvider> {
    next: Option<&'a TypeIndex<P>>,
}

impl<'a, P: TypeProvider> Iterator for Ancestors<'a, P> {
    type Item = &'a TypeIndex<P>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
