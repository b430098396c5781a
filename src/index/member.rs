//! Declared members and the type identities that appear in their signatures.
//!
//! A [`Member`] is one declared field, constructor or method of a type, captured as an
//! immutable value: its kind, its name (constructors have none), the identities of its
//! parameter types, the identity of its return type (methods only) and an opaque handle
//! owned by the caller. The index never interprets the handle; it only hands it back.
//!
//! [`DeclaredMembers`] is the unsorted set a [`crate::TypeProvider`] reports for a type.

use std::{borrow::Borrow, fmt, sync::Arc};

use strum::{EnumCount, EnumIter};

/// Canonical identity of a type as it appears in a member signature.
///
/// Parameter and return types are compared by this value. Ordering is the ordering of
/// the underlying string, and a `TypeName` compares directly against `&str` so queries
/// can be made without allocating.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Create a new `TypeName` from its canonical spelling
    pub fn new(name: impl AsRef<str>) -> Self {
        TypeName(Arc::from(name.as_ref()))
    }

    /// The canonical spelling
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        TypeName(Arc::from(name))
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// The three kinds of declared members an index keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum MemberKind {
    /// A field, identified by name
    Field,
    /// A constructor, identified by its parameter types
    Constructor,
    /// A method, identified by name, parameter types and return type
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemberKind::Field => "field",
            MemberKind::Constructor => "constructor",
            MemberKind::Method => "method",
        };
        f.write_str(name)
    }
}

/// A declared field, constructor or method of a type.
///
/// Members are immutable once captured. The `handle` is whatever the
/// [`crate::TypeProvider`] uses to read or invoke the member; it takes no part in
/// ordering or lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member<H> {
    kind: MemberKind,
    name: Option<String>,
    parameters: Vec<TypeName>,
    return_type: Option<TypeName>,
    handle: H,
}

impl<H> Member<H> {
    /// Capture a field
    pub fn field(name: impl Into<String>, handle: H) -> Self {
        Member {
            kind: MemberKind::Field,
            name: Some(name.into()),
            parameters: Vec::new(),
            return_type: None,
            handle,
        }
    }

    /// Capture a constructor taking `parameters`
    pub fn constructor<I, T>(parameters: I, handle: H) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        Member {
            kind: MemberKind::Constructor,
            name: None,
            parameters: parameters.into_iter().map(Into::into).collect(),
            return_type: None,
            handle,
        }
    }

    /// Capture a method
    ///
    /// ## Arguments
    /// * 'name' - The method name
    /// * 'parameters' - Parameter type identities, in declaration order
    /// * 'return_type' - Return type identity
    /// * 'handle' - Caller-defined handle to the method
    pub fn method<I, T>(
        name: impl Into<String>,
        parameters: I,
        return_type: impl Into<TypeName>,
        handle: H,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        Member {
            kind: MemberKind::Method,
            name: Some(name.into()),
            parameters: parameters.into_iter().map(Into::into).collect(),
            return_type: Some(return_type.into()),
            handle,
        }
    }

    /// The kind of this member
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The member name, `None` for constructors
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parameter type identities in declaration order
    #[must_use]
    pub fn parameters(&self) -> &[TypeName] {
        &self.parameters
    }

    /// Number of parameters
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Return type identity, `None` for fields and constructors
    #[must_use]
    pub fn return_type(&self) -> Option<&TypeName> {
        self.return_type.as_ref()
    }

    /// The caller-defined handle
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub(crate) fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub(crate) fn return_or_empty(&self) -> &str {
        self.return_type.as_ref().map_or("", TypeName::as_str)
    }
}

impl<H> fmt::Display for Member<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Field => return write!(f, "{}", self.name_or_empty()),
            MemberKind::Constructor => write!(f, "<init>(")?,
            MemberKind::Method => write!(f, "{}(", self.name_or_empty())?,
        }
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

/// The members a type declares itself, in no particular order.
///
/// This is what a [`crate::TypeProvider`] reports for one type. Inherited members are
/// not included; they belong to the parent type's own declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMembers<H> {
    pub(crate) fields: Vec<Member<H>>,
    pub(crate) constructors: Vec<Member<H>>,
    pub(crate) methods: Vec<Member<H>>,
}

impl<H> DeclaredMembers<H> {
    /// Create an empty member set
    #[must_use]
    pub fn new() -> Self {
        DeclaredMembers {
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add a member to the list matching its kind
    pub fn push(&mut self, member: Member<H>) {
        match member.kind {
            MemberKind::Field => self.fields.push(member),
            MemberKind::Constructor => self.constructors.push(member),
            MemberKind::Method => self.methods.push(member),
        }
    }

    /// Declared fields
    #[must_use]
    pub fn fields(&self) -> &[Member<H>] {
        &self.fields
    }

    /// Declared constructors
    #[must_use]
    pub fn constructors(&self) -> &[Member<H>] {
        &self.constructors
    }

    /// Declared methods
    #[must_use]
    pub fn methods(&self) -> &[Member<H>] {
        &self.methods
    }

    /// Total number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + self.constructors.len() + self.methods.len()
    }

    /// Returns `true` if no members are declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H> Default for DeclaredMembers<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Extend<Member<H>> for DeclaredMembers<H> {
    fn extend<I: IntoIterator<Item = Member<H>>>(&mut self, iter: I) {
        for member in iter {
            self.push(member);
        }
    }
}

impl<H> FromIterator<Member<H>> for DeclaredMembers<H> {
    fn from_iter<I: IntoIterator<Item = Member<H>>>(iter: I) -> Self {
        let mut members = DeclaredMembers::new();
        members.extend(iter);
        members
    }
}
