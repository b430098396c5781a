//! Shared provider for integration tests.
//!
//! `ClassPath` models a small class-loader world: named classes, each defined by one
//! loader, with an optional superclass and a list of declared members. Every
//! `declared_members` call is counted per class so tests can assert how often an index
//! was really built.

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::Duration,
};

use parking_lot::Mutex;

use memberscope::{DeclaredMembers, Error, Member, Result, TypeProvider};

/// Handle stored in every member: `"Class#member"`
pub type Handle = String;

pub struct ClassDef {
    loader: &'static str,
    superclass: Option<&'static str>,
    members: Vec<Member<Handle>>,
    builds: AtomicUsize,
}

#[derive(Default)]
pub struct ClassPath {
    classes: HashMap<&'static str, ClassDef>,
    build_delay: Option<Duration>,
    broken: Mutex<HashSet<&'static str>>,
}

impl ClassPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(
        mut self,
        name: &'static str,
        loader: &'static str,
        superclass: Option<&'static str>,
        members: Vec<Member<Handle>>,
    ) -> Self {
        self.classes.insert(
            name,
            ClassDef {
                loader,
                superclass,
                members,
                builds: AtomicUsize::new(0),
            },
        );
        self
    }

    /// Make every `declared_members` call sleep, widening build races
    pub fn slow(mut self, delay: Duration) -> Self {
        self.build_delay = Some(delay);
        self
    }

    /// Make `declared_members` fail for `name` (after counting and sleeping)
    pub fn break_class(&self, name: &'static str) {
        self.broken.lock().insert(name);
    }

    pub fn repair_class(&self, name: &'static str) {
        self.broken.lock().remove(name);
    }

    pub fn builds_of(&self, name: &str) -> usize {
        self.classes
            .get(name)
            .map_or(0, |class| class.builds.load(Ordering::SeqCst))
    }

    fn get(&self, name: &'static str) -> Result<&ClassDef> {
        self.classes
            .get(name)
            .ok_or_else(|| Error::Provider(format!("class not found: {name}")))
    }
}

impl TypeProvider for ClassPath {
    type Type = &'static str;
    type Scope = &'static str;
    type Handle = Handle;

    fn declared_members(&self, ty: &&'static str) -> Result<DeclaredMembers<Handle>> {
        let class = self.get(*ty)?;
        class.builds.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.build_delay {
            thread::sleep(delay);
        }
        if self.broken.lock().contains(ty) {
            return Err(Error::Provider(format!("class file corrupt: {ty}")));
        }
        Ok(class.members.iter().cloned().collect())
    }

    fn parent_type(&self, ty: &&'static str) -> Result<Option<&'static str>> {
        Ok(self.get(*ty)?.superclass)
    }

    fn owning_scope(&self, ty: &&'static str) -> Result<&'static str> {
        Ok(self.get(*ty)?.loader)
    }
}

pub fn field(owner: &str, name: &str) -> Member<Handle> {
    Member::field(name, format!("{owner}#{name}"))
}

pub fn method(owner: &str, name: &str, params: &[&str], ret: &str) -> Member<Handle> {
    Member::method(
        name,
        params.iter().copied(),
        ret,
        format!("{owner}#{name}({})", params.join(",")),
    )
}

pub fn ctor(owner: &str, params: &[&str]) -> Member<Handle> {
    Member::constructor(
        params.iter().copied(),
        format!("{owner}#<init>({})", params.join(",")),
    )
}

/// A small world spanning two loaders:
///
/// ```text
/// boot:  Object <- AbstractList
/// app:   AbstractList <- ArrayList <- Stack
/// ```
pub fn jdk() -> ClassPath {
    ClassPath::new()
        .class(
            "Object",
            "boot",
            None,
            vec![
                ctor("Object", &[]),
                method("Object", "hashCode", &[], "int"),
                method("Object", "equals", &["Object"], "boolean"),
                method("Object", "toString", &[], "String"),
            ],
        )
        .class(
            "AbstractList",
            "boot",
            Some("Object"),
            vec![
                field("AbstractList", "modCount"),
                method("AbstractList", "add", &["Object"], "boolean"),
                method("AbstractList", "add", &["int", "Object"], "void"),
                method("AbstractList", "get", &["int"], "Object"),
            ],
        )
        .class(
            "ArrayList",
            "app",
            Some("AbstractList"),
            vec![
                field("ArrayList", "size"),
                field("ArrayList", "elementData"),
                ctor("ArrayList", &[]),
                ctor("ArrayList", &["int"]),
                ctor("ArrayList", &["Collection"]),
                method("ArrayList", "add", &["Object"], "boolean"),
                method("ArrayList", "add", &["int", "Object"], "void"),
                method("ArrayList", "get", &["int"], "Object"),
                method("ArrayList", "remove", &["int"], "Object"),
                method("ArrayList", "remove", &["Object"], "boolean"),
                method("ArrayList", "size", &[], "int"),
            ],
        )
        .class(
            "Stack",
            "app",
            Some("ArrayList"),
            vec![
                ctor("Stack", &[]),
                method("Stack", "push", &["Object"], "Object"),
                method("Stack", "pop", &[], "Object"),
                method("Stack", "peek", &[], "Object"),
            ],
        )
}
