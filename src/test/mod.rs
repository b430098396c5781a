use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering},
};

use parking_lot::Mutex;

use crate::{
    index::{DeclaredMembers, Member, TypeProvider},
    Error, Result,
};

/// Collect members into a `DeclaredMembers`, routing each by kind
pub fn members(items: impl IntoIterator<Item = Member<u32>>) -> DeclaredMembers<u32> {
    items.into_iter().collect()
}

struct MockType {
    scope: &'static str,
    parent: Option<&'static str>,
    members: DeclaredMembers<u32>,
}

/// In-memory provider keyed by type name, counting every `declared_members` call
#[derive(Default)]
pub struct MockProvider {
    types: HashMap<&'static str, MockType>,
    builds: AtomicUsize,
    failing: Mutex<HashSet<&'static str>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(
        mut self,
        name: &'static str,
        scope: &'static str,
        parent: Option<&'static str>,
        members: DeclaredMembers<u32>,
    ) -> Self {
        self.types.insert(
            name,
            MockType {
                scope,
                parent,
                members,
            },
        );
        self
    }

    /// Number of `declared_members` calls so far
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Make `declared_members` fail for `name` until `recover` is called
    pub fn fail(&self, name: &'static str) {
        self.failing.lock().insert(name);
    }

    pub fn recover(&self, name: &'static str) {
        self.failing.lock().remove(name);
    }

    fn lookup(&self, ty: &'static str) -> Result<&MockType> {
        self.types
            .get(&ty)
            .ok_or_else(|| Error::Provider(format!("unknown type {ty}")))
    }
}

impl TypeProvider for MockProvider {
    type Type = &'static str;
    type Scope = &'static str;
    type Handle = u32;

    fn declared_members(&self, ty: &&'static str) -> Result<DeclaredMembers<u32>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(ty) {
            return Err(Error::Provider(format!("{ty} is unavailable")));
        }
        Ok(self.lookup(*ty)?.members.clone())
    }

    fn parent_type(&self, ty: &&'static str) -> Result<Option<&'static str>> {
        Ok(self.lookup(*ty)?.parent)
    }

    fn owning_scope(&self, ty: &&'static str) -> Result<&'static str> {
        Ok(self.lookup(*ty)?.scope)
    }
}
