//! Build-once concurrent map shared by both cache levels.
//!
//! Each key holds either a finished value or a placeholder for a build in progress.
//! The first caller to find a key vacant installs a placeholder (atomically, under the
//! shard lock), releases the lock and builds. Every other caller that finds the
//! placeholder waits on it and receives the builder's result, success or failure.
//! Shard locks are never held while building or waiting, so a build may recurse into
//! the same map for other keys.
//!
//! On completion the builder publishes its value only if its own placeholder is still
//! installed. If the key was removed meanwhile the value is handed to the waiting
//! callers but not cached. A failed or panicking build removes its placeholder so the
//! next caller starts over.
//!
//! [`Error::RecursionLimit`] depends on how deep the request that started a build was,
//! so a waiter receiving it does not keep it: the waiter claims the key again and, if
//! it wins, builds at its own depth.

use std::{
    fmt::Debug,
    hash::Hash,
    panic::{catch_unwind, resume_unwind, AssertUnwindSafe},
    sync::Arc,
    thread::{self, ThreadId},
};

use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::{Condvar, Mutex};
use tracing::{trace, warn};

use crate::{Error, Result};

/// One-shot result slot that waiting callers block on
struct BuildCell<V> {
    /// Thread running the build; re-entry from it is a cycle, not a wait
    owner: ThreadId,
    result: Mutex<Option<Result<Arc<V>>>>,
    done: Condvar,
}

impl<V> BuildCell<V> {
    fn new() -> Self {
        BuildCell {
            owner: thread::current().id(),
            result: Mutex::new(None),
            done: Condvar::new(),
        }
    }

    fn complete(&self, result: Result<Arc<V>>) {
        *self.result.lock() = Some(result);
        self.done.notify_all();
    }

    fn wait(&self) -> Result<Arc<V>> {
        let mut result = self.result.lock();
        loop {
            if let Some(result) = result.as_ref() {
                return result.clone();
            }
            self.done.wait(&mut result);
        }
    }
}

enum Slot<V> {
    Building(Arc<BuildCell<V>>),
    Ready(Arc<V>),
}

enum Claim<V> {
    Won(Arc<BuildCell<V>>),
    Lost(Arc<BuildCell<V>>),
}

/// Concurrent map whose values are built at most once per key at a time
pub(crate) struct OnceMap<K, V> {
    slots: DashMap<K, Slot<V>>,
}

impl<K, V> OnceMap<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    pub(crate) fn new() -> Self {
        OnceMap {
            slots: DashMap::new(),
        }
    }

    /// The finished value for `key`, without building or waiting
    pub(crate) fn get(&self, key: &K) -> Option<Arc<V>> {
        match self.slots.get(key)?.value() {
            Slot::Ready(value) => Some(value.clone()),
            Slot::Building(_) => None,
        }
    }

    /// The value for `key`, building it with `build` if no caller has yet.
    ///
    /// # Errors
    /// Returns the error of whichever build this call ran or waited on (except
    /// [`Error::RecursionLimit`] from a build it only waited on, which is retried),
    /// [`Error::CyclicHierarchy`] if the current thread is already building `key`, or
    /// [`Error::BuildPanicked`] if the building thread panicked.
    pub(crate) fn get_or_try_build<F>(&self, key: &K, build: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Result<Arc<V>>,
    {
        if let Some(value) = self.get(key) {
            trace!(key = ?key, "cache hit");
            return Ok(value);
        }

        loop {
            let claim = match self.slots.entry(key.clone()) {
                Entry::Occupied(entry) => match entry.get() {
                    Slot::Ready(value) => return Ok(value.clone()),
                    Slot::Building(cell) => Claim::Lost(cell.clone()),
                },
                Entry::Vacant(entry) => {
                    let cell = Arc::new(BuildCell::new());
                    entry.insert(Slot::Building(cell.clone()));
                    Claim::Won(cell)
                }
            };

            match claim {
                Claim::Lost(cell) => {
                    if cell.owner == thread::current().id() {
                        return Err(Error::CyclicHierarchy(format!("{key:?}")));
                    }
                    trace!(key = ?key, "waiting on in-flight build");
                    match cell.wait() {
                        // the limit was hit relative to the builder's request, not ours
                        Err(Error::RecursionLimit(_)) => {
                            trace!(key = ?key, "in-flight build hit the depth limit, retrying");
                        }
                        result => return result,
                    }
                }
                Claim::Won(cell) => {
                    let result = match catch_unwind(AssertUnwindSafe(build)) {
                        Ok(result) => result,
                        Err(panic) => {
                            self.abandon(key, &cell);
                            cell.complete(Err(Error::BuildPanicked(format!("{key:?}"))));
                            resume_unwind(panic);
                        }
                    };
                    self.finish(key, &cell, &result);
                    cell.complete(result.clone());
                    return result;
                }
            }
        }
    }

    /// Remove `key` whether it is finished or still building
    pub(crate) fn remove(&self, key: &K) -> bool {
        self.slots.remove(key).is_some()
    }

    /// Number of finished values
    pub(crate) fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.value(), Slot::Ready(_)))
            .count()
    }

    fn finish(&self, key: &K, cell: &Arc<BuildCell<V>>, result: &Result<Arc<V>>) {
        match result {
            Ok(value) => {
                if let Some(mut slot) = self.slots.get_mut(key) {
                    if is_placeholder_of(&slot, cell) {
                        *slot = Slot::Ready(value.clone());
                        return;
                    }
                }
                trace!(key = ?key, "entry removed during build, result not cached");
            }
            Err(error) => {
                warn!(key = ?key, %error, "index build failed");
                self.abandon(key, cell);
            }
        }
    }

    fn abandon(&self, key: &K, cell: &Arc<BuildCell<V>>) {
        self.slots
            .remove_if(key, |_, slot| is_placeholder_of(slot, cell));
    }
}

fn is_placeholder_of<V>(slot: &Slot<V>, cell: &Arc<BuildCell<V>>) -> bool {
    matches!(slot, Slot::Building(own) if Arc::ptr_eq(own, cell))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Barrier,
    };

    use super::*;

    #[test]
    fn test_builds_once_and_caches() {
        let map: OnceMap<u32, String> = OnceMap::new();
        let calls = AtomicUsize::new(0);
        let build = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new("one".to_string()))
        };

        let first = map.get_or_try_build(&1, build).unwrap();
        let second = map.get_or_try_build(&1, build).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let map: OnceMap<u32, u32> = OnceMap::new();
        let err = map
            .get_or_try_build(&7, || Err(Error::Provider("boom".into())))
            .unwrap_err();
        assert_eq!(err, Error::Provider("boom".into()));
        assert!(map.get(&7).is_none());
        assert_eq!(map.len(), 0);

        let value = map.get_or_try_build(&7, || Ok(Arc::new(7))).unwrap();
        assert_eq!(*value, 7);
    }

    #[test]
    fn test_reentry_is_a_cycle() {
        let map: OnceMap<u32, u32> = OnceMap::new();
        let err = map
            .get_or_try_build(&1, || map.get_or_try_build(&1, || Ok(Arc::new(1))))
            .unwrap_err();
        assert_eq!(err, Error::CyclicHierarchy("1".into()));
        assert!(map.get(&1).is_none());
    }

    #[test]
    fn test_remove_during_build_does_not_publish() {
        let map: OnceMap<u32, u32> = OnceMap::new();
        let value = map
            .get_or_try_build(&3, || {
                assert!(map.remove(&3));
                Ok(Arc::new(3))
            })
            .unwrap();
        assert_eq!(*value, 3);
        assert!(map.get(&3).is_none());
    }

    #[test]
    fn test_panicking_build_clears_placeholder() {
        let map: OnceMap<u32, u32> = OnceMap::new();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            map.get_or_try_build(&5, || panic!("builder exploded"))
        }));
        assert!(outcome.is_err());
        assert_eq!(*map.get_or_try_build(&5, || Ok(Arc::new(5))).unwrap(), 5);
    }

    #[test]
    fn test_waiters_share_one_build() {
        let map: OnceMap<u32, u32> = OnceMap::new();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        let results: Vec<Arc<u32>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        map.get_or_try_build(&9, || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(20));
                            Ok(Arc::new(9))
                        })
                        .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_waiters_share_one_failure() {
        let map: OnceMap<u32, u32> = OnceMap::new();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        let errors: Vec<Error> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        map.get_or_try_build(&4, || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(50));
                            Err(Error::Provider("unreadable".into()))
                        })
                        .unwrap_err()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(errors
            .iter()
            .all(|err| *err == Error::Provider("unreadable".into())));
        assert!(map.get(&4).is_none());
    }

    #[test]
    fn test_waiter_rebuilds_after_depth_limit() {
        let map: OnceMap<u32, u32> = OnceMap::new();
        let barrier = Barrier::new(2);

        let (deep, shallow) = thread::scope(|s| {
            let deep = s.spawn(|| {
                map.get_or_try_build(&6, || {
                    barrier.wait();
                    thread::sleep(std::time::Duration::from_millis(50));
                    Err(Error::RecursionLimit(2))
                })
            });
            let shallow = s.spawn(|| {
                barrier.wait();
                thread::sleep(std::time::Duration::from_millis(10));
                map.get_or_try_build(&6, || Ok(Arc::new(6)))
            });
            (deep.join().unwrap(), shallow.join().unwrap())
        });

        assert_eq!(deep.unwrap_err(), Error::RecursionLimit(2));
        assert_eq!(*shallow.unwrap(), 6);
        assert_eq!(map.get(&6).map(|v| *v), Some(6));
    }
}
