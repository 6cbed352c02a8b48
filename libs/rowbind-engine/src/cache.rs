use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rowbind_api::{RecordShape, TypeKey};

/// Which way a plan maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Record → object.
    Read,
    /// Object → record.
    Write,
}

/// Cache key: record shape, Rust type and direction.
///
/// Shapes compare structurally, types by `TypeId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    pub shape: Arc<RecordShape>,
    pub ty: TypeKey,
    pub direction: Direction,
}

impl PlanKey {
    pub fn new(shape: Arc<RecordShape>, ty: TypeKey, direction: Direction) -> Self {
        Self {
            shape,
            ty,
            direction,
        }
    }
}

type AnyPlan = Arc<dyn Any + Send + Sync>;

/// Process-wide store of mapping plans.
///
/// Created once by the host and shared between mappers. Entries are never
/// evicted: the key space is bounded by the (projection × type) pairs an
/// application actually uses.
///
/// Builds run outside the lock. Two threads missing the same key may both
/// build; the first plan stored wins and every later lookup returns it.
#[derive(Default)]
pub struct PlanCache {
    plans: RwLock<HashMap<PlanKey, AnyPlan>>,
}

impl std::fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanCache").field("len", &self.len()).finish()
    }
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached plan for `key`, if one of type `P` is stored.
    pub fn get<P: Any + Send + Sync>(&self, key: &PlanKey) -> Option<Arc<P>> {
        let plan = self.read().get(key).cloned()?;
        plan.downcast::<P>().ok()
    }

    /// Return the cached plan for `key`, building and storing it on a miss.
    pub fn get_or_build<P, F>(&self, key: PlanKey, build: F) -> Arc<P>
    where
        P: Any + Send + Sync,
        F: FnOnce() -> P,
    {
        if let Some(plan) = self.get::<P>(&key) {
            return plan;
        }

        let built = Arc::new(build());
        let erased: AnyPlan = built.clone();
        let stored = self.write().entry(key).or_insert(erased).clone();
        // A foreign plan type under this key cannot come from the engine's own
        // keys; keep the fresh plan rather than fail.
        stored.downcast::<P>().unwrap_or(built)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every plan. Readers and writers already handed out keep theirs.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<PlanKey, AnyPlan>> {
        match self.plans.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("plan cache read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PlanKey, AnyPlan>> {
        match self.plans.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("plan cache write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}
