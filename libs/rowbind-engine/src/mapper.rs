use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rowbind_api::{Introspect, RecordShape, TypeKey};

use crate::cache::{Direction, PlanCache, PlanKey};
use crate::config::MapperSettings;
use crate::fallback::{ReaderFallback, WriterFallback};
use crate::normalize::NameNormalizer;
use crate::reader::{Reader, ReaderPlan};
use crate::writer::{Writer, WriterPlan};

/// Entry point: hands out readers and writers for (shape, type) pairs.
///
/// Plans are memoized in the [`PlanCache`] unless `cache_plans` is off.
/// Several mappers may share one cache.
pub struct Mapper {
    settings: MapperSettings,
    names: NameNormalizer,
    cache: Arc<PlanCache>,
    reader_fallback: Option<Arc<dyn ReaderFallback>>,
    writer_fallback: Option<Arc<dyn WriterFallback>>,
    plans_built: AtomicU64,
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("settings", &self.settings)
            .field("cache", &self.cache)
            .field("reader_fallback", &self.reader_fallback.is_some())
            .field("writer_fallback", &self.writer_fallback.is_some())
            .field("plans_built", &self.plans_built())
            .finish()
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Mapper {
    pub fn new(settings: MapperSettings) -> Self {
        Self::builder().settings(settings).build()
    }

    pub fn builder() -> MapperBuilder {
        MapperBuilder::default()
    }

    /// Reader producing `T` from records of `shape`.
    pub fn provide_reader<T: Introspect>(&self, shape: &Arc<RecordShape>) -> Reader<T> {
        let plan = self.plan(shape, Direction::Read, T::type_key(), || {
            ReaderPlan::<T>::build(Arc::clone(shape), &self.names)
        });
        Reader::new(plan, self.reader_fallback.clone())
    }

    /// Writer producing records of `shape` from values of `T`.
    pub fn provide_writer<T: Introspect>(&self, shape: &Arc<RecordShape>) -> Writer<T> {
        let plan = self.plan(shape, Direction::Write, T::type_key(), || {
            WriterPlan::<T>::build(Arc::clone(shape))
        });
        Writer::new(plan, self.writer_fallback.clone())
    }

    /// Number of plans built by this mapper, cached or not.
    pub fn plans_built(&self) -> u64 {
        self.plans_built.load(Ordering::Relaxed)
    }

    pub fn settings(&self) -> &MapperSettings {
        &self.settings
    }

    pub fn cache(&self) -> &Arc<PlanCache> {
        &self.cache
    }

    fn plan<P, F>(
        &self,
        shape: &Arc<RecordShape>,
        direction: Direction,
        ty: TypeKey,
        build: F,
    ) -> Arc<P>
    where
        P: std::any::Any + Send + Sync,
        F: FnOnce() -> P,
    {
        let counted = || {
            self.plans_built.fetch_add(1, Ordering::Relaxed);
            build()
        };
        if self.settings.cache_plans {
            let key = PlanKey::new(Arc::clone(shape), ty, direction);
            self.cache.get_or_build(key, counted)
        } else {
            Arc::new(counted())
        }
    }
}

/// Builder for [`Mapper`]: settings, a shared cache and optional fallbacks.
#[derive(Default)]
pub struct MapperBuilder {
    settings: Option<MapperSettings>,
    cache: Option<Arc<PlanCache>>,
    reader_fallback: Option<Arc<dyn ReaderFallback>>,
    writer_fallback: Option<Arc<dyn WriterFallback>>,
}

impl MapperBuilder {
    pub fn settings(mut self, settings: MapperSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Share an existing plan cache instead of creating a private one.
    pub fn cache(mut self, cache: Arc<PlanCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn reader_fallback(mut self, fallback: impl ReaderFallback + 'static) -> Self {
        self.reader_fallback = Some(Arc::new(fallback));
        self
    }

    pub fn writer_fallback(mut self, fallback: impl WriterFallback + 'static) -> Self {
        self.writer_fallback = Some(Arc::new(fallback));
        self
    }

    pub fn build(self) -> Mapper {
        let settings = self.settings.unwrap_or_default();
        let names = NameNormalizer::new(&settings.name_separators);
        Mapper {
            names,
            settings,
            cache: self.cache.unwrap_or_default(),
            reader_fallback: self.reader_fallback,
            writer_fallback: self.writer_fallback,
            plans_built: AtomicU64::new(0),
        }
    }
}
