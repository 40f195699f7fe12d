//! The three invocation disciplines wrapping a compiled unit.
//!
//! - [`Ephemeral`] compiles the template on every invocation, measuring the
//!   combined compile and render cost.
//! - [`Cached`] loads the compiled unit from a [`Cache`] on every invocation,
//!   measuring deserialization and render cost with compilation off the hot
//!   path.
//! - [`Bound`] compiles once up front and renders the held unit repeatedly,
//!   measuring pure render cost.
//!
//! None of the strategies accumulate state across invocations, so invoking
//! one any number of times uses constant memory and invocation `N` produces
//! the same output as invocation one.

use crate::bench::{Descriptor, Subject};
use crate::cache::{Cache, CacheKey};
use crate::error::ErrorKind;
use crate::fmt::Formatter;
use crate::value::Value;
use crate::{Engine, Result, Template};

/// Compiles the template on every invocation and discards the unit.
pub struct Ephemeral<'engine, 'source> {
    engine: &'engine Engine,
    source: &'source str,
}

impl<'engine, 'source> Ephemeral<'engine, 'source> {
    pub fn new(engine: &'engine Engine, source: &'source str) -> Self {
        Self { engine, source }
    }

    /// Compile and render into the given output sink.
    pub fn invoke(&self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()> {
        self.engine.compile(self.source)?.render_into(f, ctx)
    }

    /// Compile and render to a string.
    pub fn render(&self, ctx: &Value) -> Result<String> {
        self.engine.compile(self.source)?.render(ctx)
    }
}

/// Loads the compiled unit from durable storage on every invocation.
///
/// A missing entry is lazily populated by compiling and storing, after which
/// the load is retried, so a cache miss never escapes this type.
pub struct Cached<'engine, 'source> {
    engine: &'engine Engine,
    cache: &'engine Cache,
    key: CacheKey,
    source: &'source str,
}

impl<'engine, 'source> Cached<'engine, 'source> {
    pub fn new(
        engine: &'engine Engine,
        cache: &'engine Cache,
        key: CacheKey,
        source: &'source str,
    ) -> Self {
        Self {
            engine,
            cache,
            key,
            source,
        }
    }

    /// Load the unit from the cache and render into the given output sink.
    pub fn invoke(&self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()> {
        self.load_or_populate()?.render_into(f, ctx)
    }

    /// Load the unit from the cache and render to a string.
    pub fn render(&self, ctx: &Value) -> Result<String> {
        self.load_or_populate()?.render(ctx)
    }

    fn load_or_populate(&self) -> Result<Template<'static>> {
        match self.cache.load(&self.key) {
            Ok(unit) => Ok(unit),
            Err(err) if err.kind() == ErrorKind::CacheMiss => {
                let unit = self.engine.compile(self.source)?;
                self.cache.store(&self.key, &unit)?;
                self.cache.load(&self.key)
            }
            Err(err) => Err(err),
        }
    }
}

/// Compiles once at bind time and renders the held unit repeatedly.
#[derive(Debug)]
pub struct Bound<'source> {
    unit: Template<'source>,
}

impl<'source> Bound<'source> {
    /// Compile the template into a long-lived renderer.
    pub fn bind(engine: &Engine, source: &'source str) -> Result<Self> {
        let unit = engine.compile(source)?;
        Ok(Self { unit })
    }

    /// Render the pre-bound unit into the given output sink.
    pub fn invoke(&self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()> {
        self.unit.render_into(f, ctx)
    }

    /// Render the pre-bound unit to a string.
    pub fn render(&self, ctx: &Value) -> Result<String> {
        self.unit.render(ctx)
    }

    /// The compiled unit held by this renderer.
    pub fn unit(&self) -> &Template<'source> {
        &self.unit
    }
}

/// All three strategies bound to one engine, template, and cache entry,
/// hooked into the benchmark harness as a [`Subject`].
pub struct Suite<'engine, 'source> {
    name: String,
    enabled: bool,
    ephemeral: Ephemeral<'engine, 'source>,
    cached: Cached<'engine, 'source>,
    bound: Bound<'source>,
}

impl<'engine, 'source> Suite<'engine, 'source> {
    /// Construct a suite for the given engine and template.
    ///
    /// The bound strategy compiles here, so a malformed template fails the
    /// construction rather than the first invocation.
    pub fn new(
        name: impl Into<String>,
        template_id: impl Into<String>,
        engine: &'engine Engine,
        cache: &'engine Cache,
        source: &'source str,
    ) -> Result<Self> {
        let name = name.into();
        let key = CacheKey::new(name.clone(), template_id);
        Ok(Self {
            name,
            enabled: true,
            ephemeral: Ephemeral::new(engine, source),
            cached: Cached::new(engine, cache, key, source),
            bound: Bound::bind(engine, source)?,
        })
    }

    /// Sets whether the suite is enabled in the harness.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Subject for Suite<'_, '_> {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: self.name.clone(),
            compiles: true,
            returns_value: false,
            enabled: self.enabled,
        }
    }

    fn basic(&mut self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()> {
        self.ephemeral.invoke(ctx, f)
    }

    fn cached(&mut self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()> {
        self.cached.invoke(ctx, f)
    }

    fn bound(&mut self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()> {
        self.bound.invoke(ctx, f)
    }
}
