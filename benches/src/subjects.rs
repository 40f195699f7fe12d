//! Adapters that hook benchmark engines into the harness.

use std::fmt::Write;

use ember::bench::{Descriptor, Subject};
use ember::fmt::Formatter;
use ember::{Error, Result, Value};

use crate::Engine;

/// Hooks a third-party engine into the harness.
///
/// Basic mode constructs a fresh engine and compiles the template on every
/// invocation; func mode renders through the instance bound at construction.
/// None of these engines expose a durable compiled unit, so the harness
/// skips them in cache mode.
pub struct ThirdParty<'source, E> {
    source: &'source str,
    enabled: bool,
    bound: E,
}

impl<'source, E> ThirdParty<'source, E>
where
    E: Engine<'source>,
{
    pub fn new(source: &'source str) -> Self {
        let mut bound = E::new();
        bound.add_template("bench", source);
        Self {
            source,
            enabled: true,
            bound,
        }
    }

    /// Sets whether the subject is enabled in the harness.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl<'source, E> Subject for ThirdParty<'source, E>
where
    E: Engine<'source>,
{
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: E::name().into(),
            compiles: false,
            returns_value: true,
            enabled: self.enabled,
        }
    }

    fn basic(&mut self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()> {
        let mut engine = E::new();
        engine.add_template("bench", self.source);
        f.write_str(&engine.render("bench", ctx))?;
        Ok(())
    }

    fn cached(&mut self, _: &Value, _: &mut Formatter<'_>) -> Result<()> {
        Err(Error::msg(format!(
            "{} has no durable compiled unit",
            E::name()
        )))
    }

    fn bound(&mut self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()> {
        f.write_str(&self.bound.render("bench", ctx))?;
        Ok(())
    }
}
