//! The benchmark harness.
//!
//! A [`Harness`] drives N repeated invocations per strategy per engine and
//! records elapsed wall and CPU time. Engines plug in through the
//! [`Subject`] trait, whose three entry points correspond to the execution
//! strategies; their rendered output is written to the harness sink so it
//! cannot corrupt the report stream.
//!
//! Failure policy: a compile or render failure is recorded against its
//! (engine, mode) row and the run continues with the next pairing, while an
//! I/O failure aborts the whole run since a comparison with partially
//! missing strategies is not meaningful.

mod time;

use std::fmt;
use std::io;
use std::str::FromStr;

use tracing::debug;

pub use crate::bench::time::Timing;
use crate::bench::time::Timer;
use crate::error::ErrorKind;
use crate::fmt::{Formatter, Writer};
use crate::value::Value;
use crate::{Error, Result};

/// Static metadata describing a benchmarked engine.
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Identifier used in reports and cache keys.
    pub name: String,
    /// Whether the engine can persist a compiled unit for reuse. Engines
    /// that cannot are skipped in the cache and func modes.
    pub compiles: bool,
    /// Whether the underlying engine hands back the rendered text, as
    /// opposed to streaming it into the sink itself.
    pub returns_value: bool,
    /// Disabled engines are skipped unless explicitly selected.
    pub enabled: bool,
}

/// The invocation discipline being measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compile and render on every invocation.
    Basic,
    /// Load the precompiled unit from storage and render.
    Cache,
    /// Render a unit bound once up front.
    Func,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Basic, Mode::Cache, Mode::Func];

    /// Whether the mode requires the engine to persist or hold a compiled
    /// unit.
    fn needs_compiled_unit(&self) -> bool {
        matches!(self, Mode::Cache | Mode::Func)
    }

    fn title(&self) -> &'static str {
        match self {
            Mode::Basic => "evaluate",
            Mode::Cache => "evaluate cache file",
            Mode::Func => "evaluate function",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Basic => "basic",
            Mode::Cache => "cache",
            Mode::Func => "func",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Mode::Basic),
            "cache" => Ok(Mode::Cache),
            "func" => Ok(Mode::Func),
            _ => Err(format!("unknown mode `{s}`, expected basic, cache, or func")),
        }
    }
}

/// A template engine hooked into the harness.
///
/// Each method performs a single invocation of the corresponding strategy,
/// writing the rendered output into the provided sink. Implementations must
/// be invocable any number of times without accumulating state.
pub trait Subject {
    fn descriptor(&self) -> Descriptor;

    /// Compile the template and render it.
    fn basic(&mut self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()>;

    /// Load the precompiled unit from storage and render it.
    fn cached(&mut self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()>;

    /// Render the pre-bound unit.
    fn bound(&mut self, ctx: &Value, f: &mut Formatter<'_>) -> Result<()>;
}

/// One (engine, mode) row of the report.
#[derive(Debug)]
pub struct Record {
    pub engine: String,
    pub mode: Mode,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub enum Outcome {
    /// The timed loop completed.
    Timed(Timing),
    /// The engine failed in this mode; the run continued without it.
    Failed(String),
    /// The engine does not support this mode.
    Skipped,
}

/// A per-engine, per-mode timing report.
#[derive(Debug)]
pub struct Report {
    pub records: Vec<Record>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mode in Mode::ALL {
            let records: Vec<_> = self.records.iter().filter(|r| r.mode == mode).collect();
            if records.is_empty() {
                continue;
            }
            writeln!(f, "## {}", mode.title())?;
            writeln!(f, "{:<30} {:>10} {:>10}", "", "wall", "cpu")?;
            for record in records {
                match &record.outcome {
                    Outcome::Timed(timing) => {
                        let wall = format!("{:.4}", timing.wall.as_secs_f64());
                        let cpu = match timing.cpu {
                            Some(cpu) => format!("{:.4}", cpu.as_secs_f64()),
                            None => String::from("-"),
                        };
                        writeln!(f, "{:<30} {:>10} {:>10}", record.engine, wall, cpu)?;
                    }
                    Outcome::Failed(msg) => {
                        writeln!(f, "{:<30} failed: {}", record.engine, msg)?;
                    }
                    Outcome::Skipped => {
                        writeln!(f, "{:<30} (skipped)", record.engine)?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Drives N repeated invocations per strategy per engine.
pub struct Harness<W> {
    iterations: usize,
    sink: W,
}

impl<W> Harness<W>
where
    W: io::Write,
{
    /// Construct a new harness.
    ///
    /// All rendered output is written to `sink`, which keeps it apart from
    /// whatever stream the report is printed to. Use [`io::sink()`] to
    /// discard it.
    ///
    /// # Panics
    ///
    /// If `iterations` is zero.
    pub fn new(iterations: usize, sink: W) -> Self {
        assert!(iterations > 0, "iterations must be positive");
        Self { iterations, sink }
    }

    /// Run every enabled subject through the given modes.
    pub fn run(
        &mut self,
        subjects: &mut [&mut dyn Subject],
        ctx: &Value,
        modes: &[Mode],
    ) -> Result<Report> {
        let mut records = Vec::new();
        for &mode in modes {
            for subject in subjects.iter_mut() {
                if !subject.descriptor().enabled {
                    continue;
                }
                records.push(self.run_one(&mut **subject, ctx, mode)?);
            }
        }
        Ok(Report { records })
    }

    fn run_one(&mut self, subject: &mut dyn Subject, ctx: &Value, mode: Mode) -> Result<Record> {
        let descriptor = subject.descriptor();
        let engine = descriptor.name;

        if mode.needs_compiled_unit() && !descriptor.compiles {
            debug!(%engine, %mode, "engine has no compiled unit, skipping");
            return Ok(Record {
                engine,
                mode,
                outcome: Outcome::Skipped,
            });
        }

        // Rehearse once, un-timed. This validates the pairing and lets the
        // cached strategy populate its entry before the timed loop.
        if let Err(err) = self.invoke(subject, ctx, mode) {
            return failed(&engine, mode, err);
        }

        let timer = Timer::start();
        for _ in 0..self.iterations {
            if let Err(err) = self.invoke(subject, ctx, mode) {
                return failed(&engine, mode, err);
            }
        }
        let timing = timer.stop(self.iterations);

        debug!(%engine, %mode, wall = ?timing.wall, "timed");
        Ok(Record {
            engine,
            mode,
            outcome: Outcome::Timed(timing),
        })
    }

    fn invoke(&mut self, subject: &mut dyn Subject, ctx: &Value, mode: Mode) -> Result<()> {
        let mut w = Writer::new(&mut self.sink);
        let mut f = Formatter::with_writer(&mut w);
        let result = match mode {
            Mode::Basic => subject.basic(ctx, &mut f),
            Mode::Cache => subject.cached(ctx, &mut f),
            Mode::Func => subject.bound(ctx, &mut f),
        };
        result.map_err(|err| w.take_err().map(Error::from).unwrap_or(err))
    }
}

/// Invoke a subject's basic strategy once, writing the rendered output to
/// the given writer.
///
/// This backs the driver's print mode, which shows each engine's output
/// instead of timing it.
pub fn render_once<W>(subject: &mut dyn Subject, ctx: &Value, writer: W) -> Result<()>
where
    W: io::Write,
{
    let mut w = Writer::new(writer);
    let mut f = Formatter::with_writer(&mut w);
    subject
        .basic(ctx, &mut f)
        .map_err(|err| w.take_err().map(Error::from).unwrap_or(err))
}

fn failed(engine: &str, mode: Mode, err: Error) -> Result<Record> {
    // Cache and file sink failures abort the run: the comparison is only
    // meaningful if every strategy succeeds.
    if err.kind() == ErrorKind::Io {
        return Err(err);
    }
    debug!(%engine, %mode, error = %err, "engine failed");
    Ok(Record {
        engine: engine.to_owned(),
        mode,
        outcome: Outcome::Failed(err.to_string()),
    })
}
