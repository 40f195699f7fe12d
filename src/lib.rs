//! An eruby-style template engine with swappable execution strategies.
//!
//! # Features
//!
//! ### Syntax
//!
//! - Expressions: `<%= user.name %>`
//! - Conditionals: `<% if user.enabled %> ... <% end %>`
//! - Loops: `<% for user in users %> ... <% end %>`
//! - Comments: `<%# ignored %>`
//! - Configurable delimiters: `{{ user.name }}`, `{% if user.enabled %}`
//!
//! ### Engine
//!
//! - Templates compile to a flat instruction program executed by a small
//!   interpreter, never by evaluating the embedded text as host code
//! - Render to a [`String`], any [`std::io::Write`] implementor, or an
//!   existing [`fmt::Formatter`] output sink
//! - Compiled programs serialize to disk through a [`Cache`] and can be
//!   reconstituted without recompiling
//! - Three invocation disciplines over the same unit — [`Ephemeral`],
//!   [`Cached`], and [`Bound`] — produce identical output and isolate
//!   compile, load, and render cost for the [`bench`] harness
//! - Convenient macro for building contexts:
//!   `ember::value!{ name: "John", age: 42 }`
//!
//! # Getting started
//!
//! Your entry point is the [`Engine`] struct, which stores the syntax
//! configuration. Generally, you only need to construct one engine during
//! the lifetime of a program.
//!
//! ```
//! let engine = ember::Engine::new();
//! ```
//!
//! [`.compile`][Engine::compile] turns a template source into a
//! [`Template`], which can then be rendered any number of times.
//!
//! ```
//! # let engine = ember::Engine::new();
//! let template = engine.compile("Hello <%= user.name %>!")?;
//! let result = template.render(&ember::value!{ user: { name: "John Smith" } })?;
//! assert_eq!(result, "Hello John Smith!");
//! # Ok::<(), ember::Error>(())
//! ```
//!
//! # Examples
//!
//! ### Render a template using custom syntax
//!
//! The template syntax can be set by constructing an engine using
//! [`Engine::with_syntax`].
//!
//! ```
//! let syntax = ember::Syntax::builder().expr("{{", "}}").block("{%", "%}").build();
//!
//! let result = ember::Engine::with_syntax(syntax)
//!     .compile("Hello {{ user.name }}")?
//!     .render(&ember::value!{ user: { name: "John Smith" } })?;
//!
//! assert_eq!(result, "Hello John Smith");
//! # Ok::<(), ember::Error>(())
//! ```
//!
//! ### Render a template to an `impl io::Write`
//!
//! ```
//! use std::io;
//!
//! let stdout = io::BufWriter::new(io::stdout());
//!
//! ember::Engine::new()
//!     .compile("Hello <%= user.name %>")?
//!     .render_to(stdout, &ember::value! { user: { name: "John Smith" } })?;
//! #
//! # Ok::<(), ember::Error>(())
//! ```
//!
//! ### Reuse a compiled unit across processes
//!
//! ```no_run
//! use ember::{Cache, CacheKey, Engine};
//!
//! let engine = Engine::new();
//! let cache = Cache::new("cache")?;
//! let key = CacheKey::new("ember", "hello");
//!
//! let unit = engine.compile("Hello <%= name %>!")?;
//! cache.store(&key, &unit)?;
//!
//! let reloaded = cache.load(&key)?;
//! let result = reloaded.render(&ember::value! { name: "World" })?;
//! assert_eq!(result, "Hello World!");
//! # Ok::<(), ember::Error>(())
//! ```

pub mod bench;
mod cache;
mod compile;
mod error;
mod exec;
pub mod fmt;
mod macros;
mod render;
mod types;
mod value;

use std::io;

pub use crate::cache::{Cache, CacheKey};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::exec::{Bound, Cached, Ephemeral, Suite};
pub use crate::types::syntax::{Syntax, SyntaxBuilder};
pub use crate::value::Value;

use crate::compile::Searcher;
use crate::types::program;

/// The compilation engine.
///
/// Stores the syntax configuration and is the entry point for turning
/// template sources into executable [`Template`]s.
pub struct Engine {
    searcher: Searcher,
}

/// A compiled template.
pub struct Template<'source> {
    pub(crate) program: program::Template<'source>,
}

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Construct a new engine with the default eruby syntax.
    #[inline]
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    /// Construct a new engine with custom syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use ember::{Engine, Syntax};
    ///
    /// let syntax = Syntax::builder().expr("<{", "}>").block("<[", "]>").build();
    /// let engine = Engine::with_syntax(syntax);
    /// ```
    #[inline]
    pub fn with_syntax(syntax: Syntax) -> Self {
        Self {
            searcher: Searcher::new(syntax),
        }
    }

    /// Compile a template.
    ///
    /// Compilation is stateless: compiling the same source twice yields
    /// programs that render identically.
    #[inline]
    pub fn compile<'source>(&self, source: &'source str) -> Result<Template<'source>> {
        let program = compile::template(self, source)?;
        Ok(Template { program })
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("searcher", &self.searcher)
            .finish()
    }
}

impl<'source> Template<'source> {
    /// Render the template to a string using the provided context.
    #[inline]
    pub fn render(&self, ctx: &Value) -> Result<String> {
        render::template(&self.program, ctx)
    }

    /// Render the template to a writer using the provided context.
    #[inline]
    pub fn render_to<W>(&self, writer: W, ctx: &Value) -> Result<()>
    where
        W: io::Write,
    {
        render::template_to(&self.program, writer, ctx)
    }

    /// Render the template into an existing output sink.
    #[inline]
    pub fn render_into(&self, f: &mut fmt::Formatter<'_>, ctx: &Value) -> Result<()> {
        render::template_into(&self.program, f, ctx)
    }

    /// Returns the original template source.
    #[inline]
    pub fn source(&self) -> &str {
        &self.program.source
    }

    /// Converts the template into one that owns its source.
    #[inline]
    pub fn into_owned(self) -> Template<'static> {
        Template {
            program: self.program.into_owned(),
        }
    }
}

impl std::fmt::Debug for Template<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("program", &self.program)
            .finish()
    }
}
