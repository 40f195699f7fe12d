mod core;
mod iter;
mod stack;
mod value;

use std::io;

use crate::fmt::{Formatter, Writer};
use crate::render::core::RendererImpl;
use crate::render::stack::Stack;
use crate::types::program::Template;
use crate::value::{Value, ValueCow};
use crate::{Error, Result};

/// Render the template to a string using the provided context.
pub fn template(template: &Template<'_>, globals: &Value) -> Result<String> {
    let mut s = String::with_capacity(template.source.len());
    let mut f = Formatter::with_string(&mut s);
    renderer(template, globals).render(&mut f)?;
    Ok(s)
}

/// Render the template to the given writer using the provided context.
pub fn template_to<W>(template: &Template<'_>, writer: W, globals: &Value) -> Result<()>
where
    W: io::Write,
{
    let mut w = Writer::new(writer);
    let mut f = Formatter::with_writer(&mut w);
    renderer(template, globals)
        .render(&mut f)
        .map_err(|err| w.take_err().map(Error::from).unwrap_or(err))
}

/// Render the template into an existing output sink.
pub fn template_into(template: &Template<'_>, f: &mut Formatter<'_>, globals: &Value) -> Result<()> {
    renderer(template, globals).render(f)
}

fn renderer<'render>(
    template: &'render Template<'render>,
    globals: &'render Value,
) -> RendererImpl<'render> {
    RendererImpl {
        template,
        stack: Stack::new(ValueCow::Borrowed(globals)),
    }
}
