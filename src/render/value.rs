use crate::types::ast;
use crate::types::span::Span;
use crate::value::{Value, ValueCow};
use crate::{Error, Result};

impl ValueCow<'_> {
    /// Interprets the value as a condition.
    ///
    /// Only booleans are valid conditions, anything else is a render error.
    pub fn as_bool(&self, source: &str, span: Span) -> Result<bool> {
        match &**self {
            Value::Bool(cond) => Ok(*cond),
            value => Err(Error::render(
                format!(
                    "expected bool, but expression evaluated to {}",
                    value.human()
                ),
                source,
                span,
            )),
        }
    }
}

impl Value {
    pub(crate) fn human(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

/// Index into the value with the given path segment.
pub fn lookup<'a>(source: &str, value: &'a Value, p: &ast::Ident) -> Result<&'a Value> {
    let raw = &source[p.span];
    match value {
        Value::List(list) => match raw.parse::<usize>() {
            Ok(i) => list.get(i).ok_or_else(|| {
                Error::render(
                    format!("index out of bounds, the length is {}", list.len()),
                    source,
                    p.span,
                )
            }),
            Err(_) => Err(Error::render(
                "cannot index list with string",
                source,
                p.span,
            )),
        },
        Value::Map(map) => match map.get(raw) {
            Some(value) => Ok(value),
            None => Err(Error::render("not found in map", source, p.span)),
        },
        value => Err(Error::render(
            format!("cannot index into {}", value.human()),
            source,
            p.span,
        )),
    }
}
