//! Defines a compiled [`Template`] which is a sequence of [`Instr`] that can
//! be executed by the renderer, and is serializable so that the compiled-unit
//! cache can persist it.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::ast;
use crate::types::span::Span;
use crate::value::Value;

/// Placeholder for jump targets that are patched after the jump destination
/// is known.
pub const FIXME: usize = !0;

#[derive(Clone, Serialize, Deserialize)]
pub struct Template<'source> {
    pub source: Cow<'source, str>,
    pub instrs: Vec<Instr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Instr {
    /// Jump to an instruction
    Jump(usize),

    /// Jump to the instruction if the current expression is true
    JumpIfTrue(usize, Span),

    /// Jump to the instruction if the current expression is false
    JumpIfFalse(usize, Span),

    /// Emit the current expression
    Emit(Span),

    /// Emit raw template
    EmitRaw(Span),

    /// Start a loop over the current expression
    LoopStart(ast::LoopVars, Span),

    /// Advance the loop or jump past its body once exhausted
    LoopNext(usize),

    /// Lookup a variable and start building an expression
    ExprStart(ast::Var),

    /// Start building an expression using a literal
    ExprStartLit(Value),
}

impl Template<'_> {
    /// Returns a copy of the template with the source owned, untying it from
    /// the lifetime of the original source text.
    pub fn into_owned(self) -> Template<'static> {
        let Template { source, instrs } = self;
        Template {
            source: Cow::Owned(source.into_owned()),
            instrs,
        }
    }
}

impl std::fmt::Debug for Template<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<compiled>")
    }
}
