use std::fmt::Write;

use crate::fmt::{self, Formatter};
use crate::render::iter::LoopState;
use crate::render::stack::{Stack, State};
use crate::types::program::{Instr, Template};
use crate::value::ValueCow;
use crate::{Error, Result};

/// Executes a compiled [`Template`] against a stack of scopes.
pub struct RendererImpl<'render> {
    pub(crate) template: &'render Template<'render>,
    pub(crate) stack: Stack<'render>,
}

impl<'render> RendererImpl<'render> {
    pub(crate) fn render(mut self, f: &mut Formatter<'_>) -> Result<()> {
        let t = self.template;
        let source = t.source.as_ref();

        // The program counter and the expression we are building.
        let mut pc = 0;
        let mut expr: Option<ValueCow<'render>> = None;

        while let Some(instr) = t.instrs.get(pc) {
            match instr {
                Instr::Jump(j) => {
                    pc = *j;
                    continue;
                }

                Instr::JumpIfTrue(j, span) => {
                    if expr.take().unwrap().as_bool(source, *span)? {
                        pc = *j;
                        continue;
                    }
                }

                Instr::JumpIfFalse(j, span) => {
                    if !expr.take().unwrap().as_bool(source, *span)? {
                        pc = *j;
                        continue;
                    }
                }

                Instr::Emit(span) => {
                    let value = expr.take().unwrap();
                    fmt::default(f, &value).map_err(|err| Error::format(err, source, *span))?;
                }

                Instr::EmitRaw(span) => {
                    let raw = &source[*span];
                    // This can only fail because of an IO error which the
                    // caller recovers from the writer.
                    f.write_str(raw)?;
                }

                Instr::LoopStart(vars, span) => {
                    let iterable = expr.take().unwrap();
                    self.stack
                        .push(State::Loop(LoopState::new(source, vars, iterable, *span)?));
                }

                Instr::LoopNext(j) => {
                    if self.stack.last_loop_state_mut().iterate().is_none() {
                        self.stack.pop_loop_state();
                        pc = *j;
                        continue;
                    }
                }

                Instr::ExprStart(var) => {
                    let value = self.stack.lookup_var(source, var)?;
                    let prev = expr.replace(value);
                    debug_assert!(prev.is_none());
                }

                Instr::ExprStartLit(value) => {
                    let prev = expr.replace(ValueCow::Owned(value.clone()));
                    debug_assert!(prev.is_none());
                }
            }
            pc += 1;
        }

        assert!(pc == t.instrs.len());
        Ok(())
    }
}
