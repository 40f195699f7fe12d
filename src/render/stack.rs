use crate::render::iter::LoopState;
use crate::render::value::lookup;
use crate::types::ast;
use crate::value::{Value, ValueCow};
use crate::{Error, Result};

pub struct Stack<'render> {
    stack: Vec<State<'render>>,
}

pub enum State<'render> {
    /// An entire scope of variables, always a map
    Scope(ValueCow<'render>),

    /// The current state of a loop iteration
    Loop(LoopState<'render>),
}

impl<'render> Stack<'render> {
    pub fn new(globals: ValueCow<'render>) -> Self {
        Self {
            stack: vec![State::Scope(globals)],
        }
    }

    /// Resolves a variable path against the stack.
    pub fn lookup_var(
        &self,
        source: &'render str,
        var: &'render ast::Var,
    ) -> Result<ValueCow<'render>> {
        let path = &var.path;
        'outer: for state in self.stack.iter().rev() {
            match state {
                State::Scope(scope) => {
                    match scope {
                        // If the scope is borrowed we can lookup the value and
                        // return a reference with lifetime 'render
                        ValueCow::Borrowed(mut v) => {
                            for (i, p) in path.iter().enumerate() {
                                v = match lookup(source, v, p) {
                                    Ok(v) => v,
                                    Err(err) => {
                                        // If it is the first segment of the path
                                        // then we can try the next state.
                                        if i == 0 {
                                            continue 'outer;
                                        }
                                        return Err(err);
                                    }
                                };
                            }
                            return Ok(ValueCow::Borrowed(v));
                        }
                        // If the scope is owned then make sure to only clone
                        // the edge value that we lookup.
                        ValueCow::Owned(scope) => {
                            let mut v: &Value = scope;
                            for (i, p) in path.iter().enumerate() {
                                v = match lookup(source, v, p) {
                                    Ok(v) => v,
                                    Err(err) => {
                                        if i == 0 {
                                            continue 'outer;
                                        }
                                        return Err(err);
                                    }
                                };
                            }
                            return Ok(ValueCow::Owned(v.clone()));
                        }
                    }
                }

                State::Loop(loop_state) => {
                    // Check if we are looking up one of the loop variables
                    if let Some(value) = loop_state.resolve_path(source, path)? {
                        return Ok(value);
                    }
                }
            }
        }
        Err(Error::render(
            "not found in this scope",
            source,
            path[0].span,
        ))
    }

    pub fn push(&mut self, state: State<'render>) {
        self.stack.push(state);
    }

    pub fn last_loop_state_mut(&mut self) -> &mut LoopState<'render> {
        match self.stack.last_mut().unwrap() {
            State::Loop(loop_state) => loop_state,
            _ => panic!("expected loop state"),
        }
    }

    pub fn pop_loop_state(&mut self) -> LoopState<'render> {
        match self.stack.pop().unwrap() {
            State::Loop(state) => state,
            _ => panic!("expected loop state"),
        }
    }
}
