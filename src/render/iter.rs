use std::slice;

use crate::render::value::lookup;
use crate::types::ast;
use crate::types::span::Span;
use crate::value::{btree_map, ListIntoIter, MapIntoIter, Value, ValueCow};
use crate::{Error, Result};

/// The state of a loop over a list or a map.
///
/// Borrowed and owned iterables are tracked separately so that iterating a
/// borrowed context never clones the elements.
pub enum LoopState<'render> {
    ListBorrowed {
        item: &'render ast::Ident,
        iter: slice::Iter<'render, Value>,
        value: Option<&'render Value>,
    },
    ListOwned {
        item: &'render ast::Ident,
        iter: ListIntoIter,
        value: Option<Value>,
    },
    MapBorrowed {
        kv: &'render ast::KeyValue,
        iter: btree_map::Iter<'render, String, Value>,
        value: Option<(&'render String, &'render Value)>,
    },
    MapOwned {
        kv: &'render ast::KeyValue,
        iter: MapIntoIter,
        value: Option<(String, Value)>,
    },
}

impl<'render> LoopState<'render> {
    pub fn new(
        source: &'render str,
        vars: &'render ast::LoopVars,
        iterable: ValueCow<'render>,
        span: Span,
    ) -> Result<Self> {
        let human = iterable.human();
        let err = || {
            Error::render(
                format!("expected iterable, but expression evaluated to {human}"),
                source,
                span,
            )
        };

        let unpack_list_item = |vars: &'render ast::LoopVars| match vars {
            ast::LoopVars::Item(item) => Ok(item),
            ast::LoopVars::KeyValue(kv) => Err(Error::render(
                "cannot unpack list item into two variables",
                source,
                kv.span,
            )),
        };

        let unpack_map_item = |vars: &'render ast::LoopVars| match vars {
            ast::LoopVars::Item(item) => Err(Error::render(
                "cannot unpack map item into one variable",
                source,
                item.span,
            )),
            ast::LoopVars::KeyValue(kv) => Ok(kv),
        };

        match iterable {
            ValueCow::Borrowed(v) => match v {
                Value::List(list) => {
                    let item = unpack_list_item(vars)?;
                    Ok(Self::ListBorrowed {
                        item,
                        iter: list.iter(),
                        value: None,
                    })
                }

                Value::Map(map) => {
                    let kv = unpack_map_item(vars)?;
                    Ok(Self::MapBorrowed {
                        kv,
                        iter: map.iter(),
                        value: None,
                    })
                }
                _ => Err(err()),
            },

            ValueCow::Owned(v) => match v {
                Value::List(list) => {
                    let item = unpack_list_item(vars)?;
                    Ok(Self::ListOwned {
                        item,
                        iter: list.into_iter(),
                        value: None,
                    })
                }

                Value::Map(map) => {
                    let kv = unpack_map_item(vars)?;
                    Ok(Self::MapOwned {
                        kv,
                        iter: map.into_iter(),
                        value: None,
                    })
                }
                _ => Err(err()),
            },
        }
    }

    /// Advances the loop, returning `None` once the iterable is exhausted.
    pub fn iterate(&mut self) -> Option<()> {
        match self {
            Self::ListBorrowed { iter, value, .. } => {
                *value = Some(iter.next()?);
            }
            Self::ListOwned { iter, value, .. } => {
                *value = Some(iter.next()?);
            }
            Self::MapBorrowed { iter, value, .. } => {
                *value = Some(iter.next()?);
            }
            Self::MapOwned { iter, value, .. } => {
                *value = Some(iter.next()?);
            }
        }
        Some(())
    }

    /// Resolves a path that refers to one of the loop variables, if it does.
    pub fn resolve_path(
        &self,
        source: &str,
        path: &[ast::Ident],
    ) -> Result<Option<ValueCow<'render>>> {
        let name = &source[path[0].span];

        macro_rules! resolve {
            ($v:expr) => {{
                let mut v = $v;
                for p in &path[1..] {
                    v = lookup(source, v, p)?;
                }
                v
            }};
        }

        let err = |span| Error::render("cannot index into string", source, span);

        match self {
            Self::ListBorrowed {
                item,
                value: Some(value),
                ..
            } if &source[item.span] == name => {
                let v = resolve!(*value);
                Ok(Some(ValueCow::Borrowed(v)))
            }

            Self::ListOwned {
                item,
                value: Some(value),
                ..
            } if &source[item.span] == name => {
                let v = resolve!(value);
                Ok(Some(ValueCow::Owned(v.clone())))
            }

            Self::MapBorrowed {
                kv,
                value: Some((string, _)),
                ..
            } if &source[kv.key.span] == name => {
                if let [p, ..] = &path[1..] {
                    return Err(err(p.span));
                }
                Ok(Some(ValueCow::Owned(Value::String((*string).clone()))))
            }

            Self::MapOwned {
                kv,
                value: Some((string, _)),
                ..
            } if &source[kv.key.span] == name => {
                if let [p, ..] = &path[1..] {
                    return Err(err(p.span));
                }
                Ok(Some(ValueCow::Owned(Value::String(string.clone()))))
            }

            Self::MapBorrowed {
                kv,
                value: Some((_, value)),
                ..
            } if &source[kv.value.span] == name => {
                let v = resolve!(*value);
                Ok(Some(ValueCow::Borrowed(v)))
            }

            Self::MapOwned {
                kv,
                value: Some((_, value)),
                ..
            } if &source[kv.value.span] == name => {
                let v = resolve!(value);
                Ok(Some(ValueCow::Owned(v.clone())))
            }

            _ => Ok(None),
        }
    }
}
