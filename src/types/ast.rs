//! AST representing a parsed template.

use serde::{Deserialize, Serialize};

use crate::types::span::Span;
use crate::value::Value;

#[derive(Debug)]
pub struct Template {
    pub scope: Scope,
}

#[derive(Debug)]
pub struct Scope {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug)]
pub enum Stmt {
    Raw(Span),
    InlineExpr(InlineExpr),
    IfElse(IfElse),
    ForLoop(ForLoop),
}

#[derive(Debug)]
pub struct InlineExpr {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug)]
pub struct IfElse {
    pub not: bool,
    pub cond: Expr,
    pub then_branch: Scope,
    pub else_branch: Option<Scope>,
}

#[derive(Debug)]
pub struct ForLoop {
    pub vars: LoopVars,
    pub iterable: Expr,
    pub body: Scope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoopVars {
    Item(Ident),
    KeyValue(KeyValue),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: Ident,
    pub value: Ident,
    pub span: Span,
}

#[derive(Debug)]
pub enum Expr {
    Var(Var),
    Literal(Literal),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Var {
    pub path: Vec<Ident>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ident {
    pub span: Span,
}

#[derive(Debug)]
pub struct Literal {
    pub value: Value,
    pub span: Span,
}

impl Scope {
    pub const fn new() -> Self {
        Self { stmts: Vec::new() }
    }
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Self::Var(var) => var.span(),
            Self::Literal(lit) => lit.span,
        }
    }
}

impl Var {
    pub fn span(&self) -> Span {
        let first = self.path.first().unwrap().span;
        let last = self.path.last().unwrap().span;
        first.combine(last)
    }
}
