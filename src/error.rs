use std::cmp::max;
use std::fmt;
use std::io;

use crate::types::span::Span;

/// A convenient type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur during template compilation, rendering, or while
/// accessing the compiled-unit cache.
///
/// Formatting the error with the alternate flag, e.g. `{:#}`, pretty prints
/// the error with the relevant section of the template source underlined.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    span: Option<(String, Span)>,
}

/// A classification of errors so callers can pick a recovery policy without
/// matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The template source is malformed.
    Compile,
    /// Embedded code failed during execution.
    Render,
    /// The compiled-unit cache has no entry for the requested key.
    CacheMiss,
    /// An underlying file system operation failed.
    Io,
}

impl Error {
    /// Construct a render error with the given message and no source
    /// location.
    ///
    /// This is how external engines hooked into the benchmark harness report
    /// their failures.
    pub fn msg(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Render,
            msg: msg.into(),
            span: None,
        }
    }

    pub(crate) fn compile(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self {
            kind: ErrorKind::Compile,
            msg: msg.into(),
            span: Some((source.to_string(), span.into())),
        }
    }

    pub(crate) fn render(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self {
            kind: ErrorKind::Render,
            msg: msg.into(),
            span: Some((source.to_string(), span.into())),
        }
    }

    pub(crate) fn format(err: crate::fmt::Error, source: &str, span: impl Into<Span>) -> Self {
        let msg = err.message().unwrap_or_else(|| String::from("format error"));
        Self::render(msg, source, span)
    }

    pub(crate) fn cache_miss(key: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::CacheMiss,
            msg: format!("no cached unit for `{key}`"),
            span: None,
        }
    }

    pub(crate) fn io(err: io::Error, what: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Io,
            msg: format!("{what}: {err}"),
            span: None,
        }
    }

    /// The error classification.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The byte range of the template source that this error refers to, if
    /// any.
    pub fn span(&self) -> Option<std::ops::Range<usize>> {
        self.span.as_ref().map(|(_, span)| span.m..span.n)
    }
}

impl std::error::Error for Error {}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self {
            kind: ErrorKind::Render,
            msg: String::from("format error"),
            span: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            msg: format!("compiled unit serialization: {err}"),
            span: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            msg: err.to_string(),
            span: None,
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => fmt_pretty(&self.msg, source, *span, f),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => {
                if f.alternate() {
                    fmt_pretty(&self.msg, source, *span, f)
                } else {
                    write!(f, "{} between bytes {} and {}", self.msg, span.m, span.n)
                }
            }
            None => write!(f, "{}", self.msg),
        }
    }
}

fn fmt_pretty(msg: &str, source: &str, span: Span, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lines: Vec<_> = source.split_terminator('\n').collect();
    let (line, col) = to_line_col(&lines, span.m);
    let width = max(1, display_width(&source[span]));
    let code = lines
        .get(line)
        .or_else(|| lines.last())
        .copied()
        .unwrap_or("");

    let num = (line + 1).to_string();
    let pad = display_width(&num);
    let pipe = "|";
    let underline = "^".repeat(width);

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + width,
        msg = msg
    )
}

fn to_line_col(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;
    for (i, line) in lines.iter().enumerate() {
        let len = display_width(line) + 1;
        if n + len > offset {
            return (i, offset - n);
        }
        n += len;
    }
    (
        lines.len().saturating_sub(1),
        lines.last().map(|l| display_width(l)).unwrap_or(0),
    )
}

#[cfg(feature = "unicode")]
fn display_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(not(feature = "unicode"))]
fn display_width(s: &str) -> usize {
    s.chars().count()
}
