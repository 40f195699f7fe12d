use crate::types::syntax::{Kind, Syntax};

/// Searches the template source for configured tag delimiters.
///
/// The pattern set is tiny (at most twelve short strings) so this is a
/// straightforward scan: the leftmost match wins and ties are broken by
/// preferring the longest pattern, so that `<%=` is never reported as `<%`
/// followed by `=`.
#[derive(Debug)]
pub struct Searcher {
    patterns: Vec<(Kind, String)>,
}

impl Searcher {
    pub fn new(syntax: Syntax) -> Self {
        Self {
            patterns: syntax.patterns,
        }
    }

    /// Find the leftmost pattern match at or after `at`.
    ///
    /// Returns the pattern kind and the byte range of the match.
    pub fn find_at(&self, haystack: &str, at: usize) -> Option<(Kind, usize, usize)> {
        let mut best: Option<(Kind, usize, usize)> = None;
        for (kind, pattern) in &self.patterns {
            if let Some(i) = haystack[at..].find(pattern.as_str()) {
                let m = at + i;
                let n = m + pattern.len();
                match best {
                    Some((_, bm, bn)) if m > bm || (m == bm && n <= bn) => {}
                    _ => best = Some((*kind, m, n)),
                }
            }
        }
        best
    }

    /// Returns the pattern match exactly at `at`, if any.
    pub fn starts_with(&self, haystack: &str, at: usize) -> Option<(Kind, usize)> {
        let mut best: Option<(Kind, usize)> = None;
        for (kind, pattern) in &self.patterns {
            if haystack[at..].starts_with(pattern.as_str()) {
                let n = at + pattern.len();
                match best {
                    Some((_, bn)) if n <= bn => {}
                    _ => best = Some((*kind, n)),
                }
            }
        }
        best
    }

    /// Returns the configured pattern for the given kind.
    ///
    /// Distinct kinds may share a pattern, e.g. the default eruby syntax
    /// closes expression, block, and comment tags all with `%>`. The lexer
    /// uses this to accept any end tag whose text matches the one it is
    /// expecting.
    pub fn pattern(&self, kind: Kind) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, p)| p.as_str())
    }
}
