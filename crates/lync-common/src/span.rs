//! Source location tracking.
//!
//! A [`Span`] is a cheap byte range carried by every token and AST node.
//! Line/column information is only materialized on demand, via a [`LineMap`],
//! when a diagnostic actually needs to be printed.

use std::rc::Rc;

/// A half-open byte range `[start, end)` into a single source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[inline]
    #[must_use]
    pub const fn at(pos: u32) -> Self {
        Span { start: pos, end: pos }
    }

    /// A sentinel span for synthetic nodes that have no source origin.
    #[inline]
    #[must_use]
    pub const fn dummy() -> Self {
        Span { start: u32::MAX, end: u32::MAX }
    }

    #[inline]
    #[must_use]
    pub const fn is_dummy(&self) -> bool {
        self.start == u32::MAX
    }

    #[inline]
    #[must_use]
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A fully materialized `(file, line, column)` triple, used only when a
/// diagnostic is printed or a node is created — never stored per-token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub file: Rc<str>,
    pub line: u32,
    pub column: u32,
}

impl Location {
    #[must_use]
    pub fn no_loc() -> Self {
        Location { file: Rc::from("<unknown>"), line: 0, column: 0 }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Maps byte offsets within a source file to `(line, column)` pairs.
///
/// Built once per file; columns and lines are both 1-based to match the
/// conventions most C compilers (and thus most Lync users) expect.
#[derive(Debug)]
pub struct LineMap {
    file: Rc<str>,
    line_starts: Vec<u32>,
}

impl LineMap {
    #[must_use]
    pub fn build(file: Rc<str>, source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap { file, line_starts }
    }

    #[must_use]
    pub fn location(&self, offset: u32) -> Location {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        Location {
            file: self.file.clone(),
            line: (line_idx + 1) as u32,
            column: offset - line_start + 1,
        }
    }

    #[must_use]
    pub fn span_location(&self, span: Span) -> Location {
        if span.is_dummy() {
            Location::no_loc()
        } else {
            self.location(span.start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_map_finds_first_line() {
        let map = LineMap::build(Rc::from("a.lync"), "abc\ndef\nghi");
        let loc = map.location(1);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 2);
    }

    #[test]
    fn line_map_finds_later_lines() {
        let map = LineMap::build(Rc::from("a.lync"), "abc\ndef\nghi");
        let loc = map.location(4);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);

        let loc2 = map.location(9);
        assert_eq!(loc2.line, 3);
        assert_eq!(loc2.column, 2);
    }

    #[test]
    fn dummy_span_maps_to_no_loc() {
        let map = LineMap::build(Rc::from("a.lync"), "abc");
        let loc = map.span_location(Span::dummy());
        assert_eq!(loc.line, 0);
    }
}
