/// Position tracking for IR nodes
///
/// Stores the source location (line/column) reported by the front end so
/// diagnostics can point back into the `.taihe` source.
/// A span representing a range in source code (1-indexed, as the parser reports it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source code (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width span at a single point
    pub fn point(line: usize, column: usize) -> Self {
        let pos = Position::new(line, column);
        Self::new(pos, pos)
    }
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}
