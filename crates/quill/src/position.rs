//! Source positions and spans

use std::fmt;
use std::rc::Rc;

/// A cursor into a source file.
///
/// `index`, `line` and `column` are 0-based and count characters, not bytes.
/// The file name and full text travel with every position so that any error
/// can render an excerpt without access to the original source buffer.
#[derive(Clone)]
pub struct Position {
    /// Character offset from the start of the file
    pub index: usize,

    /// Line number (0-based)
    pub line: usize,

    /// Column number (0-based)
    pub column: usize,

    /// File name, as given to the lexer
    pub file_name: Rc<str>,

    /// Full text of the file
    pub file_text: Rc<str>,
}

impl Position {
    /// Create a position at the very start of a file.
    pub fn start_of(file_name: &str, file_text: &str) -> Self {
        Self {
            index: 0,
            line: 0,
            column: 0,
            file_name: Rc::from(file_name),
            file_text: Rc::from(file_text),
        }
    }

    /// Move one character forward, `current` being the character stepped over.
    pub fn advance(&mut self, current: Option<char>) {
        self.index += 1;
        self.column += 1;

        if current == Some('\n') {
            self.line += 1;
            self.column = 0;
        }
    }

    /// Copy of this position moved one character forward.
    pub fn advanced(&self, current: Option<char>) -> Self {
        let mut next = self.clone();
        next.advance(current);
        next
    }

    /// Line number as shown to users (1-based).
    pub fn display_line(&self) -> usize {
        self.line + 1
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && self.line == other.line
            && self.column == other.column
            && self.file_name == other.file_name
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_name,
            self.line + 1,
            self.column + 1
        )
    }
}

/// Start and end (exclusive) of a syntactic construct.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// First character of the construct
    pub start: Position,

    /// One past the last character of the construct
    pub end: Position,
}

impl Span {
    /// Create a span from two positions.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span covering `self` through `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span::new(self.start.clone(), other.end.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines_and_columns() {
        let mut pos = Position::start_of("<test>", "ab\nc");
        pos.advance(Some('a'));
        pos.advance(Some('b'));
        assert_eq!((pos.index, pos.line, pos.column), (2, 0, 2));

        pos.advance(Some('\n'));
        assert_eq!((pos.index, pos.line, pos.column), (3, 1, 0));
        assert_eq!(pos.display_line(), 2);
    }

    #[test]
    fn test_equality_ignores_file_text() {
        let a = Position::start_of("f", "one");
        let b = Position::start_of("f", "two");
        assert_eq!(a, b);
    }
}
