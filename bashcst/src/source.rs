use std::fmt::Display;

/// Represents a position in source text.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourcePosition {
    /// The 0-based byte offset into the input.
    pub index: usize,
    /// The 1-based line number.
    pub line: usize,
    /// The 1-based column number, counted in characters.
    pub column: usize,
}

impl Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{},{}", self.line, self.column))
    }
}

impl SourcePosition {
    /// The position of the first character of an input.
    pub const START: Self = Self {
        index: 0,
        line: 1,
        column: 1,
    };

    /// Returns the position immediately after the given character, assuming
    /// this position is the position of that character.
    ///
    /// # Arguments
    ///
    /// * `c` - The character being stepped over.
    #[must_use]
    pub const fn advance(&self, c: char) -> Self {
        if c == '\n' {
            Self {
                index: self.index + 1,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                index: self.index + c.len_utf8(),
                line: self.line,
                column: self.column + 1,
            }
        }
    }

    /// Returns the position `text` characters earlier on the same line.
    ///
    /// # Arguments
    ///
    /// * `text` - Text without line breaks that ends at this position.
    #[must_use]
    pub fn retreat(&self, text: &str) -> Self {
        Self {
            index: self.index.saturating_sub(text.len()),
            line: self.line,
            column: self.column.saturating_sub(text.chars().count()).max(1),
        }
    }
}

#[cfg(feature = "diagnostics")]
impl From<&SourcePosition> for miette::SourceOffset {
    fn from(position: &SourcePosition) -> Self {
        position.index.into()
    }
}

/// Represents a span within source text.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceSpan {
    /// The start position.
    pub start: SourcePosition,
    /// The end position of the span (exclusive).
    pub end: SourcePosition,
}

impl Display for SourceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl SourceSpan {
    /// Returns the length of the span in bytes.
    pub const fn length(&self) -> usize {
        self.end.index - self.start.index
    }

    /// Returns the smallest span covering both `start` and `end`.
    pub(crate) const fn within(start: &Self, end: &Self) -> Self {
        Self {
            start: start.start,
            end: end.end,
        }
    }
}

#[cfg(feature = "diagnostics")]
impl From<&SourceSpan> for miette::SourceSpan {
    fn from(span: &SourceSpan) -> Self {
        Self::new((&span.start).into(), span.length())
    }
}
