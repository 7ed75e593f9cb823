use crate::SourcePosition;

/// Represents an error that occurred while parsing tokens.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A token appeared where it cannot be accepted.
    #[error("expected {expected}, found '{found}' at {position}")]
    UnexpectedToken {
        /// Description of what was expected.
        expected: String,
        /// Text of the offending token.
        found: String,
        /// Index of the offending token in the token stream.
        index: usize,
        /// Source position of the offending token.
        position: SourcePosition,
    },

    /// The input ended while a construct was still open.
    #[error("expected {expected}, found end of input")]
    UnexpectedEndOfInput {
        /// Description of what was expected.
        expected: String,
        /// Index just past the last token.
        index: usize,
    },

    /// A here-document body was not closed by its delimiter.
    #[error("here-document delimited by '{delimiter}' at {position} is never terminated")]
    UnterminatedHereDocument {
        /// The unquoted delimiter being searched for.
        delimiter: String,
        /// Position of the here-document operator.
        position: SourcePosition,
    },

    /// A quote, substitution, or expansion reached the end of input.
    #[error("unterminated {construct} starting at {position}")]
    Unterminated {
        /// Human-readable name of the construct.
        construct: &'static str,
        /// Where the construct starts.
        position: SourcePosition,
    },

    /// An extension command handler rejected its input.
    #[error("extension '{extension}' failed: {message}")]
    Extension {
        /// Name of the failing extension pattern.
        extension: String,
        /// The handler's message.
        message: String,
    },

    /// The input could not be read.
    #[error("failed to read input: {0}")]
    Read(String),
}

impl ParseError {
    /// Returns the source position the error refers to, if it has one.
    pub const fn position(&self) -> Option<SourcePosition> {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::UnterminatedHereDocument { position, .. }
            | Self::Unterminated { position, .. } => Some(*position),
            Self::UnexpectedEndOfInput { .. } | Self::Extension { .. } | Self::Read(_) => None,
        }
    }

    /// Converts the error into a report that renders the offending source.
    ///
    /// # Arguments
    ///
    /// * `source` - The text that was being parsed.
    #[cfg(feature = "diagnostics")]
    pub fn to_pretty_error(&self, source: impl Into<String>) -> miette::Report {
        let source = source.into();
        let offset = self.position().map_or(source.len(), |p| p.index);
        let labels = vec![miette::LabeledSpan::at_offset(offset, "here")];
        miette::miette!(labels = labels, "{self}").with_source_code(source)
    }
}

/// Represents an error that occurred while rendering a tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// No registered generator claims a custom node kind.
    #[error("no generator registered for node kind '{0}'")]
    UnknownNodeKind(String),

    /// An extension generator failed.
    #[error("generator for '{kind}' failed: {message}")]
    Extension {
        /// The node kind being generated.
        kind: String,
        /// The generator's message.
        message: String,
    },
}

/// Represents an error that occurred while registering extensions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExtensionError {
    /// An extension with the same name is already registered.
    #[error("extension '{0}' is already registered")]
    Duplicate(String),

    /// An extension depends on one that has not been registered.
    #[error("extension '{extension}' requires '{dependency}', which is not registered")]
    MissingDependency {
        /// The extension being registered.
        extension: String,
        /// The missing dependency.
        dependency: String,
    },
}
