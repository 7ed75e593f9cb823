//! Recursive-descent parsing of token streams into a concrete syntax tree.
//!
//! Statement lists stop at any closing keyword or delimiter and leave it
//! unconsumed; each construct consumes its own terminator. Here-document bodies
//! are claimed by the redirection that introduces them and skipped afterwards.

mod assignment;
mod case;
mod compound;
mod io;
mod pipeline;
mod test_expr;
mod trivia;
mod word;

#[cfg(test)]
mod tests;

use bon::Builder;

use crate::ast::{Program, Statement};
use crate::extension::ExtensionRegistry;
use crate::tokenizer::{Token, TokenKind, TokenizerOptions};
use crate::{ParseError, SourcePosition, SourceSpan};

/// Options used to control the behavior of the parser.
#[derive(Builder, Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserOptions {
    /// Whether reserved words in command position are recognized as keywords.
    #[builder(default = true)]
    pub keyword_classification: bool,
    /// Command names to tag specially during tokenization.
    #[builder(default = crate::tokenizer::TokenizerOptions::default().command_vocabulary)]
    pub command_vocabulary: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        let tokenizer = TokenizerOptions::default();
        Self {
            keyword_classification: tokenizer.keyword_classification,
            command_vocabulary: tokenizer.command_vocabulary,
        }
    }
}

impl ParserOptions {
    /// Returns the tokenizer options implied by these parser options.
    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            keyword_classification: self.keyword_classification,
            command_vocabulary: self.command_vocabulary.clone(),
        }
    }
}

/// Implements parsing for shell programs.
#[derive(Builder)]
pub struct Parser<'a, R: std::io::BufRead> {
    /// The reader to use for input
    reader: R,
    /// Parsing options
    #[builder(default)]
    options: ParserOptions,
    /// Extensions consulted before generic command parsing
    extensions: Option<&'a ExtensionRegistry>,
}

impl<'a, R: std::io::BufRead> Parser<'a, R> {
    /// Returns a new parser instance.
    ///
    /// # Arguments
    ///
    /// * `reader` - The reader to use for input.
    /// * `options` - The options to use when parsing.
    pub fn new(reader: R, options: &ParserOptions) -> Self {
        Self {
            reader,
            options: options.clone(),
            extensions: None,
        }
    }

    /// Parses the input into a syntax tree of a shell program.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut input = String::new();
        self.reader
            .read_to_string(&mut input)
            .map_err(|e| ParseError::Read(e.to_string()))?;

        tracing::debug!(target: "tokenize", "Tokenizing...");
        let tokens =
            crate::tokenizer::tokenize_str_with_options(&input, &self.options.tokenizer_options());
        tracing::debug!(target: "tokenize", "  => {} token(s)", tokens.len());

        parse_tokens(&tokens, self.extensions)
    }
}

/// Parses a sequence of tokens into the syntax tree of a shell program.
///
/// # Arguments
///
/// * `tokens` - The tokens to parse.
/// * `extensions` - Extensions to consult for command handlers, if any.
pub fn parse_tokens(
    tokens: &[Token],
    extensions: Option<&ExtensionRegistry>,
) -> Result<Program, ParseError> {
    let mut parser = TokenParser::new(tokens, extensions);
    let body = parser.parse_statement_list(&[])?;

    if parser.peek().is_some() {
        return Err(parser.unexpected("end of input"));
    }

    let span = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => Some(SourceSpan::within(&first.span, &last.span)),
        _ => None,
    };

    tracing::debug!(target: "parse", "parsed {} top-level statement(s)", body.len());

    Ok(Program {
        body,
        comments: vec![],
        span,
    })
}

/// Kinds that end any statement list. The construct that opened the list is
/// responsible for consuming them.
const CLOSERS: &[TokenKind] = &[
    TokenKind::Fi,
    TokenKind::Done,
    TokenKind::Esac,
    TokenKind::Else,
    TokenKind::Elif,
    TokenKind::BraceClose,
    TokenKind::SubshellClose,
    TokenKind::FunctionClose,
    TokenKind::CasePatternClose,
    TokenKind::DoubleSemicolon,
    TokenKind::CaseFallthrough,
    TokenKind::CaseContinue,
];

pub(crate) struct TokenParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Tokens consumed out of order, i.e. here-document bodies.
    claimed: Vec<bool>,
    last_end: SourcePosition,
    extensions: Option<&'a ExtensionRegistry>,
}

impl<'a> TokenParser<'a> {
    pub(crate) fn new(tokens: &'a [Token], extensions: Option<&'a ExtensionRegistry>) -> Self {
        Self {
            tokens,
            pos: 0,
            claimed: vec![false; tokens.len()],
            last_end: SourcePosition::START,
            extensions,
        }
    }

    //
    // Cursor.
    //

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn at_word_piece(&self) -> bool {
        self.peek_kind().is_some_and(TokenKind::is_word_piece)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.last_end = token.span.end;
        self.pos += 1;
        self.settle();
        Some(token)
    }

    fn settle(&mut self) {
        while self.pos < self.tokens.len() && self.claimed[self.pos] {
            self.pos += 1;
        }
    }

    fn rewind(&mut self, pos: usize) {
        self.pos = pos;
        self.settle();
    }

    /// Returns the index of the first unclaimed token at or after `from` that
    /// is not inline whitespace.
    fn significant_from(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len())
            .find(|&i| !self.claimed[i] && !self.tokens[i].kind.is_inline_space())
    }

    /// Returns the kind of the next token that is not inline whitespace.
    fn kind_past_inline_space(&self) -> Option<TokenKind> {
        self.significant_from(self.pos).map(|i| self.tokens[i].kind)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&'a Token, ParseError> {
        if self.at(kind) {
            self.advance().ok_or_else(|| self.unexpected(expected))
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                expected: expected.to_owned(),
                found: token.text.clone(),
                index: self.pos,
                position: token.span.start,
            },
            None => ParseError::UnexpectedEndOfInput {
                expected: expected.to_owned(),
                index: self.tokens.len(),
            },
        }
    }

    fn start_position(&self) -> SourcePosition {
        self.peek().map_or(self.last_end, |t| t.span.start)
    }

    const fn span_from(&self, start: SourcePosition) -> Option<SourceSpan> {
        Some(SourceSpan {
            start,
            end: self.last_end,
        })
    }

    //
    // Statement lists.
    //

    /// Parses statements until a closer, an entry of `stop`, or the end of input.
    /// A `;` or `&` must follow a command on the same line.
    pub(crate) fn parse_statement_list(
        &mut self,
        stop: &[TokenKind],
    ) -> Result<Vec<Statement>, ParseError> {
        let mut statements = vec![];
        let mut awaiting_command = true;
        while let Some(kind) = self.peek_kind() {
            if CLOSERS.contains(&kind) || stop.contains(&kind) {
                break;
            }
            match kind {
                TokenKind::Semicolon | TokenKind::Ampersand if awaiting_command => {
                    return Err(self.unexpected("a command"));
                }
                TokenKind::Semicolon | TokenKind::Ampersand | TokenKind::Newline => {
                    awaiting_command = true;
                }
                _ => (),
            }

            let statement = self.parse_statement()?;
            if !statement.is_layout() {
                awaiting_command = false;
            }
            statements.push(statement);
        }
        Ok(statements)
    }

    /// Parses a statement list that must hold at least one command.
    pub(crate) fn parse_required_list(
        &mut self,
        stop: &[TokenKind],
    ) -> Result<Vec<Statement>, ParseError> {
        let statements = self.parse_statement_list(stop)?;
        if statements.iter().all(Statement::is_layout) {
            return Err(self.unexpected("a command"));
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("a statement"));
        };

        if let Some(layout) = trivia::layout_statement(token) {
            self.advance();
            return Ok(layout);
        }

        match token.kind {
            TokenKind::HeredocContent | TokenKind::HeredocEnd | TokenKind::HeredocDelimiter => {
                Err(self.unexpected("a statement"))
            }
            kind if kind.is_word_piece()
                || matches!(kind, TokenKind::Redirect | TokenKind::HeredocOperator) =>
            {
                self.parse_command_statement()
            }
            _ => {
                let first = self.parse_pipeline_element()?;
                self.continue_pipeline(first)
            }
        }
    }

    /// Parses a statement starting with a word: a pipeline, or a single
    /// simple command, extension command, or assignment.
    fn parse_command_statement(&mut self) -> Result<Statement, ParseError> {
        if self.pipeline_ahead() {
            tracing::debug!(target: "parse", "pipeline at token {}", self.pos);
            let first = self.parse_pipeline_element()?;
            self.continue_pipeline(first)
        } else {
            self.parse_pipeline_element()
        }
    }

    /// Offers the command at the cursor to the registered handlers.
    fn try_extension(&mut self) -> Result<Option<crate::ast::CustomNode>, ParseError> {
        let Some(registry) = self.extensions else {
            return Ok(None);
        };
        let Some(name) = self.peek() else {
            return Ok(None);
        };
        let next = self
            .significant_from(self.pos + 1)
            .map(|i| &self.tokens[i])
            .filter(|t| t.kind.is_word_piece())
            .map(|t| t.text.as_str());

        let Some(handler) = registry.find_handler(&name.text, next) else {
            return Ok(None);
        };

        tracing::debug!(
            target: "extension",
            "command handler '{}' claims '{}'",
            handler.pattern(),
            name.text
        );

        // Handlers only see tokens up to the next claimed here-document body.
        let tokens = self.tokens;
        let window_end = (self.pos..tokens.len())
            .find(|&i| self.claimed[i])
            .unwrap_or(tokens.len());
        let window = &tokens[self.pos..window_end];

        let (node, consumed) = handler.parse(window)?;
        let problem = if consumed == 0 {
            Some("handler consumed no tokens")
        } else if consumed > window.len() {
            Some("handler consumed more tokens than it was given")
        } else {
            None
        };
        if let Some(message) = problem {
            return Err(ParseError::Extension {
                extension: handler.pattern().to_owned(),
                message: message.to_owned(),
            });
        }
        for _ in 0..consumed {
            self.advance();
        }

        for warning in handler.validate(&node) {
            tracing::warn!(target: "extension", "{}: {warning}", handler.pattern());
        }

        Ok(Some(node))
    }
}
