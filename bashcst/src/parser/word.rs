use super::TokenParser;
use super::trivia::comment;
use crate::ParseError;
use crate::ast::{
    ArithmeticExpansion, Argument, CommandSubstitution, ProcessDirection, ProcessSubstitution,
    Quote, SubstitutionStyle, VariableExpansion, Word,
};
use crate::tokenizer::{Token, TokenKind};

/// Splits the quoting off a string token.
pub(super) fn word_from_token(token: &Token) -> Word {
    let text = token.text.as_str();
    if token.kind == TokenKind::String || token.kind == TokenKind::HeredocDelimiter {
        if let Some(inner) = text.strip_prefix("$'").and_then(|s| s.strip_suffix('\'')) {
            return Word::with_quote(inner, Quote::AnsiC);
        }
        if let Some(inner) = text.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
            return Word::with_quote(inner, Quote::Single);
        }
        if let Some(inner) = text.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            return Word::with_quote(inner, Quote::Double);
        }
    }
    Word::new(text)
}

fn unterminated_construct(text: &str) -> &'static str {
    if text.starts_with("$((") {
        "arithmetic expansion"
    } else if text.starts_with("$(") {
        "command substitution"
    } else if text.starts_with("${") {
        "parameter expansion"
    } else if text.starts_with('`') {
        "backquoted command substitution"
    } else if text.starts_with("<(") || text.starts_with(">(") {
        "process substitution"
    } else {
        "quote"
    }
}

/// Joins word pieces: one piece stands alone, several form a concatenation.
pub(super) fn join_pieces(mut pieces: Vec<Argument>) -> Option<Argument> {
    match pieces.len() {
        0 => None,
        1 => pieces.pop(),
        _ => Some(Argument::Concatenation(pieces)),
    }
}

impl TokenParser<'_> {
    /// Parses adjacent word pieces into one argument.
    pub(super) fn parse_word(&mut self) -> Result<Argument, ParseError> {
        let mut pieces = vec![];
        while let Some(token) = self.peek() {
            if token.kind.is_word_piece() {
                pieces.push(self.parse_word_piece()?);
            } else if token.kind == TokenKind::SubshellOpen
                && matches!(
                    self.tokens.get(self.pos.wrapping_sub(1)).map(|t| t.kind),
                    Some(TokenKind::Equals | TokenKind::PlusEquals)
                )
                && !pieces.is_empty()
            {
                pieces.push(self.parse_array()?);
            } else {
                break;
            }
        }
        join_pieces(pieces).ok_or_else(|| self.unexpected("a word"))
    }

    fn parse_word_piece(&mut self) -> Result<Argument, ParseError> {
        let Some(token) = self.advance() else {
            return Err(self.unexpected("a word"));
        };
        let text = token.text.as_str();

        let piece = match token.kind {
            TokenKind::String => Argument::Word(word_from_token(token)),
            TokenKind::Expansion => Argument::Variable(VariableExpansion {
                name: text.strip_prefix('$').unwrap_or(text).to_owned(),
            }),
            TokenKind::CommandSubstitution => Argument::CommandSubstitution(CommandSubstitution {
                command: strip_delimiters(text, "$(", ")"),
                style: SubstitutionStyle::Dollar,
            }),
            TokenKind::BacktickSubstitution => {
                Argument::CommandSubstitution(CommandSubstitution {
                    command: strip_delimiters(text, "`", "`"),
                    style: SubstitutionStyle::Backtick,
                })
            }
            TokenKind::ArithmeticExpansion => Argument::Arithmetic(ArithmeticExpansion {
                expression: strip_delimiters(text, "$((", "))"),
            }),
            TokenKind::ProcessSubstitution => {
                let direction = if text.starts_with('>') {
                    ProcessDirection::Write
                } else {
                    ProcessDirection::Read
                };
                Argument::ProcessSubstitution(ProcessSubstitution {
                    direction,
                    command: text
                        .get(2..text.len().saturating_sub(1))
                        .unwrap_or_default()
                        .to_owned(),
                })
            }
            TokenKind::Unterminated => {
                return Err(ParseError::Unterminated {
                    construct: unterminated_construct(text),
                    position: token.span.start,
                });
            }
            _ => Argument::word(text),
        };

        Ok(piece)
    }

    /// Parses a parenthesized array literal.
    pub(super) fn parse_array(&mut self) -> Result<Argument, ParseError> {
        self.expect(TokenKind::SubshellOpen, "'('")?;

        let mut elements = vec![];
        loop {
            let Some(token) = self.peek() else {
                return Err(self.unexpected("')'"));
            };

            match token.kind {
                TokenKind::SubshellClose => {
                    self.advance();
                    break;
                }
                TokenKind::Space => elements.push(Argument::Space(token.text.clone())),
                TokenKind::Newline => elements.push(Argument::Newline),
                TokenKind::LineContinuation => elements.push(Argument::LineContinuation),
                TokenKind::Comment => elements.push(Argument::Comment(comment(token))),
                kind if kind.is_word_piece() => {
                    elements.push(self.parse_word()?);
                    continue;
                }
                kind if kind.is_keyword()
                    || matches!(
                        kind,
                        TokenKind::BraceOpen
                            | TokenKind::BraceClose
                            | TokenKind::TestOpen
                            | TokenKind::TestClose
                            | TokenKind::ExtendedTestOpen
                            | TokenKind::ExtendedTestClose
                            | TokenKind::Bang
                            | TokenKind::FunctionName
                    ) =>
                {
                    elements.push(Argument::word(token.text.as_str()));
                }
                _ => return Err(self.unexpected("an array element or ')'")),
            }
            self.advance();
        }

        Ok(Argument::Array(elements))
    }
}

fn strip_delimiters(text: &str, open: &str, close: &str) -> String {
    text.strip_prefix(open)
        .and_then(|s| s.strip_suffix(close))
        .unwrap_or(text)
        .to_owned()
}
