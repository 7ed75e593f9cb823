use super::TokenParser;
use super::trivia::split_indent;
use crate::{ParseError, SourceSpan};
use crate::ast::{Argument, CaseClause, CasePattern, CaseStatement, Gap, Statement};
use crate::tokenizer::TokenKind;

impl TokenParser<'_> {
    pub(super) fn parse_case(&mut self) -> Result<Statement, ParseError> {
        let start = self.start_position();
        self.expect(TokenKind::Case, "'case'")?;
        let gap = Gap::verbatim(self.take_inline_trivia());
        if !self.at_word_piece() {
            return Err(self.unexpected("a word to match"));
        }
        let subject = self.parse_word()?;
        let in_gap = Gap::verbatim(self.take_inline_trivia());
        self.expect(TokenKind::In, "'in'")?;

        let mut leading = self.take_layout_statements(false);
        let mut indent = split_indent(&mut leading);
        let mut clauses = vec![];

        while !self.at(TokenKind::Esac) {
            if self.peek().is_none() {
                return Err(self.unexpected("'esac'"));
            }

            let (clause, next_indent) = self.parse_case_clause(indent)?;
            clauses.push(clause);
            indent = next_indent;
        }

        self.expect(TokenKind::Esac, "'esac'")?;

        tracing::debug!(target: "parse", "case statement with {} clause(s)", clauses.len());

        Ok(Statement::Case(CaseStatement {
            gap,
            subject,
            in_gap,
            leading,
            clauses,
            closing_indent: indent,
            span: self.span_from(start),
        }))
    }

    /// Parses one clause. Returns it with the indentation that precedes
    /// whatever comes next: another clause or `esac`.
    fn parse_case_clause(&mut self, indent: String) -> Result<(CaseClause, String), ParseError> {
        let start = self.start_position().retreat(&indent);
        let open_paren = self.at(TokenKind::CasePatternOpen);
        if open_paren {
            self.advance();
        }

        let patterns = self.parse_case_patterns()?;
        let mut body = self.parse_statement_list(&[])?;

        let Some(token) = self.peek() else {
            return Err(self.unexpected("';;' or 'esac'"));
        };
        let terminator = match token.kind {
            TokenKind::DoubleSemicolon => Some(Statement::DoubleSemicolon),
            TokenKind::CaseFallthrough => Some(Statement::CaseFallthrough),
            TokenKind::CaseContinue => Some(Statement::CaseContinue),
            TokenKind::Esac => None,
            _ => return Err(self.unexpected("';;' or 'esac'")),
        };

        let (trailer, next_indent, end) = if let Some(terminator) = terminator {
            self.advance();
            body.push(terminator);
            let end = self.last_end;
            let mut trailer = self.take_layout_statements(false);
            let next_indent = split_indent(&mut trailer);
            (trailer, next_indent, end)
        } else {
            let next_indent = split_indent(&mut body);
            let end = self.last_end.retreat(&next_indent);
            (vec![], next_indent, end)
        };

        let clause = CaseClause {
            indent,
            open_paren,
            patterns,
            body,
            trailer: Some(trailer),
            span: Some(SourceSpan { start, end }),
        };
        Ok((clause, next_indent))
    }

    /// Parses `|`-separated patterns up to and including the closing `)`.
    fn parse_case_patterns(&mut self) -> Result<Vec<CasePattern>, ParseError> {
        let mut patterns = vec![];
        let mut parts = vec![];

        loop {
            let Some(token) = self.peek() else {
                return Err(self.unexpected("')'"));
            };

            match token.kind {
                TokenKind::CasePatternClose => {
                    self.advance();
                    patterns.push(CasePattern { parts });
                    return Ok(patterns);
                }
                TokenKind::Pipe => {
                    self.advance();
                    patterns.push(CasePattern {
                        parts: std::mem::take(&mut parts),
                    });
                }
                TokenKind::Space => {
                    self.advance();
                    parts.push(Argument::Space(token.text.clone()));
                }
                TokenKind::LineContinuation => {
                    self.advance();
                    parts.push(Argument::LineContinuation);
                }
                kind if kind.is_word_piece() => parts.push(self.parse_word()?),
                _ => return Err(self.unexpected("a case pattern")),
            }
        }
    }
}
