use super::TokenParser;
use super::word::word_from_token;
use crate::ParseError;
use crate::ast::{HereDocument, Redirect, RedirectTarget, RedirectedStatement, Statement};
use crate::tokenizer::{Token, TokenKind, unquote_delimiter};

/// Returns whether a redirection operator needs no target word, as with
/// descriptor duplication (`2>&1`) and closing (`>&-`).
pub(super) fn is_complete_operator(operator: &str) -> bool {
    match operator.rsplit_once('&') {
        Some((before, after)) => {
            before.ends_with(['<', '>'])
                && !after.is_empty()
                && (after == "-" || after.chars().all(|c| c.is_ascii_digit()))
        }
        None => false,
    }
}

/// Collects the names of variables referenced in an expanding here-document.
pub(super) fn referenced_variables(content: &str) -> Vec<String> {
    let mut names: Vec<String> = vec![];
    let mut rest = content;

    while let Some(dollar) = rest.find('$') {
        rest = &rest[dollar + 1..];
        let candidate = rest.strip_prefix('{').unwrap_or(rest);
        let len = candidate
            .char_indices()
            .find(|(i, c)| {
                !(c.is_ascii_alphabetic() || *c == '_' || (*i > 0 && c.is_ascii_digit()))
            })
            .map_or(candidate.len(), |(i, _)| i);

        if len > 0 {
            let name = &candidate[..len];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        }
    }

    names
}

impl TokenParser<'_> {
    pub(super) fn at_redirect(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(TokenKind::Redirect | TokenKind::HeredocOperator)
        )
    }

    /// Parses a redirection anchored after `position` owning elements.
    pub(super) fn parse_redirect(&mut self, position: usize) -> Result<Redirect, ParseError> {
        let Some(operator) = self.advance() else {
            return Err(self.unexpected("a redirection"));
        };

        if operator.kind == TokenKind::HeredocOperator {
            return self.parse_here_document(operator, position);
        }

        if is_complete_operator(&operator.text) {
            return Ok(Redirect {
                operator: operator.text.clone(),
                gap: vec![],
                target: RedirectTarget::None,
                position,
            });
        }

        let gap = self.take_inline_trivia();
        if !self.at_word_piece() {
            return Err(self.unexpected("a redirection target"));
        }
        let target = self.parse_word()?;

        Ok(Redirect {
            operator: operator.text.clone(),
            gap,
            target: RedirectTarget::Argument(target),
            position,
        })
    }

    fn parse_here_document(
        &mut self,
        operator: &Token,
        position: usize,
    ) -> Result<Redirect, ParseError> {
        let gap = self.take_inline_trivia();

        let Some(delimiter_token) = self
            .peek()
            .filter(|t| t.kind == TokenKind::HeredocDelimiter)
        else {
            return Err(self.unexpected("a here-document delimiter"));
        };
        self.advance();

        let delimiter = word_from_token(delimiter_token);
        let unterminated = || ParseError::UnterminatedHereDocument {
            delimiter: unquote_delimiter(&delimiter_token.text),
            position: operator.span.start,
        };

        let content_index = (self.pos..self.tokens.len())
            .find(|&i| !self.claimed[i] && self.tokens[i].kind == TokenKind::HeredocContent)
            .ok_or_else(unterminated)?;
        let end_index = content_index + 1;
        let closing = self
            .tokens
            .get(end_index)
            .filter(|t| t.kind == TokenKind::HeredocEnd)
            .ok_or_else(unterminated)?;

        self.claimed[content_index] = true;
        self.claimed[end_index] = true;

        let content = &self.tokens[content_index];
        let mut doc = HereDocument {
            strip_tabs: operator.text.ends_with('-'),
            delimiter,
            content: content.text.clone(),
            closing: closing.text.clone(),
            variables: vec![],
            span: Some(crate::SourceSpan::within(&content.span, &closing.span)),
        };
        if doc.expands() {
            doc.variables = referenced_variables(&doc.content);
        }

        tracing::debug!(
            target: "parse",
            "here-document '{}' with {} byte(s) of content",
            doc.delimiter.text,
            doc.content.len()
        );

        Ok(Redirect {
            operator: operator.text.clone(),
            gap,
            target: RedirectTarget::HereDocument(doc),
            position,
        })
    }

    /// Wraps `statement` with any redirections that follow it on the same line.
    pub(super) fn parse_trailing_redirects(
        &mut self,
        statement: Statement,
    ) -> Result<Statement, ParseError> {
        let mut suffix = vec![];
        let mut redirects = vec![];

        while matches!(
            self.kind_past_inline_space(),
            Some(TokenKind::Redirect | TokenKind::HeredocOperator)
        ) {
            suffix.extend(self.take_inline_arguments());
            redirects.push(self.parse_redirect(suffix.len())?);
        }

        if redirects.is_empty() {
            return Ok(statement);
        }

        Ok(Statement::Redirected(RedirectedStatement {
            statement: Box::new(statement),
            suffix,
            redirects,
        }))
    }
}
