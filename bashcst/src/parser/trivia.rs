use super::TokenParser;
use crate::ast::{Argument, Comment, Statement, Trivia};
use crate::tokenizer::{Token, TokenKind};

/// Converts a layout or separator token into the statement that preserves it.
pub(super) fn layout_statement(token: &Token) -> Option<Statement> {
    let statement = match token.kind {
        TokenKind::Space => Statement::Space(token.text.clone()),
        TokenKind::Newline => Statement::Newline,
        TokenKind::LineContinuation => Statement::LineContinuation,
        TokenKind::Semicolon => Statement::Semicolon,
        TokenKind::Ampersand => Statement::Background,
        TokenKind::Comment => Statement::Comment(comment(token)),
        TokenKind::Shebang => Statement::Shebang(token.text.clone()),
        _ => return None,
    };
    Some(statement)
}

pub(super) fn comment(token: &Token) -> Comment {
    Comment {
        text: token.text.clone(),
        span: Some(token.span),
    }
}

/// Removes a trailing run of spaces from a statement list and returns it.
pub(super) fn split_indent(statements: &mut Vec<Statement>) -> String {
    if let Some(Statement::Space(_)) = statements.last() {
        if let Some(Statement::Space(indent)) = statements.pop() {
            return indent;
        }
    }
    String::new()
}

impl TokenParser<'_> {
    /// Consumes spaces and line continuations.
    pub(super) fn take_inline_trivia(&mut self) -> Vec<Trivia> {
        let mut trivia = vec![];
        while let Some(token) = self.peek() {
            let item = match token.kind {
                TokenKind::Space => Trivia::Space(token.text.clone()),
                TokenKind::LineContinuation => Trivia::LineContinuation,
                _ => break,
            };
            trivia.push(item);
            self.advance();
        }
        trivia
    }

    /// Consumes spaces, line continuations, line breaks, and comments.
    pub(super) fn take_layout_trivia(&mut self) -> Vec<Trivia> {
        let mut trivia = vec![];
        while let Some(token) = self.peek() {
            let item = match token.kind {
                TokenKind::Space => Trivia::Space(token.text.clone()),
                TokenKind::LineContinuation => Trivia::LineContinuation,
                TokenKind::Newline => Trivia::Newline,
                TokenKind::Comment => Trivia::Comment(comment(token)),
                _ => break,
            };
            trivia.push(item);
            self.advance();
        }
        trivia
    }

    /// Consumes spaces and line continuations as arguments.
    pub(super) fn take_inline_arguments(&mut self) -> Vec<Argument> {
        let mut arguments = vec![];
        while let Some(token) = self.peek() {
            let item = match token.kind {
                TokenKind::Space => Argument::Space(token.text.clone()),
                TokenKind::LineContinuation => Argument::LineContinuation,
                _ => break,
            };
            arguments.push(item);
            self.advance();
        }
        arguments
    }

    /// Consumes spaces and line continuations as statements.
    pub(super) fn take_inline_statements(&mut self) -> Vec<Statement> {
        let mut statements = vec![];
        while let Some(token) = self.peek() {
            if !token.kind.is_inline_space() {
                break;
            }
            if let Some(statement) = layout_statement(token) {
                statements.push(statement);
            }
            self.advance();
        }
        statements
    }

    /// Consumes whitespace, line breaks, and comments as statements. With
    /// `separators`, `;` is consumed too.
    pub(super) fn take_layout_statements(&mut self, separators: bool) -> Vec<Statement> {
        let mut statements = vec![];
        while let Some(token) = self.peek() {
            let accepted = matches!(
                token.kind,
                TokenKind::Space
                    | TokenKind::LineContinuation
                    | TokenKind::Newline
                    | TokenKind::Comment
            ) || (separators && token.kind == TokenKind::Semicolon);
            if !accepted {
                break;
            }
            if let Some(statement) = layout_statement(token) {
                statements.push(statement);
            }
            self.advance();
        }
        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_indent_takes_trailing_space_only() {
        let mut statements = vec![Statement::Newline, Statement::Space("  ".to_owned())];
        assert_eq!(split_indent(&mut statements), "  ");
        assert_eq!(statements, vec![Statement::Newline]);
        assert_eq!(split_indent(&mut statements), "");
    }
}
