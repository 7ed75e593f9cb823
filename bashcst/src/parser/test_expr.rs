use super::TokenParser;
use crate::ParseError;
use crate::ast::{Gap, Statement, TestExpression, TestPart, Trivia};
use crate::tokenizer::{TestOperatorKind, TokenKind};

impl TokenParser<'_> {
    /// Parses `[ ... ]` or `[[ ... ]]`. Operands are kept as words; operators
    /// are classified but the expression is not otherwise structured.
    pub(super) fn parse_test(&mut self) -> Result<Statement, ParseError> {
        let start = self.start_position();
        let Some(open) = self.advance() else {
            return Err(self.unexpected("'[' or '[['"));
        };
        let (extended, close, expected) = match open.kind {
            TokenKind::ExtendedTestOpen => (true, TokenKind::ExtendedTestClose, "']]'"),
            _ => (false, TokenKind::TestClose, "']'"),
        };

        let leading = self.take_inline_trivia();
        let mut parts = vec![];

        loop {
            let Some(token) = self.peek() else {
                return Err(self.unexpected(expected));
            };
            if token.kind == close {
                break;
            }

            let part = match token.kind {
                TokenKind::Space => TestPart::Space(token.text.clone()),
                TokenKind::LineContinuation => TestPart::LineContinuation,
                TokenKind::TestOperator(TestOperatorKind::Unary) => {
                    TestPart::UnaryOperator(token.text.clone())
                }
                TokenKind::TestOperator(TestOperatorKind::Binary)
                | TokenKind::Equals
                | TokenKind::RegexMatch
                | TokenKind::Redirect => TestPart::BinaryOperator(token.text.clone()),
                TokenKind::TestOperator(TestOperatorKind::Boolean)
                | TokenKind::AndIf
                | TokenKind::OrIf => TestPart::Logical(token.text.clone()),
                TokenKind::Bang => TestPart::Not,
                TokenKind::SubshellOpen => TestPart::GroupOpen,
                TokenKind::SubshellClose => TestPart::GroupClose,
                TokenKind::RegexPattern => TestPart::Regex(token.text.clone()),
                kind if kind.is_word_piece() => {
                    parts.push(TestPart::Operand(self.parse_word()?));
                    continue;
                }
                _ => return Err(self.unexpected(expected)),
            };
            parts.push(part);
            self.advance();
        }

        let mut trailing = vec![];
        while let Some(TestPart::Space(_) | TestPart::LineContinuation) = parts.last() {
            match parts.pop() {
                Some(TestPart::Space(space)) => trailing.push(Trivia::Space(space)),
                Some(_) => trailing.push(Trivia::LineContinuation),
                None => break,
            }
        }
        trailing.reverse();

        self.expect(close, expected)?;

        Ok(Statement::Test(TestExpression {
            extended,
            leading: Gap::verbatim(leading),
            parts,
            trailing: Gap::verbatim(trailing),
            span: self.span_from(start),
        }))
    }
}
