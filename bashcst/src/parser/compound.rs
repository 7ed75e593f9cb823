use super::TokenParser;
use super::word::word_from_token;
use crate::ParseError;
use crate::ast::{
    ArithmeticCommand, BraceGroup, ElifClause, ForHeader, ForList, ForStatement,
    FunctionDefinition, FunctionParens, Gap, IfStatement, LoopStatement, Statement, Subshell,
    Word,
};
use crate::tokenizer::TokenKind;

impl TokenParser<'_> {
    /// Parses a compound command, a test, or a function definition.
    pub(super) fn parse_compound(&mut self) -> Result<Statement, ParseError> {
        let Some(kind) = self.peek_kind() else {
            return Err(self.unexpected("a command"));
        };

        match kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => Ok(Statement::While(self.parse_loop(TokenKind::While)?)),
            TokenKind::Until => Ok(Statement::Until(self.parse_loop(TokenKind::Until)?)),
            TokenKind::For => self.parse_for(),
            TokenKind::Case => self.parse_case(),
            TokenKind::Function | TokenKind::FunctionName => self.parse_function(),
            TokenKind::BraceOpen => self.parse_brace_group(),
            TokenKind::SubshellOpen => self.parse_subshell(),
            TokenKind::TestOpen | TokenKind::ExtendedTestOpen => self.parse_test(),
            TokenKind::ArithmeticCommand => {
                Ok(Statement::Arithmetic(self.parse_arithmetic_command()?))
            }
            _ => Err(self.unexpected("a command")),
        }
    }

    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        let start = self.start_position();
        self.expect(TokenKind::If, "'if'")?;
        let gap = Gap::verbatim(self.take_inline_trivia());
        let condition = self.parse_required_list(&[TokenKind::Then])?;
        self.expect(TokenKind::Then, "'then'")?;
        let then_body = self.parse_required_list(&[])?;

        let mut elif_clauses = vec![];
        while self.at(TokenKind::Elif) {
            self.advance();
            let gap = Gap::verbatim(self.take_inline_trivia());
            let condition = self.parse_required_list(&[TokenKind::Then])?;
            self.expect(TokenKind::Then, "'then'")?;
            let body = self.parse_required_list(&[])?;
            elif_clauses.push(ElifClause {
                gap,
                condition,
                body,
            });
        }

        let else_body = if self.at(TokenKind::Else) {
            self.advance();
            Some(self.parse_required_list(&[])?)
        } else {
            None
        };

        self.expect(TokenKind::Fi, "'fi'")?;

        Ok(Statement::If(IfStatement {
            gap,
            condition,
            then_body,
            elif_clauses,
            else_body,
            span: self.span_from(start),
        }))
    }

    /// Parses `while` and `until` loops, which differ only in their keyword.
    fn parse_loop(&mut self, keyword: TokenKind) -> Result<LoopStatement, ParseError> {
        let start = self.start_position();
        self.expect(keyword, "a loop keyword")?;
        let gap = Gap::verbatim(self.take_inline_trivia());
        let condition = self.parse_required_list(&[TokenKind::Do])?;
        let body = self.parse_do_group()?;

        Ok(LoopStatement {
            gap,
            condition,
            body,
            span: self.span_from(start),
        })
    }

    /// Parses `do ... done` and returns the statements between the keywords.
    fn parse_do_group(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.expect(TokenKind::Do, "'do'")?;
        let body = self.parse_required_list(&[])?;
        self.expect(TokenKind::Done, "'done'")?;
        Ok(body)
    }

    fn parse_for(&mut self) -> Result<Statement, ParseError> {
        let start = self.start_position();
        self.expect(TokenKind::For, "'for'")?;
        let gap = Gap::verbatim(self.take_inline_trivia());

        let header = if self.at(TokenKind::ArithmeticCommand) {
            ForHeader::Arithmetic(self.parse_arithmetic_command()?)
        } else {
            let Some(variable) = self.peek().filter(|t| t.kind.is_word_piece()) else {
                return Err(self.unexpected("a loop variable"));
            };
            self.advance();

            let list = if self.kind_past_inline_space() == Some(TokenKind::In) {
                Some(self.parse_for_list()?)
            } else {
                None
            };

            ForHeader::Words {
                variable: Word::new(variable.text.as_str()),
                list,
            }
        };

        let separator = self.take_layout_statements(true);
        let body = self.parse_do_group()?;

        Ok(Statement::For(ForStatement {
            gap,
            header,
            separator,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_for_list(&mut self) -> Result<ForList, ParseError> {
        let before_in = Gap::verbatim(self.take_inline_trivia());
        self.expect(TokenKind::In, "'in'")?;
        let after_in = Gap::verbatim(self.take_inline_trivia());

        let mut items = vec![];
        if self.at_word_piece() {
            items.push(self.parse_word()?);
            while self
                .kind_past_inline_space()
                .is_some_and(TokenKind::is_word_piece)
            {
                items.extend(self.take_inline_arguments());
                items.push(self.parse_word()?);
            }
        }

        Ok(ForList {
            before_in,
            after_in,
            items,
        })
    }

    fn parse_function(&mut self) -> Result<Statement, ParseError> {
        let start = self.start_position();

        let keyword = if self.at(TokenKind::Function) {
            self.advance();
            Some(Gap::verbatim(self.take_inline_trivia()))
        } else {
            None
        };

        let Some(name) = self
            .peek()
            .filter(|t| t.kind == TokenKind::FunctionName || t.kind.is_word_piece())
        else {
            return Err(self.unexpected("a function name"));
        };
        self.advance();

        let parens = if self.kind_past_inline_space() == Some(TokenKind::FunctionOpen) {
            let before = self.take_inline_trivia();
            self.advance();
            let inside = self.take_inline_trivia();
            self.expect(TokenKind::FunctionClose, "')'")?;
            Some(FunctionParens { before, inside })
        } else if keyword.is_none() {
            return Err(self.unexpected("'()'"));
        } else {
            None
        };

        let body_gap = Gap::verbatim(self.take_layout_trivia());
        let body = self.parse_compound()?;

        tracing::debug!(target: "parse", "function definition '{}'", name.text);

        Ok(Statement::Function(FunctionDefinition {
            keyword,
            name: word_from_token(name),
            parens,
            body_gap,
            body: Box::new(body),
            span: self.span_from(start),
        }))
    }

    fn parse_brace_group(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::BraceOpen, "'{'")?;
        let body = self.parse_required_list(&[])?;
        self.expect(TokenKind::BraceClose, "'}'")?;
        Ok(Statement::BraceGroup(BraceGroup { body }))
    }

    fn parse_subshell(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::SubshellOpen, "'('")?;
        let body = self.parse_required_list(&[])?;
        self.expect(TokenKind::SubshellClose, "')'")?;
        Ok(Statement::Subshell(Subshell { body }))
    }

    fn parse_arithmetic_command(&mut self) -> Result<ArithmeticCommand, ParseError> {
        let token = self.expect(TokenKind::ArithmeticCommand, "'(('")?;
        let text = token.text.as_str();
        let expression = text
            .strip_prefix("((")
            .and_then(|s| s.strip_suffix("))"))
            .unwrap_or(text);

        Ok(ArithmeticCommand {
            expression: expression.to_owned(),
        })
    }
}
