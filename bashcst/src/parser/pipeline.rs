use super::TokenParser;
use crate::ParseError;
use crate::ast::{
    Command, Gap, Negation, Pipeline, PipelineBoundary, PipelineOperator, Statement,
};
use crate::tokenizer::TokenKind;

const fn pipeline_operator(kind: TokenKind) -> Option<PipelineOperator> {
    match kind {
        TokenKind::Pipe => Some(PipelineOperator::Pipe),
        TokenKind::PipeBoth => Some(PipelineOperator::PipeBoth),
        TokenKind::AndIf => Some(PipelineOperator::And),
        TokenKind::OrIf => Some(PipelineOperator::Or),
        _ => None,
    }
}

impl TokenParser<'_> {
    /// Looks ahead, without consuming anything, for a pipe or boolean operator
    /// joining the statement at the cursor to another one. Operators nested in
    /// parentheses, braces, compound commands, or test brackets don't count; a
    /// statement separator at the outer level ends the search.
    pub(super) fn pipeline_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut in_test = false;

        for index in self.pos..self.tokens.len() {
            if self.claimed[index] {
                continue;
            }
            match self.tokens[index].kind {
                TokenKind::SubshellOpen
                | TokenKind::BraceOpen
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Until
                | TokenKind::For
                | TokenKind::Case => depth += 1,
                TokenKind::SubshellClose
                | TokenKind::BraceClose
                | TokenKind::Fi
                | TokenKind::Done
                | TokenKind::Esac => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                TokenKind::TestOpen | TokenKind::ExtendedTestOpen => in_test = true,
                TokenKind::TestClose | TokenKind::ExtendedTestClose => in_test = false,
                kind if pipeline_operator(kind).is_some() => {
                    if depth == 0 && !in_test {
                        return true;
                    }
                }
                TokenKind::Newline
                | TokenKind::Semicolon
                | TokenKind::Ampersand
                | TokenKind::Comment
                | TokenKind::DoubleSemicolon
                | TokenKind::CaseFallthrough
                | TokenKind::CaseContinue => {
                    if depth == 0 {
                        return false;
                    }
                }
                _ => (),
            }
        }

        false
    }

    fn pipeline_operator_ahead(&self) -> Option<PipelineOperator> {
        self.kind_past_inline_space().and_then(pipeline_operator)
    }

    /// Joins `first` with any further elements introduced by pipe or boolean
    /// operators. Line breaks and comments may follow an operator.
    pub(super) fn continue_pipeline(&mut self, first: Statement) -> Result<Statement, ParseError> {
        if self.pipeline_operator_ahead().is_none() {
            return Ok(first);
        }

        let mut commands = vec![first];
        let mut boundaries = vec![];

        while let Some(operator) = self.pipeline_operator_ahead() {
            let before = Gap::verbatim(self.take_inline_trivia());
            self.advance();
            let after = Gap::verbatim(self.take_layout_trivia());

            commands.push(self.parse_pipeline_element()?);
            boundaries.push(PipelineBoundary {
                before,
                operator,
                after,
            });
        }

        tracing::debug!(target: "parse", "pipeline of {} command(s)", commands.len());

        Ok(Statement::Pipeline(Pipeline {
            commands,
            boundaries,
        }))
    }

    /// Parses one element of a pipeline: a negation, an extension command, a
    /// simple command or assignment, or a compound command with its trailing
    /// redirections.
    pub(super) fn parse_pipeline_element(&mut self) -> Result<Statement, ParseError> {
        let Some(kind) = self.peek_kind() else {
            return Err(self.unexpected("a command"));
        };

        match kind {
            TokenKind::Bang => self.parse_negation(),
            kind if kind.is_word_piece() => match self.try_extension()? {
                Some(node) => Ok(Statement::Custom(node)),
                None => self.parse_simple_command(),
            },
            TokenKind::Redirect | TokenKind::HeredocOperator => self.parse_simple_command(),
            _ => {
                let compound = self.parse_compound()?;
                self.parse_trailing_redirects(compound)
            }
        }
    }

    fn parse_negation(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Bang, "'!'")?;
        let gap = Gap::verbatim(self.take_inline_trivia());
        let statement = self.parse_pipeline_element()?;

        Ok(Statement::Negated(Negation {
            gap,
            statement: Box::new(statement),
        }))
    }

    /// Returns whether the command being parsed continues past the inline
    /// whitespace at the cursor.
    fn command_continues(&self) -> bool {
        self.kind_past_inline_space().is_some_and(|kind| {
            kind.is_word_piece() || matches!(kind, TokenKind::Redirect | TokenKind::HeredocOperator)
        })
    }

    /// Parses assignments and redirections, then a command name and its
    /// arguments. Assignments without a following name stand alone.
    fn parse_simple_command(&mut self) -> Result<Statement, ParseError> {
        let start = self.start_position();
        let mut prefix = vec![];
        let mut redirects = vec![];
        let mut after_first_assignment = None;

        loop {
            if self.at_assignment() {
                prefix.push(Statement::Assignment(self.parse_assignment()?));
                after_first_assignment.get_or_insert(self.pos);
            } else if self.at_redirect() {
                redirects.push(self.parse_redirect(prefix.len())?);
            } else {
                break;
            }

            if !self.command_continues() {
                break;
            }
            prefix.extend(self.take_inline_statements());
        }

        if !self.at_word_piece() {
            if !redirects.is_empty() {
                return Err(self.unexpected("a command name"));
            }
            let (Some(resume), Some(Statement::Assignment(first))) =
                (after_first_assignment, prefix.into_iter().next())
            else {
                return Err(self.unexpected("a command"));
            };
            self.rewind(resume);
            return Ok(Statement::Assignment(first));
        }

        let name = self.parse_word()?;
        let mut arguments = vec![];

        while self.command_continues() {
            arguments.extend(self.take_inline_arguments());
            if self.at_redirect() {
                redirects.push(self.parse_redirect(prefix.len() + 1 + arguments.len())?);
            } else {
                arguments.push(self.parse_word()?);
            }
        }

        tracing::trace!(
            target: "parse",
            "command with {} prefix element(s), {} argument element(s), {} redirect(s)",
            prefix.len(),
            arguments.len(),
            redirects.len()
        );

        Ok(Statement::Command(Command {
            prefix,
            name,
            arguments,
            redirects,
            span: self.span_from(start),
        }))
    }
}
