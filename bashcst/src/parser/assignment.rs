use super::TokenParser;
use crate::ParseError;
use crate::ast::VariableAssignment;
use crate::tokenizer::TokenKind;

/// Returns whether `text` can be assigned to: a name with an optional subscript.
pub(super) fn is_assignable_name(text: &str) -> bool {
    let (name, subscript) = match text.find('[') {
        Some(open) => (&text[..open], Some(&text[open..])),
        None => (text, None),
    };

    let mut chars = name.chars();
    let valid_name = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    valid_name && subscript.is_none_or(|s| s.len() > 2 && s.ends_with(']'))
}

impl TokenParser<'_> {
    /// Returns whether the upcoming tokens are `NAME=` or `NAME+=`.
    pub(super) fn at_assignment(&self) -> bool {
        let Some(name) = self.peek() else {
            return false;
        };
        matches!(name.kind, TokenKind::Word | TokenKind::CommandName)
            && is_assignable_name(&name.text)
            && matches!(
                self.tokens.get(self.pos + 1).map(|t| t.kind),
                Some(TokenKind::Equals | TokenKind::PlusEquals)
            )
    }

    pub(super) fn parse_assignment(&mut self) -> Result<VariableAssignment, ParseError> {
        let start = self.start_position();
        let Some(name) = self.advance() else {
            return Err(self.unexpected("a variable name"));
        };
        let Some(operator) = self.advance() else {
            return Err(self.unexpected("'='"));
        };

        let value = if self.at(TokenKind::SubshellOpen) {
            Some(self.parse_array()?)
        } else if self.at_word_piece() {
            Some(self.parse_word()?)
        } else {
            None
        };

        tracing::debug!(target: "parse", "assignment to {}", name.text);

        Ok(VariableAssignment {
            name: name.text.clone(),
            append: operator.kind == TokenKind::PlusEquals,
            value,
            span: self.span_from(start),
        })
    }
}
