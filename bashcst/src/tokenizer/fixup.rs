//! Function-name reclassification: the final tokenization pass.

use super::{Token, TokenKind, in_command_position};

/// Tags the names of function definitions as [`TokenKind::FunctionName`]. This
/// covers both the name following the `function` keyword and a command-position
/// word immediately followed by `()`, whose parentheses are retagged as
/// [`TokenKind::FunctionOpen`] and [`TokenKind::FunctionClose`].
pub(super) fn classify_function_names(mut tokens: Vec<Token>) -> Vec<Token> {
    for index in 0..tokens.len() {
        let kind = tokens[index].kind;

        if kind == TokenKind::Function {
            if let Some(name) = next_significant(&tokens, index + 1) {
                if matches!(tokens[name].kind, TokenKind::Word | TokenKind::CommandName) {
                    tokens[name].kind = TokenKind::FunctionName;
                }
            }
            continue;
        }

        if !matches!(kind, TokenKind::Word | TokenKind::CommandName)
            || !in_command_position(&tokens[..index])
        {
            continue;
        }

        let Some(open) = next_significant(&tokens, index + 1) else {
            continue;
        };
        if !matches!(
            tokens[open].kind,
            TokenKind::SubshellOpen | TokenKind::FunctionOpen
        ) {
            continue;
        }
        let Some(close) = next_significant(&tokens, open + 1) else {
            continue;
        };
        if !matches!(
            tokens[close].kind,
            TokenKind::SubshellClose | TokenKind::FunctionClose
        ) {
            continue;
        }

        tracing::debug!(target: "tokenize", "function definition: {}", tokens[index].text);
        tokens[index].kind = TokenKind::FunctionName;
        tokens[open].kind = TokenKind::FunctionOpen;
        tokens[close].kind = TokenKind::FunctionClose;
    }

    tokens
}

fn next_significant(tokens: &[Token], from: usize) -> Option<usize> {
    tokens
        .iter()
        .skip(from)
        .position(|t| !t.kind.is_inline_space())
        .map(|offset| from + offset)
}
