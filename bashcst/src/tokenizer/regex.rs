//! Regex coalescing: the third tokenization pass.

use super::{Token, TokenKind};
use crate::SourceSpan;

/// Merges everything between `=~` and the `]]` closing the enclosing test into a
/// single [`TokenKind::RegexPattern`] token. Whitespace directly after the
/// operator and directly before the closing `]]` stays as separate tokens.
///
/// Bracket expressions such as `[[:alpha:]]` are balanced by counting `[[` and
/// `]]` within each merged token, so they never close the test early.
pub(super) fn coalesce_regex_patterns(tokens: Vec<Token>) -> Vec<Token> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        result.push(token.clone());
        index += 1;

        if token.kind != TokenKind::RegexMatch {
            continue;
        }

        let Some(close) = find_test_close(&tokens, index) else {
            continue;
        };

        let mut start = index;
        while start < close && tokens[start].kind.is_inline_space() {
            result.push(tokens[start].clone());
            start += 1;
        }

        let mut end = close;
        while end > start && tokens[end - 1].kind.is_inline_space() {
            end -= 1;
        }

        if start < end {
            let text: String = tokens[start..end].iter().map(|t| t.text.as_str()).collect();
            tracing::debug!(target: "tokenize", "coalesced regex pattern: {text}");
            result.push(Token {
                kind: TokenKind::RegexPattern,
                text,
                span: SourceSpan::within(&tokens[start].span, &tokens[end - 1].span),
            });
        }

        result.extend(tokens[end..close].iter().cloned());
        index = close;
    }

    result
}

fn find_test_close(tokens: &[Token], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, token) in tokens[from..].iter().enumerate() {
        match token.kind {
            TokenKind::ExtendedTestClose if depth == 0 => return Some(from + offset),
            TokenKind::ExtendedTestClose => depth -= 1,
            TokenKind::Newline => return None,
            _ => {
                let opens = token.text.matches("[[").count();
                let closes = token.text.matches("]]").count();
                depth = (depth + opens).saturating_sub(closes);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::{TokenKind, tokenize_str};
    use pretty_assertions::assert_eq;

    fn pattern(input: &str) -> Option<String> {
        tokenize_str(input)
            .into_iter()
            .find(|t| t.kind == TokenKind::RegexPattern)
            .map(|t| t.text)
    }

    #[test]
    fn grouped_pattern_with_character_class() {
        assert_eq!(
            pattern(r#"[[ "$x" =~ ([[:graph:]]*) ]]"#).as_deref(),
            Some("([[:graph:]]*)")
        );
    }

    #[test]
    fn pattern_with_inner_spaces_and_alternation() {
        assert_eq!(
            pattern("[[ $line =~ ^(foo|bar) baz$ ]] && echo y").as_deref(),
            Some("^(foo|bar) baz$")
        );
    }

    #[test]
    fn surrounding_whitespace_is_preserved() {
        let tokens = tokenize_str("[[ a =~  b  ]]");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ExtendedTestOpen,
                TokenKind::Space,
                TokenKind::Word,
                TokenKind::Space,
                TokenKind::RegexMatch,
                TokenKind::Space,
                TokenKind::RegexPattern,
                TokenKind::Space,
                TokenKind::ExtendedTestClose,
            ]
        );
    }
}
