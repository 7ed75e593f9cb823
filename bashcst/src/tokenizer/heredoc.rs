//! Here-document resolution: the second tokenization pass.

use std::collections::VecDeque;

use super::{Token, TokenKind, unquote_delimiter};
use crate::SourceSpan;

struct Expected {
    delimiter: String,
    strip_tabs: bool,
}

impl Expected {
    fn terminates(&self, token: &Token) -> bool {
        token.kind == TokenKind::Word
            && if self.strip_tabs {
                token.text.trim_start_matches('\t') == self.delimiter
            } else {
                token.text == self.delimiter
            }
    }
}

/// Collapses the raw body lines of each here-document into a single
/// [`TokenKind::HeredocContent`] token, tags the delimiter word following each
/// operator, and tags each terminator line as [`TokenKind::HeredocEnd`].
///
/// When several here-documents are opened on one line their bodies follow one
/// another; the line feed ending each terminator but the last is folded into
/// the terminator token so the parser sees content and terminator tokens back
/// to back.
pub(super) fn resolve_here_documents(tokens: Vec<Token>) -> Vec<Token> {
    let mut resolved = Vec::with_capacity(tokens.len());
    let mut expected: VecDeque<Expected> = VecDeque::new();
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        match token.kind {
            TokenKind::HeredocOperator => {
                let strip_tabs = token.text.ends_with('-');
                resolved.push(token);

                while let Some(space) = iter.next_if(|t| t.kind == TokenKind::Space) {
                    resolved.push(space);
                }

                if let Some(mut delimiter) = iter.next_if(|t| t.kind.is_word_piece()) {
                    expected.push_back(Expected {
                        delimiter: unquote_delimiter(&delimiter.text),
                        strip_tabs,
                    });
                    delimiter.kind = TokenKind::HeredocDelimiter;
                    resolved.push(delimiter);
                }
            }
            TokenKind::Newline if !expected.is_empty() => {
                let mut end = token.span.end;
                resolved.push(token);

                while let Some(doc) = expected.pop_front() {
                    let mut text = String::new();
                    let mut span = SourceSpan { start: end, end };
                    while let Some(line) = iter.next_if(|t| t.kind == TokenKind::HeredocLine) {
                        text.push_str(&line.text);
                        span.end = line.span.end;
                    }
                    resolved.push(Token {
                        kind: TokenKind::HeredocContent,
                        text,
                        span,
                    });

                    let Some(mut terminator) = iter.next_if(|t| doc.terminates(t)) else {
                        tracing::debug!(
                            target: "tokenize",
                            "here-document '{}' has no terminator",
                            doc.delimiter
                        );
                        expected.clear();
                        break;
                    };
                    terminator.kind = TokenKind::HeredocEnd;
                    end = terminator.span.end;
                    resolved.push(terminator);

                    if !expected.is_empty() {
                        if let Some(newline) = iter.next_if(|t| t.kind == TokenKind::Newline) {
                            end = newline.span.end;
                            fold_into_terminator(&mut resolved, newline);
                        }
                    }
                }
            }
            _ => resolved.push(token),
        }
    }

    resolved
}

/// Appends a folded line feed to the terminator just pushed.
fn fold_into_terminator(resolved: &mut [Token], newline: Token) {
    if let Some(terminator) = resolved.last_mut() {
        terminator.text.push_str(&newline.text);
        terminator.span.end = newline.span.end;
    }
}
