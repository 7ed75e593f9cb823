//! Character-level scanning: the first tokenization pass.

use super::{
    TestOperatorKind, Token, TokenKind, TokenizerOptions, in_command_position, last_significant,
    unquote_delimiter,
};
use crate::{SourcePosition, SourceSpan};

const UNARY_TEST_OPERATORS: &[&str] = &[
    "-b", "-c", "-d", "-e", "-f", "-g", "-h", "-k", "-n", "-p", "-r", "-s", "-t", "-u", "-v",
    "-w", "-x", "-z", "-G", "-L", "-N", "-O", "-R", "-S",
];

const BINARY_TEST_OPERATORS: &[&str] = &[
    "-ef", "-eq", "-ge", "-gt", "-le", "-lt", "-ne", "-nt", "-ot",
];

const BOOLEAN_TEST_OPERATORS: &[&str] = &["-a", "-o"];

/// Looks up a dash-prefixed word in the test operator tables.
pub(crate) fn test_operator_kind(text: &str) -> Option<TestOperatorKind> {
    if BOOLEAN_TEST_OPERATORS.contains(&text) {
        Some(TestOperatorKind::Boolean)
    } else if UNARY_TEST_OPERATORS.contains(&text) {
        Some(TestOperatorKind::Unary)
    } else if BINARY_TEST_OPERATORS.contains(&text) {
        Some(TestOperatorKind::Binary)
    } else {
        None
    }
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "elif" => TokenKind::Elif,
        "fi" => TokenKind::Fi,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "until" => TokenKind::Until,
        "do" => TokenKind::Do,
        "done" => TokenKind::Done,
        "case" => TokenKind::Case,
        "esac" => TokenKind::Esac,
        "function" => TokenKind::Function,
        _ => return None,
    };
    Some(kind)
}

#[derive(Clone, Copy)]
struct Mark {
    offset: usize,
    position: SourcePosition,
}

struct PendingHereDocument {
    delimiter: String,
    strip_tabs: bool,
}

pub(super) struct Scanner<'a> {
    chars: Vec<char>,
    offset: usize,
    position: SourcePosition,
    options: &'a TokenizerOptions,
    tokens: Vec<Token>,
    /// Kinds of the currently open parentheses, innermost last.
    parens: Vec<TokenKind>,
    case_depth: usize,
    /// Set while the next word is a case pattern rather than a command.
    case_pattern: bool,
    test_depth: usize,
    extended_test_depth: usize,
    here_documents: Vec<PendingHereDocument>,
    /// Set after a here-document operator until its delimiter word is seen.
    awaiting_delimiter: Option<bool>,
}

impl<'a> Scanner<'a> {
    pub(super) fn new(input: &str, options: &'a TokenizerOptions) -> Self {
        Self {
            chars: input.chars().collect(),
            offset: 0,
            position: SourcePosition::START,
            options,
            tokens: vec![],
            parens: vec![],
            case_depth: 0,
            case_pattern: false,
            test_depth: 0,
            extended_test_depth: 0,
            here_documents: vec![],
            awaiting_delimiter: None,
        }
    }

    pub(super) fn scan(mut self) -> Vec<Token> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    let mark = self.mark();
                    self.bump();
                    self.emit(TokenKind::Newline, mark);
                    if !self.here_documents.is_empty() {
                        self.scan_here_document_bodies();
                    }
                }
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.scan_fixed(TokenKind::LineContinuation, 2);
                }
                ' ' | '\t' | '\r' => {
                    let mark = self.mark();
                    while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
                        self.bump();
                    }
                    self.emit(TokenKind::Space, mark);
                }
                '#' if !self.adjacent_to_word() => self.scan_comment(),
                '\'' | '"' => self.scan_quoted(),
                '`' => {
                    let mark = self.mark();
                    self.bump();
                    let kind = if self.skip_backquoted() {
                        TokenKind::BacktickSubstitution
                    } else {
                        TokenKind::Unterminated
                    };
                    self.emit(kind, mark);
                }
                '$' => self.scan_dollar(),
                '(' => self.scan_open_paren(),
                ')' => self.scan_close_paren(),
                ';' => self.scan_semicolon(),
                '&' => {
                    if self.lookahead_is("&&") {
                        self.scan_fixed(TokenKind::AndIf, 2);
                    } else if self.lookahead_is("&>>") {
                        self.scan_fixed(TokenKind::Redirect, 3);
                    } else if self.lookahead_is("&>") {
                        self.scan_fixed(TokenKind::Redirect, 2);
                    } else {
                        self.scan_fixed(TokenKind::Ampersand, 1);
                    }
                }
                '|' => {
                    if self.lookahead_is("||") {
                        self.scan_fixed(TokenKind::OrIf, 2);
                    } else if self.lookahead_is("|&") {
                        self.scan_fixed(TokenKind::PipeBoth, 2);
                    } else {
                        self.scan_fixed(TokenKind::Pipe, 1);
                    }
                }
                '<' | '>' => self.scan_redirect(),
                '0'..='9' if !self.adjacent_to_word() && self.fd_prefix_len().is_some() => {
                    self.scan_redirect();
                }
                '=' => {
                    if self.in_test() && self.lookahead_is("==") {
                        self.scan_fixed(TokenKind::TestOperator(TestOperatorKind::Binary), 2);
                    } else if self.extended_test_depth > 0 && self.lookahead_is("=~") {
                        self.scan_fixed(TokenKind::RegexMatch, 2);
                    } else {
                        self.scan_fixed(TokenKind::Equals, 1);
                    }
                }
                '+' if self.peek_at(1) == Some('=') => self.scan_fixed(TokenKind::PlusEquals, 2),
                '!' if self.in_test() && self.peek_at(1) == Some('=') => {
                    self.scan_fixed(TokenKind::TestOperator(TestOperatorKind::Binary), 2);
                }
                '!' if self.bang_allowed() => self.scan_fixed(TokenKind::Bang, 1),
                c if c.is_control() => self.scan_fixed(TokenKind::Unknown, 1),
                _ => self.scan_word(),
            }
        }

        if !self.here_documents.is_empty() {
            tracing::debug!(target: "tokenize", "input ended before here-document bodies");
        }

        self.tokens
    }

    //
    // Cursor primitives.
    //

    fn peek(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.offset + n).copied()
    }

    fn lookahead_is(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += 1;
        self.position = self.position.advance(c);
        Some(c)
    }

    fn bump_to(&mut self, offset: usize) {
        while self.offset < offset && self.bump().is_some() {}
    }

    const fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            position: self.position,
        }
    }

    fn push_token(&mut self, kind: TokenKind, mark: Mark) {
        let text: String = self.chars[mark.offset..self.offset].iter().collect();
        self.tokens.push(Token {
            kind,
            text,
            span: SourceSpan {
                start: mark.position,
                end: self.position,
            },
        });
    }

    fn emit(&mut self, kind: TokenKind, mark: Mark) {
        self.push_token(kind, mark);

        if kind == TokenKind::Newline {
            self.awaiting_delimiter = None;
        } else if kind.is_word_piece() {
            if let Some(strip_tabs) = self.awaiting_delimiter.take() {
                let delimiter = self
                    .tokens
                    .last()
                    .map(|t| unquote_delimiter(&t.text))
                    .unwrap_or_default();
                tracing::debug!(target: "tokenize", "pending here-document delimiter: {delimiter}");
                self.here_documents.push(PendingHereDocument {
                    delimiter,
                    strip_tabs,
                });
            }
        }
    }

    fn scan_fixed(&mut self, kind: TokenKind, len: usize) {
        let mark = self.mark();
        self.bump_to(mark.offset + len);
        self.emit(kind, mark);
    }

    //
    // Context queries.
    //

    fn adjacent_to_word(&self) -> bool {
        self.tokens.last().is_some_and(|t| t.kind.is_word_piece())
    }

    const fn in_test(&self) -> bool {
        self.test_depth + self.extended_test_depth > 0
    }

    fn bang_allowed(&self) -> bool {
        matches!(self.peek_at(1), None | Some(' ' | '\t' | '\n' | '('))
            && (self.in_test() || in_command_position(&self.tokens))
    }

    fn last_significant_kind(&self) -> Option<TokenKind> {
        last_significant(&self.tokens).map(|i| self.tokens[i].kind)
    }

    /// Returns whether the last significant token is a name following `function`.
    fn follows_function_keyword_name(&self) -> bool {
        let Some(name) = last_significant(&self.tokens) else {
            return false;
        };
        self.tokens[name].kind.is_word_piece()
            && last_significant(&self.tokens[..name])
                .is_some_and(|i| self.tokens[i].kind == TokenKind::Function)
    }

    /// If `in` would be a keyword here, returns the keyword that introduced it.
    fn in_keyword_owner(&self) -> Option<TokenKind> {
        let mut index = last_significant(&self.tokens)?;
        if !self.tokens[index].kind.is_word_piece() {
            return None;
        }
        while self.tokens[index].kind.is_word_piece() {
            index = last_significant(&self.tokens[..index])?;
        }
        match self.tokens[index].kind {
            kind @ (TokenKind::For | TokenKind::Case) => Some(kind),
            _ => None,
        }
    }

    fn fd_prefix_len(&self) -> Option<usize> {
        let digits = self.chars[self.offset..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count();
        matches!(self.peek_at(digits), Some('<' | '>')).then_some(digits)
    }

    //
    // Token scanners.
    //

    fn scan_comment(&mut self) {
        let mark = self.mark();
        let kind = if mark.offset == 0 && self.peek_at(1) == Some('!') {
            TokenKind::Shebang
        } else {
            TokenKind::Comment
        };
        while self.peek().is_some_and(|c| c != '\n') {
            self.bump();
        }
        self.emit(kind, mark);
    }

    fn scan_quoted(&mut self) {
        let mark = self.mark();
        let terminated = match self.bump() {
            Some('\'') => self.skip_until('\''),
            _ => self.skip_double_quoted(),
        };
        let kind = if terminated {
            TokenKind::String
        } else {
            TokenKind::Unterminated
        };
        self.emit(kind, mark);
    }

    fn scan_dollar(&mut self) {
        let mark = self.mark();

        let kind = match (self.peek_at(1), self.peek_at(2)) {
            (Some('('), Some('(')) => {
                if let Some(end) = self.arithmetic_end(self.offset + 3) {
                    self.bump_to(end);
                    TokenKind::ArithmeticExpansion
                } else {
                    self.bump_to(mark.offset + 2);
                    self.balanced_or_unterminated('(', ')', TokenKind::CommandSubstitution)
                }
            }
            (Some('('), _) => {
                self.bump_to(mark.offset + 2);
                self.balanced_or_unterminated('(', ')', TokenKind::CommandSubstitution)
            }
            (Some('{'), _) => {
                self.bump_to(mark.offset + 2);
                self.balanced_or_unterminated('{', '}', TokenKind::Expansion)
            }
            (Some('\''), _) => {
                self.bump_to(mark.offset + 2);
                if self.skip_ansi_c_quoted() {
                    TokenKind::String
                } else {
                    TokenKind::Unterminated
                }
            }
            (Some(c), _) if c.is_ascii_alphabetic() || c == '_' => {
                self.bump();
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    self.bump();
                }
                TokenKind::Expansion
            }
            (Some(c), _) if c.is_ascii_digit() || "@*#?$!-".contains(c) => {
                self.bump_to(mark.offset + 2);
                TokenKind::Expansion
            }
            _ => {
                self.bump();
                TokenKind::Word
            }
        };

        self.emit(kind, mark);
    }

    fn balanced_or_unterminated(&mut self, open: char, close: char, kind: TokenKind) -> TokenKind {
        if self.skip_balanced(open, close) {
            kind
        } else {
            TokenKind::Unterminated
        }
    }

    fn scan_open_paren(&mut self) {
        let mark = self.mark();

        if self.peek_at(1) == Some('(')
            && (in_command_position(&self.tokens)
                || self.last_significant_kind() == Some(TokenKind::For))
        {
            if let Some(end) = self.arithmetic_end(self.offset + 2) {
                self.bump_to(end);
                self.emit(TokenKind::ArithmeticCommand, mark);
                return;
            }
        }

        self.bump();
        let kind = if self.case_pattern {
            TokenKind::CasePatternOpen
        } else if self.follows_function_keyword_name() {
            TokenKind::FunctionOpen
        } else {
            TokenKind::SubshellOpen
        };
        self.parens.push(kind);
        self.emit(kind, mark);
    }

    fn scan_close_paren(&mut self) {
        let mark = self.mark();
        self.bump();

        let kind = if self.case_pattern {
            if self.parens.last() == Some(&TokenKind::CasePatternOpen) {
                self.parens.pop();
            }
            self.case_pattern = false;
            TokenKind::CasePatternClose
        } else {
            match self.parens.pop() {
                Some(TokenKind::FunctionOpen) => TokenKind::FunctionClose,
                Some(TokenKind::CasePatternOpen) => TokenKind::CasePatternClose,
                _ => TokenKind::SubshellClose,
            }
        };

        self.emit(kind, mark);
    }

    fn scan_semicolon(&mut self) {
        let (kind, len) = if self.lookahead_is(";;&") {
            (TokenKind::CaseContinue, 3)
        } else if self.lookahead_is(";;") {
            (TokenKind::DoubleSemicolon, 2)
        } else if self.lookahead_is(";&") {
            (TokenKind::CaseFallthrough, 2)
        } else {
            (TokenKind::Semicolon, 1)
        };

        if kind != TokenKind::Semicolon && self.case_depth > 0 {
            self.case_pattern = true;
        }

        self.scan_fixed(kind, len);
    }

    fn scan_redirect(&mut self) {
        let mark = self.mark();
        let fd_len = self.fd_prefix_len().unwrap_or_default();
        self.bump_to(mark.offset + fd_len);

        let kind = match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some('<'), Some('<'), Some('<')) => {
                self.bump_to(self.offset + 3);
                TokenKind::Redirect
            }
            (Some('<'), Some('<'), third) => {
                let strip_tabs = third == Some('-');
                self.bump_to(self.offset + if strip_tabs { 3 } else { 2 });
                self.awaiting_delimiter = Some(strip_tabs);
                TokenKind::HeredocOperator
            }
            (Some('<' | '>'), Some('('), _) if fd_len == 0 => {
                self.bump_to(self.offset + 2);
                self.balanced_or_unterminated('(', ')', TokenKind::ProcessSubstitution)
            }
            (Some('<' | '>'), Some('&'), _) => {
                self.bump_to(self.offset + 2);
                if self.peek() == Some('-') {
                    self.bump();
                } else {
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                    }
                }
                TokenKind::Redirect
            }
            (Some('>'), Some('>' | '|'), _) | (Some('<'), Some('>'), _) => {
                self.bump_to(self.offset + 2);
                TokenKind::Redirect
            }
            _ => {
                self.bump();
                TokenKind::Redirect
            }
        };

        self.emit(kind, mark);
    }

    fn scan_word(&mut self) {
        let mark = self.mark();

        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' | ';' | '&' | '|' | '<' | '>' | '(' | ')' | '"' | '\''
                | '`' | '$' | '=' => break,
                '+' if self.peek_at(1) == Some('=') => break,
                '\\' if self.peek_at(1) == Some('\n') => break,
                '\\' => {
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }

        if self.offset == mark.offset {
            self.bump();
        }

        let text: String = self.chars[mark.offset..self.offset].iter().collect();
        let kind = self.classify_word(&text);
        self.emit(kind, mark);
    }

    fn classify_word(&mut self, text: &str) -> TokenKind {
        if self.case_pattern {
            if text == "esac" && self.options.keyword_classification {
                self.case_pattern = false;
                self.case_depth = self.case_depth.saturating_sub(1);
                return TokenKind::Esac;
            }
            return TokenKind::Word;
        }

        let command_position = in_command_position(&self.tokens);

        if text == "{"
            && (command_position
                || matches!(
                    self.last_significant_kind(),
                    Some(TokenKind::SubshellClose | TokenKind::FunctionClose)
                )
                || self.follows_function_keyword_name())
        {
            return TokenKind::BraceOpen;
        }

        if command_position {
            match text {
                "}" => return TokenKind::BraceClose,
                "[" => {
                    self.test_depth += 1;
                    return TokenKind::TestOpen;
                }
                "[[" => {
                    self.extended_test_depth += 1;
                    return TokenKind::ExtendedTestOpen;
                }
                _ => (),
            }

            if self.options.keyword_classification {
                if let Some(kind) = keyword_kind(text) {
                    match kind {
                        TokenKind::Case => self.case_depth += 1,
                        TokenKind::Esac => self.case_depth = self.case_depth.saturating_sub(1),
                        _ => (),
                    }
                    return kind;
                }
            }
        }

        if text == "in" && self.options.keyword_classification {
            if let Some(owner) = self.in_keyword_owner() {
                if owner == TokenKind::Case {
                    self.case_pattern = true;
                }
                return TokenKind::In;
            }
        }

        if text == "]" && self.test_depth > 0 {
            self.test_depth -= 1;
            return TokenKind::TestClose;
        }
        if text == "]]" && self.extended_test_depth > 0 {
            self.extended_test_depth -= 1;
            return TokenKind::ExtendedTestClose;
        }

        if text.len() > 1 && text.starts_with('-') {
            if self.in_test() {
                return test_operator_kind(text).map_or(TokenKind::Word, TokenKind::TestOperator);
            }
            return TokenKind::Flag;
        }

        if command_position && self.options.command_vocabulary.iter().any(|v| v == text) {
            return TokenKind::CommandName;
        }

        TokenKind::Word
    }

    //
    // Here-document bodies.
    //

    /// Consumes the bodies of all pending here-documents as raw lines. Each
    /// terminator line is emitted as a word followed by its line feed.
    fn scan_here_document_bodies(&mut self) {
        let pending = std::mem::take(&mut self.here_documents);

        for doc in pending {
            loop {
                if self.peek().is_none() {
                    tracing::debug!(
                        target: "tokenize",
                        "unterminated here-document: {}",
                        doc.delimiter
                    );
                    return;
                }

                let mark = self.mark();
                let line_end = self.chars[self.offset..]
                    .iter()
                    .position(|c| *c == '\n')
                    .map_or(self.chars.len(), |i| self.offset + i);
                let line: String = self.chars[self.offset..line_end].iter().collect();
                let candidate = if doc.strip_tabs {
                    line.trim_start_matches('\t')
                } else {
                    line.as_str()
                };

                self.bump_to(line_end);

                if candidate == doc.delimiter {
                    self.push_token(TokenKind::Word, mark);
                    if self.peek() == Some('\n') {
                        let newline = self.mark();
                        self.bump();
                        self.push_token(TokenKind::Newline, newline);
                    }
                    break;
                }

                self.bump();
                self.push_token(TokenKind::HeredocLine, mark);
            }
        }
    }

    //
    // Skipping helpers; each assumes the opening character was consumed.
    //

    /// Returns the offset just past the `))` closing an arithmetic expression whose
    /// body starts at `index`, or `None` if the parentheses do not close that way.
    fn arithmetic_end(&self, mut index: usize) -> Option<usize> {
        let mut depth = 0usize;
        while let Some(&c) = self.chars.get(index) {
            match c {
                '(' => depth += 1,
                ')' if depth > 0 => depth -= 1,
                ')' => {
                    return (self.chars.get(index + 1) == Some(&')')).then_some(index + 2);
                }
                _ => (),
            }
            index += 1;
        }
        None
    }

    fn skip_until(&mut self, terminator: char) -> bool {
        while let Some(c) = self.bump() {
            if c == terminator {
                return true;
            }
        }
        false
    }

    fn skip_ansi_c_quoted(&mut self) -> bool {
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '\'' => return true,
                _ => (),
            }
        }
        false
    }

    fn skip_backquoted(&mut self) -> bool {
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '`' => return true,
                _ => (),
            }
        }
        false
    }

    fn skip_double_quoted(&mut self) -> bool {
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '"' => return true,
                '`' => {
                    if !self.skip_backquoted() {
                        return false;
                    }
                }
                '$' if self.peek() == Some('(') => {
                    self.bump();
                    if !self.skip_balanced('(', ')') {
                        return false;
                    }
                }
                '$' if self.peek() == Some('{') => {
                    self.bump();
                    if !self.skip_balanced('{', '}') {
                        return false;
                    }
                }
                _ => (),
            }
        }
        false
    }

    fn skip_balanced(&mut self, open: char, close: char) -> bool {
        let mut depth = 1usize;
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '\'' => {
                    if !self.skip_until('\'') {
                        return false;
                    }
                }
                '"' => {
                    if !self.skip_double_quoted() {
                        return false;
                    }
                }
                '`' => {
                    if !self.skip_backquoted() {
                        return false;
                    }
                }
                c if c == open => depth += 1,
                c if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                _ => (),
            }
        }
        false
    }
}
