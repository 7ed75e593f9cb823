//! Lossless tokenization of shell script text.
//!
//! Tokenization runs as a fixed sequence of passes over the input:
//!
//! 1. [`scan`] walks characters and emits classified tokens, switching to raw-line
//!    mode for here-document bodies.
//! 2. [`heredoc`] collapses raw body lines into a single content token per
//!    here-document and tags its delimiter and terminator.
//! 3. [`regex`] coalesces the right-hand side of `=~` into one pattern token.
//! 4. [`fixup`] reclassifies function names and the parentheses that follow them.
//!
//! Every pass preserves the concatenation of token texts, which always equals the input.

mod fixup;
mod heredoc;
mod regex;
mod scan;

use crate::SourceSpan;

/// Classification of a unary, binary, or boolean test operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestOperatorKind {
    /// A file or string predicate taking one operand (e.g. `-f`, `-z`).
    Unary,
    /// A comparison taking two operands (e.g. `-eq`, `==`, `!=`).
    Binary,
    /// A logical connective usable inside `[ ]` (`-a`, `-o`).
    Boolean,
}

/// The kind of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// A run of spaces, tabs, and carriage returns.
    Space,
    /// A single line feed.
    Newline,
    /// A backslash immediately followed by a line feed.
    LineContinuation,
    /// A `#` comment, up to but not including the end of the line.
    Comment,
    /// A `#!` line at the very start of the input.
    Shebang,

    /// An unclassified word.
    Word,
    /// A word in command position found in the command vocabulary.
    CommandName,
    /// A dash-prefixed word outside of a test expression.
    Flag,
    /// An operator inside a test expression.
    TestOperator(TestOperatorKind),
    /// A complete single-quoted, double-quoted, or ANSI-C quoted string, quotes included.
    String,
    /// A quote, substitution, or expansion that reached the end of input unterminated.
    Unterminated,
    /// A parameter expansion: `$NAME`, `${...}`, or a special parameter like `$@`.
    Expansion,
    /// A `$( ... )` command substitution.
    CommandSubstitution,
    /// A backquoted command substitution.
    BacktickSubstitution,
    /// A `$(( ... ))` arithmetic expansion.
    ArithmeticExpansion,
    /// A `<( ... )` or `>( ... )` process substitution.
    ProcessSubstitution,
    /// A `(( ... ))` arithmetic command.
    ArithmeticCommand,
    /// A name being defined as a function.
    FunctionName,

    /// `;`
    Semicolon,
    /// `;;`
    DoubleSemicolon,
    /// `;&`
    CaseFallthrough,
    /// `;;&`
    CaseContinue,
    /// `&`
    Ampersand,
    /// `|`
    Pipe,
    /// `|&`
    PipeBoth,
    /// `&&`
    AndIf,
    /// `||`
    OrIf,
    /// `!` as a pipeline or test negation.
    Bang,
    /// `=`
    Equals,
    /// `+=`
    PlusEquals,
    /// `=~`
    RegexMatch,
    /// A redirection operator, including any file descriptor prefix (e.g. `2>&1`, `>>`, `<<<`).
    Redirect,
    /// `<<` or `<<-`
    HeredocOperator,

    /// `(` opening a subshell or array literal.
    SubshellOpen,
    /// `)` closing a subshell or array literal.
    SubshellClose,
    /// `(` following a function name.
    FunctionOpen,
    /// `)` following a function name.
    FunctionClose,
    /// `(` before a case pattern.
    CasePatternOpen,
    /// `)` after a case pattern.
    CasePatternClose,
    /// `{` in command position.
    BraceOpen,
    /// `}` in command position.
    BraceClose,
    /// `[` in command position.
    TestOpen,
    /// `]` closing a `[` test.
    TestClose,
    /// `[[` in command position.
    ExtendedTestOpen,
    /// `]]` closing a `[[` test.
    ExtendedTestClose,

    /// `if`
    If,
    /// `then`
    Then,
    /// `else`
    Else,
    /// `elif`
    Elif,
    /// `fi`
    Fi,
    /// `for`
    For,
    /// `in`
    In,
    /// `while`
    While,
    /// `until`
    Until,
    /// `do`
    Do,
    /// `done`
    Done,
    /// `case`
    Case,
    /// `esac`
    Esac,
    /// `function`
    Function,

    /// One raw line of a here-document body, including its line feed.
    HeredocLine,
    /// The word following a here-document operator.
    HeredocDelimiter,
    /// The complete body of a here-document, excluding its terminator line.
    HeredocContent,
    /// The terminator line of a here-document, excluding its line feed.
    HeredocEnd,
    /// The coalesced right-hand side of `=~`.
    RegexPattern,

    /// A control character with no meaning to the shell.
    Unknown,
}

impl TokenKind {
    /// Returns whether tokens of this kind may be glued together into a single word.
    pub const fn is_word_piece(self) -> bool {
        matches!(
            self,
            Self::Word
                | Self::CommandName
                | Self::Flag
                | Self::TestOperator(_)
                | Self::String
                | Self::Unterminated
                | Self::Expansion
                | Self::CommandSubstitution
                | Self::BacktickSubstitution
                | Self::ArithmeticExpansion
                | Self::ProcessSubstitution
                | Self::Equals
                | Self::PlusEquals
                | Self::Unknown
        )
    }

    /// Returns whether this kind is a reserved word.
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::If
                | Self::Then
                | Self::Else
                | Self::Elif
                | Self::Fi
                | Self::For
                | Self::In
                | Self::While
                | Self::Until
                | Self::Do
                | Self::Done
                | Self::Case
                | Self::Esac
                | Self::Function
        )
    }

    /// Returns whether this kind is horizontal whitespace.
    pub const fn is_inline_space(self) -> bool {
        matches!(self, Self::Space | Self::LineContinuation)
    }

    /// Returns whether a command may start immediately after a token of this kind.
    pub(crate) const fn starts_command(self) -> bool {
        matches!(
            self,
            Self::Newline
                | Self::Semicolon
                | Self::DoubleSemicolon
                | Self::CaseFallthrough
                | Self::CaseContinue
                | Self::Ampersand
                | Self::Pipe
                | Self::PipeBoth
                | Self::AndIf
                | Self::OrIf
                | Self::Bang
                | Self::SubshellOpen
                | Self::BraceOpen
                | Self::CasePatternClose
                | Self::If
                | Self::Then
                | Self::Else
                | Self::Elif
                | Self::Do
                | Self::While
                | Self::Until
                | Self::Comment
                | Self::Shebang
                | Self::HeredocEnd
        )
    }
}

/// A classified slice of the input.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// The exact input text covered by the token.
    pub text: String,
    /// Where the token sits in the input.
    pub span: SourceSpan,
}

impl Token {
    /// Returns the raw text of the token.
    pub fn to_str(&self) -> &str {
        self.text.as_str()
    }
}

#[cfg(feature = "diagnostics")]
impl From<&Token> for miette::SourceSpan {
    fn from(token: &Token) -> Self {
        (&token.span).into()
    }
}

/// Options controlling token classification.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TokenizerOptions {
    /// Whether reserved words in command position are classified as keywords.
    pub keyword_classification: bool,
    /// Words that are tagged as [`TokenKind::CommandName`] in command position.
    pub command_vocabulary: Vec<String>,
}

/// Names tagged as [`TokenKind::CommandName`] when no vocabulary is configured.
pub const DEFAULT_COMMAND_VOCABULARY: &[&str] = &[
    "awk", "cat", "cd", "chmod", "cp", "curl", "cut", "docker", "echo", "eval", "exec", "exit",
    "export", "false", "find", "git", "grep", "head", "local", "ls", "make", "mkdir", "mv",
    "printf", "read", "readonly", "return", "rm", "sed", "set", "shift", "sort", "source",
    "sudo", "tail", "tar", "test", "touch", "tr", "trap", "true", "uniq", "unset", "wc",
    "wget", "xargs",
];

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            keyword_classification: true,
            command_vocabulary: DEFAULT_COMMAND_VOCABULARY
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

/// Break the given shell script into tokens.
///
/// # Arguments
///
/// * `input` - The shell script to tokenize.
pub fn tokenize_str(input: &str) -> Vec<Token> {
    tokenize_str_with_options(input, &TokenizerOptions::default())
}

/// Break the given shell script into tokens, with explicit options.
///
/// Results are memoized on the input text and options.
///
/// # Arguments
///
/// * `input` - The shell script to tokenize.
/// * `options` - Options controlling classification.
pub fn tokenize_str_with_options(input: &str, options: &TokenizerOptions) -> Vec<Token> {
    cached_tokenize(input.to_owned(), options.to_owned())
}

#[cached::proc_macro::cached(name = "TOKENIZE_CACHE", size = 64)]
fn cached_tokenize(input: String, options: TokenizerOptions) -> Vec<Token> {
    uncached_tokenize_str(input.as_str(), &options)
}

/// Break the given shell script into tokens without consulting the cache.
///
/// # Arguments
///
/// * `input` - The shell script to tokenize.
/// * `options` - Options controlling classification.
pub fn uncached_tokenize_str(input: &str, options: &TokenizerOptions) -> Vec<Token> {
    let tokens = scan::Scanner::new(input, options).scan();
    let tokens = heredoc::resolve_here_documents(tokens);
    let tokens = regex::coalesce_regex_patterns(tokens);
    let tokens = fixup::classify_function_names(tokens);

    tracing::debug!(target: "tokenize", "produced {} tokens", tokens.len());

    tokens
}

/// Returns the index of the last token that is not inline whitespace.
pub(crate) fn last_significant(tokens: &[Token]) -> Option<usize> {
    tokens.iter().rposition(|t| !t.kind.is_inline_space())
}

/// Returns whether a token appended to `tokens` would be in command position.
pub(crate) fn in_command_position(tokens: &[Token]) -> bool {
    last_significant(tokens).is_none_or(|i| tokens[i].kind.starts_command())
}

/// Strips quoting from a here-document delimiter word.
pub(crate) fn unquote_delimiter(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => (),
            '\\' => {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<(TokenKind, String)> {
        uncached_tokenize_str(input, &TokenizerOptions::default())
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn significant(input: &str) -> Vec<(TokenKind, String)> {
        kinds(input)
            .into_iter()
            .filter(|(k, _)| !k.is_inline_space())
            .collect()
    }

    fn pair(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_owned())
    }

    #[test]
    fn token_texts_concatenate_to_input() {
        let inputs = [
            "#!/bin/bash\n# c\necho \"a $b\" 'c' $(d) `e` ${f:-g} $((1 + 2))\n",
            "cat <<-EOF | grep x\n\tone\n\tEOF\nnext\n",
            "if [[ $x =~ ^([[:alpha:]]+)$ ]]; then :; fi",
            "case $x in (a|b) y;; *) z;& esac",
            "f() { :; }\nfunction g { :; }\narr=(1 2 3)\nx+=y\n",
            "echo \"unterminated",
            "diff <(ls a) >(cat) 2>&1 &>/dev/null <<<\"s\"",
        ];
        for input in inputs {
            let tokens = tokenize_str(input);
            let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
            assert_eq!(joined, input);
        }
    }

    #[test]
    fn spans_are_contiguous() {
        let input = "echo é\nls -la # trailing\n";
        let tokens = tokenize_str(input);
        let mut expected_index = 0;
        for token in &tokens {
            assert_eq!(token.span.start.index, expected_index);
            expected_index = token.span.end.index;
        }
        assert_eq!(expected_index, input.len());
    }

    #[test]
    fn simple_command() {
        assert_eq!(
            kinds("echo hi"),
            vec![
                pair(TokenKind::CommandName, "echo"),
                pair(TokenKind::Space, " "),
                pair(TokenKind::Word, "hi"),
            ]
        );
    }

    #[test]
    fn keywords_only_in_command_position() {
        assert_eq!(
            significant("if true; then echo if; fi"),
            vec![
                pair(TokenKind::If, "if"),
                pair(TokenKind::CommandName, "true"),
                pair(TokenKind::Semicolon, ";"),
                pair(TokenKind::Then, "then"),
                pair(TokenKind::CommandName, "echo"),
                pair(TokenKind::Word, "if"),
                pair(TokenKind::Semicolon, ";"),
                pair(TokenKind::Fi, "fi"),
            ]
        );
    }

    #[test]
    fn keyword_classification_can_be_disabled() {
        let options = TokenizerOptions {
            keyword_classification: false,
            ..TokenizerOptions::default()
        };
        let tokens = uncached_tokenize_str("if", &options);
        assert_eq!(tokens[0].kind, TokenKind::Word);
    }

    #[test]
    fn in_after_for_and_case() {
        let for_kinds = significant("for x in a b; do :; done");
        assert_eq!(for_kinds[2], pair(TokenKind::In, "in"));

        let case_kinds = significant("case \"$x\" in a) ;; esac");
        assert_eq!(case_kinds[2], pair(TokenKind::In, "in"));
    }

    #[test]
    fn quoted_strings_and_expansions() {
        assert_eq!(
            significant(r#"echo "a \" b" 'c' $'d\'e' $HOME ${x:-"}"} $1 $@"#),
            vec![
                pair(TokenKind::CommandName, "echo"),
                pair(TokenKind::String, r#""a \" b""#),
                pair(TokenKind::String, "'c'"),
                pair(TokenKind::String, r"$'d\'e'"),
                pair(TokenKind::Expansion, "$HOME"),
                pair(TokenKind::Expansion, r#"${x:-"}"}"#),
                pair(TokenKind::Expansion, "$1"),
                pair(TokenKind::Expansion, "$@"),
            ]
        );
    }

    #[test]
    fn substitutions() {
        assert_eq!(
            significant("echo $(ls \")\") `pwd` $((2 * (3 + 4))) $( (cd x) )"),
            vec![
                pair(TokenKind::CommandName, "echo"),
                pair(TokenKind::CommandSubstitution, "$(ls \")\")"),
                pair(TokenKind::BacktickSubstitution, "`pwd`"),
                pair(TokenKind::ArithmeticExpansion, "$((2 * (3 + 4)))"),
                pair(TokenKind::CommandSubstitution, "$( (cd x) )"),
            ]
        );
    }

    #[test]
    fn unterminated_quote_is_tagged() {
        let tokens = tokenize_str("echo 'abc");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Unterminated));
    }

    #[test]
    fn operators_take_longest_match() {
        assert_eq!(
            significant("a && b || c | d |& e ; f & g 2>&1 >>out <in &>all"),
            vec![
                pair(TokenKind::Word, "a"),
                pair(TokenKind::AndIf, "&&"),
                pair(TokenKind::Word, "b"),
                pair(TokenKind::OrIf, "||"),
                pair(TokenKind::Word, "c"),
                pair(TokenKind::Pipe, "|"),
                pair(TokenKind::Word, "d"),
                pair(TokenKind::PipeBoth, "|&"),
                pair(TokenKind::Word, "e"),
                pair(TokenKind::Semicolon, ";"),
                pair(TokenKind::Word, "f"),
                pair(TokenKind::Ampersand, "&"),
                pair(TokenKind::Word, "g"),
                pair(TokenKind::Redirect, "2>&1"),
                pair(TokenKind::Redirect, ">>"),
                pair(TokenKind::Word, "out"),
                pair(TokenKind::Redirect, "<"),
                pair(TokenKind::Word, "in"),
                pair(TokenKind::Redirect, "&>"),
                pair(TokenKind::Word, "all"),
            ]
        );
    }

    #[test]
    fn test_brackets_and_operators() {
        assert_eq!(
            significant("[ -f x -a -n \"$y\" ]"),
            vec![
                pair(TokenKind::TestOpen, "["),
                pair(TokenKind::TestOperator(TestOperatorKind::Unary), "-f"),
                pair(TokenKind::Word, "x"),
                pair(TokenKind::TestOperator(TestOperatorKind::Boolean), "-a"),
                pair(TokenKind::TestOperator(TestOperatorKind::Unary), "-n"),
                pair(TokenKind::String, "\"$y\""),
                pair(TokenKind::TestClose, "]"),
            ]
        );
        assert_eq!(
            significant("ls -la"),
            vec![
                pair(TokenKind::CommandName, "ls"),
                pair(TokenKind::Flag, "-la"),
            ]
        );
    }

    #[test]
    fn assignment_pieces() {
        assert_eq!(
            kinds("x=1 y+=(a)"),
            vec![
                pair(TokenKind::Word, "x"),
                pair(TokenKind::Equals, "="),
                pair(TokenKind::Word, "1"),
                pair(TokenKind::Space, " "),
                pair(TokenKind::Word, "y"),
                pair(TokenKind::PlusEquals, "+="),
                pair(TokenKind::SubshellOpen, "("),
                pair(TokenKind::Word, "a"),
                pair(TokenKind::SubshellClose, ")"),
            ]
        );
    }

    #[test]
    fn shebang_only_at_start() {
        assert_eq!(kinds("#!/bin/sh\n")[0].0, TokenKind::Shebang);
        assert_eq!(kinds(" #!/bin/sh")[1].0, TokenKind::Comment);
    }

    #[test]
    fn arithmetic_command_and_for() {
        assert_eq!(
            significant("(( i++ )); for ((i=0; i<3; i++)); do :; done")[0],
            pair(TokenKind::ArithmeticCommand, "(( i++ ))")
        );
        assert_eq!(
            significant("for ((i=0; i<3; i++)); do :; done")[1],
            pair(TokenKind::ArithmeticCommand, "((i=0; i<3; i++))")
        );
    }

    #[test]
    fn nested_subshell_is_not_arithmetic() {
        assert_eq!(
            significant("((cd a) && (cd b))")[0],
            pair(TokenKind::SubshellOpen, "(")
        );
    }

    #[test]
    fn line_continuation() {
        assert_eq!(
            kinds("a \\\n b"),
            vec![
                pair(TokenKind::Word, "a"),
                pair(TokenKind::Space, " "),
                pair(TokenKind::LineContinuation, "\\\n"),
                pair(TokenKind::Space, " "),
                pair(TokenKind::Word, "b"),
            ]
        );
    }

    #[test]
    fn unquote_delimiter_strips_quoting() {
        assert_eq!(unquote_delimiter("'EOF'"), "EOF");
        assert_eq!(unquote_delimiter("\"END\""), "END");
        assert_eq!(unquote_delimiter("\\EOF"), "EOF");
    }
}
