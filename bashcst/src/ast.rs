//! Defines the concrete syntax tree for shell programs.
//!
//! Every byte of the source is owned by some node, including whitespace, comments,
//! and separators, so that rendering a parsed [`Program`] reproduces its input
//! exactly. Fields that hold layout between keywords use [`Gap`]; a gap with no
//! recorded trivia renders as a single space, which is what programmatically
//! built trees usually want.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::{ParseError, RenderOptions, SourceSpan, render};

/// Represents a complete shell program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    /// The top-level statements, including layout.
    pub body: Vec<Statement>,
    /// Comments collected separately from the body. The parser leaves this empty;
    /// comments it reads stay in `body` where they occur.
    pub comments: Vec<Comment>,
    /// The extent of the source that was parsed.
    pub span: Option<SourceSpan>,
}

impl Program {
    /// Creates a program from a list of statements.
    pub const fn new(body: Vec<Statement>) -> Self {
        Self {
            body,
            comments: Vec::new(),
            span: None,
        }
    }

    /// Returns the statements that are not layout.
    pub fn commands(&self) -> impl Iterator<Item = &Statement> {
        self.body.iter().filter(|s| !s.is_layout())
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = render::generate(self, &RenderOptions::default()).map_err(|_| std::fmt::Error)?;
        f.write_str(&text)
    }
}

/// A single element of a statement list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// A simple command.
    Command(Command),
    /// Commands joined by `|`, `|&`, `&&`, or `||`.
    Pipeline(Pipeline),
    /// A variable assignment that is not a command prefix.
    Assignment(VariableAssignment),
    /// `if ... then ... fi`
    If(IfStatement),
    /// `for ... do ... done`
    For(ForStatement),
    /// `while ... do ... done`
    While(LoopStatement),
    /// `until ... do ... done`
    Until(LoopStatement),
    /// `case ... in ... esac`
    Case(CaseStatement),
    /// A function definition.
    Function(FunctionDefinition),
    /// `{ ...; }`
    BraceGroup(BraceGroup),
    /// `( ... )`
    Subshell(Subshell),
    /// `[ ... ]` or `[[ ... ]]`
    Test(TestExpression),
    /// `(( ... ))`
    Arithmetic(ArithmeticCommand),
    /// `! statement`
    Negated(Negation),
    /// A compound statement followed by redirections.
    Redirected(RedirectedStatement),
    /// A node produced by an extension.
    Custom(CustomNode),
    /// A `#` comment.
    Comment(Comment),
    /// The `#!` line at the start of a script.
    Shebang(String),
    /// A run of spaces and tabs.
    Space(String),
    /// A line break.
    Newline,
    /// A backslash-newline.
    LineContinuation,
    /// `;`
    Semicolon,
    /// `;;`
    DoubleSemicolon,
    /// `;&`
    CaseFallthrough,
    /// `;;&`
    CaseContinue,
    /// `&`
    Background,
}

impl Statement {
    /// Returns whether this statement only contributes layout or punctuation.
    pub const fn is_layout(&self) -> bool {
        matches!(
            self,
            Self::Comment(_)
                | Self::Shebang(_)
                | Self::Space(_)
                | Self::Newline
                | Self::LineContinuation
                | Self::Semicolon
                | Self::DoubleSemicolon
                | Self::CaseFallthrough
                | Self::CaseContinue
                | Self::Background
        )
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = render::render_statement(self, &RenderOptions::default())
            .map_err(|_| std::fmt::Error)?;
        f.write_str(&text)
    }
}

/// Layout trivia recorded between syntactic elements.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trivia {
    /// Spaces and tabs.
    Space(String),
    /// A line break.
    Newline,
    /// A backslash-newline.
    LineContinuation,
    /// A comment.
    Comment(Comment),
}

/// The layout between two elements of a construct.
///
/// `None` means no layout was recorded and renders as a single space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gap(pub Option<Vec<Trivia>>);

impl Gap {
    /// A gap rendering exactly the given trivia.
    pub const fn verbatim(trivia: Vec<Trivia>) -> Self {
        Self(Some(trivia))
    }

    /// A gap rendering as nothing at all.
    pub const fn none() -> Self {
        Self(Some(Vec::new()))
    }
}

/// A `#` comment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comment {
    /// The comment text, including the leading `#`.
    pub text: String,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}

/// Quoting style of a [`Word`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quote {
    /// `'...'`
    Single,
    /// `"..."`
    Double,
    /// `$'...'`
    AnsiC,
}

/// A literal or quoted word.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// The raw text between the quotes, or the whole word when unquoted.
    pub text: String,
    /// How the word was quoted.
    pub quote: Option<Quote>,
}

impl Word {
    /// Creates an unquoted word.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quote: None,
        }
    }

    /// Creates a quoted word.
    pub fn with_quote(text: impl Into<String>, quote: Quote) -> Self {
        Self {
            text: text.into(),
            quote: Some(quote),
        }
    }

    /// Returns whether the word was written in quotes.
    pub const fn quoted(&self) -> bool {
        self.quote.is_some()
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.quote {
            None => f.write_str(&self.text),
            Some(Quote::Single) => write!(f, "'{}'", self.text),
            Some(Quote::Double) => write!(f, "\"{}\"", self.text),
            Some(Quote::AnsiC) => write!(f, "$'{}'", self.text),
        }
    }
}

/// A parameter expansion such as `$HOME`, `${x:-y}`, or `$@`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableExpansion {
    /// Everything after the `$`, braces included.
    pub name: String,
}

impl VariableExpansion {
    /// Returns the parameter name with any braces and operators removed.
    pub fn parameter(&self) -> &str {
        let inner = self
            .name
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(&self.name);
        let inner = inner.strip_prefix('#').filter(|s| !s.is_empty()).unwrap_or(inner);
        let in_name = |i: usize, c: char| {
            c.is_ascii_alphanumeric() || c == '_' || (i == 0 && "@*#?$!-".contains(c))
        };
        let end = inner
            .char_indices()
            .find(|&(i, c)| !in_name(i, c))
            .map_or(inner.len(), |(i, _)| i);
        &inner[..end]
    }
}

/// Delimiters of a [`CommandSubstitution`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubstitutionStyle {
    /// `$( ... )`
    Dollar,
    /// `` ` ... ` ``
    Backtick,
}

/// A command substitution; its body is kept as raw text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandSubstitution {
    /// The text between the delimiters.
    pub command: String,
    /// The delimiters used.
    pub style: SubstitutionStyle,
}

impl CommandSubstitution {
    /// Parses the substituted command text as a program of its own.
    pub fn parse_body(&self) -> Result<Program, ParseError> {
        crate::parse(&self.command)
    }
}

/// An arithmetic expansion `$(( ... ))`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArithmeticExpansion {
    /// The text between `$((` and `))`.
    pub expression: String,
}

/// Direction of a [`ProcessSubstitution`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessDirection {
    /// `<( ... )`
    Read,
    /// `>( ... )`
    Write,
}

/// A process substitution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessSubstitution {
    /// Whether the process is read from or written to.
    pub direction: ProcessDirection,
    /// The text between the parentheses.
    pub command: String,
}

/// An argument to a command, or a piece of one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Argument {
    /// A literal or quoted word.
    Word(Word),
    /// A parameter expansion.
    Variable(VariableExpansion),
    /// A command substitution.
    CommandSubstitution(CommandSubstitution),
    /// An arithmetic expansion.
    Arithmetic(ArithmeticExpansion),
    /// A process substitution.
    ProcessSubstitution(ProcessSubstitution),
    /// A parenthesized array literal, elements and layout included.
    Array(Vec<Argument>),
    /// Adjacent pieces with no whitespace between them.
    Concatenation(Vec<Argument>),
    /// Spaces and tabs.
    Space(String),
    /// A backslash-newline.
    LineContinuation,
    /// A line break; only found inside array literals.
    Newline,
    /// A comment; only found inside array literals.
    Comment(Comment),
}

impl Argument {
    /// Creates an unquoted word argument.
    pub fn word(text: impl Into<String>) -> Self {
        Self::Word(Word::new(text))
    }

    /// Returns whether the argument is layout rather than content.
    pub const fn is_layout(&self) -> bool {
        matches!(
            self,
            Self::Space(_) | Self::LineContinuation | Self::Newline | Self::Comment(_)
        )
    }
}

impl Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&render::render_argument(self))
    }
}

/// A simple command: optional prefix assignments, a name, arguments, and
/// redirections interleaved with them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    /// Assignments and spaces preceding the name.
    pub prefix: Vec<Statement>,
    /// The command name.
    pub name: Argument,
    /// Arguments and the spaces between them.
    pub arguments: Vec<Argument>,
    /// Redirections, each anchored at a position among the name and arguments.
    pub redirects: Vec<Redirect>,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}

impl Command {
    /// Creates a command from words, separated by single spaces.
    pub fn from_words<S: AsRef<str>>(name: &str, arguments: &[S]) -> Self {
        let mut args = vec![];
        for argument in arguments {
            args.push(Argument::Space(" ".to_owned()));
            args.push(Argument::word(argument.as_ref()));
        }
        Self {
            prefix: vec![],
            name: Argument::word(name),
            arguments: args,
            redirects: vec![],
            span: None,
        }
    }

    /// Returns the arguments that are not whitespace.
    pub fn words(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| !a.is_layout())
    }

    /// Returns the first here-document attached to this command, if any.
    pub fn here_document(&self) -> Option<&HereDocument> {
        self.redirects.iter().find_map(|r| match &r.target {
            RedirectTarget::HereDocument(doc) => Some(doc),
            _ => None,
        })
    }
}

/// A redirection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Redirect {
    /// The operator as written, including any descriptor prefix (e.g. `2>&1`, `>>`, `<<-`).
    pub operator: String,
    /// Layout between the operator and its target.
    pub gap: Vec<Trivia>,
    /// What is redirected to or from.
    pub target: RedirectTarget,
    /// Number of owning elements rendered before this redirection. For a
    /// command these are its prefix statements, then its name, then its
    /// arguments; for a redirected statement, its suffix.
    pub position: usize,
}

/// The target of a [`Redirect`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RedirectTarget {
    /// The operator is complete on its own (e.g. `2>&1`, `>&-`).
    None,
    /// A file name or descriptor word.
    Argument(Argument),
    /// A here-document body.
    HereDocument(HereDocument),
}

/// A here-document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HereDocument {
    /// Whether leading tabs are stripped (`<<-`).
    pub strip_tabs: bool,
    /// The delimiter as written after the operator.
    pub delimiter: Word,
    /// The body, every line including its line feed.
    pub content: String,
    /// The terminator line as written.
    pub closing: String,
    /// Names of variables referenced by an expanding body.
    pub variables: Vec<String>,
    /// Location of the body in the source.
    pub span: Option<SourceSpan>,
}

impl HereDocument {
    /// Returns whether the body undergoes expansion, i.e. the delimiter is unquoted.
    pub fn expands(&self) -> bool {
        !self.delimiter.quoted() && !self.delimiter.text.contains('\\')
    }
}

/// A compound statement with trailing redirections.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RedirectedStatement {
    /// The redirected statement.
    pub statement: Box<Statement>,
    /// Layout following the statement.
    pub suffix: Vec<Argument>,
    /// Redirections, positioned among `suffix`.
    pub redirects: Vec<Redirect>,
}

/// Operator joining two elements of a [`Pipeline`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PipelineOperator {
    /// `|`
    Pipe,
    /// `|&`
    PipeBoth,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl PipelineOperator {
    /// Returns the operator's text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pipe => "|",
            Self::PipeBoth => "|&",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// The junction between two pipeline elements.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineBoundary {
    /// Layout before the operator.
    pub before: Gap,
    /// The operator.
    pub operator: PipelineOperator,
    /// Layout after the operator.
    pub after: Gap,
}

/// Statements joined by pipe and boolean operators.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pipeline {
    /// The joined statements.
    pub commands: Vec<Statement>,
    /// One junction per adjacent pair of `commands`.
    pub boundaries: Vec<PipelineBoundary>,
}

impl Pipeline {
    /// Returns the operators in order.
    pub fn operators(&self) -> impl Iterator<Item = PipelineOperator> + '_ {
        self.boundaries.iter().map(|b| b.operator)
    }
}

/// The value of a [`VariableAssignment`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableAssignment {
    /// The variable name, including any subscript.
    pub name: String,
    /// Whether the operator is `+=`.
    pub append: bool,
    /// The assigned value; `None` for `NAME=`.
    pub value: Option<Argument>,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}

/// `if` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfStatement {
    /// Layout after `if`.
    pub gap: Gap,
    /// The condition, including the separator before `then`.
    pub condition: Vec<Statement>,
    /// Statements between `then` and the next clause.
    pub then_body: Vec<Statement>,
    /// `elif` clauses in order.
    pub elif_clauses: Vec<ElifClause>,
    /// Statements after `else`, if present.
    pub else_body: Option<Vec<Statement>>,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}

/// An `elif` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElifClause {
    /// Layout after `elif`.
    pub gap: Gap,
    /// The condition, including the separator before `then`.
    pub condition: Vec<Statement>,
    /// Statements after `then`.
    pub body: Vec<Statement>,
}

/// `while` or `until` loop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopStatement {
    /// Layout after the keyword.
    pub gap: Gap,
    /// The condition, including the separator before `do`.
    pub condition: Vec<Statement>,
    /// Statements between `do` and `done`.
    pub body: Vec<Statement>,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}

/// The `in` list of a `for` loop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForList {
    /// Layout before `in`.
    pub before_in: Gap,
    /// Layout after `in`.
    pub after_in: Gap,
    /// The iterated items and the spaces between them.
    pub items: Vec<Argument>,
}

/// What a `for` loop iterates over.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForHeader {
    /// `for NAME [in WORDS]`
    Words {
        /// The loop variable.
        variable: Word,
        /// The `in` list; absent when iterating positional parameters.
        list: Option<ForList>,
    },
    /// `for (( init; test; step ))`
    Arithmetic(ArithmeticCommand),
}

/// `for` loop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForStatement {
    /// Layout after `for`.
    pub gap: Gap,
    /// The loop header.
    pub header: ForHeader,
    /// Separators and layout between the header and `do`.
    pub separator: Vec<Statement>,
    /// Statements between `do` and `done`.
    pub body: Vec<Statement>,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}

/// One `|`-separated alternative of a case clause.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CasePattern {
    /// The pattern pieces and surrounding spaces.
    pub parts: Vec<Argument>,
}

impl CasePattern {
    /// Creates a pattern from a single word.
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Argument::word(text)],
        }
    }
}

/// A clause of a `case` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseClause {
    /// Whitespace before the pattern.
    pub indent: String,
    /// Whether the patterns are preceded by `(`.
    pub open_paren: bool,
    /// The alternatives.
    pub patterns: Vec<CasePattern>,
    /// Statements after `)`, including the clause terminator.
    pub body: Vec<Statement>,
    /// Layout after the body up to the next clause's indentation. `None` renders
    /// a line break when another clause follows.
    pub trailer: Option<Vec<Statement>>,
    /// From the indentation through the terminator, or through the body of a
    /// final clause without one.
    pub span: Option<SourceSpan>,
}

/// `case` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseStatement {
    /// Layout after `case`.
    pub gap: Gap,
    /// The word being matched.
    pub subject: Argument,
    /// Layout before `in`.
    pub in_gap: Gap,
    /// Layout after `in` up to the first clause's indentation.
    pub leading: Vec<Statement>,
    /// The clauses.
    pub clauses: Vec<CaseClause>,
    /// Whitespace before `esac`.
    pub closing_indent: String,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}

/// The `()` of a function definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionParens {
    /// Layout between the name and `(`.
    pub before: Vec<Trivia>,
    /// Layout between `(` and `)`.
    pub inside: Vec<Trivia>,
}

/// A function definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDefinition {
    /// Layout after the `function` keyword, when the keyword is used.
    pub keyword: Option<Gap>,
    /// The function name.
    pub name: Word,
    /// The `()` following the name, if written.
    pub parens: Option<FunctionParens>,
    /// Layout before the body.
    pub body_gap: Gap,
    /// The body, a compound statement.
    pub body: Box<Statement>,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}

/// `{ ...; }`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BraceGroup {
    /// Statements between the braces.
    pub body: Vec<Statement>,
}

/// `( ... )`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subshell {
    /// Statements between the parentheses.
    pub body: Vec<Statement>,
}

/// An element of a [`TestExpression`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestPart {
    /// An operand.
    Operand(Argument),
    /// A unary predicate such as `-f`.
    UnaryOperator(String),
    /// A comparison such as `-eq`, `==`, `<`, or `=~`.
    BinaryOperator(String),
    /// `-a`, `-o`, `&&`, or `||`.
    Logical(String),
    /// `!`
    Not,
    /// `(`
    GroupOpen,
    /// `)`
    GroupClose,
    /// The right-hand side of `=~`, verbatim.
    Regex(String),
    /// Spaces and tabs.
    Space(String),
    /// A backslash-newline.
    LineContinuation,
}

/// `[ ... ]` or `[[ ... ]]`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestExpression {
    /// Whether the double-bracket form is used.
    pub extended: bool,
    /// Layout after the opening bracket.
    pub leading: Gap,
    /// The expression.
    pub parts: Vec<TestPart>,
    /// Layout before the closing bracket.
    pub trailing: Gap,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}

/// `(( ... ))`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArithmeticCommand {
    /// The text between `((` and `))`.
    pub expression: String,
}

/// `! statement`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Negation {
    /// Layout after `!`.
    pub gap: Gap,
    /// The negated statement.
    pub statement: Box<Statement>,
}

/// A node produced by an extension command handler.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomNode {
    /// The extension-defined kind, used to select a generator.
    pub kind: String,
    /// The source text the node was parsed from.
    pub text: String,
    /// Extension-defined attributes.
    pub attributes: BTreeMap<String, String>,
    /// Location in the source.
    pub span: Option<SourceSpan>,
}
