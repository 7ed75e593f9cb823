//! Regenerates source text from a syntax tree.
//!
//! Layout recorded by the parser is written back verbatim. The renderer adds
//! whitespace only where a programmatically built tree leaves it out: an empty
//! [`Gap`] becomes one space, and keyword bodies with no layout of their own
//! are separated from their keywords.

use bon::Builder;

use crate::RenderError;
use crate::ast::{
    Argument, CaseStatement, Command, ForHeader, ForStatement, FunctionDefinition, Gap,
    HereDocument, IfStatement, LoopStatement, Pipeline, ProcessDirection, Program, Redirect,
    RedirectTarget, Statement, SubstitutionStyle, TestExpression, TestPart, Trivia,
};
use crate::extension::ExtensionRegistry;

/// Options used to control rendering.
#[derive(Builder, Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "fuzz-testing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderOptions {
    /// Whether comments are emitted. The shebang line is always emitted.
    #[builder(default = true)]
    pub comments: bool,
    /// Reserved for a compact output mode; currently has no effect.
    #[builder(default)]
    pub compact: bool,
    /// Reserved indentation unit; currently has no effect.
    #[builder(into, default = "  ".to_owned())]
    pub indent: String,
    /// Text written for every line break.
    #[builder(into, default = "\n".to_owned())]
    pub line_terminator: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            comments: true,
            compact: false,
            indent: "  ".to_owned(),
            line_terminator: "\n".to_owned(),
        }
    }
}

/// Renders a program to text.
///
/// # Arguments
///
/// * `program` - The program to render.
/// * `options` - Options controlling the output.
pub fn generate(program: &Program, options: &RenderOptions) -> Result<String, RenderError> {
    Renderer::new(options).program(program)
}

/// Renders a program to text, delegating custom nodes to registered generators.
///
/// # Arguments
///
/// * `program` - The program to render.
/// * `options` - Options controlling the output.
/// * `extensions` - The registry whose generators render custom nodes.
pub fn generate_with_extensions(
    program: &Program,
    options: &RenderOptions,
    extensions: &ExtensionRegistry,
) -> Result<String, RenderError> {
    Renderer::new(options)
        .with_extensions(extensions)
        .program(program)
}

/// Renders a single statement, including any here-document bodies it owns.
pub fn render_statement(
    statement: &Statement,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut renderer = Renderer::new(options);
    renderer.statement(statement)?;
    Ok(renderer.finish())
}

/// Renders a single argument with default options.
pub fn render_argument(argument: &Argument) -> String {
    let options = RenderOptions::default();
    let mut renderer = Renderer::new(&options);
    renderer.argument(argument);
    renderer.finish()
}

/// Accumulates the text of a tree.
///
/// Here-document bodies are queued when their redirection is rendered and
/// written after the next line break.
pub struct Renderer<'a> {
    options: &'a RenderOptions,
    extensions: Option<&'a ExtensionRegistry>,
    output: String,
    pending_here_documents: Vec<&'a HereDocument>,
}

impl<'a> Renderer<'a> {
    /// Returns a renderer with no extensions.
    pub const fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            extensions: None,
            output: String::new(),
            pending_here_documents: Vec::new(),
        }
    }

    /// Sets the registry used to render custom nodes.
    #[must_use]
    pub fn with_extensions(mut self, extensions: &'a ExtensionRegistry) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Renders a whole program and returns its text.
    pub fn program(mut self, program: &'a Program) -> Result<String, RenderError> {
        self.statements(&program.body)?;
        let text = self.finish();
        tracing::debug!(target: "render", "rendered {} byte(s)", text.len());
        Ok(text)
    }

    fn finish(mut self) -> String {
        if !self.pending_here_documents.is_empty() {
            self.newline();
        }
        self.output
    }

    fn push(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Writes a line break followed by any queued here-document bodies.
    fn newline(&mut self) {
        self.output.push_str(&self.options.line_terminator);

        let pending = std::mem::take(&mut self.pending_here_documents);
        let count = pending.len();
        for (index, doc) in pending.into_iter().enumerate() {
            self.output.push_str(&doc.content);
            if !doc.content.is_empty() && !doc.content.ends_with('\n') {
                self.output.push_str(&self.options.line_terminator);
            }
            self.output.push_str(&doc.closing);
            if index + 1 < count && !doc.closing.ends_with('\n') {
                self.output.push_str(&self.options.line_terminator);
            }
        }
    }

    //
    // Layout.
    //

    fn trivia(&mut self, trivia: &'a [Trivia]) {
        for item in trivia {
            match item {
                Trivia::Space(space) => self.push(space),
                Trivia::Newline => self.newline(),
                Trivia::LineContinuation => self.push("\\\n"),
                Trivia::Comment(comment) => {
                    if self.options.comments {
                        self.push(&comment.text);
                    }
                }
            }
        }
    }

    fn gap(&mut self, gap: &'a Gap) {
        match &gap.0 {
            Some(trivia) => self.trivia(trivia),
            None => self.push(" "),
        }
    }

    //
    // Statements.
    //

    fn statements(&mut self, statements: &'a [Statement]) -> Result<(), RenderError> {
        for statement in statements {
            self.statement(statement)?;
        }
        Ok(())
    }

    /// Renders the statements of a region that follows a keyword such as
    /// `then` or `do`, separating them from the keywords on either side when
    /// the region has no layout of its own.
    fn keyword_body(&mut self, statements: &'a [Statement]) -> Result<(), RenderError> {
        if statements.first().is_none_or(|s| !s.is_layout()) {
            self.push(" ");
        }
        self.statements(statements)?;
        if statements.last().is_some_and(|s| !s.is_layout()) {
            self.push("; ");
        }
        Ok(())
    }

    fn statement(&mut self, statement: &'a Statement) -> Result<(), RenderError> {
        match statement {
            Statement::Command(command) => self.command(command)?,
            Statement::Pipeline(pipeline) => self.pipeline(pipeline)?,
            Statement::Assignment(assignment) => {
                self.push(&assignment.name);
                self.push(if assignment.append { "+=" } else { "=" });
                if let Some(value) = &assignment.value {
                    self.argument(value);
                }
            }
            Statement::If(statement) => self.if_statement(statement)?,
            Statement::For(statement) => self.for_statement(statement)?,
            Statement::While(statement) => self.loop_statement("while", statement)?,
            Statement::Until(statement) => self.loop_statement("until", statement)?,
            Statement::Case(statement) => self.case_statement(statement)?,
            Statement::Function(function) => self.function(function)?,
            Statement::BraceGroup(group) => {
                self.push("{");
                self.keyword_body(&group.body)?;
                self.push("}");
            }
            Statement::Subshell(subshell) => {
                self.push("(");
                self.statements(&subshell.body)?;
                self.push(")");
            }
            Statement::Test(test) => self.test(test),
            Statement::Arithmetic(arithmetic) => {
                self.push("((");
                self.push(&arithmetic.expression);
                self.push("))");
            }
            Statement::Negated(negation) => {
                self.push("!");
                self.gap(&negation.gap);
                self.statement(&negation.statement)?;
            }
            Statement::Redirected(redirected) => {
                self.statement(&redirected.statement)?;
                let mut redirects = redirected.redirects.iter().peekable();
                for (index, element) in redirected.suffix.iter().enumerate() {
                    while let Some(redirect) = redirects.next_if(|r| r.position <= index) {
                        self.redirect(redirect);
                    }
                    self.argument(element);
                }
                for redirect in redirects {
                    self.redirect(redirect);
                }
            }
            Statement::Custom(node) => {
                let generator = self
                    .extensions
                    .and_then(|registry| registry.find_generator(&node.kind))
                    .ok_or_else(|| RenderError::UnknownNodeKind(node.kind.clone()))?;
                let text = generator.generate(node, self.options)?;
                self.push(&text);
            }
            Statement::Comment(comment) => {
                if self.options.comments {
                    self.push(&comment.text);
                }
            }
            Statement::Shebang(text) => self.push(text),
            Statement::Space(space) => self.push(space),
            Statement::Newline => self.newline(),
            Statement::LineContinuation => self.push("\\\n"),
            Statement::Semicolon => self.push(";"),
            Statement::DoubleSemicolon => self.push(";;"),
            Statement::CaseFallthrough => self.push(";&"),
            Statement::CaseContinue => self.push(";;&"),
            Statement::Background => self.push("&"),
        }
        Ok(())
    }

    /// Renders prefix statements, the name, and the arguments, each preceded
    /// by the redirections positioned before it.
    fn command(&mut self, command: &'a Command) -> Result<(), RenderError> {
        let prefix_len = command.prefix.len();
        let total = prefix_len + 1 + command.arguments.len();
        let mut redirects = command.redirects.iter().peekable();

        for index in 0..total {
            while let Some(redirect) = redirects.next_if(|r| r.position <= index) {
                self.redirect(redirect);
            }
            if let Some(statement) = command.prefix.get(index) {
                self.statement(statement)?;
            } else if index == prefix_len {
                self.argument(&command.name);
            } else if let Some(argument) = command.arguments.get(index - prefix_len - 1) {
                self.argument(argument);
            }
        }

        for redirect in redirects {
            self.redirect(redirect);
        }
        Ok(())
    }

    fn redirect(&mut self, redirect: &'a Redirect) {
        self.push(&redirect.operator);
        self.trivia(&redirect.gap);
        match &redirect.target {
            RedirectTarget::None => (),
            RedirectTarget::Argument(argument) => self.argument(argument),
            RedirectTarget::HereDocument(doc) => {
                self.push(&doc.delimiter.to_string());
                self.pending_here_documents.push(doc);
            }
        }
    }

    fn pipeline(&mut self, pipeline: &'a Pipeline) -> Result<(), RenderError> {
        let mut commands = pipeline.commands.iter();
        if let Some(first) = commands.next() {
            self.statement(first)?;
        }
        for (boundary, command) in pipeline.boundaries.iter().zip(commands) {
            self.gap(&boundary.before);
            self.push(boundary.operator.as_str());
            self.gap(&boundary.after);
            self.statement(command)?;
        }
        Ok(())
    }

    fn if_statement(&mut self, statement: &'a IfStatement) -> Result<(), RenderError> {
        self.push("if");
        self.gap(&statement.gap);
        self.condition(&statement.condition)?;
        self.push("then");
        self.keyword_body(&statement.then_body)?;

        for clause in &statement.elif_clauses {
            self.push("elif");
            self.gap(&clause.gap);
            self.condition(&clause.condition)?;
            self.push("then");
            self.keyword_body(&clause.body)?;
        }

        if let Some(else_body) = &statement.else_body {
            self.push("else");
            self.keyword_body(else_body)?;
        }

        self.push("fi");
        Ok(())
    }

    /// Renders a condition followed by the separator its closing keyword needs.
    fn condition(&mut self, condition: &'a [Statement]) -> Result<(), RenderError> {
        self.statements(condition)?;
        if condition.last().is_some_and(|s| !s.is_layout()) {
            self.push("; ");
        }
        Ok(())
    }

    fn loop_statement(
        &mut self,
        keyword: &str,
        statement: &'a LoopStatement,
    ) -> Result<(), RenderError> {
        self.push(keyword);
        self.gap(&statement.gap);
        self.condition(&statement.condition)?;
        self.push("do");
        self.keyword_body(&statement.body)?;
        self.push("done");
        Ok(())
    }

    fn for_statement(&mut self, statement: &'a ForStatement) -> Result<(), RenderError> {
        self.push("for");
        self.gap(&statement.gap);

        match &statement.header {
            ForHeader::Words { variable, list } => {
                self.push(&variable.to_string());
                if let Some(list) = list {
                    self.gap(&list.before_in);
                    self.push("in");
                    self.gap(&list.after_in);
                    for item in &list.items {
                        self.argument(item);
                    }
                }
            }
            ForHeader::Arithmetic(arithmetic) => {
                self.push("((");
                self.push(&arithmetic.expression);
                self.push("))");
            }
        }

        if statement.separator.is_empty() {
            self.push("; ");
        }
        self.statements(&statement.separator)?;
        self.push("do");
        self.keyword_body(&statement.body)?;
        self.push("done");
        Ok(())
    }

    fn case_statement(&mut self, statement: &'a CaseStatement) -> Result<(), RenderError> {
        self.push("case");
        self.gap(&statement.gap);
        self.argument(&statement.subject);
        self.gap(&statement.in_gap);
        self.push("in");
        self.statements(&statement.leading)?;

        let count = statement.clauses.len();
        for (index, clause) in statement.clauses.iter().enumerate() {
            self.push(&clause.indent);
            if clause.open_paren {
                self.push("(");
            }
            for (pattern_index, pattern) in clause.patterns.iter().enumerate() {
                if pattern_index > 0 {
                    self.push("|");
                }
                for part in &pattern.parts {
                    self.argument(part);
                }
            }
            self.push(")");
            self.statements(&clause.body)?;

            match &clause.trailer {
                Some(trailer) => self.statements(trailer)?,
                None if index + 1 < count => self.newline(),
                None => (),
            }
        }

        self.push(&statement.closing_indent);
        self.push("esac");
        Ok(())
    }

    fn function(&mut self, function: &'a FunctionDefinition) -> Result<(), RenderError> {
        if let Some(gap) = &function.keyword {
            self.push("function");
            self.gap(gap);
        }
        self.push(&function.name.to_string());
        if let Some(parens) = &function.parens {
            self.trivia(&parens.before);
            self.push("(");
            self.trivia(&parens.inside);
            self.push(")");
        }
        self.gap(&function.body_gap);
        self.statement(&function.body)
    }

    fn test(&mut self, test: &'a TestExpression) {
        self.push(if test.extended { "[[" } else { "[" });
        self.gap(&test.leading);
        for part in &test.parts {
            match part {
                TestPart::Operand(argument) => self.argument(argument),
                TestPart::UnaryOperator(text)
                | TestPart::BinaryOperator(text)
                | TestPart::Logical(text)
                | TestPart::Regex(text)
                | TestPart::Space(text) => self.push(text),
                TestPart::Not => self.push("!"),
                TestPart::GroupOpen => self.push("("),
                TestPart::GroupClose => self.push(")"),
                TestPart::LineContinuation => self.push("\\\n"),
            }
        }
        self.gap(&test.trailing);
        self.push(if test.extended { "]]" } else { "]" });
    }

    //
    // Arguments.
    //

    fn argument(&mut self, argument: &'a Argument) {
        match argument {
            Argument::Word(word) => self.push(&word.to_string()),
            Argument::Variable(variable) => {
                self.push("$");
                self.push(&variable.name);
            }
            Argument::CommandSubstitution(substitution) => match substitution.style {
                SubstitutionStyle::Dollar => {
                    self.push("$(");
                    self.push(&substitution.command);
                    self.push(")");
                }
                SubstitutionStyle::Backtick => {
                    self.push("`");
                    self.push(&substitution.command);
                    self.push("`");
                }
            },
            Argument::Arithmetic(arithmetic) => {
                self.push("$((");
                self.push(&arithmetic.expression);
                self.push("))");
            }
            Argument::ProcessSubstitution(substitution) => {
                self.push(match substitution.direction {
                    ProcessDirection::Read => "<(",
                    ProcessDirection::Write => ">(",
                });
                self.push(&substitution.command);
                self.push(")");
            }
            Argument::Array(elements) => {
                self.push("(");
                for element in elements {
                    self.argument(element);
                }
                self.push(")");
            }
            Argument::Concatenation(pieces) => {
                for piece in pieces {
                    self.argument(piece);
                }
            }
            Argument::Space(space) => self.push(space),
            Argument::LineContinuation => self.push("\\\n"),
            Argument::Newline => self.newline(),
            Argument::Comment(comment) => {
                if self.options.comments {
                    self.push(&comment.text);
                }
            }
        }
    }
}
