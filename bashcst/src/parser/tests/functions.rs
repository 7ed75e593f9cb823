//! Tests for function definition parsing.

use super::{only_command, test_roundtrip};
use crate::ast::{FunctionDefinition, FunctionParens, Gap, Statement, Trivia, Word};
use anyhow::Result;
use pretty_assertions::{assert_eq, assert_matches};

fn function(statement: &Statement) -> Result<&FunctionDefinition> {
    match statement {
        Statement::Function(function) => Ok(function),
        other => anyhow::bail!("expected a function definition, found {other:?}"),
    }
}

#[test]
fn parse_posix_function() -> Result<()> {
    let program = test_roundtrip("greet() {\n  echo \"Hello, $1\"\n}\n")?;
    let greet = function(only_command(&program)?)?;

    assert_eq!(greet.name, Word::new("greet"));
    assert!(greet.keyword.is_none());
    assert_eq!(greet.parens, Some(FunctionParens::default()));
    assert_eq!(greet.body_gap, Gap::verbatim(vec![Trivia::Space(" ".to_owned())]));
    assert_matches!(*greet.body, Statement::BraceGroup(_));
    Ok(())
}

#[test]
fn parse_keyword_function_without_parens() -> Result<()> {
    let program = test_roundtrip("function deploy {\n  make deploy\n}")?;
    let deploy = function(only_command(&program)?)?;

    assert_eq!(deploy.name, Word::new("deploy"));
    assert!(deploy.keyword.is_some());
    assert!(deploy.parens.is_none());
    Ok(())
}

#[test]
fn parse_keyword_function_with_parens() -> Result<()> {
    let program = test_roundtrip("function cleanup() { rm -f \"$tmp\"; }")?;
    let cleanup = function(only_command(&program)?)?;
    assert!(cleanup.keyword.is_some());
    assert!(cleanup.parens.is_some());
    Ok(())
}

#[test]
fn parse_space_before_parens() -> Result<()> {
    let program = test_roundtrip("f () { :; }")?;
    let f = function(only_command(&program)?)?;
    assert_eq!(
        f.parens,
        Some(FunctionParens {
            before: vec![Trivia::Space(" ".to_owned())],
            inside: vec![],
        })
    );
    Ok(())
}

#[test]
fn parse_subshell_body() -> Result<()> {
    let program = test_roundtrip("in_subshell() ( cd /tmp && ls )")?;
    let f = function(only_command(&program)?)?;

    let Statement::Subshell(subshell) = &*f.body else {
        anyhow::bail!("expected a subshell body");
    };
    assert!(
        subshell
            .body
            .iter()
            .any(|s| matches!(s, Statement::Pipeline(_)))
    );
    Ok(())
}

#[test]
fn parse_body_on_next_line() -> Result<()> {
    let program = test_roundtrip("setup()\n{\n  mkdir -p build\n}\n")?;
    let setup = function(only_command(&program)?)?;
    assert_eq!(setup.body_gap, Gap::verbatim(vec![Trivia::Newline]));
    Ok(())
}

#[test]
fn parse_function_with_redirection() -> Result<()> {
    let program = test_roundtrip("log() { echo \"$@\"; } >&2")?;
    let Statement::Redirected(redirected) = only_command(&program)? else {
        anyhow::bail!("expected a redirected statement");
    };
    assert_matches!(*redirected.statement, Statement::Function(_));
    assert_eq!(redirected.redirects[0].operator, ">&2");
    Ok(())
}

#[test]
fn parse_definition_then_call() -> Result<()> {
    let program = test_roundtrip("hello() { echo hi; }\nhello\n")?;
    let commands: Vec<_> = program.commands().collect();
    assert_eq!(commands.len(), 2);
    assert_matches!(commands[0], Statement::Function(_));
    assert_matches!(commands[1], Statement::Command(_));
    Ok(())
}
