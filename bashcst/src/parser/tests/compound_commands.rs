//! Tests for compound command parsing.

use super::{only_command, test_roundtrip};
use crate::ast::{
    Argument, ArithmeticCommand, ForHeader, RedirectTarget, Statement, Word,
};
use anyhow::Result;
use pretty_assertions::{assert_eq, assert_matches};

#[test]
fn parse_if_elif_else() -> Result<()> {
    let program = test_roundtrip(
        "if [ -f a ]; then\n  echo a\nelif [ -f b ]; then\n  echo b\nelse\n  echo none\nfi\n",
    )?;
    let Statement::If(statement) = only_command(&program)? else {
        anyhow::bail!("expected an if statement");
    };

    assert_matches!(statement.condition.first(), Some(Statement::Test(_)));
    assert_eq!(statement.elif_clauses.len(), 1);
    assert!(statement.else_body.is_some());
    assert_eq!(
        statement
            .then_body
            .iter()
            .filter(|s| !s.is_layout())
            .count(),
        1
    );
    Ok(())
}

#[test]
fn parse_one_line_if() -> Result<()> {
    let program = test_roundtrip("if true; then :; fi")?;
    let Statement::If(statement) = only_command(&program)? else {
        anyhow::bail!("expected an if statement");
    };
    assert!(statement.elif_clauses.is_empty());
    assert!(statement.else_body.is_none());
    Ok(())
}

#[test]
fn parse_nested_if() -> Result<()> {
    test_roundtrip("if a; then\n  if b; then\n    c\n  fi\nfi\n")?;
    Ok(())
}

#[test]
fn parse_while_with_input_redirection() -> Result<()> {
    let program = test_roundtrip("while read -r line; do\n  echo \"$line\"\ndone < input.txt\n")?;
    let Statement::Redirected(redirected) = only_command(&program)? else {
        anyhow::bail!("expected a redirected statement");
    };

    assert_matches!(*redirected.statement, Statement::While(_));
    assert_eq!(redirected.redirects.len(), 1);
    assert_eq!(redirected.redirects[0].operator, "<");
    assert_eq!(redirected.redirects[0].position, 1);
    assert_eq!(
        redirected.redirects[0].target,
        RedirectTarget::Argument(Argument::word("input.txt"))
    );
    Ok(())
}

#[test]
fn parse_until_loop() -> Result<()> {
    let program = test_roundtrip("until false; do sleep 1; done")?;
    assert_matches!(only_command(&program)?, Statement::Until(_));
    Ok(())
}

#[test]
fn parse_for_in_list() -> Result<()> {
    let program = test_roundtrip("for f in *.txt \"$extra\"; do\n  echo \"$f\"\ndone")?;
    let Statement::For(statement) = only_command(&program)? else {
        anyhow::bail!("expected a for loop");
    };

    let ForHeader::Words { variable, list } = &statement.header else {
        anyhow::bail!("expected a word list header");
    };
    assert_eq!(*variable, Word::new("f"));
    let list = list
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("expected an in list"))?;
    assert_eq!(list.items.iter().filter(|a| !a.is_layout()).count(), 2);
    assert_eq!(
        statement.separator,
        vec![Statement::Semicolon, Statement::Space(" ".to_owned())]
    );
    Ok(())
}

#[test]
fn parse_for_without_in() -> Result<()> {
    let program = test_roundtrip("for arg; do echo \"$arg\"; done")?;
    let Statement::For(statement) = only_command(&program)? else {
        anyhow::bail!("expected a for loop");
    };
    assert_matches!(&statement.header, ForHeader::Words { list: None, .. });
    Ok(())
}

#[test]
fn parse_arithmetic_for() -> Result<()> {
    let program = test_roundtrip("for ((i = 0; i < 3; i++)); do echo $i; done")?;
    let Statement::For(statement) = only_command(&program)? else {
        anyhow::bail!("expected a for loop");
    };
    assert_eq!(
        statement.header,
        ForHeader::Arithmetic(ArithmeticCommand {
            expression: "i = 0; i < 3; i++".to_owned()
        })
    );
    Ok(())
}

#[test]
fn parse_for_list_on_next_line() -> Result<()> {
    test_roundtrip("for x in a b\ndo\n  echo $x\ndone\n")?;
    Ok(())
}

#[test]
fn parse_brace_group_with_redirection() -> Result<()> {
    let program = test_roundtrip("{ echo a; echo b; } > out.txt")?;
    let Statement::Redirected(redirected) = only_command(&program)? else {
        anyhow::bail!("expected a redirected statement");
    };
    let Statement::BraceGroup(group) = &*redirected.statement else {
        anyhow::bail!("expected a brace group");
    };
    assert_eq!(group.body.iter().filter(|s| !s.is_layout()).count(), 2);
    Ok(())
}

#[test]
fn parse_subshell() -> Result<()> {
    let program = test_roundtrip("(cd /tmp; ls)")?;
    let Statement::Subshell(subshell) = only_command(&program)? else {
        anyhow::bail!("expected a subshell");
    };
    assert_eq!(subshell.body.len(), 4);
    Ok(())
}

#[test]
fn parse_arithmetic_command() -> Result<()> {
    let program = test_roundtrip("(( count++ ))")?;
    assert_eq!(
        *only_command(&program)?,
        Statement::Arithmetic(ArithmeticCommand {
            expression: " count++ ".to_owned()
        })
    );
    Ok(())
}

#[test]
fn parse_redirection_after_fi() -> Result<()> {
    let program = test_roundtrip("if true; then :; fi 2>&1")?;
    let Statement::Redirected(redirected) = only_command(&program)? else {
        anyhow::bail!("expected a redirected statement");
    };
    assert_matches!(*redirected.statement, Statement::If(_));
    assert_eq!(redirected.redirects[0].operator, "2>&1");
    assert_eq!(redirected.redirects[0].target, RedirectTarget::None);
    Ok(())
}

#[test]
fn parse_comments_inside_bodies() -> Result<()> {
    test_roundtrip("while true; do\n  # poll\n  sleep 5 # seconds\ndone\n")?;
    Ok(())
}
