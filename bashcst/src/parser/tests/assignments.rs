//! Tests for variable assignment parsing.

use super::{only_command, test_roundtrip};
use crate::ast::{
    Argument, PipelineOperator, Quote, Statement, VariableAssignment, VariableExpansion, Word,
};
use anyhow::Result;
use pretty_assertions::{assert_eq, assert_matches};

fn assignment(statement: &Statement) -> Result<&VariableAssignment> {
    match statement {
        Statement::Assignment(assignment) => Ok(assignment),
        other => anyhow::bail!("expected an assignment, found {other:?}"),
    }
}

#[test]
fn parse_standalone_assignment() -> Result<()> {
    let program = test_roundtrip("x=1")?;
    let x = assignment(only_command(&program)?)?;
    assert_eq!(x.name, "x");
    assert!(!x.append);
    assert_eq!(x.value, Some(Argument::word("1")));
    Ok(())
}

#[test]
fn parse_assignment_prefix() -> Result<()> {
    let program = test_roundtrip("NODE_ENV=production npm test")?;
    let Statement::Command(command) = only_command(&program)? else {
        anyhow::bail!("expected a command");
    };

    assert_eq!(command.name, Argument::word("npm"));
    let assignments: Vec<_> = command
        .prefix
        .iter()
        .filter(|s| !s.is_layout())
        .collect();
    assert_eq!(assignments.len(), 1);
    let env = assignment(assignments[0])?;
    assert_eq!(env.name, "NODE_ENV");
    assert_eq!(env.value, Some(Argument::word("production")));
    Ok(())
}

#[test]
fn parse_assignment_before_operator_is_not_a_prefix() -> Result<()> {
    let program = test_roundtrip("NODE_ENV=production && npm test")?;
    let Statement::Pipeline(pipeline) = only_command(&program)? else {
        anyhow::bail!("expected a pipeline");
    };

    assert_eq!(pipeline.commands.len(), 2);
    assert_matches!(&pipeline.commands[0], Statement::Assignment(a) if a.name == "NODE_ENV");
    assert_matches!(&pipeline.commands[1], Statement::Command(_));
    assert_eq!(
        pipeline.operators().collect::<Vec<_>>(),
        vec![PipelineOperator::And]
    );
    Ok(())
}

#[test]
fn parse_several_assignments_without_command() -> Result<()> {
    let program = test_roundtrip("a=1 b=\"two\"")?;
    let commands: Vec<_> = program.commands().collect();
    assert_eq!(commands.len(), 2);
    assert_eq!(assignment(commands[0])?.name, "a");
    assert_eq!(
        assignment(commands[1])?.value,
        Some(Argument::Word(Word::with_quote("two", Quote::Double)))
    );
    Ok(())
}

#[test]
fn parse_array_assignment() -> Result<()> {
    let program = test_roundtrip("arr=(one \"two three\" $x)")?;
    let arr = assignment(only_command(&program)?)?;
    assert_eq!(
        arr.value,
        Some(Argument::Array(vec![
            Argument::word("one"),
            Argument::Space(" ".to_owned()),
            Argument::Word(Word::with_quote("two three", Quote::Double)),
            Argument::Space(" ".to_owned()),
            Argument::Variable(VariableExpansion {
                name: "x".to_owned()
            }),
        ]))
    );
    Ok(())
}

#[test]
fn parse_multiline_array_with_comments() -> Result<()> {
    test_roundtrip("deps=(\n  curl # fetch\n  jq\n)\n")?;
    Ok(())
}

#[test]
fn parse_array_argument() -> Result<()> {
    let program = test_roundtrip("local arr=(a b)")?;
    let Statement::Command(command) = only_command(&program)? else {
        anyhow::bail!("expected a command");
    };
    assert_eq!(
        command.words().cloned().collect::<Vec<_>>(),
        vec![Argument::Concatenation(vec![
            Argument::word("arr"),
            Argument::word("="),
            Argument::Array(vec![
                Argument::word("a"),
                Argument::Space(" ".to_owned()),
                Argument::word("b"),
            ]),
        ])]
    );
    Ok(())
}

#[test]
fn parse_append_and_empty_assignments() -> Result<()> {
    let program = test_roundtrip("PATH+=:/opt/bin; empty=")?;
    let commands: Vec<_> = program.commands().collect();
    assert!(assignment(commands[0])?.append);
    assert_eq!(assignment(commands[1])?.value, None);
    Ok(())
}

#[test]
fn parse_tilde_value_is_not_a_regex_operator() -> Result<()> {
    let program = test_roundtrip("x=~/bin")?;
    assert_eq!(
        assignment(only_command(&program)?)?.value,
        Some(Argument::word("~/bin"))
    );
    Ok(())
}

#[test]
fn parse_subscript_assignment() -> Result<()> {
    let program = test_roundtrip("map[key]=value")?;
    assert_eq!(assignment(only_command(&program)?)?.name, "map[key]");
    Ok(())
}
