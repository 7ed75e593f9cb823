//! Tests for redirection parsing.

use super::{only_command, test_roundtrip};
use crate::ast::{
    Argument, Command, ProcessDirection, ProcessSubstitution, Quote, Redirect, RedirectTarget,
    Statement, Trivia, Word,
};
use anyhow::Result;
use pretty_assertions::assert_eq;

fn command(statement: &Statement) -> Result<&Command> {
    match statement {
        Statement::Command(command) => Ok(command),
        other => anyhow::bail!("expected a command, found {other:?}"),
    }
}

fn redirect(operator: &str, target: Option<&str>, position: usize) -> Redirect {
    Redirect {
        operator: operator.to_owned(),
        gap: if target.is_some() {
            vec![Trivia::Space(" ".to_owned())]
        } else {
            vec![]
        },
        target: target.map_or(RedirectTarget::None, |t| {
            RedirectTarget::Argument(Argument::word(t))
        }),
        position,
    }
}

#[test]
fn parse_output_and_descriptor_duplication() -> Result<()> {
    let program = test_roundtrip("echo hi > out.txt 2>&1")?;
    let echo = command(only_command(&program)?)?;

    assert_eq!(
        echo.redirects,
        vec![
            redirect(">", Some("out.txt"), 4),
            redirect("2>&1", None, 5),
        ]
    );
    assert_eq!(echo.words().count(), 1);
    Ok(())
}

#[test]
fn parse_leading_redirection() -> Result<()> {
    let program = test_roundtrip("> out.log echo hi")?;
    let echo = command(only_command(&program)?)?;

    assert_eq!(echo.name, Argument::word("echo"));
    assert_eq!(echo.redirects, vec![redirect(">", Some("out.log"), 0)]);
    assert_eq!(echo.prefix, vec![Statement::Space(" ".to_owned())]);
    Ok(())
}

#[test]
fn parse_redirection_between_arguments() -> Result<()> {
    let program = test_roundtrip("grep -v x < in.txt file")?;
    let grep = command(only_command(&program)?)?;
    assert_eq!(grep.redirects, vec![redirect("<", Some("in.txt"), 6)]);
    assert_eq!(grep.words().count(), 3);
    Ok(())
}

#[test]
fn parse_here_string() -> Result<()> {
    let program = test_roundtrip("read -r first rest <<< \"$line\"")?;
    let read = command(only_command(&program)?)?;
    assert_eq!(read.redirects[0].operator, "<<<");
    assert_eq!(
        read.redirects[0].target,
        RedirectTarget::Argument(Argument::Word(Word::with_quote("$line", Quote::Double)))
    );
    Ok(())
}

#[test]
fn parse_operator_variants() -> Result<()> {
    for (input, operator) in [
        ("cmd 2>> err.log", "2>>"),
        ("exec 3< input.txt", "3<"),
        ("make &> build.log", "&>"),
        ("cmd >| forced.txt", ">|"),
        ("exec 4<> rw.txt", "4<>"),
    ] {
        let program = test_roundtrip(input)?;
        let parsed = command(only_command(&program)?)?;
        assert_eq!(parsed.redirects[0].operator, operator, "input: {input}");
    }
    Ok(())
}

#[test]
fn parse_closing_descriptor() -> Result<()> {
    let program = test_roundtrip("exec 3>&-")?;
    let exec = command(only_command(&program)?)?;
    assert_eq!(exec.redirects, vec![redirect("3>&-", None, 2)]);
    Ok(())
}

#[test]
fn parse_digit_argument_is_not_a_descriptor() -> Result<()> {
    let program = test_roundtrip("echo 2 > x")?;
    let echo = command(only_command(&program)?)?;
    assert_eq!(echo.words().next(), Some(&Argument::word("2")));
    assert_eq!(echo.redirects, vec![redirect(">", Some("x"), 4)]);
    Ok(())
}

#[test]
fn parse_process_substitutions() -> Result<()> {
    let program = test_roundtrip("diff <(sort a) >(gzip > out.gz)")?;
    let diff = command(only_command(&program)?)?;

    assert!(diff.redirects.is_empty());
    assert_eq!(
        diff.words().cloned().collect::<Vec<_>>(),
        vec![
            Argument::ProcessSubstitution(ProcessSubstitution {
                direction: ProcessDirection::Read,
                command: "sort a".to_owned(),
            }),
            Argument::ProcessSubstitution(ProcessSubstitution {
                direction: ProcessDirection::Write,
                command: "gzip > out.gz".to_owned(),
            }),
        ]
    );
    Ok(())
}

#[test]
fn parse_redirections_in_pipeline() -> Result<()> {
    let program = test_roundtrip("sort < in.txt | uniq > out.txt")?;
    let Statement::Pipeline(pipeline) = only_command(&program)? else {
        anyhow::bail!("expected a pipeline");
    };
    for element in &pipeline.commands {
        assert_eq!(command(element)?.redirects.len(), 1);
    }
    Ok(())
}

#[test]
fn parse_redirection_without_space() -> Result<()> {
    let program = test_roundtrip("echo hi >out.txt")?;
    let echo = command(only_command(&program)?)?;
    assert!(echo.redirects[0].gap.is_empty());
    Ok(())
}
