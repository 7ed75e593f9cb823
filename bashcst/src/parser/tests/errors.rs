//! Tests for parse errors.

use super::parse;
use crate::SourcePosition;
use crate::error::ParseError;
use anyhow::Result;
use pretty_assertions::{assert_eq, assert_matches};

fn parse_error(input: &str) -> Result<ParseError> {
    match parse(input) {
        Ok(program) => anyhow::bail!("expected an error, parsed {program:?}"),
        Err(err) => Ok(err),
    }
}

#[test]
fn missing_fi() -> Result<()> {
    let err = parse_error("if true; then echo hi")?;
    assert_matches!(&err, ParseError::UnexpectedEndOfInput { expected, .. } if expected == "'fi'");
    assert_eq!(err.to_string(), "expected 'fi', found end of input");
    Ok(())
}

#[test]
fn missing_done() -> Result<()> {
    let err = parse_error("while true; do echo")?;
    assert_matches!(err, ParseError::UnexpectedEndOfInput { expected, .. } if expected == "'done'");
    Ok(())
}

#[test]
fn missing_esac() -> Result<()> {
    let err = parse_error("case x in a) ;;")?;
    assert_matches!(err, ParseError::UnexpectedEndOfInput { expected, .. } if expected == "'esac'");
    Ok(())
}

#[test]
fn unterminated_quote() -> Result<()> {
    let err = parse_error("echo 'unterminated")?;
    assert_eq!(
        err,
        ParseError::Unterminated {
            construct: "quote",
            position: SourcePosition {
                index: 5,
                line: 1,
                column: 6,
            },
        }
    );
    Ok(())
}

#[test]
fn unterminated_command_substitution() -> Result<()> {
    let err = parse_error("echo $(ls")?;
    assert_matches!(
        err,
        ParseError::Unterminated {
            construct: "command substitution",
            ..
        }
    );
    Ok(())
}

#[test]
fn unterminated_here_document() -> Result<()> {
    let err = parse_error("cat <<EOF\nbody\n")?;
    assert_eq!(
        err,
        ParseError::UnterminatedHereDocument {
            delimiter: "EOF".to_owned(),
            position: SourcePosition {
                index: 4,
                line: 1,
                column: 5,
            },
        }
    );
    Ok(())
}

#[test]
fn stray_closing_keyword() -> Result<()> {
    let err = parse_error("fi")?;
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            expected: "end of input".to_owned(),
            found: "fi".to_owned(),
            index: 0,
            position: SourcePosition::START,
        }
    );
    Ok(())
}

#[test]
fn misplaced_keyword_reports_position() -> Result<()> {
    let err = parse_error("echo hi; then")?;
    assert_matches!(&err, ParseError::UnexpectedToken { found, .. } if found == "then");
    assert_eq!(
        err.position(),
        Some(SourcePosition {
            index: 9,
            line: 1,
            column: 10,
        })
    );
    Ok(())
}

#[test]
fn position_on_later_line() -> Result<()> {
    let err = parse_error("echo ok\nfor x in a; echo $x; done\n")?;
    let position = err
        .position()
        .ok_or_else(|| anyhow::anyhow!("expected a position"))?;
    assert_eq!(position.line, 2);
    Ok(())
}

#[test]
fn line_break_inside_extended_test() -> Result<()> {
    let err = parse_error("[[ -n $x\n]]")?;
    assert_matches!(err, ParseError::UnexpectedToken { expected, .. } if expected == "']]'");
    Ok(())
}

#[test]
fn redirection_without_command() -> Result<()> {
    let err = parse_error("> out")?;
    assert_matches!(
        err,
        ParseError::UnexpectedEndOfInput { expected, .. } if expected == "a command name"
    );
    Ok(())
}

#[test]
fn dangling_pipe() -> Result<()> {
    let err = parse_error("echo a |")?;
    assert_matches!(err, ParseError::UnexpectedEndOfInput { .. });
    Ok(())
}

#[test]
fn unmatched_brace() -> Result<()> {
    let err = parse_error("{ echo a; ")?;
    assert_matches!(err, ParseError::UnexpectedEndOfInput { expected, .. } if expected == "'}'");
    Ok(())
}

#[test]
fn empty_bodies_are_rejected() -> Result<()> {
    for (input, found) in [
        ("if then fi", "then"),
        ("if true; then fi", "fi"),
        ("if true; then :; else fi", "fi"),
        ("if false; then :; elif then :; fi", "then"),
        ("while true; do done", "done"),
        ("until do :; done", "do"),
        ("for x in a; do done", "done"),
        ("{ }", "}"),
        ("( )", ")"),
        ("f() { }", "}"),
        ("if true; then # nothing\nfi", "fi"),
    ] {
        let err = parse_error(input)?;
        assert_matches!(
            &err,
            ParseError::UnexpectedToken { expected, found: actual, .. }
                if expected == "a command" && actual == found,
            "input: {input}"
        );
    }
    Ok(())
}

#[test]
fn empty_body_at_end_of_input() -> Result<()> {
    let err = parse_error("while true; do\n")?;
    assert_matches!(
        err,
        ParseError::UnexpectedEndOfInput { expected, .. } if expected == "a command"
    );
    Ok(())
}

#[test]
fn separator_without_command_is_rejected() -> Result<()> {
    for input in [";", "while; do :; done", "if ; then :; fi", "echo a\n; echo b", "a & ;"] {
        let err = parse_error(input)?;
        assert_matches!(
            &err,
            ParseError::UnexpectedToken { expected, found, .. }
                if expected == "a command" && found == ";",
            "input: {input}"
        );
    }
    Ok(())
}

#[test]
fn empty_case_clause_body_is_allowed() -> Result<()> {
    assert!(parse("case $x in\n  a) ;;\nesac\n").is_ok());
    Ok(())
}
