//! Parser tests, grouped by construct.
//!
//! Every input parsed through [`test_roundtrip`] is also checked to render back
//! to exactly the same text.

mod assignments;
mod compound_commands;
mod errors;
mod functions;
mod redirections;

use crate::ast::{Program, Statement};
use crate::error::ParseError;
use crate::parser::{Parser, ParserOptions};
use anyhow::Result;
use pretty_assertions::assert_eq;

/// Parses input through a [`Parser`] with default options.
pub fn parse(input: &str) -> Result<Program, ParseError> {
    let mut parser = Parser::new(std::io::Cursor::new(input), &ParserOptions::default());
    parser.parse_program()
}

/// Parses `input`, checks that it renders back unchanged, and returns the tree.
pub fn test_roundtrip(input: &str) -> Result<Program> {
    let program = parse(input).map_err(|e| anyhow::anyhow!("parse failed: {e}\nInput: {input}"))?;
    let rendered = crate::generate(&program, &crate::RenderOptions::default())?;
    assert_eq!(rendered, input);
    Ok(program)
}

/// Returns the only statement of a program that is not layout.
pub fn only_command(program: &Program) -> Result<&Statement> {
    let mut commands = program.commands();
    let first = commands
        .next()
        .ok_or_else(|| anyhow::anyhow!("program has no commands"))?;
    anyhow::ensure!(commands.next().is_none(), "program has more than one command");
    Ok(first)
}

mod harness_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_parses_to_empty_program() -> Result<()> {
        let program = test_roundtrip("")?;
        assert!(program.body.is_empty());
        assert!(program.span.is_none());
        Ok(())
    }

    #[test]
    fn only_command_skips_layout() -> Result<()> {
        let program = test_roundtrip("\n  # note\ntrue\n")?;
        assert_eq!(only_command(&program)?.to_string(), "true");
        Ok(())
    }
}
