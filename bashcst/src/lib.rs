//! Lossless tokenizer, parser, and renderer for POSIX / bash shell scripts.
//!
//! Parsing produces a concrete syntax tree that keeps every byte of its input,
//! so rendering an unmodified tree reproduces the source exactly and rendering
//! an edited tree leaves untouched regions as they were.
//!
//! ```
//! let program = bashcst::parse("NODE_ENV=production npm test  # run\n")?;
//! let text = bashcst::generate(&program, &bashcst::RenderOptions::default())?;
//! assert_eq!(text, "NODE_ENV=production npm test  # run\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod extension;
pub mod render;

mod error;
mod parser;
mod source;
mod tokenizer;

pub use error::{ExtensionError, ParseError, RenderError};
pub use extension::ExtensionRegistry;
pub use parser::{Parser, ParserOptions, parse_tokens};
pub use render::{RenderOptions, generate, generate_with_extensions};
pub use source::{SourcePosition, SourceSpan};
pub use tokenizer::{
    DEFAULT_COMMAND_VOCABULARY, TestOperatorKind, Token, TokenKind, TokenizerOptions,
    tokenize_str, tokenize_str_with_options, uncached_tokenize_str,
};

use ast::Program;

/// Parses shell source text with default options.
///
/// # Arguments
///
/// * `source` - The script to parse.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    parse_with_options(source, &ParserOptions::default())
}

/// Parses shell source text.
///
/// # Arguments
///
/// * `source` - The script to parse.
/// * `options` - Options controlling tokenization and parsing.
pub fn parse_with_options(source: &str, options: &ParserOptions) -> Result<Program, ParseError> {
    let tokens = tokenize_str_with_options(source, &options.tokenizer_options());
    log_result(parse_tokens(&tokens, None))
}

/// Parses shell source text, giving registered command handlers the first
/// chance at each command.
///
/// # Arguments
///
/// * `source` - The script to parse.
/// * `extensions` - The registry of command handlers to consult.
pub fn parse_with_extensions(
    source: &str,
    extensions: &ExtensionRegistry,
) -> Result<Program, ParseError> {
    let tokens = tokenize_str(source);
    log_result(parse_tokens(&tokens, Some(extensions)))
}

fn log_result(result: Result<Program, ParseError>) -> Result<Program, ParseError> {
    if let Err(err) = &result {
        tracing::debug!(target: "parse", "parse error: {err}");
    }
    result
}
