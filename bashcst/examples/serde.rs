//! Example demonstrating syntax tree serialization with the `serde` feature.
//!
//! Run with: `cargo run --package bashcst --example serde --features serde`

use bashcst::{Parser, ParserOptions, RenderOptions};
use std::io::BufReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = "echo 'Hello, World!' && ls -la  # list\n";
    let reader = BufReader::new(input.as_bytes());
    let options = ParserOptions::default();

    let mut parser = Parser::new(reader, &options);
    let program = parser.parse_program()?;

    let json = serde_json::to_string_pretty(&program)?;
    println!("Parsed tree:");
    println!("{json}");

    // Layout is serialized too, so the restored tree renders to the input.
    let restored: bashcst::ast::Program = serde_json::from_str(&json)?;
    let rendered = bashcst::generate(&restored, &RenderOptions::default())?;
    assert_eq!(rendered, input);

    Ok(())
}
