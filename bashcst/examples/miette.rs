//! Parses a script and reports errors with source context through miette.
//!
//! Run with: `cargo run --package bashcst --example miette --features diagnostics -- script.sh`

use miette::{IntoDiagnostic, miette};

fn main() -> miette::Result<()> {
    let f = std::env::args()
        .nth(1)
        .ok_or_else(|| miette!("Please provide a file name"))?;

    let source = std::fs::read_to_string(&f).into_diagnostic()?;

    let program = bashcst::parse(&source).map_err(|e| e.to_pretty_error(source.as_str()))?;

    println!("{program:#?}");

    Ok(())
}
