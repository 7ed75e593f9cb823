#![no_main]
#![allow(missing_docs)]

use anyhow::Result;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, arbitrary::Arbitrary)]
struct RenderInput {
    script: String,
    options: bashcst::RenderOptions,
}

fn check_render(input: &RenderInput) -> Result<()> {
    let Ok(program) = bashcst::parse(&input.script) else {
        return Ok(());
    };

    // Any options must render without failing.
    bashcst::generate(&program, &input.options)?;

    // Default output must parse back to the same tree.
    let rendered = bashcst::generate(&program, &bashcst::RenderOptions::default())?;
    let reparsed = bashcst::parse(&rendered)?;
    anyhow::ensure!(reparsed == program, "reparse changed the tree for {rendered:?}");

    Ok(())
}

fuzz_target!(|input: RenderInput| {
    check_render(&input).unwrap();
});
