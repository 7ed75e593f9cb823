#![no_main]
#![allow(missing_docs)]

use anyhow::Result;
use libfuzzer_sys::fuzz_target;

fn check_round_trip(input: &str) -> Result<()> {
    let tokens = bashcst::uncached_tokenize_str(input, &bashcst::TokenizerOptions::default());
    let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
    anyhow::ensure!(joined == input, "tokens lost text: {joined:?} vs {input:?}");

    // Rejected input is fine; accepted input must come back unchanged.
    let Ok(program) = bashcst::parse(input) else {
        return Ok(());
    };

    let rendered = bashcst::generate(&program, &bashcst::RenderOptions::default())?;
    anyhow::ensure!(
        rendered == input,
        "mismatched round trip: {rendered:?} vs {input:?}"
    );

    Ok(())
}

fuzz_target!(|input: String| {
    check_round_trip(&input).unwrap();
});
