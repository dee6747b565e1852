//! Parser fuzz target: feed arbitrary bytes through the whole pipeline.
//! `compile` must not panic; it returns Ok(Document) or a structured Err.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = servdsl::compile(data) {
        // A validated document prints back to source that compiles to the same AST.
        let printed = doc.to_string();
        assert_eq!(servdsl::compile(printed.as_bytes()).ok(), Some(doc));
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
