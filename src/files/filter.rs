//! Filter mode: clean one document from a stream to a stream
//!
//! This is the entry point Git calls for the clean filter. The whole
//! input is read and cleaned before a single byte is written, so a
//! malformed document never leaves partial output behind.

use std::io::{Read, Write};

use crate::core::error::SvgResult;
use crate::core::stripper::Stripper;

/// Clean a document read from `input` and write it to `output`
pub fn run_filter<R: Read, W: Write>(
    stripper: &Stripper,
    mut input: R,
    mut output: W,
) -> SvgResult<()> {
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    let cleaned = stripper.strip(&data)?;
    output.write_all(&cleaned)?;
    output.flush()?;
    Ok(())
}

/// Clean standard input to standard output
pub fn run_stdio(stripper: &Stripper) -> SvgResult<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_filter(stripper, stdin.lock(), stdout.lock())
}
