//! User-facing output.

use std::io::{self, Stderr, Stdout, Write};

use ipk24chat_client::{Output, OutputStream};

/// Writes [`Output`] lines to the stream each one belongs on.
///
/// Every line is flushed immediately so chat and diagnostics interleave in
/// the order they were produced.
#[derive(Debug)]
pub struct Console<O, E> {
    out: O,
    err: E,
}

impl Console<Stdout, Stderr> {
    /// Console bound to the process's standard streams.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Console<O, E> {
    /// Console over arbitrary writers.
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Write one output line.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the write or flush fails.
    pub fn print(&mut self, output: &Output) -> io::Result<()> {
        let writer: &mut dyn Write = match output.stream() {
            OutputStream::Stdout => &mut self.out,
            OutputStream::Stderr => &mut self.err,
        };
        writeln!(writer, "{output}")?;
        writer.flush()
    }
}
