use crate::application::dispatch::Invocation;
use crate::error::{LedgerError, Result};
use std::io::Read;

/// Reads invocations from a CSV source, one per row: `function,arg1,arg2,...`.
///
/// Rows have no header, may differ in width, and lines starting with `#` are
/// skipped. Fields are trimmed.
pub struct InvocationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InvocationReader<R> {
    /// Creates a new `InvocationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads invocations.
    pub fn invocations(self) -> impl Iterator<Item = Result<Invocation>> {
        self.reader.into_records().map(|record| -> Result<Invocation> {
            let record = record?;
            let mut fields = record.iter();
            match fields.next() {
                Some(function) if !function.is_empty() => {
                    Ok(Invocation::new(function, fields))
                }
                _ => Err(LedgerError::InvalidArgument {
                    name: "function",
                    value: String::new(),
                    reason: format!(
                        "missing function name on line {}",
                        record.position().map_or(0, |p| p.line())
                    ),
                }),
            }
        })
    }
}
