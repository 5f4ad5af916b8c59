use crate::domain::transaction::SourceTransaction;
use crate::error::{ExportError, Result};
use std::io::Read;

/// Reads source transactions from a CSV export of the accounting system.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<SourceTransaction>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    /// Creates a new `TransactionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes transactions.
    ///
    /// A malformed row yields an `Err` for that row only; iteration continues.
    pub fn transactions(self) -> impl Iterator<Item = Result<SourceTransaction>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(ExportError::from))
    }
}
