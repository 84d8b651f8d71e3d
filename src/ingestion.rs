//! CSV row source.
//!
//! Reads a delimited file into an in-memory [`Table`], tagging every record
//! with its 1-based source line number for diagnostics. Records may be ragged;
//! downstream stages treat missing cells as "no data there" rather than
//! erroring.

use std::io;
use std::path::Path;

use crate::error::GenerationResult;
use crate::types::{Row, Table};

/// Options for the CSV reader.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    /// Field separator byte.
    pub separator: u8,
    /// Quote byte.
    pub quote: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            quote: b'"',
        }
    }
}

/// Read a delimited file into a [`Table`].
pub fn read_table_from_path(
    path: impl AsRef<Path>,
    options: CsvOptions,
) -> GenerationResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.separator)
        .quote(options.quote)
        .from_path(path)?;
    read_table_from_reader(&mut rdr)
}

/// Read table rows from an existing CSV reader.
///
/// The reader must be configured with `has_headers(false)`: a column-name
/// first row is data here (line 1) until [`Table::promote_first_row_to_names`]
/// pulls it out, so that line numbers in diagnostics match the source file.
pub fn read_table_from_reader<R: io::Read>(rdr: &mut csv::Reader<R>) -> GenerationResult<Table> {
    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        rows.push(Row::new(index + 1, cells));
    }
    Ok(Table::new(rows))
}
