//! Core data model: rows of string cells, addressed by 1-based column index.
//!
//! Column numbering follows the configuration surface: the first data column
//! is column 1, matching `hierarchyColumns`/`propertyColumns` values and the
//! per-column template keys. Column 0 is reserved; a row's source line number
//! is carried as its own field, not as a synthetic cell.

/// One input row: its 1-based source line number plus the original cells.
///
/// Rows are immutable after normalization; the only mutation is the in-place
/// fill-down repair performed by [`crate::filldown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    line_number: usize,
    cells: Vec<String>,
}

impl Row {
    /// Create a row from its 1-based source line number and cells.
    pub fn new(line_number: usize, cells: Vec<String>) -> Self {
        Self { line_number, cells }
    }

    /// 1-based source line number, used only for diagnostics.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Cell at 1-based `column`. Returns `None` for column 0 and for columns
    /// beyond this row's width (rows may be ragged).
    pub fn cell(&self, column: usize) -> Option<&str> {
        if column == 0 {
            return None;
        }
        self.cells.get(column - 1).map(String::as_str)
    }

    /// Overwrite the cell at 1-based `column`. Returns `false` when the row
    /// has no such cell; ragged rows are never widened.
    pub fn set_cell(&mut self, column: usize, value: impl Into<String>) -> bool {
        if column == 0 {
            return false;
        }
        match self.cells.get_mut(column - 1) {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }

    /// Number of cells in this row.
    pub fn width(&self) -> usize {
        self.cells.len()
    }
}

/// The whole input: data rows in source order, plus the promoted column-name
/// row when `firstRowAsColumnNames` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Data rows, in source order.
    pub rows: Vec<Row>,
    /// Column names, addressed with the same 1-based indices as data cells.
    pub column_names: Option<Row>,
}

impl Table {
    /// Create a table from data rows, with no column names.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            column_names: None,
        }
    }

    /// Remove the first row and keep it as the column-name row.
    ///
    /// A no-op on an empty table.
    pub fn promote_first_row_to_names(&mut self) {
        if !self.rows.is_empty() {
            self.column_names = Some(self.rows.remove(0));
        }
    }

    /// Declared name of 1-based `column`, if column names are known and the
    /// name row is wide enough.
    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.column_names.as_ref().and_then(|names| names.cell(column))
    }
}
