//! Fill-down normalization for indentation-style tables.
//!
//! Many hand-maintained taxonomies only state the deepest level that changed
//! on each row and leave the shallower hierarchy cells blank. Fill-down
//! repairs those blanks by copying from the previous row, so the tree builder
//! can treat every row as self-contained.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::types::Row;

/// Repair blank hierarchy cells in place.
///
/// For every row after the first, hierarchy columns are scanned in declared
/// order. Scanning stops at the first column that is already populated in the
/// current row; only the contiguous empty prefix before it is repaired, so a
/// row that states just its deepest changed level keeps its deeper cells
/// untouched. A cell whose previous-row counterpart is also empty cannot be
/// repaired: that is reported to `sink` as a data error, the cell stays
/// empty, and the scan still advances. A row too short to have the cell ends
/// its own scan.
pub fn fill_down(rows: &mut [Row], hierarchy_columns: &[usize], sink: &dyn DiagnosticSink) {
    fill_down_named(rows, hierarchy_columns, None, sink)
}

/// [`fill_down`] with a column-name row for friendlier diagnostics.
pub fn fill_down_named(
    rows: &mut [Row],
    hierarchy_columns: &[usize],
    column_names: Option<&Row>,
    sink: &dyn DiagnosticSink,
) {
    for index in 1..rows.len() {
        let (before, after) = rows.split_at_mut(index);
        let previous = &before[index - 1];
        let current = &mut after[0];

        for &column in hierarchy_columns {
            match current.cell(column).map(str::is_empty) {
                Some(true) => {
                    let repair = previous
                        .cell(column)
                        .filter(|value| !value.is_empty())
                        .map(str::to_string);
                    match repair {
                        Some(value) => {
                            current.set_cell(column, value);
                        }
                        None => {
                            sink.report(&Diagnostic::FillDownGap {
                                line: current.line_number(),
                                column,
                                column_name: column_names
                                    .and_then(|names| names.cell(column))
                                    .map(str::to_string),
                            });
                        }
                    }
                }
                // The first populated column ends the contiguous empty
                // prefix; a row with no such cell has nothing to repair.
                Some(false) | None => break,
            }
        }
    }
}
