//! End-to-end generation pipeline.
//!
//! [`generate`] ties the stages together: validate configuration, read the
//! delimited input, normalize it, build the tree, and write header, rendered
//! body, and footer to the output file. Fatal problems return before the
//! output file is created; data-quality problems go to the sink and the run
//! continues.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::Settings;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{GenerationError, GenerationResult};
use crate::filldown;
use crate::ids::IdAllocator;
use crate::ingestion::{self, CsvOptions};
use crate::render::Renderer;
use crate::tree::HierarchyTree;
use crate::types::Table;

/// Minimal stats reported on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    /// Number of data rows processed (after column-name extraction).
    pub rows: usize,
    /// Number of tree nodes created, including the synthetic root.
    pub nodes: usize,
}

/// Run the whole pipeline described by `settings`.
///
/// Configuration is validated before any input or output I/O: a missing
/// input file, a missing or malformed `hierarchyColumns` value, or a
/// non-ASCII separator/quote all fail fast with no output file created.
pub fn generate(
    settings: &Settings,
    sink: &dyn DiagnosticSink,
) -> GenerationResult<GenerationStats> {
    let input = settings.input_file()?;
    if !input.is_file() {
        return Err(GenerationError::InputNotFound { path: input });
    }
    let csv_options = CsvOptions {
        separator: settings.separator()?,
        quote: settings.quote()?,
    };
    let hierarchy_columns = settings.hierarchy_columns()?;
    let property_columns = settings.property_columns(sink);
    settings.report_template_gaps(sink);
    let mut allocator = IdAllocator::new(settings.id_policy(sink));

    let mut table = ingestion::read_table_from_path(&input, csv_options)?;
    if settings.first_row_as_column_names() {
        table.promote_first_row_to_names();
    }
    if settings.filldown() {
        filldown::fill_down_named(
            &mut table.rows,
            &hierarchy_columns,
            table.column_names.as_ref(),
            sink,
        );
    }

    let row_count = table.rows.len();
    let Table { rows, column_names } = table;
    let tree = HierarchyTree::build(
        rows,
        &hierarchy_columns,
        &mut allocator,
        column_names.as_ref(),
        sink,
    );

    let mut out = BufWriter::new(File::create(settings.output_file())?);
    if let Some(path) = settings.header_file() {
        copy_section("header", &path, &mut out, sink)?;
    }
    let renderer = Renderer::new(
        settings,
        &hierarchy_columns,
        &property_columns,
        column_names.as_ref(),
    );
    renderer.render(&tree, &mut out, sink)?;
    if let Some(path) = settings.footer_file() {
        copy_section("footer", &path, &mut out, sink)?;
    }
    out.flush()?;

    Ok(GenerationStats {
        rows: row_count,
        nodes: tree.len(),
    })
}

/// Copy a header/footer file verbatim. An absent or non-file path is a
/// warning, not an error; the section is skipped.
fn copy_section(
    section: &'static str,
    path: &Path,
    out: &mut impl Write,
    sink: &dyn DiagnosticSink,
) -> GenerationResult<()> {
    if !path.is_file() {
        sink.report(&Diagnostic::SectionFileUnavailable {
            section,
            path: path.to_path_buf(),
        });
        return Ok(());
    }
    out.write_all(fs::read_to_string(path)?.as_bytes())?;
    Ok(())
}
