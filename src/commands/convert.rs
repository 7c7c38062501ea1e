use crate::error::ConvertError;
use crate::output::{dated_output_path, ensure_output_dir};
use crate::pdf::{DocumentWriter, PageSize};
use crate::report::{assemble, into_document_blocks};
use crate::sheet::{Sheet, Worksheet};
use crate::tiling::Tiling;
use chrono::NaiveDate;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, error, info};

pub struct ConvertOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Date used to name the output file.
    pub date: NaiveDate,
    pub compress: bool,
}

#[derive(Debug)]
pub struct ConvertSummary {
    pub output: PathBuf,
    pub tiles: usize,
    pub pages: usize,
}

/// Load the sheet, tile it and write the report PDF.
pub fn convert(options: &ConvertOptions) -> Result<ConvertSummary, ConvertError> {
    ensure_output_dir(&options.output_dir)?;
    let output = dated_output_path(&options.output_dir, options.date);

    let sheet = Worksheet::load(&options.input)?;
    let max_row = sheet.max_row();
    let max_col = sheet.max_column();
    info!(
        input = %options.input.display(),
        sheet = sheet.name(),
        rows = max_row,
        columns = max_col,
        "loaded spreadsheet"
    );

    let writer = DocumentWriter::new(PageSize::LETTER.landscape())
        .title(format!("{} ({})", sheet.name(), options.date))
        .compress(options.compress);

    let tiling = Tiling::compute(max_col, max_row, writer.usable_width());
    if tiling.is_empty() {
        return Err(ConvertError::EmptySheet {
            path: options.input.clone(),
        });
    }
    info!(
        row_batches = tiling.row_batch_count,
        col_batches = tiling.col_batch_count,
        cols_per_page = tiling.cols_per_page,
        tiles = tiling.tile_count(),
        "computed tiling"
    );

    let page_blocks = assemble(&sheet, &tiling);
    let tiles = page_blocks.len();
    let pages = writer.write(&into_document_blocks(page_blocks), &output)?;

    Ok(ConvertSummary {
        output,
        tiles,
        pages,
    })
}

/// Run a conversion, reporting any failure. Returns whether a PDF was
/// written.
pub fn run(options: &ConvertOptions) -> bool {
    match convert(options) {
        Ok(summary) => {
            debug!(
                output = %summary.output.display(),
                tiles = summary.tiles,
                pages = summary.pages,
                "wrote report"
            );
            println!(
                "Converted {} into {} page(s): {}",
                options.input.display(),
                summary.pages,
                summary.output.display()
            );
            true
        }
        Err(e) => {
            error!("Error converting spreadsheet to PDF: {}", error_chain(&e));
            false
        }
    }
}

fn error_chain(e: &ConvertError) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
