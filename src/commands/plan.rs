use crate::pdf::{DocumentWriter, PageSize};
use crate::report::PageLabel;
use crate::sheet::{Sheet, Worksheet};
use crate::tiling::{Tile, Tiling};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub sheet: String,
    pub max_row: u32,
    pub max_column: u32,
    pub tiling: Tiling,
    pub pages: Vec<PlannedPage>,
}

#[derive(Debug, Serialize)]
pub struct PlannedPage {
    pub label: String,
    #[serde(flatten)]
    pub tile: Tile,
}

/// Work out how `sheet` would be paginated without rendering anything.
pub fn plan<S: Sheet + ?Sized>(name: &str, sheet: &S, page_width: f32) -> PlanReport {
    let max_row = sheet.max_row();
    let max_column = sheet.max_column();
    let tiling = Tiling::compute(max_column, max_row, page_width);
    let pages = tiling
        .tiles(max_row, max_column)
        .map(|tile| PlannedPage {
            label: PageLabel::new(tile.row_batch + 1, tile.col_batch).to_string(),
            tile,
        })
        .collect();

    PlanReport {
        sheet: name.to_string(),
        max_row,
        max_column,
        tiling,
        pages,
    }
}

pub fn run<P: AsRef<Path>>(path: P, json: bool) -> Result<()> {
    let path = path.as_ref();
    let sheet = Worksheet::load(path)
        .with_context(|| format!("Failed to load spreadsheet: {}", path.display()))?;
    let page_width = DocumentWriter::new(PageSize::LETTER.landscape()).usable_width();
    let report = plan(sheet.name(), &sheet, page_width);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File: {}", path.display());
    println!("Sheet: {}", report.sheet);
    println!("Size: {} rows x {} columns", report.max_row, report.max_column);
    println!(
        "Columns per page: {} ({} batch(es)), column width hint {:.1}pt",
        report.tiling.cols_per_page, report.tiling.col_batch_count, report.tiling.column_width_hint
    );
    println!(
        "Rows per page: {} ({} batch(es))",
        report.tiling.rows_per_page, report.tiling.row_batch_count
    );

    if report.pages.is_empty() {
        println!("\nSheet is empty; nothing to render.");
        return Ok(());
    }

    println!();
    for page in &report.pages {
        println!(
            "Page {}: rows {}-{}, columns {}-{}",
            page.label, page.tile.row_start, page.tile.row_end, page.tile.col_start, page.tile.col_end
        );
    }
    println!("\n{} page(s) planned.", report.pages.len());

    Ok(())
}
