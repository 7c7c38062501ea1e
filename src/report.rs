use crate::pdf::{Block, ParagraphStyle, Table, TableStyle};
use crate::sheet::Sheet;
use crate::tiling::{Tile, Tiling};
use std::fmt;
use tracing::debug;

/// Vertical gap between a page's table and its label.
pub const LABEL_GAP: f32 = 20.0;

/// Logical page number of a tile: the row-batch counter, with the column
/// batch appended after a dot when the tile is not the first of its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLabel {
    pub counter: u32,
    pub col_batch: u32,
}

impl PageLabel {
    pub fn new(counter: u32, col_batch: u32) -> Self {
        PageLabel { counter, col_batch }
    }
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.col_batch == 0 {
            write!(f, "{}", self.counter)
        } else {
            write!(f, "{}.{}", self.counter, self.col_batch)
        }
    }
}

/// Everything rendered for one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBlock {
    pub label: PageLabel,
    pub table: Table,
}

impl PageBlock {
    /// Table, gap, label, then a page break.
    pub fn into_blocks(self) -> [Block; 4] {
        [
            Block::Table(self.table),
            Block::Spacer(LABEL_GAP),
            Block::Paragraph(format!("Page {}", self.label), ParagraphStyle::default()),
            Block::PageBreak,
        ]
    }
}

/// Cell text of a tile. Row 0 is always the sheet's first row; data rows
/// start at row 2 even when the tile starts at row 1.
pub fn extract_batch<S: Sheet + ?Sized>(sheet: &S, tile: &Tile) -> Vec<Vec<String>> {
    let row_text = |row: u32| -> Vec<String> {
        (tile.col_start..=tile.col_end)
            .map(|col| sheet.cell(row, col).to_string())
            .collect()
    };

    std::iter::once(row_text(1))
        .chain((tile.row_start.max(2)..=tile.row_end).map(row_text))
        .collect()
}

/// Build the page blocks for every tile of `sheet`, in reading order.
pub fn assemble<S: Sheet + ?Sized>(sheet: &S, tiling: &Tiling) -> Vec<PageBlock> {
    let max_row = sheet.max_row();
    let max_col = sheet.max_column();
    let tiles: Vec<Tile> = tiling.tiles(max_row, max_col).collect();

    let (_, pages) = tiles
        .chunk_by(|a, b| a.row_batch == b.row_batch)
        .fold((1, Vec::new()), |(counter, mut pages), row_tiles| {
            for tile in row_tiles {
                let label = PageLabel::new(counter, tile.col_batch);
                debug!(
                    page = %label,
                    rows = ?(tile.row_start, tile.row_end),
                    cols = ?(tile.col_start, tile.col_end),
                    "assembling tile"
                );
                pages.push(PageBlock {
                    label,
                    table: Table {
                        rows: extract_batch(sheet, tile),
                        style: TableStyle::report(),
                    },
                });
            }
            (counter + 1, pages)
        });

    pages
}

/// Flatten page blocks into the writer's block stream.
pub fn into_document_blocks(pages: Vec<PageBlock>) -> Vec<Block> {
    pages.into_iter().flat_map(PageBlock::into_blocks).collect()
}
