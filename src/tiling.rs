use serde::Serialize;

/// Columns a page is laid out for before the sheet's own width is considered.
pub const NOMINAL_COLUMNS_PER_PAGE: u32 = 8;

/// Data rows per page.
pub const ROWS_PER_PAGE: u32 = 30;

/// How a sheet is cut into pages along both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tiling {
    pub cols_per_page: u32,
    pub col_batch_count: u32,
    pub rows_per_page: u32,
    pub row_batch_count: u32,
    /// Page width divided by the nominal column count. Reported only; the
    /// table sizes its columns from their content.
    pub column_width_hint: f32,
}

/// A rectangular slice of the sheet rendered on one page. All bounds are
/// 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub row_batch: u32,
    pub col_batch: u32,
    pub row_start: u32,
    pub row_end: u32,
    pub col_start: u32,
    pub col_end: u32,
}

impl Tiling {
    /// Compute the tiling for a sheet of `max_row` x `max_col` cells.
    ///
    /// A sheet with no rows or no columns gets zero batches on both axes.
    pub fn compute(max_col: u32, max_row: u32, page_width: f32) -> Self {
        let column_width_hint = page_width / NOMINAL_COLUMNS_PER_PAGE as f32;

        if max_col == 0 || max_row == 0 {
            return Tiling {
                cols_per_page: 0,
                col_batch_count: 0,
                rows_per_page: ROWS_PER_PAGE,
                row_batch_count: 0,
                column_width_hint,
            };
        }

        let cols_per_page = NOMINAL_COLUMNS_PER_PAGE.min(max_col);
        Tiling {
            cols_per_page,
            col_batch_count: max_col.div_ceil(cols_per_page),
            rows_per_page: ROWS_PER_PAGE,
            row_batch_count: max_row.div_ceil(ROWS_PER_PAGE),
            column_width_hint,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_batch_count == 0 || self.col_batch_count == 0
    }

    pub fn tile_count(&self) -> u32 {
        self.row_batch_count * self.col_batch_count
    }

    /// Iterate every tile, all column batches of a row batch before the next
    /// row batch.
    pub fn tiles(&self, max_row: u32, max_col: u32) -> impl Iterator<Item = Tile> + '_ {
        (0..self.row_batch_count).flat_map(move |row_batch| {
            let (row_start, row_end) = batch_bounds(row_batch, self.rows_per_page, max_row);
            (0..self.col_batch_count).map(move |col_batch| {
                let (col_start, col_end) = batch_bounds(col_batch, self.cols_per_page, max_col);
                Tile {
                    row_batch,
                    col_batch,
                    row_start,
                    row_end,
                    col_start,
                    col_end,
                }
            })
        })
    }
}

/// 1-based inclusive bounds of batch `batch_index` when `max_items` are cut
/// into runs of `items_per_page`.
pub fn batch_bounds(batch_index: u32, items_per_page: u32, max_items: u32) -> (u32, u32) {
    let start = batch_index * items_per_page + 1;
    let end = ((batch_index + 1) * items_per_page).min(max_items);
    (start, end)
}
