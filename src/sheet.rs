use crate::error::ConvertError;
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// A cell's value as the report sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => {
                // Whole numbers print without a trailing ".0"
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Date(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(n) => CellValue::Number(*n),
            Data::Int(n) => CellValue::Number(*n as f64),
            Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Data::Error(e) => CellValue::Text(e.to_string()),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(dt) => CellValue::Date(dt),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Read access to a grid of cells addressed by 1-based row and column.
pub trait Sheet {
    fn max_row(&self) -> u32;
    fn max_column(&self) -> u32;
    fn cell(&self, row: u32, column: u32) -> CellValue;
}

/// The first worksheet of a workbook, fully loaded into memory.
pub struct Worksheet {
    name: String,
    range: Range<Data>,
}

impl Worksheet {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let malformed = |reason: String| ConvertError::InputMalformed {
            path: path.to_path_buf(),
            reason,
        };

        // calamine nests the io error under a per-format variant, so check
        // existence up front to keep "not found" distinct from "unreadable".
        match path.try_exists() {
            Ok(true) => {}
            Ok(false) => {
                return Err(ConvertError::InputNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(malformed(e.to_string())),
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| malformed(e.to_string()))?;

        let name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| malformed("workbook contains no sheets".to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| malformed("workbook contains no sheets".to_string()))?
            .map_err(|e| malformed(format!("sheet '{}': {}", name, e)))?;

        debug!(sheet = %name, size = ?range.get_size(), "loaded worksheet");
        Ok(Worksheet { name, range })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Sheet for Worksheet {
    // The range may start past A1; its end is an absolute position, so the
    // extent counts from the top-left corner of the sheet.
    fn max_row(&self) -> u32 {
        self.range.end().map_or(0, |(row, _)| row + 1)
    }

    fn max_column(&self) -> u32 {
        self.range.end().map_or(0, |(_, col)| col + 1)
    }

    fn cell(&self, row: u32, column: u32) -> CellValue {
        if row == 0 || column == 0 {
            return CellValue::Empty;
        }
        self.range
            .get_value((row - 1, column - 1))
            .map_or(CellValue::Empty, CellValue::from)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Formula, Workbook};

    /// In-memory sheet for driving the report without a workbook on disk.
    pub(crate) struct GridSheet {
        pub rows: Vec<Vec<CellValue>>,
    }

    impl GridSheet {
        /// A `rows` x `cols` grid whose header cells read `H{col}` and whose
        /// body cells read `R{row}C{col}`.
        pub fn labelled(rows: u32, cols: u32) -> Self {
            let rows = (1..=rows)
                .map(|r| {
                    (1..=cols)
                        .map(|c| {
                            if r == 1 {
                                CellValue::Text(format!("H{}", c))
                            } else {
                                CellValue::Text(format!("R{}C{}", r, c))
                            }
                        })
                        .collect()
                })
                .collect();
            GridSheet { rows }
        }
    }

    impl Sheet for GridSheet {
        fn max_row(&self) -> u32 {
            self.rows.len() as u32
        }

        fn max_column(&self) -> u32 {
            self.rows.iter().map(Vec::len).max().unwrap_or(0) as u32
        }

        fn cell(&self, row: u32, column: u32) -> CellValue {
            self.rows
                .get(row as usize - 1)
                .and_then(|r| r.get(column as usize - 1))
                .cloned()
                .unwrap_or(CellValue::Empty)
        }
    }

    #[test]
    fn test_number_display() {
        assert_eq!(CellValue::Number(5.0).to_string(), "5");
        assert_eq!(CellValue::Number(-12.0).to_string(), "-12");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Number(0.1).to_string(), "0.1");
        assert_eq!(CellValue::Number(1e20).to_string(), "100000000000000000000");
    }

    #[test]
    fn test_date_display() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            CellValue::Date(date.and_time(NaiveTime::MIN)).to_string(),
            "2024-03-09"
        );
        assert_eq!(
            CellValue::Date(date.and_hms_opt(14, 5, 0).unwrap()).to_string(),
            "2024-03-09 14:05:00"
        );
    }

    #[test]
    fn test_from_data() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
        assert_eq!(CellValue::from(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            CellValue::from(&Data::Bool(true)),
            CellValue::Text("TRUE".to_string())
        );
        assert_eq!(
            CellValue::from(&Data::DateTimeIso("2023-11-02".to_string())),
            CellValue::Date(
                NaiveDate::from_ymd_opt(2023, 11, 2)
                    .unwrap()
                    .and_time(NaiveTime::MIN)
            )
        );
        assert_eq!(
            CellValue::from(&Data::DurationIso("PT1H".to_string())),
            CellValue::Text("PT1H".to_string())
        );
    }

    #[test]
    fn test_cell_error_code() {
        assert_eq!(
            CellValue::from(&Data::Error(calamine::CellErrorType::Div0)).to_string(),
            "#DIV/0!"
        );
    }

    #[test]
    fn test_load_dates_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typed.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let date = ExcelDateTime::from_ymd(2024, 3, 9).unwrap();
        sheet.write_string(0, 0, "When").unwrap();
        sheet.write_string(0, 1, "Ratio").unwrap();
        sheet
            .write_datetime_with_format(1, 0, &date, &date_format)
            .unwrap();
        sheet
            .write_formula(1, 1, Formula::new("=1/0").set_result("#DIV/0!"))
            .unwrap();
        workbook.save(&path).unwrap();

        let sheet = Worksheet::load(&path).unwrap();
        assert!(matches!(sheet.cell(2, 1), CellValue::Date(_)));
        assert_eq!(sheet.cell(2, 1).to_string(), "2024-03-09");
        assert_eq!(sheet.cell(2, 2).to_string(), "#DIV/0!");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_path_is_not_reported_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, b"").unwrap();
        // A path through a regular file fails to stat with ENOTDIR
        let err = Worksheet::load(file.join("input.xlsx")).err().unwrap();
        assert!(matches!(err, ConvertError::InputMalformed { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Worksheet::load(dir.path().join("missing.xlsx")).err().unwrap();
        assert!(matches!(err, ConvertError::InputNotFound { .. }));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();
        let err = Worksheet::load(&path).err().unwrap();
        assert!(matches!(err, ConvertError::InputMalformed { .. }));
    }

    #[test]
    fn test_load_first_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet().set_name("Data").unwrap();
        first.write_string(0, 0, "Name").unwrap();
        first.write_string(0, 1, "Qty").unwrap();
        first.write_string(1, 0, "bolts").unwrap();
        first.write_number(1, 1, 40.0).unwrap();
        first.write_number(2, 1, 2.25).unwrap();
        let second = workbook.add_worksheet().set_name("Other").unwrap();
        second.write_string(9, 9, "ignored").unwrap();
        workbook.save(&path).unwrap();

        let sheet = Worksheet::load(&path).unwrap();
        assert_eq!(sheet.name(), "Data");
        assert_eq!(sheet.max_row(), 3);
        assert_eq!(sheet.max_column(), 2);
        assert_eq!(sheet.cell(1, 2).to_string(), "Qty");
        assert_eq!(sheet.cell(2, 2).to_string(), "40");
        assert_eq!(sheet.cell(3, 2).to_string(), "2.25");
        assert_eq!(sheet.cell(3, 1), CellValue::Empty);
        assert_eq!(sheet.cell(50, 50), CellValue::Empty);
    }

    #[test]
    fn test_extent_counts_from_a1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(3, 2, "late").unwrap();
        workbook.save(&path).unwrap();

        let sheet = Worksheet::load(&path).unwrap();
        assert_eq!(sheet.max_row(), 4);
        assert_eq!(sheet.max_column(), 3);
        assert_eq!(sheet.cell(4, 3).to_string(), "late");
        assert_eq!(sheet.cell(1, 1), CellValue::Empty);
    }
}
