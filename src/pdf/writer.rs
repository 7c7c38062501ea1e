use super::block::{Block, CellStyle, Color, Font, Grid, ParagraphStyle, Table};
use super::metrics::{encoded_width, fit_text, text_width};
use crate::error::ConvertError;
use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US letter, portrait.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn landscape(self) -> Self {
        if self.width < self.height {
            PageSize {
                width: self.height,
                height: self.width,
            }
        } else {
            self
        }
    }
}

/// Lays a flat list of blocks out on fixed-size pages and serializes the
/// result as a PDF.
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    page_size: PageSize,
    margin: f32,
    title: String,
    compress: bool,
}

impl DocumentWriter {
    pub fn new(page_size: PageSize) -> Self {
        DocumentWriter {
            page_size,
            margin: 36.0,
            title: String::new(),
            compress: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Width between the left and right margins.
    pub fn usable_width(&self) -> f32 {
        self.page_size.width - 2.0 * self.margin
    }

    /// Flow `blocks` onto pages, returning the drawing operations of each.
    /// There is always at least one page.
    pub fn layout(&self, blocks: &[Block]) -> Vec<Vec<Operation>> {
        let mut frame = Frame::new(self);
        for block in blocks {
            match block {
                Block::Table(table) => frame.place_table(table),
                Block::Spacer(height) => frame.place_spacer(*height),
                Block::Paragraph(text, style) => frame.place_paragraph(text, style),
                Block::PageBreak => frame.break_page(),
            }
        }
        frame.finish()
    }

    /// Build the complete in-memory document.
    pub fn render(&self, blocks: &[Block]) -> Result<Document, ConvertError> {
        let pages = self.layout(blocks);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                self.page_size.width.into(),
                self.page_size.height.into(),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Title" => text_string(&self.title),
            "Producer" => Object::string_literal(concat!("sheetpdf ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(Local::now().format("D:%Y%m%d%H%M%S").to_string()),
        });
        doc.trailer.set("Info", info_id);

        if self.compress {
            doc.compress();
        }

        Ok(doc)
    }

    /// Render and save to `path`, returning the number of pages written.
    ///
    /// The file is written next to `path` under a temporary name and moved
    /// into place once complete; on failure nothing lands at `path`.
    pub fn write(&self, blocks: &[Block], path: &Path) -> Result<usize, ConvertError> {
        let mut doc = self.render(blocks)?;
        let page_count = doc.get_pages().len();

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|e| ConvertError::write_failed(path, e))?;

        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            doc.save_to(&mut out)
                .map_err(|e| ConvertError::write_failed(path, io::Error::other(e.to_string())))?;
            out.flush()
                .map_err(|e| ConvertError::write_failed(path, e))?;
        }

        tmp.persist(path)
            .map_err(|e| ConvertError::write_failed(path, e.error))?;

        debug!(path = %path.display(), pages = page_count, "saved PDF");
        Ok(page_count)
    }
}

/// Layout cursor over the page currently being filled.
struct Frame<'a> {
    writer: &'a DocumentWriter,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
    has_content: bool,
}

impl<'a> Frame<'a> {
    fn new(writer: &'a DocumentWriter) -> Self {
        Frame {
            writer,
            pages: Vec::new(),
            ops: Vec::new(),
            y: writer.page_size.height - writer.margin,
            has_content: false,
        }
    }

    fn remaining(&self) -> f32 {
        self.y - self.writer.margin
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = self.writer.page_size.height - self.writer.margin;
        self.has_content = false;
    }

    fn break_page(&mut self) {
        if self.has_content {
            self.new_page();
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if self.has_content || self.pages.is_empty() {
            self.pages.push(self.ops);
        }
        self.pages
    }

    fn place_spacer(&mut self, height: f32) {
        if !self.has_content {
            return;
        }
        if height > self.remaining() {
            self.new_page();
        } else {
            self.y -= height;
        }
    }

    fn place_paragraph(&mut self, text: &str, style: &ParagraphStyle) {
        if style.leading > self.remaining() && self.has_content {
            self.new_page();
        }
        let bytes = fit_text(text, style.font, style.font_size, self.writer.usable_width());
        let baseline = self.y - style.font_size;
        show_text(
            &mut self.ops,
            style.font,
            style.font_size,
            style.color,
            self.writer.margin,
            baseline,
            bytes,
        );
        self.y -= style.leading;
        self.has_content = true;
    }

    fn place_table(&mut self, table: &Table) {
        let widths = column_widths(table, self.writer.usable_width());
        let total: f32 = widths.iter().sum();
        let x = self.writer.margin + (self.writer.usable_width() - total).max(0.0) / 2.0;

        for (index, row) in table.rows.iter().enumerate() {
            let height = table.style.row_style(index).row_height();
            if height > self.remaining() && self.has_content {
                self.new_page();
                // Continuation pages repeat the header
                if index > 0 {
                    if let Some(header) = table.rows.first() {
                        self.draw_row(table, 0, header, &widths, x);
                    }
                }
            }
            self.draw_row(table, index, row, &widths, x);
        }
    }

    fn draw_row(&mut self, table: &Table, index: usize, row: &[String], widths: &[f32], x: f32) {
        let style = table.style.row_style(index);
        let height = style.row_height();
        let bottom = self.y - height;

        let mut cell_x = x;
        for (column, &width) in widths.iter().enumerate() {
            if let Some(background) = style.background {
                fill_rect(&mut self.ops, cell_x, bottom, width, height, background);
            }
            let text = row.get(column).map(String::as_str).unwrap_or("");
            if !text.is_empty() {
                draw_cell_text(&mut self.ops, style, text, cell_x, bottom, width);
            }
            if let Some(grid) = &table.style.grid {
                stroke_rect(&mut self.ops, cell_x, bottom, width, height, grid);
            }
            cell_x += width;
        }

        self.y = bottom;
        self.has_content = true;
    }
}

/// Natural column widths, scaled down together when they overflow
/// `available`.
/// A PDF text string: literal when plain ASCII, otherwise UTF-16BE with a
/// byte order mark so viewers decode it correctly.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn column_widths(table: &Table, available: f32) -> Vec<f32> {
    let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![table.style.min_column_width; columns];

    for (index, row) in table.rows.iter().enumerate() {
        let style = table.style.row_style(index);
        for (column, text) in row.iter().enumerate() {
            let width = text_width(text, style.font, style.font_size)
                + style.padding.left
                + style.padding.right;
            widths[column] = widths[column].max(width);
        }
    }

    let total: f32 = widths.iter().sum();
    if total > available && total > 0.0 {
        let scale = available / total;
        for width in &mut widths {
            *width *= scale;
        }
    }
    widths
}

fn draw_cell_text(
    ops: &mut Vec<Operation>,
    style: &CellStyle,
    text: &str,
    cell_x: f32,
    bottom: f32,
    width: f32,
) {
    let inner = (width - style.padding.left - style.padding.right).max(0.0);
    let bytes = fit_text(text, style.font, style.font_size, inner);
    let text_width = encoded_width(&bytes, style.font, style.font_size);
    let x = cell_x + (width - text_width) / 2.0;
    let baseline = bottom + style.padding.bottom + 0.2 * style.font_size;
    show_text(
        ops,
        style.font,
        style.font_size,
        style.text_color,
        x,
        baseline,
        bytes,
    );
}

fn set_fill_color(ops: &mut Vec<Operation>, color: Color) {
    ops.push(Operation::new(
        "rg",
        vec![color.r.into(), color.g.into(), color.b.into()],
    ));
}

fn rect(ops: &mut Vec<Operation>, x: f32, y: f32, width: f32, height: f32) {
    ops.push(Operation::new(
        "re",
        vec![x.into(), y.into(), width.into(), height.into()],
    ));
}

fn fill_rect(ops: &mut Vec<Operation>, x: f32, y: f32, width: f32, height: f32, color: Color) {
    set_fill_color(ops, color);
    rect(ops, x, y, width, height);
    ops.push(Operation::new("f", vec![]));
}

fn stroke_rect(ops: &mut Vec<Operation>, x: f32, y: f32, width: f32, height: f32, grid: &Grid) {
    ops.push(Operation::new(
        "RG",
        vec![grid.color.r.into(), grid.color.g.into(), grid.color.b.into()],
    ));
    ops.push(Operation::new("w", vec![grid.width.into()]));
    rect(ops, x, y, width, height);
    ops.push(Operation::new("S", vec![]));
}

fn show_text(
    ops: &mut Vec<Operation>,
    font: Font,
    size: f32,
    color: Color,
    x: f32,
    y: f32,
    bytes: Vec<u8>,
) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![font.resource_name().into(), size.into()],
    ));
    set_fill_color(ops, color);
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(bytes, StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}
