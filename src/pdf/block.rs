/// Standard Type1 fonts available to every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    pub const ALL: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

    pub fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Key under /Resources /Font
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }
}

/// DeviceRGB color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const GREY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const WHITE_SMOKE: Color = Color::rgb(0.96, 0.96, 0.96);
    pub const BEIGE: Color = Color::rgb(0.96, 0.96, 0.86);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Look of one region of a table (header or body).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub font: Font,
    pub font_size: f32,
    pub text_color: Color,
    pub background: Option<Color>,
    pub padding: Padding,
}

impl CellStyle {
    pub fn leading(&self) -> f32 {
        self.font_size * 1.2
    }

    pub fn row_height(&self) -> f32 {
        self.leading() + self.padding.top + self.padding.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    /// Applied to row 0.
    pub header: CellStyle,
    /// Applied to every other row.
    pub body: CellStyle,
    pub grid: Option<Grid>,
    /// Minimum width of a column, padding included.
    pub min_column_width: f32,
}

impl TableStyle {
    /// Bold grey header with light text over beige body rows, every cell
    /// centered and boxed by a 1pt black grid.
    pub fn report() -> Self {
        TableStyle {
            header: CellStyle {
                font: Font::HelveticaBold,
                font_size: 12.0,
                text_color: Color::WHITE_SMOKE,
                background: Some(Color::GREY),
                padding: Padding {
                    top: 3.0,
                    bottom: 12.0,
                    left: 6.0,
                    right: 6.0,
                },
            },
            body: CellStyle {
                font: Font::Helvetica,
                font_size: 10.0,
                text_color: Color::BLACK,
                background: Some(Color::BEIGE),
                padding: Padding {
                    top: 1.5,
                    bottom: 1.5,
                    left: 6.0,
                    right: 6.0,
                },
            },
            grid: Some(Grid {
                width: 1.0,
                color: Color::BLACK,
            }),
            min_column_width: 24.0,
        }
    }

    pub fn row_style(&self, row: usize) -> &CellStyle {
        if row == 0 {
            &self.header
        } else {
            &self.body
        }
    }
}

/// Row-major cell text; row 0 is the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font: Font,
    pub font_size: f32,
    pub leading: f32,
    pub color: Color,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        ParagraphStyle {
            font: Font::Helvetica,
            font_size: 10.0,
            leading: 12.0,
            color: Color::BLACK,
        }
    }
}

/// One unit of flowing document content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Table(Table),
    Spacer(f32),
    Paragraph(String, ParagraphStyle),
    PageBreak,
}
