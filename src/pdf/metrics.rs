use super::block::Font;

// Advance widths in 1/1000 em for printable ASCII (0x20..=0x7E), taken
// from the Adobe AFM files for the standard 14 fonts.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const DEFAULT_WIDTH: u16 = 556;

fn glyph_width(font: Font, byte: u8) -> u16 {
    let table = match font {
        Font::Helvetica => &HELVETICA,
        Font::HelveticaBold => &HELVETICA_BOLD,
    };
    match byte {
        0x20..=0x7E => table[(byte - 0x20) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Encode text for a simple font using WinAnsiEncoding. Characters the
/// encoding lacks become `?`, control characters become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            c if c.is_control() => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

/// Width in points of already-encoded text.
pub fn encoded_width(bytes: &[u8], font: Font, size: f32) -> f32 {
    let units: u32 = bytes.iter().map(|&b| glyph_width(font, b) as u32).sum();
    units as f32 * size / 1000.0
}

/// Width in points of `text` set in `font` at `size`.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    encoded_width(&encode_win_ansi(text), font, size)
}

/// Encode `text` and cut it down, marking the cut with `...`, until it fits
/// in `max_width` points. Nothing is drawn when even the marker overflows.
pub fn fit_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<u8> {
    let mut bytes = encode_win_ansi(text);
    if encoded_width(&bytes, font, size) <= max_width {
        return bytes;
    }

    let ellipsis: u32 = b"...".iter().map(|&b| glyph_width(font, b) as u32).sum();
    let fits = |units: u32| units as f32 * size / 1000.0 <= max_width;
    if !fits(ellipsis) {
        return Vec::new();
    }

    let mut units = ellipsis;
    let mut cut = 0;
    for &byte in &bytes {
        let next = units + glyph_width(font, byte) as u32;
        if !fits(next) {
            break;
        }
        units = next;
        cut += 1;
    }

    bytes.truncate(cut);
    bytes.extend_from_slice(b"...");
    bytes
}
