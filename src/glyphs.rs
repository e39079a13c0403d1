//! Tile face bitmaps.
//!
//! One fixed-height glyph per possible cell code: index 0 is the blank face
//! used for empty cells, indices 1..=13 carry the decimal value 2^n. All 14
//! glyphs live in one flat table of 154 bytes — comfortably under a 256-byte
//! page, so a page-aligned base keeps the high address byte constant and only
//! the low byte of a glyph address ever changes.

/// Scanlines of bitmap data per glyph.
pub const GLYPH_HEIGHT: usize = 11;
/// Number of glyphs: blank plus tiles 2..8192.
pub const GLYPH_COUNT: usize = 14;

/// 3x5 digit font, one row per byte in the low three bits.
const DIGIT_FONT: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b001, 0b001], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

/// The assembled glyph table.
pub struct GlyphTable {
    bytes: [u8; GLYPH_COUNT * GLYPH_HEIGHT],
}

impl GlyphTable {
    /// Compose all 14 faces from the digit font.
    ///
    /// Values up to two digits are drawn on one text row, vertically
    /// centered. Three- and four-digit values split across two stacked text
    /// rows inside the 11-line face (e.g. "10" over "24").
    pub fn new() -> Self {
        let mut bytes = [0u8; GLYPH_COUNT * GLYPH_HEIGHT];
        for exponent in 1..GLYPH_COUNT {
            let mut face = [0u8; GLYPH_HEIGHT];
            draw_value(&mut face, 1u32 << exponent);
            let base = exponent * GLYPH_HEIGHT;
            bytes[base..base + GLYPH_HEIGHT].copy_from_slice(&face);
        }
        GlyphTable { bytes }
    }

    /// Read one bitmap byte of a glyph, addressed by its low-byte offset into
    /// the table plus a line index within the face.
    pub fn byte(&self, offset: u8, line: usize) -> u8 {
        debug_assert!(line < GLYPH_HEIGHT);
        self.bytes[offset as usize + line]
    }

    /// The raw table, for tests and debugging.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a tile value into an 8-pixel-wide face.
fn draw_value(face: &mut [u8; GLYPH_HEIGHT], value: u32) {
    let digits = decimal_digits(value);
    match digits.len() {
        1 => blit_digit(face, digits[0], 2, 3),
        2 => {
            blit_digit(face, digits[0], 0, 3);
            blit_digit(face, digits[1], 4, 3);
        }
        // Two digits on top, the rest below.
        3 => {
            blit_digit(face, digits[0], 0, 0);
            blit_digit(face, digits[1], 4, 0);
            blit_digit(face, digits[2], 2, 6);
        }
        _ => {
            blit_digit(face, digits[0], 0, 0);
            blit_digit(face, digits[1], 4, 0);
            blit_digit(face, digits[2], 0, 6);
            blit_digit(face, digits[3], 4, 6);
        }
    }
}

fn decimal_digits(mut value: u32) -> Vec<usize> {
    let mut digits = Vec::new();
    while value > 0 {
        digits.push((value % 10) as usize);
        value /= 10;
    }
    digits.reverse();
    digits
}

/// OR a 3x5 digit into the face with its left edge at column `x` (bit 7 is
/// the leftmost pixel) and its top at line `y`.
fn blit_digit(face: &mut [u8; GLYPH_HEIGHT], digit: usize, x: usize, y: usize) {
    debug_assert!(x <= 5 && y + 5 <= GLYPH_HEIGHT);
    for (i, row) in DIGIT_FONT[digit].iter().enumerate() {
        face[y + i] |= row << (5 - x);
    }
}
