// Wingbit Font
// 5x5 glyphs for printable ASCII, stored column by column

/// One glyph: five column bitmasks, bit `y` set means row `y` is lit.
pub type Glyph = [u8; 5];

/// First code point with a glyph (space).
pub const FIRST_PRINTABLE: u32 = 0x20;
/// Last code point with a glyph (tilde).
pub const LAST_PRINTABLE: u32 = 0x7e;

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 5;

static GLYPHS: [Glyph; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x17, 0x00, 0x00], // '!'
    [0x00, 0x03, 0x00, 0x03, 0x00], // '"'
    [0x0a, 0x1f, 0x0a, 0x1f, 0x0a], // '#'
    [0x12, 0x15, 0x1f, 0x15, 0x09], // '$'
    [0x13, 0x09, 0x04, 0x12, 0x19], // '%'
    [0x0a, 0x15, 0x15, 0x0a, 0x10], // '&'
    [0x02, 0x01, 0x00, 0x00, 0x00], // '\''
    [0x00, 0x0e, 0x11, 0x00, 0x00], // '('
    [0x00, 0x11, 0x0e, 0x00, 0x00], // ')'
    [0x00, 0x0a, 0x04, 0x0a, 0x00], // '*'
    [0x00, 0x04, 0x0e, 0x04, 0x00], // '+'
    [0x00, 0x10, 0x08, 0x00, 0x00], // ','
    [0x00, 0x04, 0x04, 0x04, 0x00], // '-'
    [0x00, 0x00, 0x10, 0x00, 0x00], // '.'
    [0x10, 0x08, 0x04, 0x02, 0x01], // '/'
    [0x0e, 0x11, 0x11, 0x0e, 0x00], // '0'
    [0x00, 0x12, 0x1f, 0x10, 0x00], // '1'
    [0x19, 0x15, 0x15, 0x12, 0x00], // '2'
    [0x09, 0x11, 0x15, 0x0b, 0x00], // '3'
    [0x0c, 0x0a, 0x09, 0x1f, 0x08], // '4'
    [0x17, 0x15, 0x15, 0x15, 0x09], // '5'
    [0x08, 0x14, 0x16, 0x15, 0x08], // '6'
    [0x11, 0x09, 0x05, 0x03, 0x01], // '7'
    [0x0a, 0x15, 0x15, 0x15, 0x0a], // '8'
    [0x02, 0x15, 0x0d, 0x05, 0x02], // '9'
    [0x00, 0x0a, 0x00, 0x00, 0x00], // ':'
    [0x00, 0x10, 0x0a, 0x00, 0x00], // ';'
    [0x00, 0x04, 0x0a, 0x11, 0x00], // '<'
    [0x00, 0x0a, 0x0a, 0x0a, 0x00], // '='
    [0x00, 0x11, 0x0a, 0x04, 0x00], // '>'
    [0x00, 0x01, 0x15, 0x05, 0x02], // '?'
    [0x0e, 0x11, 0x15, 0x09, 0x0e], // '@'
    [0x1e, 0x05, 0x05, 0x1e, 0x00], // 'A'
    [0x1f, 0x15, 0x15, 0x0a, 0x00], // 'B'
    [0x0e, 0x11, 0x11, 0x11, 0x00], // 'C'
    [0x1f, 0x11, 0x11, 0x0e, 0x00], // 'D'
    [0x1f, 0x15, 0x15, 0x11, 0x00], // 'E'
    [0x1f, 0x05, 0x05, 0x01, 0x00], // 'F'
    [0x0e, 0x11, 0x11, 0x15, 0x0c], // 'G'
    [0x1f, 0x04, 0x04, 0x1f, 0x00], // 'H'
    [0x00, 0x11, 0x1f, 0x11, 0x00], // 'I'
    [0x08, 0x11, 0x11, 0x0f, 0x01], // 'J'
    [0x1f, 0x04, 0x0a, 0x11, 0x00], // 'K'
    [0x1f, 0x10, 0x10, 0x10, 0x00], // 'L'
    [0x1f, 0x02, 0x04, 0x02, 0x1f], // 'M'
    [0x1f, 0x02, 0x04, 0x08, 0x1f], // 'N'
    [0x0e, 0x11, 0x11, 0x0e, 0x00], // 'O'
    [0x1f, 0x05, 0x05, 0x02, 0x00], // 'P'
    [0x06, 0x09, 0x09, 0x16, 0x00], // 'Q'
    [0x1f, 0x05, 0x0d, 0x12, 0x00], // 'R'
    [0x12, 0x15, 0x15, 0x09, 0x00], // 'S'
    [0x01, 0x01, 0x1f, 0x01, 0x01], // 'T'
    [0x0f, 0x10, 0x10, 0x0f, 0x00], // 'U'
    [0x07, 0x08, 0x10, 0x08, 0x07], // 'V'
    [0x1f, 0x08, 0x04, 0x08, 0x1f], // 'W'
    [0x1b, 0x04, 0x04, 0x1b, 0x00], // 'X'
    [0x01, 0x02, 0x1c, 0x02, 0x01], // 'Y'
    [0x19, 0x15, 0x13, 0x11, 0x00], // 'Z'
    [0x00, 0x1f, 0x11, 0x11, 0x00], // '['
    [0x01, 0x02, 0x04, 0x08, 0x10], // '\\'
    [0x00, 0x11, 0x11, 0x1f, 0x00], // ']'
    [0x00, 0x02, 0x01, 0x02, 0x00], // '^'
    [0x10, 0x10, 0x10, 0x10, 0x10], // '_'
    [0x00, 0x01, 0x02, 0x00, 0x00], // '`'
    [0x0c, 0x12, 0x12, 0x1e, 0x10], // 'a'
    [0x1f, 0x14, 0x14, 0x08, 0x00], // 'b'
    [0x0c, 0x12, 0x12, 0x12, 0x00], // 'c'
    [0x08, 0x14, 0x14, 0x1f, 0x00], // 'd'
    [0x0e, 0x15, 0x15, 0x12, 0x00], // 'e'
    [0x04, 0x1e, 0x05, 0x01, 0x00], // 'f'
    [0x02, 0x15, 0x15, 0x0f, 0x00], // 'g'
    [0x1f, 0x04, 0x04, 0x18, 0x00], // 'h'
    [0x00, 0x1d, 0x00, 0x00, 0x00], // 'i'
    [0x08, 0x10, 0x10, 0x0d, 0x00], // 'j'
    [0x1f, 0x04, 0x0a, 0x10, 0x00], // 'k'
    [0x00, 0x0f, 0x10, 0x10, 0x00], // 'l'
    [0x1e, 0x02, 0x04, 0x02, 0x1c], // 'm'
    [0x1e, 0x02, 0x02, 0x1c, 0x00], // 'n'
    [0x0c, 0x12, 0x12, 0x0c, 0x00], // 'o'
    [0x1e, 0x0a, 0x0a, 0x04, 0x00], // 'p'
    [0x04, 0x0a, 0x0a, 0x1e, 0x00], // 'q'
    [0x1c, 0x02, 0x02, 0x02, 0x00], // 'r'
    [0x10, 0x14, 0x0a, 0x02, 0x00], // 's'
    [0x00, 0x0f, 0x14, 0x14, 0x00], // 't'
    [0x0e, 0x10, 0x10, 0x1e, 0x00], // 'u'
    [0x06, 0x08, 0x10, 0x08, 0x06], // 'v'
    [0x0e, 0x10, 0x0c, 0x10, 0x0e], // 'w'
    [0x12, 0x0c, 0x0c, 0x12, 0x00], // 'x'
    [0x12, 0x14, 0x08, 0x04, 0x02], // 'y'
    [0x12, 0x1a, 0x16, 0x12, 0x00], // 'z'
    [0x04, 0x0e, 0x11, 0x11, 0x00], // '{'
    [0x00, 0x1f, 0x00, 0x00, 0x00], // '|'
    [0x11, 0x11, 0x0e, 0x04, 0x00], // '}'
    [0x08, 0x04, 0x04, 0x08, 0x08], // '~'
];

/// Look up the glyph for `c`, falling back to a blank space for anything
/// outside printable ASCII.
pub fn glyph(c: char) -> &'static Glyph {
    let code = c as u32;
    if (FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&code) {
        &GLYPHS[(code - FIRST_PRINTABLE) as usize]
    } else {
        &GLYPHS[0]
    }
}

/// True when row `y` of column `column` is lit.
pub fn is_lit(glyph: &Glyph, column: usize, y: usize) -> bool {
    glyph[column] & (1 << y) != 0
}
