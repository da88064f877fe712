// Wingbit Scrolling Text
// Animates a string right-to-left across the 5x5 display

use crate::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::host::{DISPLAY_SIZE, MAX_BRIGHTNESS};

/// Scroll steps per character: the glyph columns plus one blank gap column
pub const CELL_WIDTH: usize = GLYPH_WIDTH + 1;

/// What the renderer draws on
pub trait Canvas {
    fn clear(&mut self);
    fn plot(&mut self, x: usize, y: usize, brightness: u8);
    fn pause(&mut self, ms: u64);
}

/// Scroll `text` through the display, one frame per scroll offset, each
/// frame followed by a `frame_ms` pause. The text enters from the right edge
/// and leaves past the left edge; the display ends cleared. Returns the
/// number of frames drawn.
pub fn scroll_text(canvas: &mut dyn Canvas, text: &str, frame_ms: u64) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let width = DISPLAY_SIZE as i64;
    let cell = CELL_WIDTH as i64;
    let end = chars.len() as i64 * cell;

    let mut frames = 0;
    for offset in -width..end {
        canvas.clear();
        for x in 0..DISPLAY_SIZE {
            let pos = offset + x as i64;
            if pos < 0 {
                continue;
            }
            let column = (pos % cell) as usize;
            if column == GLYPH_WIDTH {
                continue;
            }
            let c = chars.get((pos / cell) as usize).copied().unwrap_or(' ');
            let glyph = font::glyph(c);
            for y in 0..GLYPH_HEIGHT {
                if font::is_lit(glyph, column, y) {
                    canvas.plot(x, y, MAX_BRIGHTNESS);
                }
            }
        }
        canvas.pause(frame_ms);
        frames += 1;
    }

    canvas.clear();
    canvas.pause(frame_ms);
    frames
}
