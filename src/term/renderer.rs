//! TerminalRenderer: flushes the pixel framebuffer to a real terminal.
//!
//! Every terminal row carries two pixel rows via the ▀ half-block (fg = top
//! pixel, bg = bottom pixel). Output is diffed against the previous frame:
//! a row that changed emits one cursor move plus one run spanning exactly
//! the leftmost..rightmost changed columns; untouched rows emit nothing.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::term::fb::PixelBuffer;
use crate::types::Rgb;

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<PixelBuffer>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self { stdout: io::stdout(), last: None }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to repaint everything (unpause, resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a frame, swapping it into internal state.
    ///
    /// Callers keep one `PixelBuffer` and pass it in every frame; buffers
    /// are swapped rather than cloned, exactly one previous frame is kept.
    pub fn draw_swap(&mut self, fb: &mut PixelBuffer) -> Result<()> {
        if fb.width() == 0 || fb.rows() == 0 {
            return Ok(());
        }
        let needs_full = match &self.last {
            None => true,
            Some(prev) => prev.width() != fb.width() || prev.height() != fb.height(),
        };

        if needs_full {
            self.full_redraw(fb)?;
            self.last = Some(fb.clone());
            return Ok(());
        }

        let mut prev = self.last.take().unwrap_or_else(|| fb.clone());
        self.diff_redraw(fb, &prev)?;
        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn full_redraw(&mut self, fb: &PixelBuffer) -> Result<()> {
        self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
        self.stdout.queue(cursor::MoveTo(0, 0))?;

        let mut colors = ColorState::new();
        for row in 0..fb.rows() {
            emit_row_run(&mut self.stdout, fb, row, 0, fb.width() - 1, &mut colors)?;
            if row + 1 < fb.rows() {
                self.stdout.queue(Print("\r\n"))?;
            }
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }

    fn diff_redraw(&mut self, next: &PixelBuffer, prev: &PixelBuffer) -> Result<()> {
        let mut colors = ColorState::new();
        let mut touched = false;

        for row in 0..next.rows() {
            if let Some((left, right)) = row_dirty_span(prev, next, row) {
                self.stdout.queue(cursor::MoveTo(left as u16, row as u16))?;
                emit_row_run(&mut self.stdout, next, row, left, right, &mut colors)?;
                touched = true;
            }
        }

        if touched {
            self.stdout.queue(ResetColor)?;
            self.stdout.flush()?;
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Leftmost and rightmost columns of `row` (a terminal row, i.e. a stacked
/// pixel-row pair) where the buffers disagree. `None` when identical.
pub fn row_dirty_span(
    prev: &PixelBuffer,
    next: &PixelBuffer,
    row: usize,
) -> Option<(usize, usize)> {
    let top = row * 2;
    let bottom = top + 1;
    let w = next.width();

    let differs = |x: usize| {
        prev.get(x, top) != next.get(x, top) || prev.get(x, bottom) != next.get(x, bottom)
    };

    let left = (0..w).find(|&x| differs(x))?;
    let right = (left..w).rev().find(|&x| differs(x)).unwrap_or(left);
    Some((left, right))
}

/// Minimal escape-state tracker: fg/bg set commands are only emitted when
/// the color actually changes within a flush.
struct ColorState {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
}

impl ColorState {
    fn new() -> Self {
        Self { fg: None, bg: None }
    }
}

fn emit_row_run(
    out: &mut io::Stdout,
    fb: &PixelBuffer,
    row: usize,
    left: usize,
    right: usize,
    colors: &mut ColorState,
) -> Result<()> {
    for x in left..=right {
        let top = fb.get(x, row * 2);
        let bottom = fb.get(x, row * 2 + 1);

        if top == bottom {
            // Uniform cell: background + space needs one color, not two.
            if colors.bg != Some(top) {
                out.queue(SetBackgroundColor(to_color(top)))?;
                colors.bg = Some(top);
            }
            out.queue(Print(' '))?;
        } else {
            if colors.fg != Some(top) {
                out.queue(SetForegroundColor(to_color(top)))?;
                colors.fg = Some(top);
            }
            if colors.bg != Some(bottom) {
                out.queue(SetBackgroundColor(to_color(bottom)))?;
                colors.bg = Some(bottom);
            }
            out.queue(Print('\u{2580}'))?; // ▀
        }
    }
    Ok(())
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }
}
