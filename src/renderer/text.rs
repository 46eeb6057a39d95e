//! Plain-text renderer for terminals
//!
//! Snaps every sprite to its nearest cell and prints the board as a table.
//! In-flight frames are skipped unless `show_motion` is set.

use std::io::{self, Write};

use crossterm::QueueableCommand;
use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};

use super::{Frame, Overlay, RenderSink};
use crate::nearest_cell;

const MIN_CELL_WIDTH: usize = 4;

pub struct TextRenderer<W: Write> {
    out: W,
    rows: usize,
    cols: usize,
    cell_size: i32,
    /// Also print frames captured mid-slide
    pub show_motion: bool,
    /// Clear the terminal and home the cursor before each frame
    pub clear_screen: bool,
    /// Output goes to a raw-mode terminal, so lines end in CRLF
    pub raw_mode: bool,
    /// Printed under every frame
    pub footer: Option<String>,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, rows: usize, cols: usize, cell_size: i32) -> Self {
        Self {
            out,
            rows,
            cols,
            cell_size,
            show_motion: false,
            clear_screen: false,
            raw_mode: false,
            footer: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Format a frame as text without writing it
    pub fn draw(&self, frame: &Frame) -> String {
        let mut board = vec![vec![0u32; self.cols]; self.rows];
        for sprite in &frame.tiles {
            let (row, col) = nearest_cell(sprite.pos, self.cell_size);
            if row < 0 || col < 0 {
                continue;
            }
            let (row, col) = (row as usize, col as usize);
            if row < self.rows && col < self.cols {
                // Sprites arrive smallest first, so larger values win shared cells
                board[row][col] = sprite.value;
            }
        }

        let width = frame
            .tiles
            .iter()
            .map(|t| t.value.to_string().len())
            .max()
            .unwrap_or(0)
            .max(MIN_CELL_WIDTH);
        let border = format!("+{}+\n", vec!["-".repeat(width + 2); self.cols].join("+"));

        let mut text = String::new();
        text.push_str(&border);
        for row in &board {
            let cells: Vec<String> = row
                .iter()
                .map(|&v| {
                    if v == 0 {
                        format!(" {:>width$} ", "")
                    } else {
                        format!(" {v:>width$} ")
                    }
                })
                .collect();
            text.push_str(&format!("|{}|\n", cells.join("|")));
            text.push_str(&border);
        }

        match frame.overlay {
            Overlay::None => {}
            Overlay::Won => text.push_str("You won! [r] restart  [c] keep playing\n"),
            Overlay::Lost => text.push_str("Game over! [r] restart\n"),
        }
        text
    }

    fn write_frame(&mut self, text: &str) -> io::Result<()> {
        if self.clear_screen {
            self.out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
        }
        if self.raw_mode {
            self.out.write_all(text.replace('\n', "\r\n").as_bytes())?;
        } else {
            self.out.write_all(text.as_bytes())?;
        }
        self.out.flush()
    }
}

impl<W: Write> RenderSink for TextRenderer<W> {
    fn render(&mut self, frame: &Frame) {
        if !frame.settled && !self.show_motion {
            return;
        }
        let mut text = self.draw(frame);
        if let Some(footer) = &self.footer {
            text.push_str(footer);
            text.push('\n');
        }
        if let Err(e) = self.write_frame(&text) {
            log::warn!("Render error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Grid;

    #[test]
    fn test_draw_settled_grid() {
        let grid = Grid::from_rows(&[[2, 0], [0, 2048]], 100);
        let renderer = TextRenderer::new(Vec::new(), 2, 2, 100);
        let text = renderer.draw(&Frame::from_grid(&grid, Overlay::None));
        assert_eq!(
            text,
            "+------+------+\n\
             |    2 |      |\n\
             +------+------+\n\
             |      | 2048 |\n\
             +------+------+\n"
        );
    }

    #[test]
    fn test_overlay_text() {
        let grid = Grid::from_rows(&[[2]], 100);
        let renderer = TextRenderer::new(Vec::new(), 1, 1, 100);
        assert!(renderer.draw(&Frame::from_grid(&grid, Overlay::Won)).contains("You won!"));
        assert!(renderer.draw(&Frame::from_grid(&grid, Overlay::Lost)).contains("Game over!"));
    }

    #[test]
    fn test_raw_terminal_output() {
        let grid = Grid::from_rows(&[[2]], 100);
        let mut renderer = TextRenderer::new(Vec::new(), 1, 1, 100);
        renderer.clear_screen = true;
        renderer.raw_mode = true;
        renderer.footer = Some("q quit".to_string());
        renderer.render(&Frame::from_grid(&grid, Overlay::None));

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.starts_with("\x1b[2J"));
        assert!(out.ends_with("+------+\r\nq quit\r\n"));
        assert!(!out.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_skips_motion_frames_by_default() {
        let mut renderer = TextRenderer::new(Vec::new(), 1, 1, 100);
        let moving = Frame {
            settled: false,
            ..Frame::default()
        };
        renderer.render(&moving);
        assert!(renderer.out.is_empty());

        renderer.show_motion = true;
        renderer.render(&moving);
        assert!(!renderer.into_inner().is_empty());
    }
}
