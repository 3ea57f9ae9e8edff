use chordlab_core::render::Grid;
use chordlab_core::sinks::{IlluminationSink, PresentationSink};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor};
use std::io::{self, Write};
use tracing::warn;

/// Prints per-trial notifications as console lines. Raw mode is active
/// during a session, hence the explicit carriage returns.
pub struct ConsolePresenter;

impl PresentationSink for ConsolePresenter {
    fn command(&mut self, text: &str) {
        print!(">> {}\r\n", text);
        let _ = io::stdout().flush();
    }

    fn result(&mut self, text: &str) {
        // Empty result lines clear a UI; the console just skips them.
        if text.is_empty() {
            return;
        }
        print!("   {}\r\n", text);
        let _ = io::stdout().flush();
    }
}

/// Draws the backlight grid as colored terminal cells. Frames arrive on
/// every render tick; identical consecutive frames are skipped so the
/// terminal only scrolls when the board actually changes.
pub struct AnsiBoard {
    last: Option<Grid>,
}

impl AnsiBoard {
    pub fn new() -> Self {
        Self { last: None }
    }

    fn paint(grid: &Grid) -> io::Result<()> {
        let mut out = io::stdout();
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let cell = grid.get(row, col);
                queue!(
                    out,
                    SetBackgroundColor(Color::Rgb {
                        r: cell.red,
                        g: cell.green,
                        b: cell.blue,
                    }),
                    Print("  ")
                )?;
            }
            queue!(out, ResetColor, Print("\r\n"))?;
        }
        queue!(out, Print("\r\n"))?;
        out.flush()
    }
}

impl IlluminationSink for AnsiBoard {
    fn apply(&mut self, grid: &Grid) {
        if self.last.as_ref() == Some(grid) {
            return;
        }
        if let Err(e) = Self::paint(grid) {
            warn!("board paint failed: {}", e);
        }
        self.last = Some(grid.clone());
    }
}
