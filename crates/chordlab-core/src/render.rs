use crate::combos::CombinationIndex;
use crate::engine::{Phase, TrialEngine};
use serde::{Deserialize, Serialize};

/// A single backlight color. Value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// The four colors a session paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Every cell not otherwise addressed.
    pub idle: Rgb,
    /// The key currently held while its chord is incomplete.
    pub active: Rgb,
    /// Partner keys that would complete some chord with the held key.
    pub hint: Rgb,
    /// Both keys once a chord has been entered.
    pub pressed: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            idle: Rgb::WHITE,
            active: Rgb::BLUE,
            hint: Rgb::GREEN,
            pressed: Rgb::GREEN,
        }
    }
}

/// A full rows x cols color frame. A fresh grid is produced per render and
/// handed to the illumination sink; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Rgb>,
}

impl Grid {
    pub fn filled(rows: usize, cols: usize, color: Rgb) -> Self {
        Self {
            rows,
            cols,
            cells: vec![color; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Rgb {
        self.cells[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, color: Rgb) {
        self.cells[row * self.cols + col] = color;
    }

    /// Cells whose color differs from `color`.
    pub fn count_not(&self, color: Rgb) -> usize {
        self.cells.iter().filter(|&&c| c != color).count()
    }
}

/// Pure function from engine state to the frame to display. Deterministic
/// given its inputs; never panics, unmapped pressed keys simply keep their
/// cells idle.
#[derive(Debug, Clone)]
pub struct GridRenderer {
    rows: usize,
    cols: usize,
    palette: Palette,
}

impl GridRenderer {
    pub fn new(rows: usize, cols: usize, palette: Palette) -> Self {
        Self {
            rows,
            cols,
            palette,
        }
    }

    pub fn render(
        &self,
        engine: &TrialEngine,
        index: &CombinationIndex,
        lit_enabled: bool,
    ) -> Grid {
        let mut grid = Grid::filled(self.rows, self.cols, self.palette.idle);

        if !lit_enabled {
            return grid;
        }
        if matches!(engine.phase(), Phase::Resting | Phase::Exhausted) {
            return grid;
        }

        let pressed = engine.pressed_keys();
        match pressed {
            [] => {}
            [held] => {
                for partner in index.partners(held) {
                    if let Some((row, col)) = index.cell(partner) {
                        grid.set(row, col, self.palette.hint);
                    }
                }
                if let Some((row, col)) = index.cell(held) {
                    grid.set(row, col, self.palette.active);
                }
            }
            chord => {
                for key in chord {
                    if let Some((row, col)) = index.cell(key) {
                        grid.set(row, col, self.palette.pressed);
                    }
                }
            }
        }

        grid
    }
}
