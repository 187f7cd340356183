use anyhow::Result;

use crate::food::Food;
use crate::grid::{Cell, Direction};
use crate::snake::Snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub border: Rgb,
    pub food: Rgb,
    pub snake: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Rgb::new(0, 0, 0),
            border: Rgb::new(93, 216, 228),
            food: Rgb::new(255, 0, 0),
            snake: Rgb::new(0, 255, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Direction),
}

/// Something the game can paint grid cells on.
pub trait Surface {
    fn clear(&mut self, color: Rgb) -> Result<()>;

    fn draw_cell(&mut self, cell: Cell, fill: Rgb, border: Rgb) -> Result<()>;

    /// Shows everything drawn since the last `clear`.
    fn present(&mut self) -> Result<()>;
}

pub trait InputSource {
    /// Returns the events that arrived since the last call, at most `max` of
    /// them; the rest stay queued. Must not block.
    fn poll_events(&mut self, max: usize) -> Result<Vec<InputEvent>>;
}

/// Game objects that know how to paint themselves.
pub trait Drawable {
    fn draw(&self, surface: &mut dyn Surface, palette: &Palette) -> Result<()>;
}

impl Drawable for Food {
    fn draw(&self, surface: &mut dyn Surface, palette: &Palette) -> Result<()> {
        surface.draw_cell(self.position(), palette.food, palette.border)
    }
}

impl Drawable for Snake {
    fn draw(&self, surface: &mut dyn Surface, palette: &Palette) -> Result<()> {
        for &cell in self.body() {
            surface.draw_cell(cell, palette.snake, palette.border)?;
        }
        Ok(())
    }
}
