//! Snake on a wrap-around grid.
//!
//! The game rules (grid, snake, food, tick) know nothing about terminals;
//! they draw through the [`surface`] traits, which `term` implements with
//! crossterm.

pub mod clock;
pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod snake;
pub mod surface;
pub mod term;
