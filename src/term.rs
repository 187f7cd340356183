use std::{convert::TryFrom, io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, poll, read};
use crossterm::style::Color;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use tracing::error;

use crate::grid::{Cell, Direction::*, Grid};
use crate::surface::{InputEvent, InputSource, Rgb, Surface};

const CELL_GLYPH: &str = "[]";
// Terminal characters are about twice as tall as they are wide
pub const COLUMNS_PER_CELL: u16 = 2;

/// Draws the grid on the terminal through crossterm and reads the keyboard.
pub struct TermManager {
    stdout: Stdout,
    grid: Grid,
    active: bool,
}

impl TermManager {
    pub fn new(grid: Grid) -> Self {
        TermManager { stdout: stdout(), grid, active: false }
    }

    /// Columns and rows the terminal needs to show the whole grid. Fails for
    /// grids no terminal can address.
    pub fn required_size(&self) -> Result<(u16, u16)> {
        let (columns, rows) = (self.grid.columns(), self.grid.rows());
        let width = u16::try_from(columns)
            .ok()
            .and_then(|c| c.checked_mul(COLUMNS_PER_CELL));
        match (width, u16::try_from(rows).ok()) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => bail!("a {}x{} grid does not fit in any terminal", columns, rows),
        }
    }

    pub fn setup(&mut self, title: &str) -> Result<()> {
        let (need_w, need_h) = self.required_size()?;
        let (width, height) = terminal::size().context("Failed to read terminal size")?;
        if width < need_w || height < need_h {
            bail!(
                "terminal is {}x{} but the {}x{} grid needs at least {}x{}",
                width, height, self.grid.columns(), self.grid.rows(), need_w, need_h
            );
        }

        execute!(self.stdout, EnterAlternateScreen, terminal::SetTitle(title))
            .context("Failed to enter alternate screen")?;
        self.active = true;
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Failed to hide cursor")?;
        Ok(())
    }

    /// Gives the terminal back in the state `setup` found it. Safe to call
    /// more than once.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Last resort after a panic; the normal path has already restored.
        let _ = self.restore();
    }
}

impl Surface for TermManager {
    fn clear(&mut self, color: Rgb) -> Result<()> {
        // `queue!` borrows the whole of `self` here, so no field may be printed
        let blank_row = " ".repeat(self.grid.columns() as usize * COLUMNS_PER_CELL as usize);
        let rows = self.grid.rows() as u16;

        queue!(self.stdout, style::SetBackgroundColor(to_color(color)))?;
        for row in 0..rows {
            queue!(self.stdout, cursor::MoveTo(0, row), style::Print(&blank_row))?;
        }
        queue!(self.stdout, style::ResetColor)?;
        Ok(())
    }

    fn draw_cell(&mut self, cell: Cell, fill: Rgb, border: Rgb) -> Result<()> {
        let (col, row) = self.grid.index_of(cell);
        queue!(
            self.stdout,
            cursor::MoveTo(col as u16 * COLUMNS_PER_CELL, row as u16),
            style::SetForegroundColor(to_color(border)),
            style::SetBackgroundColor(to_color(fill)),
            style::Print(CELL_GLYPH),
            style::ResetColor
        )?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.stdout.flush().context("Failed to flush terminal")
    }
}

impl InputSource for TermManager {
    fn poll_events(&mut self, max: usize) -> Result<Vec<InputEvent>> {
        let mut events = vec![];

        while events.len() < max && poll(Duration::from_millis(0))? {
            if let Event::Key(key) = read()? {
                if let Some(ev) = map_key(&key) {
                    events.push(ev);
                }
            }
        }

        Ok(events)
    }
}

/// Arrow keys and WASD steer; Esc, `q` and Ctrl+C quit. Everything else is
/// ignored.
pub fn map_key(ev: &KeyEvent) -> Option<InputEvent> {
    if is_ctrl_c(ev) {
        return Some(InputEvent::Quit);
    }

    let ev = match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => InputEvent::KeyDown(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => InputEvent::KeyDown(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => InputEvent::KeyDown(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => InputEvent::KeyDown(Right),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputEvent::Quit,
        _ => return None,
    };
    Some(ev)
}

/// Combines the outcome of a session with the outcome of restoring the
/// terminal afterwards, so that neither failure hides the other.
pub fn merge_restore<T>(result: Result<T>, restored: Result<()>) -> Result<T> {
    match (result, restored) {
        (Ok(value), restored) => restored.map(|_| value),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(restore_err)) => {
            error!("failed to restore the terminal: {:#}", restore_err);
            Err(e.context(format!("terminal not restored: {:#}", restore_err)))
        }
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(map_key(&key(KeyCode::Up)), Some(InputEvent::KeyDown(Up)));
        assert_eq!(map_key(&key(KeyCode::Down)), Some(InputEvent::KeyDown(Down)));
        assert_eq!(map_key(&key(KeyCode::Left)), Some(InputEvent::KeyDown(Left)));
        assert_eq!(map_key(&key(KeyCode::Right)), Some(InputEvent::KeyDown(Right)));
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(map_key(&key(KeyCode::Char('w'))), Some(InputEvent::KeyDown(Up)));
        assert_eq!(map_key(&key(KeyCode::Char('a'))), Some(InputEvent::KeyDown(Left)));
        assert_eq!(map_key(&key(KeyCode::Char('s'))), Some(InputEvent::KeyDown(Down)));
        assert_eq!(map_key(&key(KeyCode::Char('D'))), Some(InputEvent::KeyDown(Right)));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(&key(KeyCode::Esc)), Some(InputEvent::Quit));
        assert_eq!(map_key(&key(KeyCode::Char('q'))), Some(InputEvent::Quit));

        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(map_key(&ctrl_c), Some(InputEvent::Quit));
    }

    #[test]
    fn test_other_keys_are_ignored() {
        assert_eq!(map_key(&key(KeyCode::Char('c'))), None);
        assert_eq!(map_key(&key(KeyCode::Char('x'))), None);
        assert_eq!(map_key(&key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_required_size() {
        let term = TermManager::new(Grid::new(640, 480, 20));
        assert_eq!(term.required_size().unwrap(), (64, 24));
    }

    #[test]
    fn test_required_size_of_huge_grid_is_an_error() {
        // 40000 columns need 80000 terminal columns, more than u16 can hold.
        let term = TermManager::new(Grid::new(40000, 20, 1));
        assert!(term.required_size().is_err());

        let term = TermManager::new(Grid::new(1, 70000, 1));
        assert!(term.required_size().is_err());
    }

    #[test]
    fn test_merge_restore_keeps_both_failures() {
        let merged = merge_restore::<()>(Err(anyhow!("poll failed")), Err(anyhow!("raw mode stuck")));
        let msg = format!("{:#}", merged.unwrap_err());
        assert!(msg.contains("poll failed"), "{}", msg);
        assert!(msg.contains("raw mode stuck"), "{}", msg);
    }

    #[test]
    fn test_merge_restore_single_failures() {
        assert_eq!(merge_restore(Ok(3), Ok(())).unwrap(), 3);

        let game_err = merge_restore::<()>(Err(anyhow!("poll failed")), Ok(()));
        assert_eq!(game_err.unwrap_err().to_string(), "poll failed");

        let restore_err = merge_restore(Ok(3), Err(anyhow!("raw mode stuck")));
        assert_eq!(restore_err.unwrap_err().to_string(), "raw mode stuck");
    }
}
