use std::{fmt, path::PathBuf, str::FromStr};

use clap::Parser;
use thiserror::Error;

use crate::grid::{Cell, Grid};
use crate::surface::{Palette, Rgb};
use crate::term::COLUMNS_PER_CELL;

pub const DEFAULT_WIDTH: i32 = 640;
pub const DEFAULT_HEIGHT: i32 = 480;
pub const DEFAULT_CELL_SIZE: i32 = 20;
pub const DEFAULT_TICKS_PER_SECOND: u32 = 20;
pub const MAX_TICKS_PER_SECOND: u32 = 1000;
const TITLE: &str = "Snake";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    CellSize(i32),
    #[error("screen size must be positive, got {width}x{height}")]
    ScreenSize { width: i32, height: i32 },
    #[error("screen {axis} of {value}px is not a multiple of the {cell_size}px cell size")]
    Misaligned { axis: &'static str, value: i32, cell_size: i32 },
    #[error("the grid needs at least 2 cells, got {0}")]
    GridTooSmall(usize),
    #[error("a {columns}x{rows} grid is too large to show in a terminal")]
    GridTooLarge { columns: i32, rows: i32 },
    #[error("tick rate must be between 1 and {max}, got {0}", max = MAX_TICKS_PER_SECOND)]
    TickRate(u32),
    #[error("start position ({x}, {y}) is not a cell of the grid")]
    StartOutside { x: i32, y: i32 },
    #[error("invalid color {0:?}, expected r,g,b")]
    Color(String),
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::Color(s.to_string()))?;

        match channels[..] {
            [r, g, b] => Ok(Rgb::new(r, g, b)),
            _ => Err(ConfigError::Color(s.to_string())),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Everything the game needs to know at startup, built once and handed out
/// by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub grid: Grid,
    pub start: Cell,
    pub ticks_per_second: u32,
    pub palette: Palette,
    pub title: String,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let grid = Grid::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_CELL_SIZE);
        Settings {
            grid,
            start: centre(&grid),
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            palette: Palette::default(),
            title: TITLE.to_string(),
            seed: None,
            log_file: None,
        }
    }
}

/// The cell at the middle of the grid, rounded towards the top left.
fn centre(grid: &Grid) -> Cell {
    Cell::new(grid.columns() / 2 * grid.unit(), grid.rows() / 2 * grid.unit())
}

#[derive(Parser, Debug)]
#[command(name = "snake_wrap")]
#[command(version, about = "Snake on a wrap-around grid, in the terminal")]
pub struct Cli {
    /// Screen width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: i32,

    /// Screen height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: i32,

    /// Size of one grid cell in pixels
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    pub cell_size: i32,

    /// Game speed in ticks per second
    #[arg(long, default_value_t = DEFAULT_TICKS_PER_SECOND)]
    pub tps: u32,

    /// Start x in pixels [default: centre of the screen]
    #[arg(long)]
    pub start_x: Option<i32>,

    /// Start y in pixels [default: centre of the screen]
    #[arg(long)]
    pub start_y: Option<i32>,

    /// Background color as r,g,b
    #[arg(long, default_value_t = Palette::default().background)]
    pub background: Rgb,

    /// Cell border color as r,g,b
    #[arg(long, default_value_t = Palette::default().border)]
    pub border: Rgb,

    /// Food color as r,g,b
    #[arg(long, default_value_t = Palette::default().food)]
    pub food_color: Rgb,

    /// Snake color as r,g,b
    #[arg(long, default_value_t = Palette::default().snake)]
    pub snake_color: Rgb,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (set the level with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let Cli { width, height, cell_size, tps, .. } = self;

        if cell_size <= 0 {
            return Err(ConfigError::CellSize(cell_size));
        }
        if width <= 0 || height <= 0 {
            return Err(ConfigError::ScreenSize { width, height });
        }
        for &(axis, value) in [("width", width), ("height", height)].iter() {
            if value % cell_size != 0 {
                return Err(ConfigError::Misaligned { axis, value, cell_size });
            }
        }
        if tps == 0 || tps > MAX_TICKS_PER_SECOND {
            return Err(ConfigError::TickRate(tps));
        }

        let grid = Grid::new(width, height, cell_size);
        if grid.capacity() < 2 {
            return Err(ConfigError::GridTooSmall(grid.capacity()));
        }
        let (columns, rows) = (grid.columns(), grid.rows());
        if columns as i64 * COLUMNS_PER_CELL as i64 > u16::MAX as i64 || rows as i64 > u16::MAX as i64 {
            return Err(ConfigError::GridTooLarge { columns, rows });
        }

        let middle = centre(&grid);
        let start = Cell::new(self.start_x.unwrap_or(middle.x), self.start_y.unwrap_or(middle.y));
        if !grid.contains(start) {
            return Err(ConfigError::StartOutside { x: start.x, y: start.y });
        }

        Ok(Settings {
            grid,
            start,
            ticks_per_second: tps,
            palette: Palette {
                background: self.background,
                border: self.border,
                food: self.food_color,
                snake: self.snake_color,
            },
            title: TITLE.to_string(),
            seed: self.seed,
            log_file: self.log_file,
        })
    }
}
