//! Configuration loading.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! [grid]
//! width = 40
//! height = 20
//! finish = { x = 30, y = 12 }
//!
//! [search]
//! heuristic = "octile"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pathviz_core::Point;
use pathviz_search::Heuristic;
use serde::Deserialize;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pathviz.toml";

/// Rows drawn below the grid: status line and help/notice line.
pub const SCREEN_FOOTER_ROWS: i32 = 2;

/// Main configuration structure.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub obstacles: ObstacleConfig,
}

/// Grid dimensions and initial endpoints.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GridConfig {
    /// Columns (default: 64, a 1280 pixel window at 20 pixels per cell)
    #[serde(default = "default_width")]
    pub width: i32,

    /// Rows (default: 36)
    #[serde(default = "default_height")]
    pub height: i32,

    /// Initial start cell (default: top-left corner)
    #[serde(default)]
    pub start: Option<Point>,

    /// Initial finish cell (default: bottom-right corner)
    #[serde(default)]
    pub finish: Option<Point>,
}

/// Terminal presentation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DisplayConfig {
    /// Terminal columns per grid cell (default: 2, which looks roughly square)
    #[serde(default = "default_cell_width")]
    pub cell_width: i32,

    /// Frame length in milliseconds; one search step runs per frame (default: 16)
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub heuristic: Heuristic,
}

/// Random obstacle scatter (`r` key).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ObstacleConfig {
    /// Percentage of cells to block (default: 25)
    #[serde(default = "default_density")]
    pub density: u32,

    /// RNG seed (default: 42)
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_width() -> i32 {
    64
}

fn default_height() -> i32 {
    36
}

fn default_cell_width() -> i32 {
    2
}

fn default_frame_ms() -> u64 {
    16
}

fn default_density() -> u32 {
    25
}

fn default_seed() -> u64 {
    42
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            start: None,
            finish: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width: default_cell_width(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            seed: default_seed(),
        }
    }
}

impl GridConfig {
    pub fn start(&self) -> Point {
        self.start.unwrap_or(Point::ZERO)
    }

    pub fn finish(&self) -> Point {
        self.finish
            .unwrap_or(Point::new(self.width - 1, self.height - 1))
    }
}

impl Config {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else
    /// use defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                log::info!("loading configuration from {}", p.display());
                Self::load(p)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                log::info!("loading configuration from {DEFAULT_CONFIG_FILE}");
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => {
                log::info!("using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Check value ranges and that the endpoints are distinct cells of the
    /// grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.grid;
        if g.width < 1 || g.height < 1 || (g.width == 1 && g.height == 1) {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} must have at least two cells",
                g.width, g.height
            )));
        }
        for (name, p) in [("start", g.start()), ("finish", g.finish())] {
            if p.x < 0 || p.y < 0 || p.x >= g.width || p.y >= g.height {
                return Err(ConfigError::Invalid(format!(
                    "{name} {p} is outside the {}x{} grid",
                    g.width, g.height
                )));
            }
        }
        if g.start() == g.finish() {
            return Err(ConfigError::Invalid(format!(
                "start and finish are both {}",
                g.start()
            )));
        }
        if self.display.cell_width < 1 {
            return Err(ConfigError::Invalid("cell_width must be at least 1".into()));
        }
        // Terminal coordinates are u16.
        let columns = g.width.checked_mul(self.display.cell_width);
        let rows = g.height.checked_add(SCREEN_FOOTER_ROWS);
        let fits = |n: Option<i32>| n.is_some_and(|n| n <= i32::from(u16::MAX));
        if !fits(columns) || !fits(rows) {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} at cell_width {} does not fit a terminal screen",
                g.width, g.height, self.display.cell_width
            )));
        }
        if self.obstacles.density > 100 {
            return Err(ConfigError::Invalid(format!(
                "obstacle density {} is not a percentage",
                self.obstacles.density
            )));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.display.frame_ms)
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse(e) => write!(f, "invalid config: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}
