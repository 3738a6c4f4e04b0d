use std::fmt;
use std::path::{Path, PathBuf};

use crate::editor::BrushTool;
use crate::viewport::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE};

pub const DEFAULT_SQUARE_LENGTH: f32 = 20.0;
pub const DEFAULT_ROW_COUNT: usize = 6;
pub const DEFAULT_COLUMN_COUNT: usize = 8;
pub const DEFAULT_BRUSH_COLOR: &str = "#FF0000";
/// Largest configurable starting row/column count (4096² cells).
pub const MAX_INITIAL_EXTENT: usize = 4096;

/// Editor settings. Stored as a plain `key=value` file; unknown keys are
/// ignored and unparsable values keep their defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    pub square_length: f32,
    pub row_count: usize,
    pub column_count: usize,
    pub min_scale: f32,
    pub max_scale: f32,
    pub initial_scale: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub device_pixel_ratio: f32,
    pub brush_color: String,
    pub brush_tool: BrushTool,
    /// When set, neither resize gestures nor `extend`/`shorten` change the grid.
    pub grid_fixed: bool,
    pub pan_zoomable: bool,
    /// Exponent applied per wheel delta unit.
    pub wheel_sensitivity: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            square_length: DEFAULT_SQUARE_LENGTH,
            row_count: DEFAULT_ROW_COUNT,
            column_count: DEFAULT_COLUMN_COUNT,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            initial_scale: 1.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
            device_pixel_ratio: 1.0,
            brush_color: DEFAULT_BRUSH_COLOR.to_string(),
            brush_tool: BrushTool::Dot,
            grid_fixed: false,
            pan_zoomable: true,
            wheel_sensitivity: 0.001,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl EditorConfig {
    /// Default settings file location.
    pub fn settings_path() -> PathBuf {
        crate::logger::app_dir().join("settings.cfg")
    }

    /// Load from the default location (defaults if missing or unreadable).
    pub fn load() -> Self {
        match Self::load_from(&Self::settings_path()) {
            Ok(config) => config,
            Err(e) => {
                crate::log_info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Save to the default location; failures are logged, not returned.
    pub fn save(&self) {
        let path = Self::settings_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = self.save_to(&path) {
            crate::log_err!("Failed to save settings to {}: {}", path.display(), e);
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_config_string())?;
        Ok(())
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "square_length={}\n\
             row_count={}\n\
             column_count={}\n\
             min_scale={}\n\
             max_scale={}\n\
             initial_scale={}\n\
             canvas_width={}\n\
             canvas_height={}\n\
             device_pixel_ratio={}\n\
             brush_color={}\n\
             brush_tool={}\n\
             grid_fixed={}\n\
             pan_zoomable={}\n\
             wheel_sensitivity={}\n",
            self.square_length,
            self.row_count,
            self.column_count,
            self.min_scale,
            self.max_scale,
            self.initial_scale,
            self.canvas_width,
            self.canvas_height,
            self.device_pixel_ratio,
            self.brush_color,
            self.brush_tool.config_name(),
            self.grid_fixed,
            self.pan_zoomable,
            self.wheel_sensitivity,
        )
    }

    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "square_length" => s.square_length = parse_positive(val, s.square_length),
                "row_count" => s.row_count = val.parse().unwrap_or(s.row_count),
                "column_count" => s.column_count = val.parse().unwrap_or(s.column_count),
                "min_scale" => s.min_scale = parse_positive(val, s.min_scale),
                "max_scale" => s.max_scale = parse_positive(val, s.max_scale),
                "initial_scale" => s.initial_scale = parse_positive(val, s.initial_scale),
                "canvas_width" => s.canvas_width = parse_positive(val, s.canvas_width),
                "canvas_height" => s.canvas_height = parse_positive(val, s.canvas_height),
                "device_pixel_ratio" => {
                    s.device_pixel_ratio = parse_positive(val, s.device_pixel_ratio)
                }
                "brush_color" => s.brush_color = val.to_string(),
                "brush_tool" => {
                    if let Some(tool) = BrushTool::from_config_name(val) {
                        s.brush_tool = tool;
                    }
                }
                "grid_fixed" => s.grid_fixed = val == "true",
                "pan_zoomable" => s.pan_zoomable = val != "false",
                "wheel_sensitivity" => {
                    s.wheel_sensitivity = parse_positive(val, s.wheel_sensitivity)
                }
                _ => {}
            }
        }
        s.validated()
    }

    /// Enforce `min_scale <= initial_scale <= max_scale`, the 2×2 floor and
    /// [`MAX_INITIAL_EXTENT`].
    pub fn validated(mut self) -> Self {
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        self.initial_scale = self.initial_scale.max(self.min_scale).min(self.max_scale);
        self.row_count = self.row_count.clamp(2, MAX_INITIAL_EXTENT);
        self.column_count = self.column_count.clamp(2, MAX_INITIAL_EXTENT);
        self
    }
}

fn parse_positive(val: &str, fallback: f32) -> f32 {
    match val.parse::<f32>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => fallback,
    }
}
