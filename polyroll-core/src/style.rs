/// Render style configuration, loadable from RON or JSON documents
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiceError, Result};

/// Visual parameters for a die mesh. Field names match the style template
/// documents, and any field left out takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Colour at intensity 0.
    #[serde(default = "default_start_color")]
    pub start_color: String,
    /// Colour at intensity 0.5.
    #[serde(default = "default_middle_color")]
    pub middle_color: String,
    /// Colour at intensity 1.
    #[serde(default = "default_end_color")]
    pub end_color: String,
    /// Surface opacity in [0, 1].
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_font_color")]
    pub font_color: String,
    #[serde(default = "default_edge_color")]
    pub edge_color: String,
    #[serde(default = "default_edge_width")]
    pub edge_width: u32,
}

pub const FONT_SIZES: RangeInclusive<u32> = 10..=100;
pub const EDGE_WIDTHS: RangeInclusive<u32> = 0..=10;

fn default_start_color() -> String {
    "green".to_string()
}
fn default_middle_color() -> String {
    "black".to_string()
}
fn default_end_color() -> String {
    "lightgreen".to_string()
}
fn default_opacity() -> f64 {
    0.8
}
fn default_font_size() -> u32 {
    30
}
fn default_font_color() -> String {
    "white".to_string()
}
fn default_edge_color() -> String {
    "black".to_string()
}
fn default_edge_width() -> u32 {
    5
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            start_color: default_start_color(),
            middle_color: default_middle_color(),
            end_color: default_end_color(),
            opacity: default_opacity(),
            font_size: default_font_size(),
            font_color: default_font_color(),
            edge_color: default_edge_color(),
            edge_width: default_edge_width(),
        }
    }
}

impl RenderStyle {
    pub fn from_ron_str(data: &str) -> Result<Self> {
        let style: Self = ron::from_str(data).map_err(|e| DiceError::InvalidStyle(e.to_string()))?;
        style.validate()?;
        Ok(style)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let style: Self =
            serde_json::from_str(data).map_err(|e| DiceError::InvalidStyle(e.to_string()))?;
        style.validate()?;
        Ok(style)
    }

    /// Check the numeric fields: opacity in [0, 1], font size in 10..=100 and
    /// edge width in 0..=10.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(DiceError::InvalidStyle(format!(
                "opacity {} is outside [0, 1]",
                self.opacity
            )));
        }
        if !FONT_SIZES.contains(&self.font_size) {
            return Err(DiceError::InvalidStyle(format!(
                "font size {} is outside {}..={}",
                self.font_size,
                FONT_SIZES.start(),
                FONT_SIZES.end()
            )));
        }
        if !EDGE_WIDTHS.contains(&self.edge_width) {
            return Err(DiceError::InvalidStyle(format!(
                "edge width {} is outside {}..={}",
                self.edge_width,
                EDGE_WIDTHS.start(),
                EDGE_WIDTHS.end()
            )));
        }
        Ok(())
    }

    /// Read a RON style document from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron_str(&data)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| DiceError::InvalidStyle(e.to_string()))
    }
}
