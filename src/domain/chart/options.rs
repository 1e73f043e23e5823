use super::value_objects::{Color, Palette};
use crate::domain::errors::ChartResult;
use serde::{Deserialize, Serialize};

/// Trading days in one calendar year
pub const DEFAULT_WINDOW_SIZE: usize = 252;

/// Bars added on each side of a contraction's extension lines
pub const DEFAULT_EXTENSION_PADDING: usize = 5;

/// Surface and overlay configuration.
///
/// Every field has a default, so a host may pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    /// Ticker drawn as a faint watermark; empty means none.
    pub symbol: String,
    pub height: u32,
    pub background: Color,
    pub text_color: Color,
    pub grid_color: Color,
    pub up_color: Color,
    pub down_color: Color,
    pub window_size: usize,
    pub extension_padding: usize,
    pub palette: Palette,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            height: 400,
            background: Color::from_hex(0x1a1a1a),
            text_color: Color::from_hex(0xd1d4dc),
            grid_color: Color::rgb(42, 46, 57).with_alpha(0.2),
            up_color: Color::from_hex(0x26a69a),
            down_color: Color::from_hex(0xef5350),
            window_size: DEFAULT_WINDOW_SIZE,
            extension_padding: DEFAULT_EXTENSION_PADDING,
            palette: Palette::default(),
        }
    }
}

impl ChartOptions {
    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
