use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::market_data::{PriceBar, TradingDate};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// Value Object - Color
///
/// Serialized in CSS form: `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb(((hex >> 16) & 0xFF) as u8, ((hex >> 8) & 0xFF) as u8, (hex & 0xFF) as u8)
    }

    pub fn to_hex(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha.clamp(0.0, 1.0), ..*self }
    }

    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:06x}", self.to_hex())
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn parse_css(raw: &str) -> ChartResult<Self> {
        let invalid = || ChartError::InvalidColor(raw.to_string());
        let trimmed = raw.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(invalid());
            }
            return u32::from_str_radix(hex, 16).map(Self::from_hex).map_err(|_| invalid());
        }

        let inner = trimmed
            .strip_prefix("rgba(")
            .or_else(|| trimmed.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(invalid());
        }
        let channel = |part: &str| part.parse::<u8>().map_err(|_| invalid());
        let alpha = match parts.get(3) {
            Some(part) => part.parse::<f32>().map_err(|_| invalid())?,
            None => 1.0,
        };
        Ok(Self::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?).with_alpha(alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(raw: String) -> ChartResult<Self> {
        Self::parse_css(&raw)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

/// Fixed, non-empty list of overlay colors cycled by contraction index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette(Vec<Color>);

impl Palette {
    pub const DEFAULT_COLORS: [Color; 4] = [
        Color::from_hex(0x2962ff),
        Color::from_hex(0xff6d00),
        Color::from_hex(0xab47bc),
        Color::from_hex(0xffd600),
    ];

    pub fn new(colors: Vec<Color>) -> ChartResult<Self> {
        if colors.is_empty() {
            return Err(ChartError::InvalidPalette("palette needs at least one color".to_string()));
        }
        Ok(Self(colors))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    /// Palette slot used by the element at `index`.
    pub fn slot(&self, index: usize) -> usize {
        index % self.0.len()
    }

    pub fn color_for(&self, index: usize) -> Color {
        self.0[self.slot(index)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(Self::DEFAULT_COLORS.to_vec())
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = ChartError;

    fn try_from(colors: Vec<Color>) -> ChartResult<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.0
    }
}

/// Stroke pattern of an overlay line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Canvas dash pattern in pixels; empty means solid.
    pub fn dash_pattern(&self) -> &'static [f64] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[6.0, 4.0],
            LineStyle::Dotted => &[1.5, 3.0],
        }
    }
}

/// Which side of the bar a marker is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
pub enum MarkerSide {
    #[strum(serialize = "aboveBar")]
    #[serde(rename = "aboveBar")]
    Above,
    #[strum(serialize = "belowBar")]
    #[serde(rename = "belowBar")]
    Below,
}

/// Price level an extension segment marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SegmentLevel {
    Peak,
    Trough,
}

/// Value Object - Viewport range in calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportRange {
    pub from: TradingDate,
    pub to: TradingDate,
}

/// What the surface shows before any user interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InitialView {
    Range(ViewportRange),
    FitContent,
}

/// Candlestick point handed to the surface's base series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    pub time: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<&PriceBar> for CandlePoint {
    fn from(bar: &PriceBar) -> Self {
        Self {
            time: bar.date,
            open: bar.open.value(),
            high: bar.high.value(),
            low: bar.low.value(),
            close: bar.close.value(),
        }
    }
}

impl CandlePoint {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_round_trip() {
        let opaque = Color::from_hex(0x26a69a);
        assert_eq!(opaque.to_css(), "#26a69a");
        assert_eq!(Color::parse_css("#26a69a").unwrap(), opaque);

        let grid = Color::parse_css("rgba(42, 46, 57, 0.2)").unwrap();
        assert_eq!((grid.r, grid.g, grid.b), (42, 46, 57));
        assert!((grid.a - 0.2).abs() < 1e-6);
    }

    #[test]
    fn candle_direction_follows_close() {
        let date = TradingDate::from_ymd(2024, 3, 1).unwrap();
        let up = CandlePoint::from(&PriceBar::new(date, 10.0, 12.0, 9.0, 11.0, 0.0));
        let down = CandlePoint { close: 9.5, ..up };
        assert!(up.is_bullish());
        assert!(!down.is_bullish());
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert!(Palette::new(Vec::new()).is_err());
    }

    #[test]
    fn palette_wraps_around() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(4), palette.color_for(0));
        assert_eq!(palette.slot(9), 1);
    }
}
