use super::value_objects::{Price, TradingDate, Volume};
use serde::{Deserialize, Serialize};

/// Domain entity - one daily price bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: TradingDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    #[serde(default)]
    pub volume: Volume,
}

impl PriceBar {
    pub fn new(date: TradingDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: Price::from(open),
            high: Price::from(high),
            low: Price::from(low),
            close: Price::from(close),
            volume: Volume::from(volume),
        }
    }
}
