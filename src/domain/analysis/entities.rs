use crate::domain::errors::ChartResult;
use crate::domain::market_data::{Price, TradingDate};
use serde::{Deserialize, Serialize};

/// One swing-high to swing-low leg of a base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contraction {
    pub peak_date: TradingDate,
    pub peak_price: Price,
    pub trough_date: TradingDate,
    pub trough_price: Price,
    pub depth: f64,
}

impl Contraction {
    pub fn new(
        peak_date: TradingDate,
        peak_price: f64,
        trough_date: TradingDate,
        trough_price: f64,
        depth: f64,
    ) -> Self {
        Self {
            peak_date,
            peak_price: Price::from(peak_price),
            trough_date,
            trough_price: Price::from(trough_price),
            depth,
        }
    }
}

/// Breakout flag as reported upstream: either a boolean or a label such as
/// `"positive"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BreakoutFlag {
    Flag(bool),
    Label(String),
}

impl Default for BreakoutFlag {
    fn default() -> Self {
        BreakoutFlag::Flag(false)
    }
}

impl BreakoutFlag {
    pub fn is_confirmed(&self) -> bool {
        match self {
            BreakoutFlag::Flag(flag) => *flag,
            BreakoutFlag::Label(label) => {
                let label = label.trim();
                !label.is_empty() && !label.eq_ignore_ascii_case("false")
            }
        }
    }
}

/// Contraction analysis for one symbol, supplied wholesale by the analysis
/// service and treated as immutable for a render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcpAnalysis {
    #[serde(default)]
    pub contractions: Vec<Contraction>,
    pub highest_high: Price,
    pub lowest_low: Price,
    pub base_length_days: u32,
    pub base_depth_percent: f64,
    #[serde(default)]
    pub breakout_confirmed: BreakoutFlag,
    #[serde(default)]
    pub breakout_date: Option<TradingDate>,
    pub current_price: Price,
}

impl VcpAnalysis {
    /// Decode an analysis payload; JSON `null` means "no analysis".
    pub fn from_json(json: &str) -> ChartResult<Option<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_breakout_confirmed(&self) -> bool {
        self.breakout_confirmed.is_confirmed()
    }
}
