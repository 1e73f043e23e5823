use crate::domain::{
    analysis::VcpAnalysis,
    chart::{CandlePoint, ChartOptions, InitialView, OverlayBuilder, OverlaySet, ViewportWindower},
    errors::ChartResult,
    market_data::{BarIndex, PriceBar},
};
use serde::Serialize;

/// Everything a surface needs for one render cycle, derived from
/// `(bars, analysis, visible)` and nothing else.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    #[serde(skip)]
    pub index: BarIndex,
    pub base_series: Vec<CandlePoint>,
    pub overlays: OverlaySet,
    pub initial_view: InitialView,
    pub overlay_visible: bool,
}

impl RenderPlan {
    pub fn build(
        bars: &[PriceBar],
        analysis: Option<&VcpAnalysis>,
        visible: bool,
        options: &ChartOptions,
    ) -> Self {
        let index = BarIndex::build(bars.iter().cloned());
        let initial_view = ViewportWindower::new(options.window_size).initial_view(&index);

        let contractions = analysis.map(|a| a.contractions.as_slice()).unwrap_or_default();
        let overlays = OverlayBuilder::new(&options.palette)
            .with_padding(options.extension_padding)
            .build(&index, contractions, visible);

        let base_series = index.bars().iter().map(CandlePoint::from).collect();

        Self { index, base_series, overlays, initial_view, overlay_visible: visible }
    }

    pub fn to_json(&self) -> ChartResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
