use wasm_bindgen::prelude::*;

use crate::application::ChartLifecycle;
use crate::domain::{
    analysis::VcpAnalysis,
    chart::ChartOptions,
    errors::{ChartError, ChartResult},
    logging::LogComponent,
    market_data::PriceBar,
};
use crate::infrastructure::{
    browser::WindowResizeSource,
    rendering::CanvasSurfaceFactory,
};
use crate::{log_info, log_warn};

/// Разбор массива баров из JSON
pub fn decode_bars(json: &str) -> ChartResult<Vec<PriceBar>> {
    Ok(serde_json::from_str(json)?)
}

/// Разбор анализа VCP; пустая строка и `null` означают отсутствие анализа
pub fn decode_analysis(json: Option<&str>) -> ChartResult<Option<VcpAnalysis>> {
    match json.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => VcpAnalysis::from_json(raw),
    }
}

pub fn decode_options(json: Option<&str>) -> ChartResult<ChartOptions> {
    match json.map(str::trim) {
        None | Some("") => Ok(ChartOptions::default()),
        Some(raw) => ChartOptions::from_json(raw),
    }
}

fn to_js(error: ChartError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// WASM API графика VCP: свечи, наложение сжатий и окно просмотра
#[wasm_bindgen]
pub struct VcpChartApi {
    container_id: String,
    lifecycle: ChartLifecycle<CanvasSurfaceFactory, WindowResizeSource>,
}

#[wasm_bindgen]
impl VcpChartApi {
    /// Создать график внутри элемента `container_id`
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: String, options_json: Option<String>) -> Result<VcpChartApi, JsValue> {
        let options = decode_options(options_json.as_deref()).map_err(to_js)?;
        let factory = CanvasSurfaceFactory::new(container_id.clone());
        let resize = WindowResizeSource::new(container_id.clone());

        log_info!(
            LogComponent::Presentation("VcpChartApi"),
            "📈 Chart created in '{}' (window {}, padding {})",
            container_id,
            options.window_size,
            options.extension_padding
        );

        Ok(Self { container_id, lifecycle: ChartLifecycle::new(factory, resize, options) })
    }

    #[wasm_bindgen(getter, js_name = containerId)]
    pub fn container_id(&self) -> String {
        self.container_id.clone()
    }

    /// Заменить ряд баров и перестроить график
    #[wasm_bindgen(js_name = setBars)]
    pub fn set_bars(&mut self, bars_json: &str) -> Result<(), JsValue> {
        let bars = decode_bars(bars_json).map_err(to_js)?;
        self.lifecycle.set_bars(bars).map_err(to_js)
    }

    /// Заменить анализ VCP; `undefined` убирает наложение
    #[wasm_bindgen(js_name = setAnalysis)]
    pub fn set_analysis(&mut self, analysis_json: Option<String>) -> Result<(), JsValue> {
        let analysis = decode_analysis(analysis_json.as_deref()).map_err(to_js)?;
        self.lifecycle.set_analysis(analysis).map_err(to_js)
    }

    /// Тикер для водяного знака; пустая строка убирает его
    #[wasm_bindgen(js_name = setSymbol)]
    pub fn set_symbol(&mut self, symbol: &str) -> Result<(), JsValue> {
        let options = ChartOptions { symbol: symbol.trim().to_string(), ..self.lifecycle.options().clone() };
        self.lifecycle.set_options(options).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setOverlayVisible)]
    pub fn set_overlay_visible(&mut self, visible: bool) -> Result<(), JsValue> {
        self.lifecycle.set_overlay_visible(visible).map_err(to_js)
    }

    #[wasm_bindgen(js_name = overlayVisible)]
    pub fn overlay_visible(&self) -> bool {
        self.lifecycle.overlay_visible()
    }

    /// Переключить наложение, вернуть новое состояние
    #[wasm_bindgen(js_name = toggleOverlay)]
    pub fn toggle_overlay(&mut self) -> Result<bool, JsValue> {
        self.lifecycle.toggle_overlay().map_err(to_js)
    }

    /// Последний построенный план отрисовки в JSON, `undefined` до первой сборки
    #[wasm_bindgen(js_name = renderPlanJson)]
    pub fn render_plan_json(&self) -> Result<Option<String>, JsValue> {
        self.lifecycle
            .render_plan()
            .map(|plan| plan.to_json())
            .transpose()
            .map_err(to_js)
    }

    /// Снять холст и слушатель resize
    #[wasm_bindgen(js_name = dispose)]
    pub fn dispose(&mut self) {
        if !self.lifecycle.is_mounted() {
            log_warn!(
                LogComponent::Presentation("VcpChartApi"),
                "dispose on '{}' without a mounted surface",
                self.container_id
            );
        }
        self.lifecycle.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_analysis_means_no_overlay() {
        assert_eq!(decode_analysis(None).unwrap(), None);
        assert_eq!(decode_analysis(Some("  ")).unwrap(), None);
        assert_eq!(decode_analysis(Some("null")).unwrap(), None);
    }

    #[test]
    fn malformed_bars_are_a_decode_error() {
        assert!(matches!(decode_bars("[{\"date\": 1}]"), Err(ChartError::Decode(_))));
    }

    #[test]
    fn missing_options_fall_back_to_defaults() {
        let options = decode_options(None).unwrap();
        assert_eq!(options.window_size, 252);
        assert_eq!(options.extension_padding, 5);
    }
}
