use crate::application::surface::{RenderSurface, SurfaceFactory};
use crate::domain::{
    chart::{CandlePoint, ChartOptions, Color, InitialView, LineStyle, MarkerSide, OverlaySet},
    errors::{ChartError, ChartResult},
    logging::LogComponent,
    market_data::TradingDate,
};
use crate::{log_debug, log_warn};
use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const PADDING_TOP: f64 = 20.0;
const PADDING_BOTTOM: f64 = 28.0;
const PADDING_LEFT: f64 = 10.0;
const PRICE_SCALE_WIDTH: f64 = 64.0;
const MARKER_SIZE: f64 = 6.0;
const GRID_LINES: usize = 4;
const TIME_LABEL_SPACING: f64 = 80.0;
const WATERMARK_ALPHA: f32 = 0.05;

/// Bar positions in `start..=end` that get a date label, spaced so that
/// neighbouring labels are at least `min_spacing` pixels apart.
pub(crate) fn time_tick_positions(start: usize, end: usize, candle_width: f64, min_spacing: f64) -> Vec<usize> {
    if end < start || candle_width <= 0.0 {
        return Vec::new();
    }
    let step = (min_spacing / candle_width).ceil().max(1.0) as usize;
    (start..=end).step_by(step).collect()
}

/// Параметры масштабирования для видимого окна
#[derive(Debug, Clone)]
struct ScaleParams {
    start: usize,
    chart_width: f64,
    chart_height: f64,
    min_price: f64,
    max_price: f64,
    candle_width: f64,
}

impl ScaleParams {
    fn x_at(&self, position: f64) -> f64 {
        PADDING_LEFT + (position - self.start as f64 + 0.5) * self.candle_width
    }

    fn y_at(&self, price: f64) -> f64 {
        let range = self.max_price - self.min_price;
        if range <= 0.0 {
            return PADDING_TOP + self.chart_height / 2.0;
        }
        PADDING_TOP + (self.max_price - price) / range * self.chart_height
    }
}

/// Canvas 2D chart surface living inside a container element.
///
/// Inputs are stored as they arrive; painting happens when the initial view
/// is applied and on every resize.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    options: ChartOptions,
    width: u32,
    candles: Vec<CandlePoint>,
    overlays: OverlaySet,
    view: InitialView,
    released: bool,
}

impl CanvasSurface {
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn paint(&self) {
        if self.released {
            return;
        }
        if let Err(error) = self.render() {
            log_warn!(LogComponent::Infrastructure("CanvasSurface"), "paint failed: {:?}", error);
        }
    }

    fn render(&self) -> Result<(), JsValue> {
        let width = self.width as f64;
        let height = self.options.height as f64;
        let ctx = &self.context;

        ctx.clear_rect(0.0, 0.0, width, height);
        ctx.set_fill_style_str(&self.options.background.to_css());
        ctx.fill_rect(0.0, 0.0, width, height);
        self.render_watermark(width, height);

        let Some((start, end)) = self.visible_span() else {
            return self.render_no_data_message();
        };

        let params = self.calculate_scale_params(start, end);
        self.render_grid(&params)?;
        for (offset, candle) in self.candles[start..=end].iter().enumerate() {
            self.render_single_candle(&params, start + offset, candle);
        }
        self.render_overlays(&params)?;
        self.render_price_scale(&params)?;
        self.render_time_scale(&params, end)?;

        log_debug!(
            LogComponent::Infrastructure("CanvasSurface"),
            "painted bars {}..={} of {}",
            start,
            end,
            self.candles.len()
        );
        Ok(())
    }

    /// Inclusive bar positions covered by the current view.
    fn visible_span(&self) -> Option<(usize, usize)> {
        let last = self.candles.len().checked_sub(1)?;
        match self.view {
            InitialView::FitContent => Some((0, last)),
            InitialView::Range(range) => {
                let start = self.candles.partition_point(|c| c.time < range.from).min(last);
                let end = self.candles.partition_point(|c| c.time <= range.to).saturating_sub(1);
                Some((start, end.max(start)))
            }
        }
    }

    /// Bar position of a date; dates between bars snap to the next bar.
    fn position_of(&self, date: TradingDate) -> f64 {
        match self.candles.binary_search_by_key(&date, |c| c.time) {
            Ok(position) => position as f64,
            Err(insert_at) => insert_at as f64 - 0.5,
        }
    }

    fn calculate_scale_params(&self, start: usize, end: usize) -> ScaleParams {
        let chart_width = (self.width as f64 - PADDING_LEFT - PRICE_SCALE_WIDTH).max(1.0);
        let chart_height = (self.options.height as f64 - PADDING_TOP - PADDING_BOTTOM).max(1.0);

        let visible = &self.candles[start..=end];
        let mut min_price = visible.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let mut max_price = visible.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let padding = (max_price - min_price) * 0.05;
        min_price -= padding;
        max_price += padding;

        ScaleParams {
            start,
            chart_width,
            chart_height,
            min_price,
            max_price,
            candle_width: chart_width / (end - start + 1) as f64,
        }
    }

    fn render_grid(&self, params: &ScaleParams) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.set_stroke_style_str(&self.options.grid_color.to_css());
        ctx.set_line_width(1.0);
        ctx.set_line_dash(&Array::new())?;
        for step in 0..=GRID_LINES {
            let y = PADDING_TOP + params.chart_height * step as f64 / GRID_LINES as f64;
            ctx.begin_path();
            ctx.move_to(PADDING_LEFT, y);
            ctx.line_to(PADDING_LEFT + params.chart_width, y);
            ctx.stroke();
        }
        Ok(())
    }

    fn render_single_candle(&self, params: &ScaleParams, position: usize, candle: &CandlePoint) {
        let ctx = &self.context;
        let color = if candle.is_bullish() { self.options.up_color } else { self.options.down_color };
        let css = color.to_css();
        let x = params.x_at(position as f64);
        let body_width = (params.candle_width * 0.6).max(1.0);

        ctx.set_stroke_style_str(&css);
        ctx.set_fill_style_str(&css);
        ctx.begin_path();
        ctx.move_to(x, params.y_at(candle.high));
        ctx.line_to(x, params.y_at(candle.low));
        ctx.stroke();

        let open_y = params.y_at(candle.open);
        let close_y = params.y_at(candle.close);
        let body_top = open_y.min(close_y);
        let body_height = (open_y - close_y).abs().max(1.0);
        ctx.fill_rect(x - body_width / 2.0, body_top, body_width, body_height);
    }

    fn render_overlays(&self, params: &ScaleParams) -> Result<(), JsValue> {
        if self.overlays.is_empty() {
            return Ok(());
        }
        let ctx = &self.context;

        ctx.set_line_width(1.0);
        for segment in &self.overlays.extension_segments {
            let y = params.y_at(segment.price);
            self.set_stroke(segment.color, segment.style)?;
            ctx.begin_path();
            ctx.move_to(params.x_at(segment.from_position as f64), y);
            ctx.line_to(params.x_at(segment.to_position as f64), y);
            ctx.stroke();
        }

        if let Some((first, rest)) = self.overlays.trend_line_points.split_first() {
            self.set_stroke(self.options.text_color, LineStyle::Solid)?;
            ctx.set_line_width(2.0);
            ctx.begin_path();
            ctx.move_to(params.x_at(self.position_of(first.date)), params.y_at(first.price));
            for point in rest {
                ctx.line_to(params.x_at(self.position_of(point.date)), params.y_at(point.price));
            }
            ctx.stroke();
            ctx.set_line_width(1.0);
        }

        ctx.set_font("11px Arial");
        ctx.set_text_align("center");
        for marker in &self.overlays.markers {
            let x = params.x_at(marker.bar_position.map(|p| p as f64).unwrap_or_else(|| self.position_of(marker.date)));
            let y = params.y_at(marker.price);
            ctx.set_fill_style_str(&marker.color.to_css());
            ctx.begin_path();
            match marker.side {
                MarkerSide::Above => {
                    let tip = y - MARKER_SIZE;
                    ctx.move_to(x, tip);
                    ctx.line_to(x - MARKER_SIZE / 2.0, tip - MARKER_SIZE);
                    ctx.line_to(x + MARKER_SIZE / 2.0, tip - MARKER_SIZE);
                    ctx.close_path();
                    ctx.fill();
                    ctx.fill_text(&marker.label, x, tip - MARKER_SIZE - 3.0)?;
                }
                MarkerSide::Below => {
                    let tip = y + MARKER_SIZE;
                    ctx.move_to(x, tip);
                    ctx.line_to(x - MARKER_SIZE / 2.0, tip + MARKER_SIZE);
                    ctx.line_to(x + MARKER_SIZE / 2.0, tip + MARKER_SIZE);
                    ctx.close_path();
                    ctx.fill();
                    ctx.fill_text(&marker.label, x, tip + MARKER_SIZE + 11.0)?;
                }
            }
        }
        ctx.set_text_align("start");
        Ok(())
    }

    fn set_stroke(&self, color: Color, style: LineStyle) -> Result<(), JsValue> {
        let dashes: Array = style.dash_pattern().iter().map(|d| JsValue::from_f64(*d)).collect();
        self.context.set_stroke_style_str(&color.to_css());
        self.context.set_line_dash(&dashes)
    }

    fn render_price_scale(&self, params: &ScaleParams) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.set_fill_style_str(&self.options.text_color.to_css());
        ctx.set_font("12px Arial");
        let x = PADDING_LEFT + params.chart_width + 6.0;
        for step in 0..=GRID_LINES {
            let ratio = step as f64 / GRID_LINES as f64;
            let price = params.max_price - (params.max_price - params.min_price) * ratio;
            let y = PADDING_TOP + params.chart_height * ratio;
            ctx.fill_text(&format!("{:.2}", price), x, y + 4.0)?;
        }
        Ok(())
    }

    fn render_watermark(&self, width: f64, height: f64) {
        let symbol = self.options.symbol.trim();
        if symbol.is_empty() {
            return;
        }
        let ctx = &self.context;
        ctx.set_fill_style_str(&self.options.text_color.with_alpha(WATERMARK_ALPHA).to_css());
        ctx.set_font("bold 48px Arial");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        if let Err(error) = ctx.fill_text(symbol, width / 2.0, height / 2.0) {
            log_warn!(LogComponent::Infrastructure("CanvasSurface"), "watermark failed: {:?}", error);
        }
        ctx.set_text_align("start");
        ctx.set_text_baseline("alphabetic");
    }

    fn render_time_scale(&self, params: &ScaleParams, end: usize) -> Result<(), JsValue> {
        let ctx = &self.context;
        let y = PADDING_TOP + params.chart_height + 18.0;
        ctx.set_fill_style_str(&self.options.text_color.to_css());
        ctx.set_font("11px Arial");
        ctx.set_text_align("center");
        for position in time_tick_positions(params.start, end, params.candle_width, TIME_LABEL_SPACING) {
            let label = self.candles[position].time.value().format("%d %b %y").to_string();
            ctx.fill_text(&label, params.x_at(position as f64), y)?;
        }
        ctx.set_text_align("start");
        Ok(())
    }

    fn render_no_data_message(&self) -> Result<(), JsValue> {
        self.context.set_fill_style_str(&self.options.text_color.to_css());
        self.context.set_font("16px Arial");
        self.context.fill_text("No price data", PADDING_LEFT + 40.0, self.options.height as f64 / 2.0)
    }
}

impl RenderSurface for CanvasSurface {
    fn set_base_series(&mut self, candles: &[CandlePoint]) {
        self.candles = candles.to_vec();
    }

    fn set_overlays(&mut self, overlays: &OverlaySet) {
        self.overlays = overlays.clone();
    }

    fn apply_initial_view(&mut self, view: &InitialView) {
        self.view = *view;
        self.paint();
    }

    fn resize(&mut self, width: u32) {
        if self.released || width == self.width {
            return;
        }
        self.width = width;
        self.canvas.set_width(width);
        self.paint();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.canvas.remove();
        self.candles.clear();
        self.overlays = OverlaySet::default();
        self.released = true;
    }
}

/// Appends a fresh `<canvas>` to a container element for every surface.
pub struct CanvasSurfaceFactory {
    container_id: String,
}

impl CanvasSurfaceFactory {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self { container_id: container_id.into() }
    }
}

fn surface_error(context: &str) -> impl Fn(JsValue) -> ChartError + '_ {
    move |error| ChartError::Surface(format!("{}: {:?}", context, error))
}

impl SurfaceFactory for CanvasSurfaceFactory {
    type Surface = CanvasSurface;

    fn create(&mut self, options: &ChartOptions) -> ChartResult<CanvasSurface> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| ChartError::Surface("document not available".to_string()))?;
        let container = document
            .get_element_by_id(&self.container_id)
            .ok_or_else(|| ChartError::Surface(format!("container '{}' not found", self.container_id)))?;

        let canvas = document
            .create_element("canvas")
            .map_err(surface_error("create canvas"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ChartError::Surface("element is not a canvas".to_string()))?;

        let width = container.client_width().max(0) as u32;
        canvas.set_width(width);
        canvas.set_height(options.height);

        // context before attach, so a failure leaves the container untouched
        let context = canvas
            .get_context("2d")
            .map_err(surface_error("get 2d context"))?
            .ok_or_else(|| ChartError::Surface("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ChartError::Surface("failed to cast to 2d context".to_string()))?;
        container.append_child(&canvas).map_err(surface_error("attach canvas"))?;

        log_debug!(
            LogComponent::Infrastructure("CanvasSurface"),
            "canvas {}x{} attached to '{}'",
            width,
            options.height,
            self.container_id
        );

        Ok(CanvasSurface {
            canvas,
            context,
            options: options.clone(),
            width,
            candles: Vec::new(),
            overlays: OverlaySet::default(),
            view: InitialView::FitContent,
            released: false,
        })
    }
}
