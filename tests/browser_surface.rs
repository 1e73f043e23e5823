#![cfg(target_arch = "wasm32")]
use vcp_chart_wasm::application::{RenderSurface, SurfaceFactory};
use vcp_chart_wasm::domain::chart::{ChartOptions, InitialView};
use vcp_chart_wasm::presentation::VcpChartApi;
use vcp_chart_wasm::infrastructure::rendering::CanvasSurfaceFactory;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const BARS: &str = r#"[
    {"date": "2024-05-01", "open": 98.0, "high": 100.5, "low": 97.0, "close": 100.0},
    {"date": "2024-05-02", "open": 100.0, "high": 102.0, "low": 99.0, "close": 101.0},
    {"date": "2024-05-03", "open": 101.0, "high": 104.0, "low": 100.0, "close": 103.5}
]"#;

fn container(id: &str) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document.create_element("div").unwrap();
    div.set_id(id);
    div.set_attribute("style", "width: 480px").unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

#[wasm_bindgen_test]
fn canvas_is_attached_and_removed() {
    let div = container("surface-basic");
    let mut factory = CanvasSurfaceFactory::new("surface-basic");

    let mut surface = factory.create(&ChartOptions::default()).unwrap();
    assert_eq!(div.child_element_count(), 1);
    assert_eq!(surface.canvas().height(), 400);

    surface.apply_initial_view(&InitialView::FitContent);
    surface.release();
    assert!(surface.is_released());
    assert_eq!(div.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn missing_container_is_a_surface_error() {
    let mut factory = CanvasSurfaceFactory::new("no-such-container");

    assert!(factory.create(&ChartOptions::default()).is_err());
}

#[wasm_bindgen_test]
fn api_keeps_exactly_one_canvas() {
    let div = container("api-chart");
    let mut api = VcpChartApi::new("api-chart".to_string(), None).unwrap();

    api.set_bars(BARS).unwrap();
    api.set_analysis(None).unwrap();
    api.toggle_overlay().unwrap();
    assert_eq!(div.child_element_count(), 1);
    assert!(api.render_plan_json().unwrap().is_some());

    api.dispose();
    assert_eq!(div.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn symbol_change_replaces_the_canvas() {
    let div = container("api-symbol");
    let mut api = VcpChartApi::new("api-symbol".to_string(), Some(r#"{"symbol": "AAPL"}"#.to_string())).unwrap();

    api.set_bars(BARS).unwrap();
    api.set_symbol("NVDA").unwrap();

    assert_eq!(div.child_element_count(), 1);
    api.dispose();
    assert_eq!(div.child_element_count(), 0);
}
