use serde_json::Value;
use vcp_chart_wasm::application::RenderPlan;
use vcp_chart_wasm::domain::analysis::VcpAnalysis;
use vcp_chart_wasm::domain::chart::ChartOptions;
use vcp_chart_wasm::domain::errors::ChartError;
use vcp_chart_wasm::presentation::{decode_analysis, decode_bars, decode_options};
use wasm_bindgen_test::*;

const BARS: &str = r#"[
    {"date": "2024-05-03T00:00:00", "open": 101.0, "high": 104.0, "low": 100.0, "close": 103.5, "volume": 120000},
    {"date": "2024-05-01", "open": 98.0, "high": 100.5, "low": 97.0, "close": 100.0, "volume": 90000},
    {"date": "2024-05-02 00:00:00", "open": 100.0, "high": 102.0, "low": 99.0, "close": 101.0}
]"#;

const ANALYSIS: &str = r#"{
    "contractions": [
        {"peak_date": "2024-05-01", "peak_price": 100.5, "trough_date": "2024-05-02", "trough_price": 99.0, "depth": 0.015}
    ],
    "highest_high": 104.0,
    "lowest_low": 97.0,
    "base_length_days": 3,
    "base_depth_percent": 6.7,
    "breakout_confirmed": "positive",
    "current_price": 103.5
}"#;

#[wasm_bindgen_test(unsupported = test)]
fn bars_accept_timestamps_and_missing_volume() {
    let bars = decode_bars(BARS).unwrap();

    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].date.to_string(), "2024-05-03");
    assert_eq!(bars[2].volume.value(), 0.0);
}

#[wasm_bindgen_test(unsupported = test)]
fn breakout_flag_accepts_labels_and_booleans() {
    let labelled = decode_analysis(Some(ANALYSIS)).unwrap().unwrap();
    assert!(labelled.is_breakout_confirmed());
    assert_eq!(labelled.contractions.len(), 1);
    assert_eq!(labelled.breakout_date, None);

    let flagged = ANALYSIS.replace("\"positive\"", "false");
    assert!(!VcpAnalysis::from_json(&flagged).unwrap().unwrap().is_breakout_confirmed());

    let negative = ANALYSIS.replace("\"positive\"", "\"false\"");
    assert!(!VcpAnalysis::from_json(&negative).unwrap().unwrap().is_breakout_confirmed());
}

#[wasm_bindgen_test(unsupported = test)]
fn analysis_without_contractions_decodes() {
    let json = r#"{"highest_high": 1.0, "lowest_low": 0.5, "base_length_days": 0,
                   "base_depth_percent": 0.0, "current_price": 0.8}"#;
    let analysis = decode_analysis(Some(json)).unwrap().unwrap();

    assert!(analysis.contractions.is_empty());
    assert!(!analysis.is_breakout_confirmed());
}

#[wasm_bindgen_test(unsupported = test)]
fn bad_contraction_date_is_rejected() {
    let broken = ANALYSIS.replace("\"2024-05-02\"", "\"05/02/2024\"");

    assert!(matches!(decode_analysis(Some(broken.as_str())), Err(ChartError::Decode(_))));
}

#[wasm_bindgen_test(unsupported = test)]
fn options_accept_css_colors() {
    let options = decode_options(Some(r##"{"upColor": "#00ff00", "palette": ["#111111", "rgba(1, 2, 3, 0.5)"]}"##)).unwrap();

    assert_eq!(options.up_color.to_css(), "#00ff00");
    assert_eq!(options.palette.len(), 2);
    assert_eq!(options.palette.color_for(3).to_css(), "rgba(1, 2, 3, 0.5)");
    assert!(decode_options(Some(r#"{"upColor": "green"}"#)).is_err());
}

#[wasm_bindgen_test(unsupported = test)]
fn render_plan_serializes_for_the_host() {
    let bars = decode_bars(BARS).unwrap();
    let analysis = decode_analysis(Some(ANALYSIS)).unwrap();
    let plan = RenderPlan::build(&bars, analysis.as_ref(), true, &ChartOptions::default());

    let json: Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();

    assert_eq!(json["overlayVisible"], true);
    assert_eq!(json["baseSeries"][0]["time"], "2024-05-01");
    assert_eq!(json["initialView"]["kind"], "range");
    assert_eq!(json["initialView"]["from"], "2024-05-01");
    assert_eq!(json["initialView"]["to"], "2024-05-03");

    let overlays = &json["overlays"];
    assert_eq!(overlays["trendLinePoints"].as_array().unwrap().len(), 2);
    assert_eq!(overlays["markers"][0]["side"], "aboveBar");
    assert_eq!(overlays["markers"][0]["label"], "P1");
    assert_eq!(overlays["markers"][0]["color"], "#2962ff");
    assert_eq!(overlays["markers"][1]["barPosition"], 1);
    assert_eq!(overlays["extensionSegments"][0]["style"], "dashed");
    assert_eq!(overlays["extensionSegments"][1]["style"], "dotted");
    assert_eq!(overlays["extensionSegments"][0]["colorIndex"], 0);
    assert_eq!(overlays["extensionSegments"][0]["to"], "2024-05-03");
}

#[wasm_bindgen_test(unsupported = test)]
fn empty_bars_serialize_fit_content() {
    let plan = RenderPlan::build(&[], None, true, &ChartOptions::default());
    let json: Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();

    assert_eq!(json["initialView"]["kind"], "fitContent");
    assert_eq!(json["overlays"]["markers"].as_array().unwrap().len(), 0);
}
