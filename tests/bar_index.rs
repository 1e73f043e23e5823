use chrono::{Duration, NaiveDate};
use quickcheck_macros::quickcheck;
use vcp_chart_wasm::domain::market_data::{BarIndex, PriceBar, TradingDate};
use wasm_bindgen_test::*;

fn date(raw: &str) -> TradingDate {
    raw.parse().unwrap()
}

fn bar(raw: &str, close: f64) -> PriceBar {
    PriceBar::new(date(raw), close - 1.0, close + 1.0, close - 2.0, close, 1_000.0)
}

fn day(offset: u16) -> TradingDate {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    TradingDate::from(base + Duration::days(offset as i64))
}

#[wasm_bindgen_test(unsupported = test)]
fn out_of_order_input_is_sorted() {
    let index = BarIndex::build(vec![bar("2024-03-03", 12.0), bar("2024-03-01", 10.0), bar("2024-03-02", 11.0)]);

    let dates: Vec<String> = index.bars().iter().map(|b| b.date.to_string()).collect();
    assert_eq!(dates, ["2024-03-01", "2024-03-02", "2024-03-03"]);
    assert_eq!(index.position_of(date("2024-03-01")), Some(0));
    assert_eq!(index.position_of(date("2024-03-03")), Some(2));
}

#[wasm_bindgen_test(unsupported = test)]
fn time_of_day_does_not_split_a_date() {
    let index = BarIndex::build(vec![
        bar("2024-03-01T00:00:00", 10.0),
        bar("2024-03-01 16:00:00", 11.0),
        bar("2024-03-02", 12.0),
    ]);

    assert_eq!(index.len(), 2);
    assert_eq!(index.position_of(date("2024-03-01T09:30:00Z")), Some(0));
}

#[wasm_bindgen_test(unsupported = test)]
fn duplicate_dates_keep_the_last_bar() {
    let index = BarIndex::build(vec![bar("2024-03-01", 10.0), bar("2024-03-02", 11.0), bar("2024-03-01", 99.0)]);

    assert_eq!(index.len(), 2);
    assert_eq!(index.bars()[0].close.value(), 99.0);
}

#[wasm_bindgen_test(unsupported = test)]
fn empty_input_builds_an_empty_index() {
    let index = BarIndex::build(Vec::new());

    assert!(index.is_empty());
    assert!(index.bars().is_empty());
    assert_eq!(index.date_at(0), None);
    assert_eq!(index.position_of(date("2024-03-01")), None);
}

#[quickcheck]
fn indexed_bars_are_sorted_and_unique(offsets: Vec<u16>) -> bool {
    let index = BarIndex::build(offsets.iter().map(|o| PriceBar::new(day(*o), 1.0, 2.0, 0.5, 1.5, 0.0)));

    let mut expected: Vec<u16> = offsets.clone();
    expected.sort_unstable();
    expected.dedup();

    index.len() == expected.len()
        && index.bars().windows(2).all(|pair| pair[0].date < pair[1].date)
        && index
            .bars()
            .iter()
            .enumerate()
            .all(|(pos, b)| index.position_of(b.date) == Some(pos))
}
