use super::entities::PriceBar;
use super::value_objects::TradingDate;
use std::collections::{BTreeMap, HashMap};

/// Sorted, de-duplicated view over a bar sequence with O(1) date lookup.
///
/// Built in one pass from arbitrary input order. When two bars share a
/// calendar date the one seen last in the input wins.
#[derive(Debug, Clone, Default)]
pub struct BarIndex {
    bars: Vec<PriceBar>,
    positions: HashMap<TradingDate, usize>,
}

impl BarIndex {
    pub fn build<I>(bars: I) -> Self
    where
        I: IntoIterator<Item = PriceBar>,
    {
        let mut by_date: BTreeMap<TradingDate, PriceBar> = BTreeMap::new();
        for bar in bars {
            by_date.insert(bar.date, bar);
        }

        let bars: Vec<PriceBar> = by_date.into_values().collect();
        let positions = bars.iter().enumerate().map(|(pos, bar)| (bar.date, pos)).collect();

        Self { bars, positions }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn date_at(&self, position: usize) -> Option<TradingDate> {
        self.bars.get(position).map(|bar| bar.date)
    }

    pub fn position_of(&self, date: TradingDate) -> Option<usize> {
        self.positions.get(&date).copied()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}
