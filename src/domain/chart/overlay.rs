use super::options::DEFAULT_EXTENSION_PADDING;
use super::value_objects::{Color, LineStyle, MarkerSide, Palette, SegmentLevel};
use crate::domain::analysis::Contraction;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{BarIndex, Price, TradingDate};
use crate::{log_debug, log_warn};
use serde::Serialize;

/// Vertex of the contraction trend line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: TradingDate,
    pub price: f64,
}

/// Flat line at a contraction's peak or trough price, clamped to the bar range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSegment {
    pub contraction: usize,
    pub level: SegmentLevel,
    pub from: TradingDate,
    pub to: TradingDate,
    pub from_position: usize,
    pub to_position: usize,
    pub price: f64,
    pub style: LineStyle,
    pub color_index: usize,
    pub color: Color,
}

/// Labeled marker pinned above a peak or below a trough
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub contraction: usize,
    pub date: TradingDate,
    pub price: f64,
    pub side: MarkerSide,
    pub label: String,
    pub color_index: usize,
    pub color: Color,
    /// Bar the marker sits on; `None` when the date is not in the index.
    pub bar_position: Option<usize>,
}

/// Every overlay primitive derived from one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySet {
    pub trend_line_points: Vec<TrendPoint>,
    pub extension_segments: Vec<ExtensionSegment>,
    pub markers: Vec<Marker>,
}

impl OverlaySet {
    pub fn is_empty(&self) -> bool {
        self.trend_line_points.is_empty() && self.extension_segments.is_empty() && self.markers.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.trend_line_points.len() + self.extension_segments.len() + self.markers.len()
    }

    pub fn segments_for(&self, contraction: usize) -> impl Iterator<Item = &ExtensionSegment> {
        self.extension_segments.iter().filter(move |segment| segment.contraction == contraction)
    }

    pub fn markers_for(&self, contraction: usize) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(move |marker| marker.contraction == contraction)
    }

    /// Markers ordered by date, for surfaces that require ascending time.
    pub fn markers_chronological(&self) -> Vec<&Marker> {
        let mut markers: Vec<&Marker> = self.markers.iter().collect();
        markers.sort_by_key(|marker| marker.date);
        markers
    }
}

/// Turns a contraction list into overlay primitives keyed to bar dates.
///
/// A contraction whose dates are missing from the index still contributes
/// its trend-line vertices and markers; only its extension segments are
/// dropped. Nothing here validates the pattern itself.
pub struct OverlayBuilder<'a> {
    palette: &'a Palette,
    padding: usize,
}

impl<'a> OverlayBuilder<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette, padding: DEFAULT_EXTENSION_PADDING }
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn build(&self, index: &BarIndex, contractions: &[Contraction], visible: bool) -> OverlaySet {
        if !visible || contractions.is_empty() {
            log_debug!(
                LogComponent::Domain("OverlayBuilder"),
                "overlay skipped (visible: {}, contractions: {})",
                visible,
                contractions.len()
            );
            return OverlaySet::default();
        }

        let mut overlays = OverlaySet {
            trend_line_points: Self::trend_line(contractions),
            ..OverlaySet::default()
        };

        for (i, contraction) in contractions.iter().enumerate() {
            overlays.markers.extend(self.markers(index, i, contraction));
            overlays.extension_segments.extend(self.extension_segments(index, i, contraction));
        }

        log_debug!(
            LogComponent::Domain("OverlayBuilder"),
            "built {} trend points, {} segments, {} markers",
            overlays.trend_line_points.len(),
            overlays.extension_segments.len(),
            overlays.markers.len()
        );

        overlays
    }

    fn trend_line(contractions: &[Contraction]) -> Vec<TrendPoint> {
        let mut points: Vec<TrendPoint> = contractions
            .iter()
            .flat_map(|c| {
                [
                    TrendPoint { date: c.peak_date, price: c.peak_price.value() },
                    TrendPoint { date: c.trough_date, price: c.trough_price.value() },
                ]
            })
            .collect();
        // stable: equal dates keep supplied order
        points.sort_by_key(|point| point.date);
        points
    }

    fn markers(&self, index: &BarIndex, i: usize, contraction: &Contraction) -> [Marker; 2] {
        let color_index = self.palette.slot(i);
        let color = self.palette.color_for(i);
        let marker = |date: TradingDate, price: Price, side: MarkerSide, prefix: char| Marker {
            contraction: i,
            date,
            price: price.value(),
            side,
            label: format!("{}{}", prefix, i + 1),
            color_index,
            color,
            bar_position: index.position_of(date),
        };

        [
            marker(contraction.peak_date, contraction.peak_price, MarkerSide::Above, 'P'),
            marker(contraction.trough_date, contraction.trough_price, MarkerSide::Below, 'T'),
        ]
    }

    fn extension_segments(&self, index: &BarIndex, i: usize, contraction: &Contraction) -> Vec<ExtensionSegment> {
        let (Some(peak_pos), Some(trough_pos)) =
            (index.position_of(contraction.peak_date), index.position_of(contraction.trough_date))
        else {
            log_warn!(
                LogComponent::Domain("OverlayBuilder"),
                "contraction {} ({} -> {}) not found in bar index, extension lines skipped",
                i + 1,
                contraction.peak_date,
                contraction.trough_date
            );
            return Vec::new();
        };

        let start = peak_pos.min(trough_pos).saturating_sub(self.padding);
        let end = peak_pos
            .max(trough_pos)
            .saturating_add(self.padding)
            .min(index.len().saturating_sub(1));
        let (Some(from), Some(to)) = (index.date_at(start), index.date_at(end)) else {
            return Vec::new();
        };

        let color_index = self.palette.slot(i);
        let color = self.palette.color_for(i);
        let segment = |level: SegmentLevel, price: Price, style: LineStyle| ExtensionSegment {
            contraction: i,
            level,
            from,
            to,
            from_position: start,
            to_position: end,
            price: price.value(),
            style,
            color_index,
            color,
        };

        vec![
            segment(SegmentLevel::Peak, contraction.peak_price, LineStyle::Dashed),
            segment(SegmentLevel::Trough, contraction.trough_price, LineStyle::Dotted),
        ]
    }
}
