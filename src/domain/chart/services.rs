use super::options::DEFAULT_WINDOW_SIZE;
use super::value_objects::{InitialView, ViewportRange};
use crate::domain::market_data::BarIndex;

/// Доменный сервис - окно просмотра по умолчанию
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportWindower {
    window_size: usize,
}

impl Default for ViewportWindower {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl ViewportWindower {
    /// A zero window is treated as a single bar.
    pub fn new(window_size: usize) -> Self {
        Self { window_size: window_size.max(1) }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Last `min(window_size, len)` bars, or fit-content for an empty index.
    pub fn initial_view(&self, index: &BarIndex) -> InitialView {
        let (Some(first), Some(last)) = (
            index.date_at(index.len().saturating_sub(self.window_size)),
            index.last(),
        ) else {
            return InitialView::FitContent;
        };

        InitialView::Range(ViewportRange { from: first, to: last.date })
    }
}
