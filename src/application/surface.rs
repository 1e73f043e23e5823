use crate::domain::{
    chart::{CandlePoint, ChartOptions, InitialView, OverlaySet},
    errors::ChartResult,
};

/// A live charting surface. Owned by exactly one lifecycle at a time.
pub trait RenderSurface {
    fn set_base_series(&mut self, candles: &[CandlePoint]);

    /// Called only with a non-empty overlay set.
    fn set_overlays(&mut self, overlays: &OverlaySet);

    fn apply_initial_view(&mut self, view: &InitialView);

    fn resize(&mut self, width: u32);

    /// Free every host resource. The surface is not used afterwards.
    fn release(&mut self);
}

/// Creates surfaces on demand
pub trait SurfaceFactory {
    type Surface: RenderSurface + 'static;

    fn create(&mut self, options: &ChartOptions) -> ChartResult<Self::Surface>;
}

/// Receives the new container width
pub type ResizeHandler = Box<dyn FnMut(u32)>;

/// Handle to a registered resize listener
pub trait ResizeSubscription {
    fn unsubscribe(self);
}

/// Source of container resize notifications
pub trait ResizeSource {
    type Subscription: ResizeSubscription;

    fn subscribe(&mut self, handler: ResizeHandler) -> Self::Subscription;
}
