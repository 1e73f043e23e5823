use super::overlay_toggle::OverlayToggle;
use super::render_plan::RenderPlan;
use super::surface::{RenderSurface, ResizeSource, ResizeSubscription, SurfaceFactory};
use crate::domain::{
    analysis::VcpAnalysis,
    chart::ChartOptions,
    errors::ChartResult,
    logging::LogComponent,
    market_data::PriceBar,
};
use crate::{log_debug, log_info, log_warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct ActiveChart<S, R> {
    surface: Rc<RefCell<S>>,
    subscription: R,
    generation: u64,
}

/// Owns the single render surface and the single resize subscription of one
/// chart view.
///
/// Every input change tears the previous surface down before anything new
/// is created, then rebuilds the whole render plan from scratch. Dropping the
/// lifecycle releases both resources.
pub struct ChartLifecycle<F: SurfaceFactory, R: ResizeSource> {
    factory: F,
    resize_source: R,
    options: ChartOptions,
    bars: Vec<PriceBar>,
    analysis: Option<VcpAnalysis>,
    toggle: OverlayToggle,
    plan: Option<RenderPlan>,
    active: Option<ActiveChart<F::Surface, R::Subscription>>,
    generation: u64,
}

impl<F: SurfaceFactory, R: ResizeSource> ChartLifecycle<F, R> {
    pub fn new(factory: F, resize_source: R, options: ChartOptions) -> Self {
        Self {
            factory,
            resize_source,
            options,
            bars: Vec::new(),
            analysis: None,
            toggle: OverlayToggle::default(),
            plan: None,
            active: None,
            generation: 0,
        }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Handle to the toggle owned by this lifecycle. It stops working once
    /// the lifecycle is dropped.
    pub fn overlay_toggle(&self) -> OverlayToggle {
        self.toggle
    }

    pub fn overlay_visible(&self) -> bool {
        self.toggle.is_visible()
    }

    pub fn render_plan(&self) -> Option<&RenderPlan> {
        self.plan.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_mounted(&self) -> bool {
        self.active.is_some()
    }

    /// Run `f` against the live surface, if there is one.
    pub fn with_surface<T>(&self, f: impl FnOnce(&F::Surface) -> T) -> Option<T> {
        self.active.as_ref().map(|active| f(&active.surface.borrow()))
    }

    pub fn set_bars(&mut self, bars: Vec<PriceBar>) -> ChartResult<()> {
        self.bars = bars;
        self.rebuild()
    }

    pub fn set_analysis(&mut self, analysis: Option<VcpAnalysis>) -> ChartResult<()> {
        self.analysis = analysis;
        self.rebuild()
    }

    pub fn set_options(&mut self, options: ChartOptions) -> ChartResult<()> {
        self.options = options;
        self.rebuild()
    }

    pub fn set_overlay_visible(&mut self, visible: bool) -> ChartResult<()> {
        self.toggle.set_visible(visible);
        self.rebuild()
    }

    pub fn toggle_overlay(&mut self) -> ChartResult<bool> {
        let visible = self.toggle.flip();
        self.rebuild()?;
        Ok(visible)
    }

    /// Replace every input at once and rebuild a single time.
    pub fn update(
        &mut self,
        bars: Vec<PriceBar>,
        analysis: Option<VcpAnalysis>,
        visible: bool,
    ) -> ChartResult<()> {
        self.bars = bars;
        self.analysis = analysis;
        self.toggle.set_visible(visible);
        self.rebuild()
    }

    /// Rebuild when the toggle was written through its channel since the
    /// last build. Returns whether a rebuild happened.
    pub fn refresh(&mut self) -> ChartResult<bool> {
        let applied = self.plan.as_ref().map(|plan| plan.overlay_visible);
        if applied == Some(self.toggle.is_visible()) {
            return Ok(false);
        }
        self.rebuild()?;
        Ok(true)
    }

    /// Tear down the current surface and build a fresh one from the current
    /// inputs.
    pub fn rebuild(&mut self) -> ChartResult<()> {
        self.release_active();
        self.generation += 1;

        let visible = self.toggle.is_visible();
        let plan = RenderPlan::build(&self.bars, self.analysis.as_ref(), visible, &self.options);

        log_debug!(
            LogComponent::Application("ChartLifecycle"),
            "🔄 Rebuild #{}: {} bars, {} overlay elements",
            self.generation,
            plan.index.len(),
            plan.overlays.element_count()
        );

        let mut surface = match self.factory.create(&self.options) {
            Ok(surface) => surface,
            Err(error) => {
                log_warn!(
                    LogComponent::Application("ChartLifecycle"),
                    "⚠️ Render surface unavailable for rebuild #{}: {}",
                    self.generation,
                    error
                );
                self.plan = Some(plan);
                return Err(error);
            }
        };

        surface.set_base_series(&plan.base_series);
        if !plan.overlays.is_empty() {
            surface.set_overlays(&plan.overlays);
        }
        surface.apply_initial_view(&plan.initial_view);

        let surface = Rc::new(RefCell::new(surface));
        let subscription = self.resize_source.subscribe(Self::resize_handler(Rc::downgrade(&surface)));

        self.active = Some(ActiveChart { surface, subscription, generation: self.generation });
        self.plan = Some(plan);
        Ok(())
    }

    /// Release the surface and the resize listener without rebuilding.
    pub fn teardown(&mut self) {
        self.release_active();
        self.plan = None;
    }

    fn release_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        active.subscription.unsubscribe();
        match active.surface.try_borrow_mut() {
            Ok(mut surface) => surface.release(),
            Err(_) => {
                log_warn!(
                    LogComponent::Application("ChartLifecycle"),
                    "surface of build #{} busy during release",
                    active.generation
                );
            }
        }

        log_info!(
            LogComponent::Application("ChartLifecycle"),
            "🧹 Released surface of build #{}",
            active.generation
        );
    }

    fn resize_handler(surface: Weak<RefCell<F::Surface>>) -> Box<dyn FnMut(u32)> {
        Box::new(move |width| {
            if let Some(surface) = surface.upgrade() {
                if let Ok(mut surface) = surface.try_borrow_mut() {
                    surface.resize(width);
                }
            }
        })
    }
}

impl<F: SurfaceFactory, R: ResizeSource> Drop for ChartLifecycle<F, R> {
    fn drop(&mut self) {
        self.release_active();
        self.toggle.dispose();
    }
}
