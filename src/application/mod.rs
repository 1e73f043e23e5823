pub mod lifecycle;
pub mod overlay_toggle;
pub mod render_plan;
pub mod surface;

pub use lifecycle::*;
pub use overlay_toggle::*;
pub use render_plan::*;
pub use surface::*;
