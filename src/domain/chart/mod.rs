//! Chart aggregate: overlay primitives, viewport windowing and options.

pub mod options;
pub mod overlay;
pub mod services;
pub mod value_objects;

pub use options::*;
pub use overlay::*;
pub use services::*;
pub use value_objects::*;
