//! Market data aggregate: price bars and their date index.

pub mod bar_index;
pub mod entities;
pub mod value_objects;

pub use bar_index::*;
pub use entities::*;
pub use value_objects::*;
