//! Contraction analysis records produced by the upstream pattern detector.

pub mod entities;

pub use entities::*;
