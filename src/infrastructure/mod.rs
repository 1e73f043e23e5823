pub mod browser;
pub mod rendering;
pub mod services;
