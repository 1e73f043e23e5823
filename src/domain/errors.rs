use derive_more::Display;

/// Errors raised at the edges of the chart engine.
///
/// The overlay and viewport computations themselves never fail; these
/// variants cover decoding upstream payloads and acquiring a render surface.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ChartError {
    #[display(fmt = "Invalid date: {}", _0)]
    InvalidDate(String),
    #[display(fmt = "Invalid palette: {}", _0)]
    InvalidPalette(String),
    #[display(fmt = "Invalid color: {}", _0)]
    InvalidColor(String),
    #[display(fmt = "Decode error: {}", _0)]
    Decode(String),
    #[display(fmt = "Render surface error: {}", _0)]
    Surface(String),
}

impl std::error::Error for ChartError {}

impl From<serde_json::Error> for ChartError {
    fn from(error: serde_json::Error) -> Self {
        ChartError::Decode(error.to_string())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
