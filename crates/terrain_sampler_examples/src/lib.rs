#![forbid(unsafe_code)]

mod backend;
mod rendering;

pub use backend::{HeightField, RasterBackend};
pub use rendering::{render_samples_to_png, RenderConfig, SampleStyle};
