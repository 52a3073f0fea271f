pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod schema;

pub use config::{CONFIG_FILE, ChartConfig, PipelineConfig};
pub use error::{Result, VizError};
pub use pipeline::{Chart, ChartOutcome, ChartResult, Pipeline, RunReport};
pub use render::{ChartRenderer, PlottersRenderer};
