pub mod comparison;
pub mod error;
pub mod estimator;
pub mod model;
pub mod resize;
pub mod sample;

pub use comparison::{
    ComparisonBuilder, ComparisonSeries, Comparisons, LambdaGrid, build_comparisons,
};
pub use error::{ModelError, Result};
pub use estimator::{AnchorSelection, ScaleConfig, ScaleEstimator, ScaleFactor, ScalePolicy};
pub use model::{CollisionStrategy, Outcome, ProbeModel};
pub use resize::ResizeComparison;
pub use sample::{LoadFactorSample, ResizePolicy, ResizeSample};
