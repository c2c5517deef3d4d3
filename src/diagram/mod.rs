pub mod classifier;
pub mod region;

pub use classifier::{DiagramClassifier, DiagramOutcome};
pub use region::{DiagramRegionEstimator, RegionStrategy};
