pub mod artifact;
pub mod gbdt;
pub mod linear;
pub mod metrics;
pub mod scaler;
pub mod trainer;

pub use artifact::{ModelArtifact, ModelKind};
pub use trainer::{train_segment, TrainConfig};
