pub mod joint;
pub mod skeleton;

pub use joint::{Joint, JointTracking, JointType};
pub use skeleton::{ClippedEdges, SensorTick, SkeletonFrame, SkeletonTracking};
