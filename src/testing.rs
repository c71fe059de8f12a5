//! Test helpers: a skeleton builder and a depth-independent projector.

use crate::pose::{JointTracking, JointType, SkeletonFrame, SkeletonTracking};
use crate::projection::{ScreenPoint, ScreenProjector};
use crate::replay::standing_skeleton;

/// 頭 (0, 0.5) 基準で開始ポーズが成立し、LinearProjector でヒットゾーン内に入る右手の XY
pub const HAND_IN_ZONE: [f32; 2] = [0.6, 0.4];
/// 開始ポーズは成立するがヒットゾーン外の右手の XY
pub const HAND_OUT_OF_ZONE: [f32; 2] = [0.4, 0.8];

/// u = 320 + 200x, v = 240 - 200y（奥行きを無視）
pub struct LinearProjector;

impl ScreenProjector for LinearProjector {
    fn project(&self, position: [f32; 3]) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(
            320.0 + 200.0 * position[0],
            240.0 - 200.0 * position[1],
        ))
    }
}

pub struct SkeletonBuilder {
    frame: SkeletonFrame,
}

impl SkeletonBuilder {
    /// 腕を下ろして直立、全関節 Tracked。z は ShoulderCenter の奥行き
    pub fn standing(z: f32) -> Self {
        Self {
            frame: standing_skeleton(z),
        }
    }

    pub fn joint(mut self, joint: JointType, position: [f32; 3]) -> Self {
        self.frame.joints[joint as usize].position = position;
        self
    }

    pub fn tracking(mut self, joint: JointType, tracking: JointTracking) -> Self {
        self.frame.joints[joint as usize].tracking = tracking;
        self
    }

    /// 右手をヒットゾーン外で横に上げる（押し込みなし）
    pub fn with_start_pose(self) -> Self {
        let z = self.frame.get(JointType::ShoulderCenter).z();
        self.joint(
            JointType::HandRight,
            [HAND_OUT_OF_ZONE[0], HAND_OUT_OF_ZONE[1], z - 0.1],
        )
    }

    pub fn skeleton_tracking(mut self, tracking: SkeletonTracking) -> Self {
        self.frame.tracking = tracking;
        self
    }

    pub fn timestamp(mut self, timestamp_ms: u64) -> Self {
        self.frame.timestamp_ms = timestamp_ms;
        self
    }

    pub fn build(self) -> SkeletonFrame {
        self.frame
    }
}
