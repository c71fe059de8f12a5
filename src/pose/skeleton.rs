use serde::{Deserialize, Serialize};

use super::joint::{Joint, JointType};

/// スケルトン全体のトラッキング状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkeletonTracking {
    #[default]
    NotTracked,
    /// 体の中心位置のみ
    PositionOnly,
    Tracked,
}

/// 画面端で切れている辺
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClippedEdges {
    #[serde(default)]
    pub top: bool,
    #[serde(default)]
    pub bottom: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
}

impl ClippedEdges {
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// 1 ティック分・1 人分の関節集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonFrame {
    pub tracking: SkeletonTracking,
    /// 体の中心 (PositionOnly 時に使用)
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub joints: [Joint; JointType::COUNT],
    #[serde(default)]
    pub clipped_edges: ClippedEdges,
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl SkeletonFrame {
    pub fn new(tracking: SkeletonTracking, joints: [Joint; JointType::COUNT]) -> Self {
        Self {
            tracking,
            position: joints[JointType::HipCenter as usize].position,
            joints,
            clipped_edges: ClippedEdges::default(),
            timestamp_ms: 0,
        }
    }

    pub fn position_only(position: [f32; 3]) -> Self {
        Self {
            tracking: SkeletonTracking::PositionOnly,
            position,
            joints: [Joint::default(); JointType::COUNT],
            clipped_edges: ClippedEdges::default(),
            timestamp_ms: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn get(&self, joint: JointType) -> &Joint {
        &self.joints[joint as usize]
    }

    /// NotTracked の関節は None
    pub fn available(&self, joint: JointType) -> Option<&Joint> {
        let j = self.get(joint);
        j.is_available().then_some(j)
    }

    pub fn is_tracked(&self) -> bool {
        self.tracking == SkeletonTracking::Tracked
    }
}

impl Default for SkeletonFrame {
    fn default() -> Self {
        Self {
            tracking: SkeletonTracking::NotTracked,
            position: [0.0; 3],
            joints: [Joint::default(); JointType::COUNT],
            clipped_edges: ClippedEdges::default(),
            timestamp_ms: 0,
        }
    }
}

/// センサーが 1 ティックで届けるスケルトン群
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorTick {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub skeletons: Vec<SkeletonFrame>,
}

impl SensorTick {
    pub fn new(timestamp_ms: u64, skeletons: Vec<SkeletonFrame>) -> Self {
        Self {
            timestamp_ms,
            skeletons,
        }
    }

    /// 最初に Tracked になっているスケルトン
    pub fn primary(&self) -> Option<&SkeletonFrame> {
        self.skeletons.iter().find(|s| s.is_tracked())
    }
}
