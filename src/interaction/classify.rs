use crate::config::{DistanceConfig, PoseConfig};
use crate::pose::{JointType, SkeletonFrame};

/// センサーからの距離判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceState {
    TooNear,
    Correct,
    TooFar,
}

impl DistanceState {
    pub fn is_correct(&self) -> bool {
        *self == Self::Correct
    }
}

/// ShoulderCenter の奥行きで距離を判定（範囲の両端を含む）
///
/// ShoulderCenter が取れていなければ TooFar を返す。
pub fn classify_distance(frame: &SkeletonFrame, config: &DistanceConfig) -> DistanceState {
    match frame.available(JointType::ShoulderCenter) {
        Some(shoulder) => classify_depth(shoulder.z(), config),
        None => DistanceState::TooFar,
    }
}

pub fn classify_depth(depth: f32, config: &DistanceConfig) -> DistanceState {
    if depth < config.min_depth {
        DistanceState::TooNear
    } else if depth > config.max_depth {
        DistanceState::TooFar
    } else if depth.is_nan() {
        DistanceState::TooFar
    } else {
        DistanceState::Correct
    }
}

/// 開始ポーズ: 右手が頭より右に hand_x_margin 以上離れ、
/// 高さが (head.y - hand_y_below, head.y + hand_y_above) の範囲にある
pub fn validate_start_pose(frame: &SkeletonFrame, config: &PoseConfig) -> bool {
    let (Some(head), Some(hand)) = (
        frame.available(JointType::Head),
        frame.available(JointType::HandRight),
    ) else {
        return false;
    };

    let extended = hand.x() >= head.x() + config.hand_x_margin;
    let raised =
        hand.y() > head.y() - config.hand_y_below && hand.y() < head.y() + config.hand_y_above;
    extended && raised
}
