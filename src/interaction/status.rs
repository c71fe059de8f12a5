use crate::config::Config;
use crate::pose::SkeletonFrame;
use crate::render::Color;

use super::classify::{classify_distance, validate_start_pose, DistanceState};

/// スケルトン描画の色状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    /// 距離 OK, ポーズ OK
    Green,
    /// 距離 OK, ポーズ NG
    Yellow,
    /// 距離 NG
    Red,
}

impl StatusColor {
    pub fn color(&self) -> Color {
        match self {
            Self::Green => Color::GREEN,
            Self::Yellow => Color::YELLOW,
            Self::Red => Color::RED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

pub fn resolve(distance: DistanceState, pose_valid: bool) -> StatusColor {
    match (distance, pose_valid) {
        (DistanceState::Correct, true) => StatusColor::Green,
        (DistanceState::Correct, false) => StatusColor::Yellow,
        _ => StatusColor::Red,
    }
}

/// 距離が NG のときはポーズを評価しない
pub fn resolve_frame(frame: &SkeletonFrame, config: &Config) -> StatusColor {
    let distance = classify_distance(frame, &config.distance);
    let pose_valid = distance.is_correct() && validate_start_pose(frame, &config.pose);
    resolve(distance, pose_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SkeletonBuilder;

    #[test]
    fn test_resolve_table() {
        assert_eq!(resolve(DistanceState::Correct, true), StatusColor::Green);
        assert_eq!(resolve(DistanceState::Correct, false), StatusColor::Yellow);
        assert_eq!(resolve(DistanceState::TooNear, true), StatusColor::Red);
        assert_eq!(resolve(DistanceState::TooFar, false), StatusColor::Red);
    }

    #[test]
    fn test_resolve_frame_red_outside_window_regardless_of_pose() {
        let config = Config::default();
        for z in [1.2, 1.99, 2.51, 4.0] {
            let posed = SkeletonBuilder::standing(z).with_start_pose().build();
            let idle = SkeletonBuilder::standing(z).build();
            assert_eq!(resolve_frame(&posed, &config), StatusColor::Red, "z={}", z);
            assert_eq!(resolve_frame(&idle, &config), StatusColor::Red, "z={}", z);
        }
    }

    #[test]
    fn test_resolve_frame_inside_window() {
        let config = Config::default();
        let posed = SkeletonBuilder::standing(2.2).with_start_pose().build();
        let idle = SkeletonBuilder::standing(2.2).build();
        assert_eq!(resolve_frame(&posed, &config), StatusColor::Green);
        assert_eq!(resolve_frame(&idle, &config), StatusColor::Yellow);
    }
}
