use serde::{Deserialize, Serialize};

/// Kinect v1 の 20 関節インデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum JointType {
    HipCenter = 0,
    Spine = 1,
    ShoulderCenter = 2,
    Head = 3,
    ShoulderLeft = 4,
    ElbowLeft = 5,
    WristLeft = 6,
    HandLeft = 7,
    ShoulderRight = 8,
    ElbowRight = 9,
    WristRight = 10,
    HandRight = 11,
    HipLeft = 12,
    KneeLeft = 13,
    AnkleLeft = 14,
    FootLeft = 15,
    HipRight = 16,
    KneeRight = 17,
    AnkleRight = 18,
    FootRight = 19,
}

impl JointType {
    pub const COUNT: usize = 20;

    pub const ALL: [JointType; JointType::COUNT] = [
        Self::HipCenter,
        Self::Spine,
        Self::ShoulderCenter,
        Self::Head,
        Self::ShoulderLeft,
        Self::ElbowLeft,
        Self::WristLeft,
        Self::HandLeft,
        Self::ShoulderRight,
        Self::ElbowRight,
        Self::WristRight,
        Self::HandRight,
        Self::HipLeft,
        Self::KneeLeft,
        Self::AnkleLeft,
        Self::FootLeft,
        Self::HipRight,
        Self::KneeRight,
        Self::AnkleRight,
        Self::FootRight,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HipCenter => "hip-center",
            Self::Spine => "spine",
            Self::ShoulderCenter => "shoulder-center",
            Self::Head => "head",
            Self::ShoulderLeft => "shoulder-left",
            Self::ElbowLeft => "elbow-left",
            Self::WristLeft => "wrist-left",
            Self::HandLeft => "hand-left",
            Self::ShoulderRight => "shoulder-right",
            Self::ElbowRight => "elbow-right",
            Self::WristRight => "wrist-right",
            Self::HandRight => "hand-right",
            Self::HipLeft => "hip-left",
            Self::KneeLeft => "knee-left",
            Self::AnkleLeft => "ankle-left",
            Self::FootLeft => "foot-left",
            Self::HipRight => "hip-right",
            Self::KneeRight => "knee-right",
            Self::AnkleRight => "ankle-right",
            Self::FootRight => "foot-right",
        }
    }
}

/// 関節ごとのトラッキング状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JointTracking {
    #[default]
    NotTracked,
    /// センサーが推定した位置
    Inferred,
    Tracked,
}

/// 単一関節
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Joint {
    /// センサー座標 (メートル): X 右, Y 上, Z センサーからの奥行き
    pub position: [f32; 3],
    #[serde(default)]
    pub tracking: JointTracking,
}

impl Joint {
    pub fn new(position: [f32; 3], tracking: JointTracking) -> Self {
        Self { position, tracking }
    }

    pub fn tracked(x: f32, y: f32, z: f32) -> Self {
        Self::new([x, y, z], JointTracking::Tracked)
    }

    /// NotTracked 以外なら位置を信用できる
    pub fn is_available(&self) -> bool {
        self.tracking != JointTracking::NotTracked
    }

    pub fn x(&self) -> f32 {
        self.position[0]
    }

    pub fn y(&self) -> f32 {
        self.position[1]
    }

    pub fn z(&self) -> f32 {
        self.position[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_type_count() {
        assert_eq!(JointType::COUNT, 20);
        assert_eq!(JointType::ALL.len(), JointType::COUNT);
    }

    #[test]
    fn test_joint_type_names() {
        assert_eq!(JointType::HandRight.as_str(), "hand-right");
        assert_eq!(JointType::ShoulderCenter.as_str(), "shoulder-center");
    }

    #[test]
    fn test_all_matches_discriminants() {
        for (i, joint) in JointType::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
    }

    #[test]
    fn test_joint_availability() {
        assert!(Joint::tracked(0.0, 0.0, 2.0).is_available());
        assert!(Joint::new([0.0; 3], JointTracking::Inferred).is_available());
        assert!(!Joint::default().is_available());
    }

    #[test]
    fn test_joint_tracking_serde_names() {
        let json = serde_json::to_string(&JointTracking::NotTracked).unwrap();
        assert_eq!(json, "\"not-tracked\"");
    }
}
