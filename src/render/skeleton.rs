use crate::config::RenderConfig;
use crate::pose::{ClippedEdges, JointTracking, JointType, SkeletonFrame};
use crate::projection::{ScreenProjector, ScreenRect};

use super::directive::{Color, DrawDirective};

/// 骨格の接続定義 (開始関節, 終了関節)
pub const SKELETON_BONES: [(JointType, JointType); 20] = [
    // 胴体
    (JointType::Head, JointType::ShoulderCenter),
    (JointType::ShoulderCenter, JointType::ShoulderLeft),
    (JointType::ShoulderCenter, JointType::ShoulderRight),
    (JointType::Spine, JointType::HipCenter),
    (JointType::HipCenter, JointType::HipLeft),
    (JointType::HipCenter, JointType::HipRight),
    (JointType::ShoulderLeft, JointType::HipCenter),
    (JointType::ShoulderRight, JointType::HipCenter),
    // 左腕
    (JointType::ShoulderLeft, JointType::ElbowLeft),
    (JointType::ElbowLeft, JointType::WristLeft),
    (JointType::WristLeft, JointType::HandLeft),
    // 右腕
    (JointType::ShoulderRight, JointType::ElbowRight),
    (JointType::ElbowRight, JointType::WristRight),
    (JointType::WristRight, JointType::HandRight),
    // 左脚
    (JointType::HipLeft, JointType::KneeLeft),
    (JointType::KneeLeft, JointType::AnkleLeft),
    (JointType::AnkleLeft, JointType::FootLeft),
    // 右脚
    (JointType::HipRight, JointType::KneeRight),
    (JointType::KneeRight, JointType::AnkleRight),
    (JointType::AnkleRight, JointType::FootRight),
];

/// 体の中心マーカーの色
pub const BODY_CENTER_COLOR: Color = Color::BLUE;

/// 画面端で切れている辺の警告色
pub const CLIPPED_EDGE_COLOR: Color = Color::RED;

/// 片方でも NotTracked、または両方 Inferred の骨は描かない
pub fn bone_visible(a: JointTracking, b: JointTracking) -> bool {
    if a == JointTracking::NotTracked || b == JointTracking::NotTracked {
        return false;
    }
    !(a == JointTracking::Inferred && b == JointTracking::Inferred)
}

/// 骨と関節を状態色で描く
pub fn skeleton_directives(
    frame: &SkeletonFrame,
    tint: Color,
    projector: &dyn ScreenProjector,
    config: &RenderConfig,
) -> Vec<DrawDirective> {
    let mut out = Vec::with_capacity(SKELETON_BONES.len() + JointType::COUNT);

    for (start, end) in SKELETON_BONES.iter() {
        let a = frame.get(*start);
        let b = frame.get(*end);
        if !bone_visible(a.tracking, b.tracking) {
            continue;
        }
        if let (Some(from), Some(to)) = (projector.project(a.position), projector.project(b.position)) {
            out.push(DrawDirective::Line {
                from,
                to,
                color: tint,
                thickness: config.bone_thickness,
            });
        }
    }

    for joint in frame.joints.iter().filter(|j| j.is_available()) {
        if let Some(center) = projector.project(joint.position) {
            out.push(DrawDirective::Circle {
                center,
                radius: config.joint_radius,
                color: tint,
            });
        }
    }

    out
}

/// 画面端で切れている辺に赤い帯
pub fn clipped_edge_directives(
    edges: ClippedEdges,
    width: f32,
    height: f32,
    thickness: f32,
) -> Vec<DrawDirective> {
    let mut out = Vec::new();
    let mut bar = |rect: ScreenRect| {
        out.push(DrawDirective::Rect {
            rect,
            color: CLIPPED_EDGE_COLOR,
        })
    };
    if edges.bottom {
        bar(ScreenRect::new(0.0, height - thickness, width, thickness));
    }
    if edges.top {
        bar(ScreenRect::new(0.0, 0.0, width, thickness));
    }
    if edges.left {
        bar(ScreenRect::new(0.0, 0.0, thickness, height));
    }
    if edges.right {
        bar(ScreenRect::new(width - thickness, 0.0, thickness, height));
    }
    out
}

/// PositionOnly のスケルトンは中心に円だけ描く
pub fn body_center_directive(
    frame: &SkeletonFrame,
    projector: &dyn ScreenProjector,
    config: &RenderConfig,
) -> Option<DrawDirective> {
    let center = projector.project(frame.position)?;
    Some(DrawDirective::Circle {
        center,
        radius: config.body_center_radius,
        color: BODY_CENTER_COLOR,
    })
}
