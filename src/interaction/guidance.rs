use crate::pose::{JointType, SkeletonFrame};
use crate::projection::{ScreenPoint, ScreenProjector, ScreenRect};
use crate::render::{Color, Cue, DrawDirective, TextSlot};

use super::classify::DistanceState;
use super::selector::{InteractionState, ToggleSelector};

/// 足元マーカーのサイズ
const FOOT_MARKER_WIDTH: f32 = 100.0;
const FOOT_MARKER_HEIGHT: f32 = 50.0;

/// 適正距離外の足元マーカー色（半透明の白）
pub const FOOT_MARKER_IDLE: Color = Color::rgba(255, 255, 255, 127);
/// 適正距離の足元マーカー色（半透明の薄緑）
pub const FOOT_MARKER_OK: Color = Color::rgba(127, 255, 127, 127);

pub const ARROW_COLOR: Color = Color::RED;
const ARROW_THICKNESS: f32 = 4.0;
/// 足元からの矢印の上端・下端
const ARROW_TOP: f32 = -15.0;
const ARROW_BOTTOM: f32 = 10.0;

/// 未選択の箱
pub const ZONE_UNSELECTED: Color = Color::RED;
/// 選択済みの箱
pub const ZONE_SELECTED: Color = Color::GREEN;

/// 判定結果と状態から描画指示を作る。状態は持たない
pub fn project_guidance(
    frame: &SkeletonFrame,
    distance: DistanceState,
    state: &InteractionState,
    selector: &ToggleSelector,
    projector: &dyn ScreenProjector,
) -> Vec<DrawDirective> {
    let mut out = Vec::new();

    match distance {
        DistanceState::TooNear | DistanceState::TooFar => {
            out.push(text(TextSlot::Status, Cue::GetInPosition));
            let cue = if distance == DistanceState::TooNear {
                Cue::StepBack
            } else {
                Cue::StepCloser
            };
            out.push(text(TextSlot::Distance, cue));
            out.extend(foot_marker(frame, projector, FOOT_MARKER_IDLE));
            out.extend(distance_arrow(frame, projector, distance));
        }
        DistanceState::Correct => {
            out.push(text(TextSlot::Distance, Cue::DistanceOk));
            out.extend(foot_marker(frame, projector, FOOT_MARKER_OK));

            if !state.pose_achieved {
                let cue = if state.is_holding_pose() {
                    Cue::HoldPose
                } else {
                    Cue::RaiseRightHand
                };
                out.push(text(TextSlot::Status, cue));
            } else {
                let (cue, color) = if state.selected {
                    (Cue::TryDeselect, ZONE_SELECTED)
                } else {
                    (Cue::TrySelect, ZONE_UNSELECTED)
                };
                out.push(text(TextSlot::Status, cue));
                if let Some(rect) = selector.hit_zone(frame, projector) {
                    out.push(DrawDirective::Rect { rect, color });
                }
            }
        }
    }

    if state.goal_reached(selector.goal()) {
        out.push(text(TextSlot::Banner, Cue::ObjectiveComplete));
    }

    out
}

fn text(slot: TextSlot, cue: Cue) -> DrawDirective {
    DrawDirective::Text { slot, cue }
}

/// Spine の X と FootLeft の Y を基準にした楕円
fn foot_marker(
    frame: &SkeletonFrame,
    projector: &dyn ScreenProjector,
    color: Color,
) -> Option<DrawDirective> {
    let (spine_x, foot_y) = foot_anchor(frame, projector)?;
    let rect = ScreenRect::new(
        spine_x - FOOT_MARKER_WIDTH / 2.0,
        foot_y - FOOT_MARKER_HEIGHT / 2.0,
        FOOT_MARKER_WIDTH,
        FOOT_MARKER_HEIGHT,
    );
    Some(DrawDirective::Ellipse { rect, color })
}

/// 近すぎる: 上向き（下がれ）、遠すぎる: 下向き（近づけ）
fn distance_arrow(
    frame: &SkeletonFrame,
    projector: &dyn ScreenProjector,
    distance: DistanceState,
) -> Option<DrawDirective> {
    let (spine_x, foot_y) = foot_anchor(frame, projector)?;
    let top = ScreenPoint::new(spine_x, foot_y + ARROW_TOP);
    let bottom = ScreenPoint::new(spine_x, foot_y + ARROW_BOTTOM);
    let (from, to) = match distance {
        DistanceState::TooNear => (bottom, top),
        DistanceState::TooFar => (top, bottom),
        DistanceState::Correct => return None,
    };
    Some(DrawDirective::Arrow {
        from,
        to,
        color: ARROW_COLOR,
        thickness: ARROW_THICKNESS,
    })
}

fn foot_anchor(frame: &SkeletonFrame, projector: &dyn ScreenProjector) -> Option<(f32, f32)> {
    let spine = projector.project(frame.available(JointType::Spine)?.position)?;
    let foot = projector.project(frame.available(JointType::FootLeft)?.position)?;
    Some((spine.x, foot.y))
}
