pub mod classify;
pub mod guidance;
pub mod selector;
pub mod similarity;
pub mod status;

pub use classify::{classify_distance, validate_start_pose, DistanceState};
pub use guidance::project_guidance;
pub use selector::{InteractionState, SelectorOutcome, SelectorPhase, ToggleSelector};
pub use similarity::score;
pub use status::{resolve, resolve_frame, StatusColor};

use tracing::debug;

use crate::config::Config;
use crate::pose::{JointType, SkeletonFrame};
use crate::projection::ScreenProjector;
use crate::render::DrawDirective;

/// 1 ティック分の判定結果
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub distance: DistanceState,
    pub status: StatusColor,
    pub outcome: SelectorOutcome,
    pub directives: Vec<DrawDirective>,
}

/// 距離・ポーズ判定 → セレクター → 案内表示 を 1 フレーム分実行する
///
/// Tracked でないフレームや、右手・ShoulderCenter が取れていないフレームは
/// 何もせず None を返す（状態はそのまま）。
pub fn evaluate(
    state: &mut InteractionState,
    frame: &SkeletonFrame,
    selector: &ToggleSelector,
    config: &Config,
    projector: &dyn ScreenProjector,
) -> Option<TickReport> {
    if !frame.is_tracked() {
        return None;
    }
    for joint in [JointType::ShoulderCenter, JointType::HandRight] {
        if frame.available(joint).is_none() {
            debug!("skipping frame: {} not tracked", joint.as_str());
            return None;
        }
    }

    let distance = classify_distance(frame, &config.distance);
    let pose_valid = distance.is_correct() && validate_start_pose(frame, &config.pose);
    let status = resolve(distance, pose_valid);

    let outcome = selector.step(state, frame, distance, projector);
    let directives = project_guidance(frame, distance, state, selector, projector);

    Some(TickReport {
        distance,
        status,
        outcome,
        directives,
    })
}

/// `evaluate` の描画指示だけを返す版
pub fn update(
    state: &mut InteractionState,
    frame: &SkeletonFrame,
    selector: &ToggleSelector,
    config: &Config,
    projector: &dyn ScreenProjector,
) -> Vec<DrawDirective> {
    evaluate(state, frame, selector, config, projector)
        .map(|report| report.directives)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{JointTracking, SkeletonTracking};
    use crate::render::{cues, Cue, TextSlot};
    use crate::testing::{LinearProjector, SkeletonBuilder, HAND_IN_ZONE};

    struct Harness {
        config: Config,
        selector: ToggleSelector,
        state: InteractionState,
    }

    impl Harness {
        fn new() -> Self {
            let config = Config::default();
            let selector = ToggleSelector::from_config(&config);
            Self {
                config,
                selector,
                state: InteractionState::new(),
            }
        }

        fn tick(&mut self, frame: &SkeletonFrame) -> Vec<DrawDirective> {
            update(&mut self.state, frame, &self.selector, &self.config, &LinearProjector)
        }
    }

    fn push_frame(z: f32) -> SkeletonFrame {
        SkeletonBuilder::standing(2.2)
            .joint(JointType::HandRight, [HAND_IN_ZONE[0], HAND_IN_ZONE[1], z])
            .build()
    }

    #[test]
    fn test_goal_cue_appears_and_persists() {
        let mut h = Harness::new();
        h.tick(&SkeletonBuilder::standing(2.2).with_start_pose().build());
        assert!(h.state.pose_achieved);

        let banner = (TextSlot::Banner, Cue::ObjectiveComplete);
        let mut first_banner = None;
        let sequence = [1.6, 1.9, 1.6, 1.9];
        for (i, z) in sequence.into_iter().enumerate() {
            let out = h.tick(&push_frame(z));
            if cues(&out).contains(&banner) && first_banner.is_none() {
                first_banner = Some(i);
            }
        }
        assert_eq!(first_banner, Some(2));
        assert_eq!(h.state.objective_counter, 2);

        for _ in 0..5 {
            let out = h.tick(&SkeletonBuilder::standing(2.2).build());
            assert!(cues(&out).contains(&banner));
        }
    }

    #[test]
    fn test_not_tracked_hand_is_noop() {
        let mut h = Harness::new();
        h.state = InteractionState {
            pose_achieved: true,
            selected: true,
            debounce: true,
            objective_counter: 1,
            last_counted_direction: true,
            hand_reference_depth: Some(2.1),
            pose_held_since_ms: None,
            pose_seen_at_ms: None,
        };
        let before = h.state.clone();
        let frame = SkeletonBuilder::standing(2.2)
            .tracking(JointType::HandRight, JointTracking::NotTracked)
            .build();

        assert!(h.tick(&frame).is_empty());
        assert_eq!(h.state, before);
    }

    #[test]
    fn test_untracked_skeleton_is_noop() {
        let mut h = Harness::new();
        let frame = SkeletonBuilder::standing(2.2)
            .with_start_pose()
            .skeleton_tracking(SkeletonTracking::PositionOnly)
            .build();
        assert!(h.tick(&frame).is_empty());
        assert_eq!(h.state, InteractionState::new());
    }

    #[test]
    fn test_report_status() {
        let h = Harness::new();
        let mut state = InteractionState::new();
        let frame = SkeletonBuilder::standing(2.2).with_start_pose().build();
        let report = evaluate(&mut state, &frame, &h.selector, &h.config, &LinearProjector).unwrap();
        assert_eq!(report.distance, DistanceState::Correct);
        assert_eq!(report.status, StatusColor::Green);
        assert!(report.outcome.armed_now);
        assert!(cues(&report.directives).contains(&(TextSlot::Status, Cue::TrySelect)));
    }
}
