//! Push-to-toggle selection of the virtual box.
//!
//! The player first holds the start pose at the correct distance (`Idle` →
//! `Armed`). Once armed, pushing the right hand towards the sensor inside the
//! hit zone flips `selected`. A push latches `debounce` until the hand is
//! pulled back past the release threshold; push and release thresholds differ
//! so the flag cannot oscillate at the boundary.

use tracing::{debug, info};

use crate::config::{Config, PoseConfig, SelectorConfig};
use crate::pose::{JointType, SkeletonFrame};
use crate::projection::{ScreenProjector, ScreenRect};

use super::classify::{validate_start_pose, DistanceState};

/// フレームをまたいで保持されるインタラクション状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    /// 開始ポーズを適正距離で達成済み（外部リセットまで保持）
    pub pose_achieved: bool,
    /// 箱の選択状態
    pub selected: bool,
    /// 押し込み中。手が戻るまで再トグルしない
    pub debounce: bool,
    /// トグル回数
    pub objective_counter: u32,
    /// 最後にカウントした選択状態
    pub last_counted_direction: bool,
    /// 開始ポーズ成立時の手の奥行き
    pub hand_reference_depth: Option<f32>,
    /// 開始ポーズを取り始めた時刻
    pub pose_held_since_ms: Option<u64>,
    /// 開始ポーズを最後に確認した時刻
    pub pose_seen_at_ms: Option<u64>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn phase(&self) -> SelectorPhase {
        if self.pose_achieved {
            SelectorPhase::Armed {
                selected: self.selected,
            }
        } else {
            SelectorPhase::Idle
        }
    }

    pub fn goal_reached(&self, goal: u32) -> bool {
        self.objective_counter >= goal
    }

    /// 開始ポーズの保持待ち
    pub fn is_holding_pose(&self) -> bool {
        !self.pose_achieved && self.pose_held_since_ms.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorPhase {
    Idle,
    Armed { selected: bool },
}

/// 1 フレーム分の評価結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectorOutcome {
    /// このフレームで Idle → Armed
    pub armed_now: bool,
    pub toggled: bool,
    /// このフレームで初めて目標回数に到達
    pub goal_just_reached: bool,
}

pub struct ToggleSelector {
    pose: PoseConfig,
    zone_width: f32,
    zone_height: f32,
    zone_offset_x: f32,
    zone_offset_y: f32,
    push_margin: f32,
    release_margin: f32,
    goal: u32,
    hold_ms: u64,
    hold_gap_ms: u64,
}

impl ToggleSelector {
    pub fn new(pose: PoseConfig, selector: &SelectorConfig) -> Self {
        let hold_ms = (pose.hold_secs.max(0.0) * 1000.0).round() as u64;
        let hold_gap_ms = (pose.hold_gap_secs.max(0.0) * 1000.0).round() as u64;
        Self {
            pose,
            zone_width: selector.zone_width,
            zone_height: selector.zone_height,
            zone_offset_x: selector.zone_offset_x,
            zone_offset_y: selector.zone_offset_y,
            push_margin: selector.push_margin,
            release_margin: selector.release_margin,
            goal: selector.goal,
            hold_ms,
            hold_gap_ms,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pose.clone(), &config.selector)
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    /// ShoulderCenter の投影位置を基準にしたヒットゾーン
    pub fn hit_zone(&self, frame: &SkeletonFrame, projector: &dyn ScreenProjector) -> Option<ScreenRect> {
        let shoulder = frame.available(JointType::ShoulderCenter)?;
        let anchor = projector
            .project(shoulder.position)?
            .offset(self.zone_offset_x, self.zone_offset_y);
        Some(ScreenRect::new(anchor.x, anchor.y, self.zone_width, self.zone_height))
    }

    /// 1 フレーム進める
    ///
    /// 右手か ShoulderCenter が取れていなければ何もしない。
    pub fn step(
        &self,
        state: &mut InteractionState,
        frame: &SkeletonFrame,
        distance: DistanceState,
        projector: &dyn ScreenProjector,
    ) -> SelectorOutcome {
        let mut outcome = SelectorOutcome::default();

        let (Some(shoulder), Some(hand)) = (
            frame.available(JointType::ShoulderCenter),
            frame.available(JointType::HandRight),
        ) else {
            return outcome;
        };

        if !distance.is_correct() {
            if !state.pose_achieved {
                state.pose_held_since_ms = None;
                state.pose_seen_at_ms = None;
            }
            return outcome;
        }

        if !state.pose_achieved {
            if validate_start_pose(frame, &self.pose) {
                let now = frame.timestamp_ms;
                // 評価されないティックが続いた後は保持をやり直す
                if let Some(seen) = state.pose_seen_at_ms {
                    if now.saturating_sub(seen) > self.hold_gap_ms {
                        debug!("start pose hold restarted after {} ms gap", now - seen);
                        state.pose_held_since_ms = None;
                    }
                }
                state.pose_seen_at_ms = Some(now);
                let since = *state.pose_held_since_ms.get_or_insert(now);
                if now.saturating_sub(since) >= self.hold_ms {
                    state.pose_achieved = true;
                    state.hand_reference_depth = Some(hand.z());
                    state.pose_held_since_ms = None;
                    state.pose_seen_at_ms = None;
                    outcome.armed_now = true;
                    info!("start pose achieved (hand z={:.3})", hand.z());
                }
            } else {
                state.pose_held_since_ms = None;
                state.pose_seen_at_ms = None;
            }
        }

        if !state.pose_achieved {
            return outcome;
        }

        let Some(zone) = self.hit_zone(frame, projector) else {
            return outcome;
        };
        let Some(hand_screen) = projector.project(hand.position) else {
            return outcome;
        };

        let was_selected = state.selected;
        let pushed = hand.z() < shoulder.z() - self.push_margin;
        if zone.contains_strict(hand_screen) && pushed && !state.debounce {
            state.debounce = true;
            state.selected = !state.selected;
            debug!("box toggled: selected={}", state.selected);
        }

        // 押し込みと解除の閾値は別（ヒステリシス）
        if hand.z() >= shoulder.z() - self.release_margin {
            state.debounce = false;
        }

        outcome.toggled = state.selected != was_selected;

        if state.selected != state.last_counted_direction {
            let before = state.objective_counter;
            state.objective_counter = state.objective_counter.saturating_add(1);
            state.last_counted_direction = state.selected;
            if before < self.goal && state.objective_counter >= self.goal {
                outcome.goal_just_reached = true;
                info!("objective complete after {} toggles", state.objective_counter);
            }
        }

        outcome
    }
}
