//! Game-loop driver: owns the interaction state and turns sensor ticks into
//! draw directives.

use tracing::{debug, info};

use crate::config::Config;
use crate::interaction::{self, similarity, InteractionState, SelectorOutcome, StatusColor, ToggleSelector};
use crate::pose::{SensorTick, SkeletonFrame, SkeletonTracking};
use crate::projection::{DepthCameraProjector, ScreenProjector};
use crate::render::skeleton::{body_center_directive, clipped_edge_directives, skeleton_directives};
use crate::render::{cues, Cue, DrawDirective, TextSlot};

/// 1 ティック分の出力
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    pub directives: Vec<DrawDirective>,
    /// 判定できたティックの状態色。Tracked のスケルトンが無い、
    /// または右手・ShoulderCenter が取れていなければ None
    pub status: Option<StatusColor>,
    pub outcome: Option<SelectorOutcome>,
    pub goal_reached: bool,
}

impl FrameOutput {
    pub fn cues(&self) -> Vec<(TextSlot, Cue)> {
        cues(&self.directives)
    }
}

pub struct Session<P: ScreenProjector = DepthCameraProjector> {
    config: Config,
    selector: ToggleSelector,
    projector: P,
    state: InteractionState,
    show_skeleton: bool,
    /// 類似度比較用の基準スケルトン
    reference: Option<SkeletonFrame>,
    /// 直近で処理した Tracked スケルトン
    last_tracked: Option<SkeletonFrame>,
    last_cues: Vec<(TextSlot, Cue)>,
    last_status: Option<StatusColor>,
    log_cues: bool,
    ticks: u64,
}

impl Session<DepthCameraProjector> {
    pub fn new(config: Config) -> Self {
        let projector = DepthCameraProjector::from_config(&config.projection);
        Self::with_projector(config, projector)
    }
}

impl<P: ScreenProjector> Session<P> {
    pub fn with_projector(config: Config, projector: P) -> Self {
        let selector = ToggleSelector::from_config(&config);
        let show_skeleton = config.render.show_skeleton;
        Self {
            config,
            selector,
            projector,
            state: InteractionState::new(),
            show_skeleton,
            reference: None,
            last_tracked: None,
            last_cues: Vec::new(),
            last_status: None,
            log_cues: true,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn goal_reached(&self) -> bool {
        self.state.goal_reached(self.selector.goal())
    }

    /// 案内文の変化をログに出すか
    pub fn set_log_cues(&mut self, enabled: bool) {
        self.log_cues = enabled;
    }

    pub fn show_skeleton(&self) -> bool {
        self.show_skeleton
    }

    pub fn toggle_skeleton(&mut self) -> bool {
        self.show_skeleton = !self.show_skeleton;
        info!("skeleton display {}", if self.show_skeleton { "on" } else { "off" });
        self.show_skeleton
    }

    /// インタラクション状態を初期化（外部リセット）
    pub fn reset(&mut self) {
        self.state.reset();
        self.last_cues.clear();
        info!("interaction state reset");
    }

    /// 直近の Tracked スケルトンを基準として保存
    pub fn capture_reference(&mut self) -> bool {
        match &self.last_tracked {
            Some(frame) => {
                self.reference = Some(frame.clone());
                info!("reference skeleton captured");
                true
            }
            None => false,
        }
    }

    /// 直近のスケルトンと基準スケルトンの距離
    pub fn reference_score(&self) -> f32 {
        similarity::score(
            self.last_tracked.as_ref(),
            self.reference.as_ref(),
            self.config.similarity.matching,
        )
    }

    /// 1 ティック処理する
    ///
    /// 最初の Tracked スケルトンだけを判定に使い、それ以降のスロットは見ない。
    pub fn process(&mut self, tick: &SensorTick) -> FrameOutput {
        self.ticks += 1;
        let mut output = FrameOutput::default();
        let clip_thickness = self.config.render.clip_thickness;
        let width = self.config.projection.width as f32;
        let height = self.config.projection.height as f32;

        for skeleton in &tick.skeletons {
            if skeleton.clipped_edges.any() {
                output.directives.extend(clipped_edge_directives(
                    skeleton.clipped_edges,
                    width,
                    height,
                    clip_thickness,
                ));
            }

            match skeleton.tracking {
                SkeletonTracking::Tracked => {
                    let frame = if skeleton.timestamp_ms == 0 {
                        skeleton.clone().with_timestamp(tick.timestamp_ms)
                    } else {
                        skeleton.clone()
                    };
                    self.process_tracked(&frame, &mut output);
                    self.last_tracked = Some(frame);
                    break;
                }
                SkeletonTracking::PositionOnly => {
                    output
                        .directives
                        .extend(body_center_directive(skeleton, &self.projector, &self.config.render));
                }
                SkeletonTracking::NotTracked => {}
            }
        }

        output.goal_reached = self.goal_reached();
        if output.status.is_some() && output.status != self.last_status {
            if let Some(status) = output.status {
                debug!("status: {}", status.as_str());
            }
            self.last_status = output.status;
        }
        self.log_cue_changes(&output);
        output
    }

    fn process_tracked(&mut self, frame: &SkeletonFrame, output: &mut FrameOutput) {
        if self.show_skeleton {
            // 右手などが欠けていても骨格は状態色で描く
            let tint = interaction::resolve_frame(frame, &self.config);
            output.directives.extend(skeleton_directives(
                frame,
                tint.color(),
                &self.projector,
                &self.config.render,
            ));
        }

        if let Some(report) = interaction::evaluate(
            &mut self.state,
            frame,
            &self.selector,
            &self.config,
            &self.projector,
        ) {
            if report.outcome.toggled {
                debug!(
                    "toggle #{} (selected={})",
                    self.state.objective_counter, self.state.selected
                );
            }
            output.status = Some(report.status);
            output.outcome = Some(report.outcome);
            output.directives.extend(report.directives);
        }
    }

    fn log_cue_changes(&mut self, output: &FrameOutput) {
        let current = output.cues();
        if current.is_empty() || current == self.last_cues {
            return;
        }
        if self.log_cues {
            for (slot, cue) in current.iter().filter(|c| !self.last_cues.contains(c)) {
                info!("[{:?}] {}", slot, cue.message());
            }
        }
        self.last_cues = current;
    }
}
