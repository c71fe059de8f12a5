use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub distance: DistanceConfig,
    #[serde(default)]
    pub pose: PoseConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
}

/// センサーからの適正距離 (ShoulderCenter の Z, メートル)
#[derive(Debug, Deserialize, Clone)]
pub struct DistanceConfig {
    #[serde(default = "default_min_depth")]
    pub min_depth: f32,
    #[serde(default = "default_max_depth")]
    pub max_depth: f32,
}

fn default_min_depth() -> f32 { 2.0 }
fn default_max_depth() -> f32 { 2.5 }

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            min_depth: default_min_depth(),
            max_depth: default_max_depth(),
        }
    }
}

/// 開始ポーズ（右手を横に上げる）の判定
#[derive(Debug, Deserialize, Clone)]
pub struct PoseConfig {
    /// 右手が頭より右にあるべき最小距離（メートル）
    #[serde(default = "default_hand_x_margin")]
    pub hand_x_margin: f32,
    /// 右手の高さの下限: head.y - hand_y_below
    #[serde(default = "default_hand_y_below")]
    pub hand_y_below: f32,
    /// 右手の高さの上限: head.y + hand_y_above
    #[serde(default = "default_hand_y_above")]
    pub hand_y_above: f32,
    /// ポーズ保持時間（秒）。0 なら最初のフレームで成立
    #[serde(default)]
    pub hold_secs: f32,
    /// 保持中にこれより長く評価されないティックが続いたら保持をやり直す（秒）
    #[serde(default = "default_hold_gap_secs")]
    pub hold_gap_secs: f32,
}

fn default_hand_x_margin() -> f32 { 0.15 }
fn default_hand_y_below() -> f32 { 0.5 }
fn default_hand_y_above() -> f32 { 1.0 }
fn default_hold_gap_secs() -> f32 { 0.1 }

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            hand_x_margin: default_hand_x_margin(),
            hand_y_below: default_hand_y_below(),
            hand_y_above: default_hand_y_above(),
            hold_secs: 0.0,
            hold_gap_secs: default_hold_gap_secs(),
        }
    }
}

/// ヒットゾーンと押し込みジェスチャー
#[derive(Debug, Deserialize, Clone)]
pub struct SelectorConfig {
    /// ゾーン幅（画面座標）
    #[serde(default = "default_zone_size")]
    pub zone_width: f32,
    #[serde(default = "default_zone_size")]
    pub zone_height: f32,
    /// ShoulderCenter の投影位置からのオフセット
    #[serde(default = "default_zone_offset_x")]
    pub zone_offset_x: f32,
    #[serde(default = "default_zone_offset_y")]
    pub zone_offset_y: f32,
    /// 手が shoulder.z - push_margin より手前で押し込み
    #[serde(default = "default_push_margin")]
    pub push_margin: f32,
    /// 手が shoulder.z - release_margin 以上に戻ったら解除
    #[serde(default = "default_release_margin")]
    pub release_margin: f32,
    /// 目標のトグル回数
    #[serde(default = "default_goal")]
    pub goal: u32,
}

fn default_zone_size() -> f32 { 50.0 }
fn default_zone_offset_x() -> f32 { 100.0 }
fn default_zone_offset_y() -> f32 { -50.0 }
fn default_push_margin() -> f32 { 0.5 }
fn default_release_margin() -> f32 { 0.4 }
fn default_goal() -> u32 { 2 }

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            zone_width: default_zone_size(),
            zone_height: default_zone_size(),
            zone_offset_x: default_zone_offset_x(),
            zone_offset_y: default_zone_offset_y(),
            push_margin: default_push_margin(),
            release_margin: default_release_margin(),
            goal: default_goal(),
        }
    }
}

/// 深度カメラの投影パラメータ (Kinect v1 640x480)
#[derive(Debug, Deserialize, Clone)]
pub struct ProjectionConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// 焦点距離（ピクセル）
    #[serde(default = "default_focal_length")]
    pub focal_length: f32,
    /// 投影後に加える縦方向のずれ（ピクセル）
    #[serde(default = "default_y_offset")]
    pub y_offset: f32,
}

fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 480 }
fn default_focal_length() -> f32 { 571.26 }
fn default_y_offset() -> f32 { 40.0 }

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            focal_length: default_focal_length(),
            y_offset: default_y_offset(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_show_skeleton")]
    pub show_skeleton: bool,
    #[serde(default = "default_joint_radius")]
    pub joint_radius: f32,
    #[serde(default = "default_bone_thickness")]
    pub bone_thickness: f32,
    /// 画面端の警告バーの太さ
    #[serde(default = "default_clip_thickness")]
    pub clip_thickness: f32,
    #[serde(default = "default_body_center_radius")]
    pub body_center_radius: f32,
}

fn default_show_skeleton() -> bool { true }
fn default_joint_radius() -> f32 { 5.0 }
fn default_bone_thickness() -> f32 { 10.0 }
fn default_clip_thickness() -> f32 { 10.0 }
fn default_body_center_radius() -> f32 { 10.0 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_skeleton: default_show_skeleton(),
            joint_radius: default_joint_radius(),
            bone_thickness: default_bone_thickness(),
            clip_thickness: default_clip_thickness(),
            body_center_radius: default_body_center_radius(),
        }
    }
}

/// 関節の対応付け方
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JointMatching {
    /// 両スケルトンの関節を順番に走査し、型タグが同じものを対応させる
    #[default]
    ParallelOrder,
    /// 関節 ID が同じものを対応させる
    JointId,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SimilarityConfig {
    #[serde(default)]
    pub matching: JointMatching,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 読めなければデフォルト値で続行
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let d = &self.distance;
        ensure!(
            d.min_depth <= d.max_depth,
            "distance.min_depth ({}) must not exceed distance.max_depth ({})",
            d.min_depth,
            d.max_depth
        );

        let p = &self.pose;
        ensure!(p.hand_x_margin >= 0.0, "pose.hand_x_margin must be >= 0");
        ensure!(
            p.hand_y_below >= 0.0 && p.hand_y_above >= 0.0,
            "pose.hand_y_below and pose.hand_y_above must be >= 0"
        );
        ensure!(p.hold_secs >= 0.0, "pose.hold_secs must be >= 0");
        ensure!(p.hold_gap_secs >= 0.0, "pose.hold_gap_secs must be >= 0");

        let s = &self.selector;
        ensure!(
            s.zone_width > 0.0 && s.zone_height > 0.0,
            "selector zone size must be positive"
        );
        ensure!(
            s.release_margin < s.push_margin,
            "selector.release_margin ({}) must be smaller than selector.push_margin ({})",
            s.release_margin,
            s.push_margin
        );
        ensure!(s.goal > 0, "selector.goal must be at least 1");

        let pr = &self.projection;
        ensure!(
            pr.width > 0 && pr.height > 0,
            "projection size must be non-zero"
        );
        ensure!(pr.focal_length > 0.0, "projection.focal_length must be positive");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.distance.min_depth, 2.0);
        assert_eq!(config.distance.max_depth, 2.5);
        assert_eq!(config.pose.hand_x_margin, 0.15);
        assert_eq!(config.pose.hold_gap_secs, 0.1);
        assert_eq!(config.selector.zone_width, 50.0);
        assert_eq!(config.selector.zone_offset_y, -50.0);
        assert_eq!(config.selector.push_margin, 0.5);
        assert_eq!(config.selector.release_margin, 0.4);
        assert_eq!(config.selector.goal, 2);
        assert_eq!(config.similarity.matching, JointMatching::ParallelOrder);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.projection.width, 640);
        assert!(config.render.show_skeleton);
    }

    #[test]
    fn test_partial_section() {
        let config = Config::from_toml_str(
            r#"
            [selector]
            goal = 4

            [similarity]
            matching = "joint-id"
            "#,
        )
        .unwrap();
        assert_eq!(config.selector.goal, 4);
        assert_eq!(config.selector.push_margin, 0.5);
        assert_eq!(config.similarity.matching, JointMatching::JointId);
    }

    #[test]
    fn test_rejects_collapsed_hysteresis() {
        let err = Config::from_toml_str(
            r#"
            [selector]
            push_margin = 0.4
            release_margin = 0.4
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_inverted_distance_window() {
        let err = Config::from_toml_str(
            r#"
            [distance]
            min_depth = 3.0
            max_depth = 2.0
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_zero_goal() {
        assert!(Config::from_toml_str("[selector]\ngoal = 0\n").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/touch-boxes.toml");
        assert_eq!(config.selector.goal, 2);
    }
}
