use crate::projection::{ScreenPoint, ScreenRect};

/// RGBA 色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// 0x00RRGGBB (minifb バッファ形式)
    pub fn to_rgb_u32(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// テキスト表示先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    /// メインの指示
    Status,
    /// 距離の状態
    Distance,
    /// 目標達成の表示
    Banner,
}

/// プレイヤーへの案内メッセージ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    GetInPosition,
    StepBack,
    StepCloser,
    DistanceOk,
    RaiseRightHand,
    HoldPose,
    TrySelect,
    TryDeselect,
    ObjectiveComplete,
}

impl Cue {
    pub fn message(&self) -> &'static str {
        match self {
            Self::GetInPosition => "Move to the correct distance",
            Self::StepBack => "Step back a little",
            Self::StepCloser => "Come a little closer",
            Self::DistanceOk => "Distance OK",
            Self::RaiseRightHand => "Raise your right hand",
            Self::HoldPose => "Hold that pose",
            Self::TrySelect => "Try to select the red box",
            Self::TryDeselect => "Try to deselect the green box",
            Self::ObjectiveComplete => "OBJECTIVE COMPLETE!",
        }
    }
}

/// 外部レンダラーへの描画指示
#[derive(Debug, Clone, PartialEq)]
pub enum DrawDirective {
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Color,
        thickness: f32,
    },
    /// 塗りつぶし円
    Circle {
        center: ScreenPoint,
        radius: f32,
        color: Color,
    },
    /// 塗りつぶし矩形
    Rect { rect: ScreenRect, color: Color },
    /// rect に内接する塗りつぶし楕円
    Ellipse { rect: ScreenRect, color: Color },
    /// from → to の矢印（矢じりは to 側）
    Arrow {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Color,
        thickness: f32,
    },
    Text { slot: TextSlot, cue: Cue },
}

impl DrawDirective {
    pub fn cue(&self) -> Option<(TextSlot, Cue)> {
        match self {
            Self::Text { slot, cue } => Some((*slot, *cue)),
            _ => None,
        }
    }
}

/// 指示列からテキストだけを取り出す
pub fn cues(directives: &[DrawDirective]) -> Vec<(TextSlot, Cue)> {
    directives.iter().filter_map(DrawDirective::cue).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_rgb_u32() {
        assert_eq!(Color::RED.to_rgb_u32(), 0xFF0000);
        assert_eq!(Color::rgba(0x12, 0x34, 0x56, 0x7F).to_rgb_u32(), 0x123456);
    }

    #[test]
    fn test_cues_extracts_text_only() {
        let directives = vec![
            DrawDirective::Circle {
                center: ScreenPoint::new(0.0, 0.0),
                radius: 1.0,
                color: Color::BLUE,
            },
            DrawDirective::Text {
                slot: TextSlot::Status,
                cue: Cue::RaiseRightHand,
            },
        ];
        assert_eq!(cues(&directives), vec![(TextSlot::Status, Cue::RaiseRightHand)]);
    }
}
