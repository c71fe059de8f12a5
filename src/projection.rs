use nalgebra::{Matrix3, Vector3};

use crate::config::ProjectionConfig;

/// 描画面上の点（ピクセル）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// 軸平行な矩形（左上 + サイズ）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 境界上は含まない
    pub fn contains_strict(&self, p: ScreenPoint) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }
}

/// センサー座標 → 描画面座標の写像
///
/// フレームごとのキャリブレーション状態に依存するため、結果はキャッシュしない。
pub trait ScreenProjector {
    /// 投影できない点（Z <= 0 など）は None
    fn project(&self, position: [f32; 3]) -> Option<ScreenPoint>;
}

/// ピンホールモデルの深度カメラ投影
#[derive(Debug, Clone)]
pub struct DepthCameraProjector {
    intrinsic: Matrix3<f32>,
    y_offset: f32,
    pub image_width: f32,
    pub image_height: f32,
}

impl DepthCameraProjector {
    pub fn new(width: u32, height: u32, focal_length: f32, y_offset: f32) -> Self {
        let w = width as f32;
        let h = height as f32;
        let cx = w / 2.0;
        let cy = h / 2.0;
        // 正方ピクセルを仮定
        let intrinsic = Matrix3::new(
            focal_length, 0.0, cx,
            0.0, focal_length, cy,
            0.0, 0.0, 1.0,
        );
        Self {
            intrinsic,
            y_offset,
            image_width: w,
            image_height: h,
        }
    }

    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self::new(config.width, config.height, config.focal_length, config.y_offset)
    }
}

impl ScreenProjector for DepthCameraProjector {
    fn project(&self, position: [f32; 3]) -> Option<ScreenPoint> {
        if position[2].is_nan() || position[2] <= f32::EPSILON {
            return None;
        }
        // センサー座標は Y 上向き、画像座標は Y 下向き
        let camera = Vector3::new(position[0], -position[1], position[2]);
        let uvw = self.intrinsic * camera;
        Some(ScreenPoint::new(
            uvw.x / uvw.z,
            uvw.y / uvw.z + self.y_offset,
        ))
    }
}

impl<P: ScreenProjector + ?Sized> ScreenProjector for &P {
    fn project(&self, position: [f32; 3]) -> Option<ScreenPoint> {
        (**self).project(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_hits_principal_point() {
        let projector = DepthCameraProjector::new(640, 480, 571.26, 0.0);
        let p = projector.project([0.0, 0.0, 2.0]).unwrap();
        assert!((p.x - 320.0).abs() < 1e-4);
        assert!((p.y - 240.0).abs() < 1e-4);
    }

    #[test]
    fn test_y_up_maps_to_screen_up() {
        let projector = DepthCameraProjector::new(640, 480, 500.0, 0.0);
        let p = projector.project([0.2, 0.4, 2.0]).unwrap();
        // u = 500 * 0.2 / 2 + 320, v = -500 * 0.4 / 2 + 240
        assert!((p.x - 370.0).abs() < 1e-3);
        assert!((p.y - 140.0).abs() < 1e-3);
    }

    #[test]
    fn test_y_offset_applied() {
        let projector = DepthCameraProjector::new(640, 480, 571.26, 40.0);
        let p = projector.project([0.0, 0.0, 2.2]).unwrap();
        assert!((p.y - 280.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_positive_depth_is_rejected() {
        let projector = DepthCameraProjector::from_config(&ProjectionConfig::default());
        assert!(projector.project([0.0, 0.0, 0.0]).is_none());
        assert!(projector.project([0.0, 0.0, -1.0]).is_none());
        assert!(projector.project([0.0, 0.0, f32::NAN]).is_none());
    }

    #[test]
    fn test_rect_contains_is_strict() {
        let rect = ScreenRect::new(100.0, 50.0, 50.0, 50.0);
        assert!(rect.contains_strict(ScreenPoint::new(125.0, 75.0)));
        assert!(!rect.contains_strict(ScreenPoint::new(100.0, 75.0)));
        assert!(!rect.contains_strict(ScreenPoint::new(150.0, 75.0)));
        assert!(!rect.contains_strict(ScreenPoint::new(125.0, 100.0)));
    }
}
