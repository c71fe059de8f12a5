use anyhow::Result;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::projection::{ScreenPoint, ScreenRect};
use crate::render::directive::{Color, Cue, DrawDirective, TextSlot};

/// 矢じりの長さ（ピクセル）
const ARROW_HEAD: f32 = 10.0;

/// minifbを使用したレンダラー
pub struct MinifbRenderer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    title: String,
}

impl MinifbRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;
        window.set_target_fps(30);

        Ok(Self {
            window,
            buffer: vec![0u32; width * height],
            width,
            height,
            title: title.to_string(),
        })
    }

    /// ウィンドウが開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// キーが今回押されたか（リピートなし）
    pub fn key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// 背景色で塗りつぶす（カラー映像の代わり）
    pub fn clear(&mut self, color: Color) {
        self.buffer.fill(color.to_rgb_u32());
    }

    /// 描画指示をバッファに描く。テキストはタイトルバーに表示
    pub fn draw_directives(&mut self, directives: &[DrawDirective]) {
        let mut status = None;
        let mut distance = None;
        let mut banner = None;

        for directive in directives {
            match directive {
                DrawDirective::Line {
                    from,
                    to,
                    color,
                    thickness,
                } => self.draw_thick_line(*from, *to, *color, *thickness),
                DrawDirective::Circle {
                    center,
                    radius,
                    color,
                } => {
                    if self.near_buffer(*center, *radius) {
                        self.fill_circle(center.x as i32, center.y as i32, *radius as i32, *color);
                    }
                }
                DrawDirective::Rect { rect, color } => self.fill_rect(rect, *color),
                DrawDirective::Ellipse { rect, color } => self.fill_ellipse(rect, *color),
                DrawDirective::Arrow {
                    from,
                    to,
                    color,
                    thickness,
                } => self.draw_arrow(*from, *to, *color, *thickness),
                DrawDirective::Text { slot, cue } => match slot {
                    TextSlot::Status => status = Some(*cue),
                    TextSlot::Distance => distance = Some(*cue),
                    TextSlot::Banner => banner = Some(*cue),
                },
            }
        }

        let parts: Vec<&str> = [banner, status, distance]
            .iter()
            .flatten()
            .map(Cue::message)
            .collect();
        let title = if parts.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, parts.join(" | "))
        };
        self.window.set_title(&title);
    }

    /// バッファをウィンドウに表示
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    fn draw_arrow(&mut self, from: ScreenPoint, to: ScreenPoint, color: Color, thickness: f32) {
        self.draw_thick_line(from, to, color, thickness);

        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len = (dx * dx + dy * dy).sqrt();
        if !len.is_finite() || len <= f32::EPSILON {
            return;
        }
        let (ux, uy) = (dx / len, dy / len);
        // 軸に垂直な方向
        let (px, py) = (-uy, ux);
        let back = ScreenPoint::new(to.x - ux * ARROW_HEAD, to.y - uy * ARROW_HEAD);
        let left = back.offset(px * ARROW_HEAD, py * ARROW_HEAD);
        let right = back.offset(-px * ARROW_HEAD, -py * ARROW_HEAD);
        self.draw_thick_line(left, to, color, thickness);
        self.draw_thick_line(to, right, color, thickness);
    }

    /// Bresenhamの線を太さ分の円で塗る。バッファ外は先に切り詰める
    fn draw_thick_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Color, thickness: f32) {
        let radius = ((thickness / 2.0).round() as i32).max(0);
        let margin = radius as f32;
        let Some((from, to)) = clip_segment(
            from,
            to,
            -margin,
            -margin,
            self.width as f32 - 1.0 + margin,
            self.height as f32 - 1.0 + margin,
        ) else {
            return;
        };
        let (x0, y0) = (from.x as i32, from.y as i32);
        let (x1, y1) = (to.x as i32, to.y as i32);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            if radius == 0 {
                self.set_pixel(x, y, color);
            } else {
                self.fill_circle(x, y, radius, color);
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// 中心が半径分の余白を含めてバッファ内にあるか
    fn near_buffer(&self, p: ScreenPoint, radius: f32) -> bool {
        p.x.is_finite()
            && p.y.is_finite()
            && p.x >= -radius
            && p.y >= -radius
            && p.x <= self.width as f32 + radius
            && p.y <= self.height as f32 + radius
    }

    fn fill_rect(&mut self, rect: &ScreenRect, color: Color) {
        let x0 = (rect.x.floor() as i32).max(0);
        let y0 = (rect.y.floor() as i32).max(0);
        let x1 = ((rect.x + rect.width).ceil() as i32).min(self.width as i32);
        let y1 = ((rect.y + rect.height).ceil() as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x, y, color);
            }
        }
    }

    fn fill_ellipse(&mut self, rect: &ScreenRect, color: Color) {
        let rx = rect.width / 2.0;
        let ry = rect.height / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let cx = rect.x + rx;
        let cy = rect.y + ry;
        let x0 = (rect.x.floor() as i32).max(0);
        let y0 = (rect.y.floor() as i32).max(0);
        let x1 = ((rect.x + rect.width).ceil() as i32).min(self.width as i32);
        let y1 = ((rect.y + rect.height).ceil() as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                let nx = (x as f32 + 0.5 - cx) / rx;
                let ny = (y as f32 + 0.5 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// ピクセルをセット（境界チェック・アルファ合成付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.buffer[idx] = blend(self.buffer[idx], color);
    }
}

/// 線分を矩形 [min, max] に切り詰める (Liang-Barsky)。交わらなければ None
fn clip_segment(
    from: ScreenPoint,
    to: ScreenPoint,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
) -> Option<(ScreenPoint, ScreenPoint)> {
    if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [
        (-dx, from.x - min_x),
        (dx, max_x - from.x),
        (-dy, from.y - min_y),
        (dy, max_y - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    // 端点は丸め誤差で範囲をわずかに越えうる
    let at = |t: f32| {
        ScreenPoint::new(
            (from.x + dx * t).clamp(min_x, max_x),
            (from.y + dy * t).clamp(min_y, max_y),
        )
    };
    Some((at(t0), at(t1)))
}

/// 0x00RRGGBB の下地に color をアルファ合成
fn blend(dst: u32, color: Color) -> u32 {
    if color.a == 255 {
        return color.to_rgb_u32();
    }
    let a = color.a as u32;
    let inv = 255 - a;
    let mix = |d: u32, s: u8| (s as u32 * a + d * inv) / 255;
    let r = mix((dst >> 16) & 0xFF, color.r);
    let g = mix((dst >> 8) & 0xFF, color.g);
    let b = mix(dst & 0xFF, color.b);
    (r << 16) | (g << 8) | b
}
