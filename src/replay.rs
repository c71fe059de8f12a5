//! 記録済みセンサーティックの読み込みと、組み込みデモ列
//!
//! ファイル形式は 1 行 1 ティックの JSON Lines。

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::pose::{Joint, JointType, SensorTick, SkeletonFrame, SkeletonTracking};

/// デモ列のティック間隔（約 30Hz）
pub const DEMO_TICK_MS: u64 = 33;

/// デモで右手を置く XY。既定の投影設定・肩の奥行き 2.2m のとき、
/// 1.6m まで押し込むとヒットゾーン内に写る
const DEMO_HAND_XY: [f32; 2] = [0.35, 0.29];

/// JSON Lines を読み込む。空行は読み飛ばす
pub fn read_ticks<R: BufRead>(reader: R) -> Result<Vec<SensorTick>> {
    let mut ticks = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.with_context(|| format!("failed to read line {}", line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let tick: SensorTick = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid sensor tick on line {}", line_no))?;
        ticks.push(tick);
    }
    Ok(ticks)
}

/// ファイルから読み込む
pub fn load_ticks<P: AsRef<Path>>(path: P) -> Result<Vec<SensorTick>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open frames file: {}", path.display()))?;
    read_ticks(BufReader::new(file))
        .with_context(|| format!("failed to parse frames file: {}", path.display()))
}

/// パス指定があればファイルから、無ければデモ列
pub fn load_or_demo(path: Option<&Path>) -> Result<Vec<SensorTick>> {
    match path {
        Some(path) => load_ticks(path),
        None => Ok(demo_script()),
    }
}

/// 1 ティック 1 行で書き出す
pub fn write_ticks<W: Write>(mut writer: W, ticks: &[SensorTick]) -> Result<()> {
    for tick in ticks {
        serde_json::to_writer(&mut writer, tick)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// 腕を下ろして直立した全関節 Tracked のスケルトン。z は体全体の奥行き
pub fn standing_skeleton(z: f32) -> SkeletonFrame {
    use JointType::*;
    let layout: [(JointType, f32, f32); JointType::COUNT] = [
        (HipCenter, 0.0, -0.3),
        (Spine, 0.0, -0.1),
        (ShoulderCenter, 0.0, 0.3),
        (Head, 0.0, 0.5),
        (ShoulderLeft, -0.2, 0.25),
        (ElbowLeft, -0.25, 0.0),
        (WristLeft, -0.27, -0.2),
        (HandLeft, -0.28, -0.28),
        (ShoulderRight, 0.2, 0.25),
        (ElbowRight, 0.25, 0.0),
        (WristRight, 0.27, -0.2),
        (HandRight, 0.28, -0.28),
        (HipLeft, -0.1, -0.35),
        (KneeLeft, -0.1, -0.75),
        (AnkleLeft, -0.1, -1.1),
        (FootLeft, -0.1, -1.15),
        (HipRight, 0.1, -0.35),
        (KneeRight, 0.1, -0.75),
        (AnkleRight, 0.1, -1.1),
        (FootRight, 0.1, -1.15),
    ];
    let mut joints = [Joint::default(); JointType::COUNT];
    for (joint, x, y) in layout {
        joints[joint as usize] = Joint::tracked(x, y, z);
    }
    SkeletonFrame::new(SkeletonTracking::Tracked, joints)
}

/// 右手を前に出した姿勢（肘・手首も手に合わせて動かす）
fn reaching_skeleton(z: f32, hand_z: f32) -> SkeletonFrame {
    let mut frame = standing_skeleton(z);
    let [hx, hy] = DEMO_HAND_XY;
    frame.joints[JointType::HandRight as usize].position = [hx, hy, hand_z];
    frame.joints[JointType::WristRight as usize].position = [hx - 0.03, hy - 0.05, hand_z + 0.05];
    frame.joints[JointType::ElbowRight as usize].position =
        [0.3, 0.1, (z + hand_z) / 2.0];
    frame
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

struct Script {
    ticks: Vec<SensorTick>,
}

impl Script {
    fn push(&mut self, skeletons: Vec<SkeletonFrame>) {
        let timestamp_ms = self.ticks.len() as u64 * DEMO_TICK_MS;
        self.ticks.push(SensorTick::new(timestamp_ms, skeletons));
    }

    fn hold(&mut self, frame: &SkeletonFrame, count: usize) {
        for _ in 0..count {
            self.push(vec![frame.clone()]);
        }
    }

    /// 体の奥行きを from から to へ移動
    fn walk(&mut self, from: f32, to: f32, count: usize) {
        for i in 0..count {
            let t = i as f32 / (count - 1).max(1) as f32;
            self.push(vec![standing_skeleton(lerp(from, to, t))]);
        }
    }

    /// 右手の奥行きを from から to へ動かす
    fn reach(&mut self, z: f32, from: f32, to: f32, count: usize) {
        for i in 0..count {
            let t = i as f32 / (count - 1).max(1) as f32;
            self.push(vec![reaching_skeleton(z, lerp(from, to, t))]);
        }
    }
}

/// センサー無しで一通り遊べるティック列
///
/// 遠すぎ → 近すぎ → 適正距離 → 右手を上げて待機 → 押し込み 2 回 の順。
/// 既定設定で最後にゴール到達・非選択状態になる。
pub fn demo_script() -> Vec<SensorTick> {
    const BODY_Z: f32 = 2.2;
    const HAND_READY: f32 = 2.1;
    const HAND_PUSHED: f32 = 1.6;

    let mut script = Script { ticks: Vec::new() };

    // 誰もいない
    for _ in 0..10 {
        script.push(Vec::new());
    }

    // 遠くから歩いてくる。隣に PositionOnly の通行人
    for i in 0..30 {
        let z = lerp(3.4, 2.7, i as f32 / 29.0);
        let bystander = SkeletonFrame::position_only([-0.8, -0.2, 3.5]);
        script.push(vec![bystander, standing_skeleton(z)]);
    }

    // 近づきすぎて足元が切れる
    script.walk(2.7, 1.7, 15);
    let mut too_near = standing_skeleton(1.7);
    too_near.clipped_edges.bottom = true;
    script.hold(&too_near, 15);

    // 適正距離まで下がる
    script.walk(1.7, BODY_Z, 15);
    script.hold(&standing_skeleton(BODY_Z), 15);

    // 右手を見失ったティックは何も起きない
    let mut lost_hand = standing_skeleton(BODY_Z);
    lost_hand.joints[JointType::HandRight as usize].tracking = Default::default();
    script.hold(&lost_hand, 5);

    // 右手を上げて開始ポーズ
    script.reach(BODY_Z, HAND_READY, HAND_READY, 20);

    // 押して戻す × 2
    for _ in 0..2 {
        script.reach(BODY_Z, HAND_READY, HAND_PUSHED, 8);
        script.reach(BODY_Z, HAND_PUSHED, HAND_PUSHED, 10);
        script.reach(BODY_Z, HAND_PUSHED, HAND_READY, 8);
        script.reach(BODY_Z, HAND_READY, HAND_READY, 10);
    }

    // 手を下ろして余韻
    script.hold(&standing_skeleton(BODY_Z), 30);

    script.ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_ticks_skips_blank_lines() {
        let input = "{\"timestamp_ms\":0,\"skeletons\":[]}\n\n   \n{\"timestamp_ms\":33}\n";
        let ticks = read_ticks(Cursor::new(input)).unwrap();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[1].timestamp_ms, 33);
        assert!(ticks[1].skeletons.is_empty());
    }

    #[test]
    fn test_read_ticks_reports_line_number() {
        let input = "{\"timestamp_ms\":0}\n\nnot json\n";
        let err = read_ticks(Cursor::new(input)).unwrap_err();
        assert!(format!("{:#}", err).contains("line 3"));
    }

    #[test]
    fn test_position_only_tick_parses() {
        let input = r#"{"timestamp_ms":5,"skeletons":[{"tracking":"position-only","position":[0.1,0.2,3.0]}]}"#;
        let ticks = read_ticks(Cursor::new(input)).unwrap();
        let skeleton = &ticks[0].skeletons[0];
        assert_eq!(skeleton.tracking, SkeletonTracking::PositionOnly);
        assert_eq!(skeleton.position, [0.1, 0.2, 3.0]);
        assert!(!skeleton.get(JointType::Head).is_available());
    }

    #[test]
    fn test_written_demo_reads_back() {
        let demo = demo_script();
        let mut buf = Vec::new();
        write_ticks(&mut buf, &demo).unwrap();
        let back = read_ticks(Cursor::new(buf)).unwrap();
        assert_eq!(back, demo);
    }

    #[test]
    fn test_demo_timestamps_increase() {
        let demo = demo_script();
        assert!(demo.windows(2).all(|w| w[1].timestamp_ms > w[0].timestamp_ms));
        assert!(demo.iter().any(|t| t.primary().is_some()));
        assert!(demo.iter().any(|t| t.skeletons.is_empty()));
    }

    #[test]
    fn test_load_ticks_missing_file() {
        let err = load_ticks("/nonexistent/frames.jsonl").unwrap_err();
        assert!(err.to_string().contains("frames.jsonl"));
    }
}
