use crate::config::JointMatching;
use crate::pose::{Joint, JointType, SkeletonFrame};

/// どちらかのスケルトンが無いときの値
pub const MISSING_SKELETON_SCORE: f32 = 1.0;

/// 2 つのスケルトンの対応関節間の XY 距離の合計（Z は無視）
///
/// 値が小さいほど似ている。
pub fn score(
    person: Option<&SkeletonFrame>,
    model: Option<&SkeletonFrame>,
    matching: JointMatching,
) -> f32 {
    let (Some(person), Some(model)) = (person, model) else {
        return MISSING_SKELETON_SCORE;
    };

    match matching {
        JointMatching::ParallelOrder => person
            .joints
            .iter()
            .zip(model.joints.iter())
            .filter(|(a, b)| same_type_tag(a, b))
            .map(|(a, b)| xy_distance(a, b))
            .sum(),
        JointMatching::JointId => JointType::ALL
            .iter()
            .map(|&id| xy_distance(person.get(id), model.get(id)))
            .sum(),
    }
}

/// 関節はすべて同じ型なので常に一致する
fn same_type_tag(_a: &Joint, _b: &Joint) -> bool {
    true
}

fn xy_distance(a: &Joint, b: &Joint) -> f32 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SkeletonBuilder;

    #[test]
    fn test_missing_skeleton_sentinel() {
        let frame = SkeletonBuilder::standing(2.2).build();
        for matching in [JointMatching::ParallelOrder, JointMatching::JointId] {
            assert_eq!(score(None, Some(&frame), matching), MISSING_SKELETON_SCORE);
            assert_eq!(score(Some(&frame), None, matching), MISSING_SKELETON_SCORE);
            assert_eq!(score(None, None, matching), MISSING_SKELETON_SCORE);
        }
    }

    #[test]
    fn test_identical_skeletons_score_zero() {
        let frame = SkeletonBuilder::standing(2.2).build();
        assert_eq!(score(Some(&frame), Some(&frame), JointMatching::ParallelOrder), 0.0);
        assert_eq!(score(Some(&frame), Some(&frame), JointMatching::JointId), 0.0);
    }

    #[test]
    fn test_depth_is_ignored() {
        let near = SkeletonBuilder::standing(1.0).build();
        let far = SkeletonBuilder::standing(3.0).build();
        assert_eq!(score(Some(&near), Some(&far), JointMatching::ParallelOrder), 0.0);
    }

    #[test]
    fn test_single_joint_offset() {
        let model = SkeletonBuilder::standing(2.2).build();
        let hand = model.get(JointType::HandRight).position;
        let person = SkeletonBuilder::standing(2.2)
            .joint(JointType::HandRight, [hand[0] + 0.3, hand[1] + 0.4, hand[2]])
            .build();

        for matching in [JointMatching::ParallelOrder, JointMatching::JointId] {
            let s = score(Some(&person), Some(&model), matching);
            assert!((s - 0.5).abs() < 1e-5, "{:?}: {}", matching, s);
        }
    }
}
