//! 分数归一化
//!
//! 所有原始分按测评满分折算到 /20 制，便于跨模块加权平均。

/// 将原始分折算为 /20 制分数
///
/// - 折算后限制在 [0, 20] 区间内
/// - 四舍五入保留两位小数
/// - 满分非正数或原始分非有限数时返回 None
pub fn normalize_note_20(score_raw: Option<f64>, total_points: f64) -> Option<f64> {
    let raw = score_raw?;
    if !raw.is_finite() || !total_points.is_finite() || total_points <= 0.0 {
        return None;
    }
    let scaled = (raw / total_points * 20.0).clamp(0.0, 20.0);
    Some((scaled * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_scaling() {
        assert_eq!(normalize_note_20(Some(15.0), 20.0), Some(15.0));
        assert_eq!(normalize_note_20(Some(50.0), 100.0), Some(10.0));
        assert_eq!(normalize_note_20(Some(7.0), 10.0), Some(14.0));
    }

    #[test]
    fn test_rounding_two_decimals() {
        // 1/3 * 20 = 6.666... → 6.67
        assert_eq!(normalize_note_20(Some(1.0), 3.0), Some(6.67));
        assert_eq!(normalize_note_20(Some(2.0), 3.0), Some(13.33));
    }

    #[test]
    fn test_clamped_above() {
        // 超出满分的加分卷也封顶在 20
        assert_eq!(normalize_note_20(Some(110.0), 100.0), Some(20.0));
    }

    #[test]
    fn test_clamped_below() {
        assert_eq!(normalize_note_20(Some(-5.0), 20.0), Some(0.0));
    }

    #[test]
    fn test_missing_score() {
        assert_eq!(normalize_note_20(None, 20.0), None);
    }

    #[test]
    fn test_invalid_total_points() {
        assert_eq!(normalize_note_20(Some(10.0), 0.0), None);
        assert_eq!(normalize_note_20(Some(10.0), -20.0), None);
    }

    #[test]
    fn test_non_finite_inputs() {
        assert_eq!(normalize_note_20(Some(f64::NAN), 20.0), None);
        assert_eq!(normalize_note_20(Some(f64::INFINITY), 20.0), None);
        assert_eq!(normalize_note_20(Some(10.0), f64::NAN), None);
    }
}
