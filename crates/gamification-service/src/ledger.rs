//! 完成事件积分计算
//!
//! 单次活动完成的积分由固定基础分加各类加成构成。
//! 连续加成是互斥档位（取最高一档），不叠加。

use crate::error::{GamifyError, Result};

/// 基础分
pub const BASE_POINTS: u64 = 10;
/// 满分加成（score == 100）
pub const PERFECT_SCORE_BONUS: u64 = 5;
/// 首次完成该活动加成
pub const FIRST_COMPLETION_BONUS: u64 = 3;
/// 新类别加成
pub const NEW_CATEGORY_BONUS: u64 = 5;

/// 长连续加成（连续 >= 7 天）
pub const LONG_STREAK_BONUS: u64 = 10;
/// 短连续加成（连续 >= 3 天）
pub const SHORT_STREAK_BONUS: u64 = 5;

/// 连续天数加成
///
/// 互斥档位：>= 7 天记 10 分，否则 >= 3 天记 5 分，否则 0 分。
pub fn streak_bonus(streak_count: u32) -> u64 {
    if streak_count >= 7 {
        LONG_STREAK_BONUS
    } else if streak_count >= 3 {
        SHORT_STREAK_BONUS
    } else {
        0
    }
}

/// 计算单次完成事件的总积分
///
/// streak_count 取本次事件推进之后的计数。
pub fn points_earned(
    score: u32,
    is_first_time_completion: bool,
    is_new_category: bool,
    streak_count: u32,
) -> u64 {
    let mut points = BASE_POINTS;
    if score == 100 {
        points += PERFECT_SCORE_BONUS;
    }
    if is_first_time_completion {
        points += FIRST_COMPLETION_BONUS;
    }
    if is_new_category {
        points += NEW_CATEGORY_BONUS;
    }
    points + streak_bonus(streak_count)
}

/// 校验成绩在 0..=100 范围内
pub fn validate_score(score: u32) -> Result<()> {
    if score > 100 {
        return Err(GamifyError::Validation(format!(
            "score 必须在 0..=100 范围内, 实际: {}",
            score
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_points_only() {
        assert_eq!(points_earned(60, false, false, 1), 10);
    }

    #[test]
    fn test_perfect_score_bonus() {
        assert_eq!(points_earned(100, false, false, 1), 15);
        // 99 分不算满分
        assert_eq!(points_earned(99, false, false, 1), 10);
    }

    #[test]
    fn test_all_bonuses_stack() {
        // 10 基础 + 5 满分 + 3 首次 + 5 新类别 + 5 短连续 = 28
        assert_eq!(points_earned(100, true, true, 3), 28);
    }

    #[test]
    fn test_streak_bonus_tiers_are_exclusive() {
        assert_eq!(streak_bonus(0), 0);
        assert_eq!(streak_bonus(2), 0);
        assert_eq!(streak_bonus(3), 5);
        assert_eq!(streak_bonus(6), 5);
        assert_eq!(streak_bonus(7), 10);
        assert_eq!(streak_bonus(100), 10);
    }

    #[test]
    fn test_long_streak_does_not_stack_with_short() {
        // 10 基础 + 10 长连续，而非 10 + 5 + 10
        assert_eq!(points_earned(50, false, false, 8), 20);
    }

    #[test]
    fn test_validate_score_bounds() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(100).is_ok());

        let err = validate_score(101).unwrap_err();
        assert!(matches!(err, GamifyError::Validation(_)));
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
