//! 连续天数跟踪
//!
//! 以两次活动时间的整天差（向下取整的经过时间，非日历日）驱动
//! 连续计数的推进：同一 24 小时窗口内不变，恰好隔一天加一，
//! 间隔更久则重置为 1。

use chrono::{DateTime, Utc};

/// 连续天数推进结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak_count: u32,
    pub last_activity_date: DateTime<Utc>,
}

/// 根据本次活动时间推进连续计数
///
/// 天数差按经过时间向下取整计算（例如 23 小时 = 0 天，25 小时 = 1 天）。
/// 时钟回拨产生的负差按同日处理，计数不变。
/// 无论计数如何变化，lastActivityDate 一律更新为本次活动时间。
pub fn advance(
    last_activity: Option<DateTime<Utc>>,
    current_streak: u32,
    now: DateTime<Utc>,
) -> StreakUpdate {
    let streak_count = match last_activity {
        None => 1,
        Some(last) => {
            let days = (now - last).num_days();
            if days <= 0 {
                // 同日（或时钟回拨）：计数不变
                current_streak
            } else if days == 1 {
                current_streak + 1
            } else {
                1
            }
        }
    };

    StreakUpdate {
        streak_count,
        last_activity_date: now,
    }
}
