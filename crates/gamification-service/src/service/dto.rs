//! 服务层数据传输对象

use chrono::{DateTime, Utc};
use criteria_engine::AchievementDefinition;
use serde::{Deserialize, Serialize};

use crate::models::Tier;

/// 活动完成事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub account_id: String,
    /// 成绩（0..=100）
    pub score: u32,
    /// 是否首次完成该活动
    #[serde(default)]
    pub is_first_time_completion: bool,
    /// 是否属于账户未涉足的类别
    #[serde(default)]
    pub is_new_category: bool,
    /// 活动发生时间，缺省为当前时间
    #[serde(default = "Utc::now")]
    pub occurred_at: DateTime<Utc>,
}

impl CompletionEvent {
    pub fn new(account_id: impl Into<String>, score: u32) -> Self {
        Self {
            account_id: account_id.into(),
            score,
            is_first_time_completion: false,
            is_new_category: false,
            occurred_at: Utc::now(),
        }
    }
}

/// 完成事件处理结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    /// 本次事件入账的积分（含成就奖励）
    pub points_earned: u64,
    pub new_total_points: u64,
    pub new_tier: Tier,
    /// 本次扫描中新解锁的成就 id
    pub newly_earned_achievement_ids: Vec<String>,
    pub streak_count: u32,
}

/// 成就进度视图
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub definition: AchievementDefinition,
    /// 0..=100 的进度分
    pub progress: f64,
    pub eligible: bool,
}
