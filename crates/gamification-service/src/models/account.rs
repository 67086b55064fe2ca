//! 账户实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeSet;

use super::enums::Tier;
use crate::error::{GamifyError, Result};

/// 学习者账户
///
/// 持有积分账本（累计/可用）、等级、连续天数和已解锁成就集。
/// 已解锁成就是真正的集合类型，加载/持久化边界显式序列化，
/// 不做访问时的惰性解析。
///
/// 不变式: availablePoints <= totalPoints 恒成立；
/// 两者均非负且单调不减，仅 availablePoints 会因批准的兑换而减少。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    /// 累计积分（只增不减）
    pub total_points: u64,
    /// 可用积分（兑换时扣减）
    pub available_points: u64,
    pub tier: Tier,
    /// 连续活动天数
    pub streak_count: u32,
    /// 最近一次活动时间（首次活动前为 None）
    #[serde(default)]
    pub last_activity_date: Option<DateTime<Utc>>,
    /// 已解锁成就 id 集合
    #[serde(default)]
    pub earned_achievement_ids: BTreeSet<String>,
    /// 活动进度文档（由活动层维护，成就条件的字段路径解析于此）
    #[serde(default)]
    pub progress: Value,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            total_points: 0,
            available_points: 0,
            tier: Tier::Bronze,
            streak_count: 0,
            last_activity_date: None,
            earned_achievement_ids: BTreeSet::new(),
            progress: json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    /// 积分入账
    ///
    /// 同时增加累计与可用积分，并从新的累计积分重新判定等级。
    pub fn credit(&mut self, points: u64) {
        self.total_points += points;
        self.available_points += points;
        self.tier = Tier::classify(self.total_points);
        debug_assert!(self.available_points <= self.total_points);
    }

    /// 可用积分扣减
    ///
    /// 累计积分不变；余额不足返回 InsufficientPoints。
    pub fn debit(&mut self, points: u64) -> Result<()> {
        if self.available_points < points {
            return Err(GamifyError::InsufficientPoints {
                required: points,
                available: self.available_points,
            });
        }
        self.available_points -= points;
        Ok(())
    }

    /// 是否已持有某成就
    pub fn has_achievement(&self, achievement_id: &str) -> bool {
        self.earned_achievement_ids.contains(achievement_id)
    }

    /// 记录成就解锁
    ///
    /// 集合语义：重复添加已持有的 id 为无操作并返回 false，
    /// 保证重试或重复事件下的幂等性。
    pub fn award_achievement(&mut self, achievement_id: &str) -> bool {
        self.earned_achievement_ids.insert(achievement_id.to_string())
    }

    /// 生成评估快照
    ///
    /// 供 CriteriaEvaluator 做字段路径解析的只读 JSON 视图，
    /// 账户字段在 "account" 下，活动进度文档在 "progress" 下。
    pub fn snapshot(&self) -> Value {
        json!({
            "account": {
                "totalPoints": self.total_points,
                "availablePoints": self.available_points,
                "tier": self.tier,
                "streakCount": self.streak_count,
                "achievementCount": self.earned_achievement_ids.len(),
            },
            "progress": self.progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_updates_both_balances_and_tier() {
        let mut account = Account::new("user-1");
        account.credit(150);

        assert_eq!(account.total_points, 150);
        assert_eq!(account.available_points, 150);
        assert_eq!(account.tier, Tier::Silver);
    }

    #[test]
    fn test_debit_leaves_total_untouched() {
        let mut account = Account::new("user-1");
        account.credit(100);
        account.debit(30).unwrap();

        assert_eq!(account.total_points, 100);
        assert_eq!(account.available_points, 70);
        // 等级由累计积分决定，扣减可用积分不降级
        assert_eq!(account.tier, Tier::Silver);
    }

    #[test]
    fn test_debit_insufficient_points() {
        let mut account = Account::new("user-1");
        account.credit(20);

        let err = account.debit(50).unwrap_err();
        assert!(matches!(
            err,
            GamifyError::InsufficientPoints {
                required: 50,
                available: 20
            }
        ));
        // 失败的扣减不改变余额
        assert_eq!(account.available_points, 20);
    }

    #[test]
    fn test_invariant_available_never_exceeds_total() {
        let mut account = Account::new("user-1");
        account.credit(500);
        account.debit(200).unwrap();
        account.credit(150);

        assert!(account.available_points <= account.total_points);
        assert_eq!(account.total_points, 650);
        assert_eq!(account.available_points, 450);
        assert_eq!(account.tier, Tier::Platinum);
    }

    #[test]
    fn test_award_achievement_is_idempotent() {
        let mut account = Account::new("user-1");

        assert!(account.award_achievement("first-steps"));
        // 重复添加为无操作
        assert!(!account.award_achievement("first-steps"));
        assert_eq!(account.earned_achievement_ids.len(), 1);
        assert!(account.has_achievement("first-steps"));
    }

    #[test]
    fn test_snapshot_shape() {
        let mut account = Account::new("user-1");
        account.credit(120);
        account.streak_count = 4;
        account.progress = json!({ "activitiesCompleted": 7 });
        account.award_achievement("first-steps");

        let snapshot = account.snapshot();
        assert_eq!(snapshot["account"]["totalPoints"], 120);
        assert_eq!(snapshot["account"]["tier"], "SILVER");
        assert_eq!(snapshot["account"]["streakCount"], 4);
        assert_eq!(snapshot["account"]["achievementCount"], 1);
        assert_eq!(snapshot["progress"]["activitiesCompleted"], 7);
    }

    #[test]
    fn test_account_serialization_roundtrip() {
        let mut account = Account::new("user-1");
        account.credit(42);
        account.award_achievement("first-steps");

        let json = serde_json::to_string(&account).unwrap();
        let parsed: Account = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, "user-1");
        assert_eq!(parsed.total_points, 42);
        assert!(parsed.has_achievement("first-steps"));
    }
}
