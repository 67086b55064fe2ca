//! 奖励项实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 奖励目录项
///
/// 可用可用积分兑换的目录条目，可选家长审批门控。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 兑换所需积分
    pub points_cost: u64,
    /// 是否需要家长审批
    #[serde(default)]
    pub parent_approval_required: bool,
    /// 适龄年龄集合，为空表示不限
    #[serde(default)]
    pub age_appropriate_range: BTreeSet<i32>,
    /// 是否上架；下架项对兑换方不可见
    pub is_active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl RewardItem {
    /// 是否可被兑换
    pub fn is_redeemable(&self) -> bool {
        self.is_active
    }

    /// 是否适合给定年龄
    pub fn is_age_appropriate(&self, age: i32) -> bool {
        self.age_appropriate_range.is_empty() || self.age_appropriate_range.contains(&age)
    }
}
