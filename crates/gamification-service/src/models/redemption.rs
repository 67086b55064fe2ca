//! 兑换请求实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::RedemptionStatus;

/// 兑换请求
///
/// pointsUsed 是请求创建时刻的成本快照，之后目录价格变动
/// 不影响已创建的请求。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionRequest {
    pub id: String,
    pub account_id: String,
    pub reward_item_id: String,
    /// 创建时刻的积分成本快照
    pub points_used: u64,
    pub status: RedemptionStatus,
    /// 请求方附言
    #[serde(default)]
    pub note: Option<String>,
    pub requested_at: DateTime<Utc>,
    /// 到达终态的时间
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    /// 审批方附言
    #[serde(default)]
    pub process_note: Option<String>,
}

impl RedemptionRequest {
    pub fn new(
        account_id: impl Into<String>,
        reward_item_id: impl Into<String>,
        points_used: u64,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.into(),
            reward_item_id: reward_item_id.into(),
            points_used,
            status: RedemptionStatus::Pending,
            note,
            requested_at: Utc::now(),
            processed_at: None,
            process_note: None,
        }
    }

    /// 标记为已批准
    pub fn mark_approved(&mut self, process_note: Option<String>) {
        self.status = RedemptionStatus::Approved;
        self.processed_at = Some(Utc::now());
        self.process_note = process_note;
    }

    /// 标记为已拒绝
    pub fn mark_denied(&mut self, process_note: Option<String>) {
        self.status = RedemptionStatus::Denied;
        self.processed_at = Some(Utc::now());
        self.process_note = process_note;
    }
}
