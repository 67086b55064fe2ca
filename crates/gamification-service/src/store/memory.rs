//! 内存存储实现
//!
//! 基于 DashMap 的线程安全内存存储，用于测试和本地开发。

use async_trait::async_trait;
use criteria_engine::AchievementDefinition;
use dashmap::DashMap;
use tracing::debug;

use super::traits::GamificationStore;
use crate::error::Result;
use crate::models::{Account, RedemptionRequest, RedemptionStatus, RewardItem};

/// 内存存储
#[derive(Default)]
pub struct MemoryStore {
    accounts: DashMap<String, Account>,
    definitions: DashMap<String, AchievementDefinition>,
    reward_items: DashMap<String, RewardItem>,
    redemption_requests: DashMap<String, RedemptionRequest>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置账户
    pub fn seed_account(&self, account: Account) {
        self.accounts.insert(account.id.clone(), account);
    }

    /// 预置成就定义
    pub fn seed_definition(&self, definition: AchievementDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    /// 预置奖励项
    pub fn seed_reward_item(&self, item: RewardItem) {
        self.reward_items.insert(item.id.clone(), item);
    }
}

#[async_trait]
impl GamificationStore for MemoryStore {
    async fn load_account(&self, account_id: &str) -> Result<Option<Account>> {
        Ok(self.accounts.get(account_id).map(|entry| entry.clone()))
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        debug!(account_id = %account.id, total_points = account.total_points, "saving account");
        self.accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn load_achievement_definitions(&self) -> Result<Vec<AchievementDefinition>> {
        let mut definitions: Vec<AchievementDefinition> =
            self.definitions.iter().map(|entry| entry.clone()).collect();
        // DashMap 迭代顺序不稳定，按 id 排序保证评估顺序确定
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(definitions)
    }

    async fn load_reward_item(&self, item_id: &str) -> Result<Option<RewardItem>> {
        Ok(self.reward_items.get(item_id).map(|entry| entry.clone()))
    }

    async fn load_redemption_request(
        &self,
        request_id: &str,
    ) -> Result<Option<RedemptionRequest>> {
        Ok(self
            .redemption_requests
            .get(request_id)
            .map(|entry| entry.clone()))
    }

    async fn save_redemption_request(&self, request: &RedemptionRequest) -> Result<()> {
        debug!(request_id = %request.id, status = %request.status, "saving redemption request");
        self.redemption_requests
            .insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn load_pending_requests(&self, account_id: &str) -> Result<Vec<RedemptionRequest>> {
        let mut requests: Vec<RedemptionRequest> = self
            .redemption_requests
            .iter()
            .filter(|entry| {
                entry.account_id == account_id && entry.status == RedemptionStatus::Pending
            })
            .map(|entry| entry.clone())
            .collect();
        requests.sort_by(|a, b| a.requested_at.cmp(&b.requested_at));
        Ok(requests)
    }
}
