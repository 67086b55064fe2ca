//! 存储 trait 定义

use async_trait::async_trait;
use criteria_engine::AchievementDefinition;

use crate::error::Result;
use crate::models::{Account, RedemptionRequest, RewardItem};

/// 游戏化数据存取接口
///
/// 服务层只依赖这个抽象，持久化后端（内存、数据库等）
/// 通过实现该 trait 接入。读取方法对缺失实体返回 Ok(None)，
/// 由服务层决定映射到哪个 NotFound 错误。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GamificationStore: Send + Sync {
    /// 加载账户
    async fn load_account(&self, account_id: &str) -> Result<Option<Account>>;

    /// 保存账户（整体覆盖写）
    async fn save_account(&self, account: &Account) -> Result<()>;

    /// 加载全部成就定义（含停用项，由调用方过滤）
    async fn load_achievement_definitions(&self) -> Result<Vec<AchievementDefinition>>;

    /// 加载奖励项
    async fn load_reward_item(&self, item_id: &str) -> Result<Option<RewardItem>>;

    /// 加载兑换请求
    async fn load_redemption_request(&self, request_id: &str)
    -> Result<Option<RedemptionRequest>>;

    /// 保存兑换请求（整体覆盖写）
    async fn save_redemption_request(&self, request: &RedemptionRequest) -> Result<()>;

    /// 加载某账户的全部待处理兑换请求
    async fn load_pending_requests(&self, account_id: &str) -> Result<Vec<RedemptionRequest>>;
}
