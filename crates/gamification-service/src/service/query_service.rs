//! 只读查询服务

use std::sync::Arc;

use criteria_engine::{CriteriaEvaluator, EvaluationContext};
use tracing::instrument;

use crate::error::{GamifyError, Result};
use crate::models::RedemptionRequest;
use crate::service::dto::AchievementProgress;
use crate::store::GamificationStore;

/// 查询服务
///
/// 纯读取路径，不加账户锁：返回的进度是查询时刻的快照视图。
pub struct QueryService<S: GamificationStore> {
    store: Arc<S>,
}

impl<S: GamificationStore> QueryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 查询账户对全部启用且未持有成就的进度
    #[instrument(skip(self))]
    pub async fn get_eligible_achievements(
        &self,
        account_id: &str,
    ) -> Result<Vec<AchievementProgress>> {
        let account = self
            .store
            .load_account(account_id)
            .await?
            .ok_or_else(|| GamifyError::AccountNotFound(account_id.to_string()))?;

        let definitions = self.store.load_achievement_definitions().await?;
        let ctx = EvaluationContext::new(account.snapshot());

        let progress = definitions
            .into_iter()
            .filter(|d| d.is_active && !account.has_achievement(&d.id))
            .map(|definition| {
                let outcome =
                    CriteriaEvaluator::evaluate(&definition, &account.earned_achievement_ids, &ctx);
                AchievementProgress {
                    definition,
                    progress: outcome.progress,
                    eligible: outcome.eligible,
                }
            })
            .collect();

        Ok(progress)
    }

    /// 查询账户的待处理兑换请求
    #[instrument(skip(self))]
    pub async fn get_pending_redemptions(
        &self,
        account_id: &str,
    ) -> Result<Vec<RedemptionRequest>> {
        // 账户必须存在，空结果与账户不存在要可区分
        if self.store.load_account(account_id).await?.is_none() {
            return Err(GamifyError::AccountNotFound(account_id.to_string()));
        }
        self.store.load_pending_requests(account_id).await
    }
}
