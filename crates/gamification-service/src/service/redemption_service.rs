//! 兑换服务
//!
//! 处理奖励兑换的申请与审批。余额校验发生在申请时和批准时两处：
//! 待处理请求不冻结积分，批准时必须以当下余额重新校验。

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{GamifyError, Result};
use crate::lock::AccountLockManager;
use crate::models::{RedemptionRequest, RewardItem};
use crate::store::GamificationStore;

/// 兑换服务
pub struct RedemptionService<S: GamificationStore> {
    store: Arc<S>,
    locks: Arc<AccountLockManager>,
}

impl<S: GamificationStore> RedemptionService<S> {
    pub fn new(store: Arc<S>, locks: Arc<AccountLockManager>) -> Self {
        Self { store, locks }
    }

    /// 发起兑换请求
    ///
    /// 校验奖励项可兑换且账户余额充足后创建请求。
    /// 不需要家长审批的奖励项直接批准并扣减积分。
    #[instrument(skip(self, note))]
    pub async fn request_redemption(
        &self,
        account_id: &str,
        reward_item_id: &str,
        note: Option<String>,
    ) -> Result<RedemptionRequest> {
        let _guard = self.locks.acquire(account_id).await?;

        let mut account = self
            .store
            .load_account(account_id)
            .await?
            .ok_or_else(|| GamifyError::AccountNotFound(account_id.to_string()))?;

        let item = self.load_redeemable_item(reward_item_id).await?;

        if account.available_points < item.points_cost {
            return Err(GamifyError::InsufficientPoints {
                required: item.points_cost,
                available: account.available_points,
            });
        }

        // pointsUsed 锁定创建时刻的成本，后续目录调价不影响本请求
        let mut request = RedemptionRequest::new(
            account_id,
            reward_item_id,
            item.points_cost,
            note,
        );

        if !item.parent_approval_required {
            request.mark_approved(None);
            account.debit(request.points_used)?;
            self.store.save_account(&account).await?;
            info!(
                request_id = %request.id,
                account_id = %account_id,
                points_used = request.points_used,
                "redemption auto-approved"
            );
        } else {
            info!(
                request_id = %request.id,
                account_id = %account_id,
                "redemption pending parental approval"
            );
        }

        self.store.save_redemption_request(&request).await?;
        Ok(request)
    }

    /// 审批兑换请求
    ///
    /// 批准时以当下余额重新校验并扣减；余额不足时请求保持待处理。
    /// 已到终态的请求返回 AlreadyProcessed。
    #[instrument(skip(self, process_note))]
    pub async fn process_redemption(
        &self,
        request_id: &str,
        approve: bool,
        process_note: Option<String>,
    ) -> Result<RedemptionRequest> {
        // 先窥视请求拿到账户 id，再在账户锁内重新加载，
        // 避免终态检查与扣减之间被并发审批穿插
        let peeked = self
            .store
            .load_redemption_request(request_id)
            .await?
            .ok_or_else(|| GamifyError::RequestNotFound(request_id.to_string()))?;

        let _guard = self.locks.acquire(&peeked.account_id).await?;

        let mut request = self
            .store
            .load_redemption_request(request_id)
            .await?
            .ok_or_else(|| GamifyError::RequestNotFound(request_id.to_string()))?;

        if request.status.is_terminal() {
            return Err(GamifyError::AlreadyProcessed {
                request_id: request.id.clone(),
                status: request.status,
            });
        }

        if approve {
            let mut account = self
                .store
                .load_account(&request.account_id)
                .await?
                .ok_or_else(|| GamifyError::AccountNotFound(request.account_id.clone()))?;

            // 申请后余额可能已被其他兑换消耗，批准前必须重新校验
            if let Err(err) = account.debit(request.points_used) {
                warn!(
                    request_id = %request.id,
                    account_id = %request.account_id,
                    points_used = request.points_used,
                    available = account.available_points,
                    "approval failed balance re-check, request stays pending"
                );
                return Err(err);
            }

            request.mark_approved(process_note);
            self.store.save_account(&account).await?;
            info!(
                request_id = %request.id,
                account_id = %request.account_id,
                points_used = request.points_used,
                "redemption approved"
            );
        } else {
            // 拒绝不触碰余额
            request.mark_denied(process_note);
            info!(request_id = %request.id, "redemption denied");
        }

        self.store.save_redemption_request(&request).await?;
        Ok(request)
    }

    async fn load_redeemable_item(&self, reward_item_id: &str) -> Result<RewardItem> {
        let item = self
            .store
            .load_reward_item(reward_item_id)
            .await?
            .ok_or_else(|| GamifyError::RewardItemNotFound(reward_item_id.to_string()))?;

        // 下架项与不存在同等对待，不向兑换方泄露目录状态
        if !item.is_redeemable() {
            return Err(GamifyError::RewardItemNotFound(reward_item_id.to_string()));
        }
        Ok(item)
    }
}
