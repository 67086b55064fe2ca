//! 积分累积服务
//!
//! 处理活动完成事件：推进连续计数、计算并入账积分、
//! 扫描成就并发放奖励，整个过程在账户锁内原子完成。

use std::sync::Arc;

use criteria_engine::{CriteriaEvaluator, EvaluationContext};
use tracing::{debug, info, instrument};

use crate::error::{GamifyError, Result};
use crate::ledger;
use crate::lock::AccountLockManager;
use crate::models::Account;
use crate::service::dto::{CompletionEvent, CompletionOutcome};
use crate::store::GamificationStore;
use crate::streak;

/// 积分累积服务
pub struct AccrualService<S: GamificationStore> {
    store: Arc<S>,
    locks: Arc<AccountLockManager>,
}

impl<S: GamificationStore> AccrualService<S> {
    pub fn new(store: Arc<S>, locks: Arc<AccountLockManager>) -> Self {
        Self { store, locks }
    }

    /// 处理一次活动完成事件
    ///
    /// 在账户锁内执行：加载账户、推进连续计数、积分入账、
    /// 成就扫描、发放成就奖励，最后单次保存账户。
    #[instrument(skip(self, event), fields(account_id = %event.account_id, score = event.score))]
    pub async fn record_completion(&self, event: &CompletionEvent) -> Result<CompletionOutcome> {
        ledger::validate_score(event.score)?;

        let _guard = self.locks.acquire(&event.account_id).await?;

        let mut account = self
            .store
            .load_account(&event.account_id)
            .await?
            .ok_or_else(|| GamifyError::AccountNotFound(event.account_id.clone()))?;

        let update = streak::advance(
            account.last_activity_date,
            account.streak_count,
            event.occurred_at,
        );
        account.streak_count = update.streak_count;
        account.last_activity_date = Some(update.last_activity_date);

        let completion_points = ledger::points_earned(
            event.score,
            event.is_first_time_completion,
            event.is_new_category,
            account.streak_count,
        );
        account.credit(completion_points);

        let (newly_earned, achievement_points) = self.run_achievement_pass(&mut account).await?;
        let points_earned = completion_points + achievement_points;

        account.updated_at = event.occurred_at;
        self.store.save_account(&account).await?;

        info!(
            account_id = %account.id,
            points_earned = points_earned,
            new_total = account.total_points,
            tier = %account.tier,
            streak = account.streak_count,
            newly_earned = newly_earned.len(),
            "completion recorded"
        );

        Ok(CompletionOutcome {
            points_earned,
            new_total_points: account.total_points,
            new_tier: account.tier,
            newly_earned_achievement_ids: newly_earned,
            streak_count: account.streak_count,
        })
    }

    /// 成就扫描
    ///
    /// 以扫描开始时的账户快照和已持有集合评估全部启用定义，
    /// 本轮新解锁的成就不会影响同一轮内其他定义的评估结果。
    /// 返回新解锁的成就 id 和发放的奖励积分总和。
    async fn run_achievement_pass(&self, account: &mut Account) -> Result<(Vec<String>, u64)> {
        let definitions = self.store.load_achievement_definitions().await?;

        let ctx = EvaluationContext::new(account.snapshot());
        let held = account.earned_achievement_ids.clone();

        let mut newly_earned = Vec::new();
        let mut awarded_points = 0u64;

        for definition in definitions.iter().filter(|d| d.is_active) {
            let outcome = CriteriaEvaluator::evaluate(definition, &held, &ctx);
            if !outcome.eligible {
                continue;
            }
            // 集合插入保证重复扫描下的幂等
            if !account.award_achievement(&definition.id) {
                continue;
            }

            let reward = outcome
                .matched_level
                .as_ref()
                .map(|level| level.reward_points)
                .unwrap_or(definition.points_reward);
            account.credit(reward);
            awarded_points += reward;

            debug!(
                account_id = %account.id,
                achievement_id = %definition.id,
                progress = outcome.progress,
                reward = reward,
                "achievement awarded"
            );
            newly_earned.push(definition.id.clone());
        }

        Ok((newly_earned, awarded_points))
    }
}
