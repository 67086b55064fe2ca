//! 成就进度评估器
//!
//! 对单个账户快照和单个成就定义计算 0..=100 的进度分并判定可解锁性。
//! 评估是纯函数，永不失败：缺失或不可读的字段退化为数值 0，
//! 以保证成就扫描不会阻塞积分累积主流程。

use crate::models::{
    AchievementDefinition, Condition, EvaluationContext, EvaluationOutcome, IneligibilityReason,
    as_f64,
};
use crate::operators::Comparison;
use serde_json::Value;
use std::collections::BTreeSet;

/// 成就进度评估器
pub struct CriteriaEvaluator;

impl CriteriaEvaluator {
    /// 评估一个成就定义
    ///
    /// # Arguments
    /// * `definition` - 声明式成就定义
    /// * `held` - 账户已持有的成就 id 集合
    /// * `ctx` - 账户/活动进度快照
    pub fn evaluate(
        definition: &AchievementDefinition,
        held: &BTreeSet<String>,
        ctx: &EvaluationContext,
    ) -> EvaluationOutcome {
        // 已持有即视为已达最高等级，进度直接记满
        if held.contains(&definition.id) {
            return EvaluationOutcome::ineligible(100.0, IneligibilityReason::MaxLevelHeld);
        }

        // 前置成就缺失则完全不可解锁
        if let Some(missing) = definition
            .prerequisites
            .iter()
            .find(|id| !held.contains(*id))
        {
            return EvaluationOutcome::ineligible(
                0.0,
                IneligibilityReason::MissingPrerequisite(missing.clone()),
            );
        }

        // 持有互斥成就则取消资格
        if let Some(excluded) = definition.exclusions.iter().find(|id| held.contains(*id)) {
            return EvaluationOutcome::ineligible(
                0.0,
                IneligibilityReason::ExclusionHeld(excluded.clone()),
            );
        }

        let progress = Self::score(&definition.conditions, ctx);

        if progress >= definition.threshold_score {
            EvaluationOutcome {
                eligible: true,
                progress,
                reason: None,
                matched_level: definition.level_for_score(progress).cloned(),
            }
        } else {
            EvaluationOutcome::ineligible(progress, IneligibilityReason::BelowThreshold)
        }
    }

    /// 计算加权进度分
    ///
    /// score = Σ(weightᵢ × creditᵢ) / Σ(weightᵢ) × 100。
    /// 条件列表为空视为平凡满足，记 100 分。
    fn score(conditions: &[Condition], ctx: &EvaluationContext) -> f64 {
        if conditions.is_empty() {
            return 100.0;
        }

        let mut total_weight = 0.0;
        let mut earned = 0.0;

        for condition in conditions {
            total_weight += condition.weight;
            earned += condition.weight * Self::condition_credit(condition, ctx);
        }

        earned / total_weight * 100.0
    }

    /// 单条件学分（0..=1）
    ///
    /// 满足记 1；未满足的 gt/gte 条件按 min(字段值/目标值, 1) 给部分学分，
    /// 使数值目标的进度平滑而非全有或全无；其余操作符未满足记 0。
    fn condition_credit(condition: &Condition, ctx: &EvaluationContext) -> f64 {
        match &condition.comparison {
            Comparison::Eq(expected) => {
                let actual = Self::resolve(condition, ctx);
                if Self::values_equal(&actual, expected) { 1.0 } else { 0.0 }
            }
            Comparison::Ne(expected) => {
                let actual = Self::resolve(condition, ctx);
                if Self::values_equal(&actual, expected) { 0.0 } else { 1.0 }
            }
            Comparison::Gt(target) => {
                let actual = ctx.get_numeric(&condition.field);
                if actual > *target {
                    1.0
                } else {
                    Self::partial_credit(actual, *target)
                }
            }
            Comparison::Gte(target) => {
                let actual = ctx.get_numeric(&condition.field);
                if actual >= *target {
                    1.0
                } else {
                    Self::partial_credit(actual, *target)
                }
            }
            Comparison::Lt(target) => {
                if ctx.get_numeric(&condition.field) < *target { 1.0 } else { 0.0 }
            }
            Comparison::Lte(target) => {
                if ctx.get_numeric(&condition.field) <= *target { 1.0 } else { 0.0 }
            }
            Comparison::In(candidates) => {
                let actual = Self::resolve(condition, ctx);
                if candidates.iter().any(|c| Self::values_equal(&actual, c)) {
                    1.0
                } else {
                    0.0
                }
            }
            Comparison::Between([min, max]) => {
                let actual = ctx.get_numeric(&condition.field);
                if actual >= *min && actual <= *max { 1.0 } else { 0.0 }
            }
        }
    }

    /// 数值目标的部分学分: min(actual / target, 1)，下限 0
    fn partial_credit(actual: f64, target: f64) -> f64 {
        if target > 0.0 {
            (actual / target).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// 解析字段值，缺失退化为数值 0
    fn resolve(condition: &Condition, ctx: &EvaluationContext) -> Value {
        ctx.get_field(&condition.field)
            .cloned()
            .unwrap_or(Value::from(0))
    }

    /// 相等比较
    ///
    /// 数值统一转为浮点数比较，避免整数和浮点数形式不一致（如 100 与 100.0）
    fn values_equal(a: &Value, b: &Value) -> bool {
        if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
            return (x - y).abs() < f64::EPSILON;
        }
        a == b
    }
}
