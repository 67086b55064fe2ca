//! 评估引擎领域模型

use crate::error::{CriteriaError, Result};
use crate::operators::Comparison;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

fn default_weight() -> f64 {
    1.0
}

fn default_active() -> bool {
    true
}

/// 加权条件
///
/// 对账户/活动进度快照中某个字段的一次比较测试，
/// weight 决定该条件在总进度分中的占比，缺省为 1。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// 点号分隔的字段路径，如 "progress.activitiesCompleted"
    pub field: String,
    #[serde(flatten)]
    pub comparison: Comparison,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Condition {
    pub fn new(field: impl Into<String>, comparison: Comparison) -> Self {
        Self {
            field: field.into(),
            comparison,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// 加载期校验
    ///
    /// 权重必须为正的有限数；between 区间端点必须有序；in 列表不能为空。
    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(CriteriaError::InvalidCondition {
                field: self.field.clone(),
                reason: format!("权重必须为正数: {}", self.weight),
            });
        }

        match &self.comparison {
            Comparison::Between([min, max]) if min > max => Err(CriteriaError::InvalidCondition {
                field: self.field.clone(),
                reason: format!("between 区间端点无序: [{}, {}]", min, max),
            }),
            Comparison::In(values) if values.is_empty() => Err(CriteriaError::InvalidCondition {
                field: self.field.clone(),
                reason: "in 候选列表不能为空".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// 成就等级
///
/// 多级成就的单个等级，threshold 为达到该等级所需的进度分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementLevel {
    pub name: String,
    /// 达到该等级所需的进度分（0..=100）
    pub threshold: f64,
    /// 达到该等级时发放的积分
    pub reward_points: u64,
}

/// 成就定义
///
/// 声明式地描述一项成就的解锁条件：加权条件集、进度阈值、
/// 前置/互斥成就、可选的多级等级表和单级成就的固定积分奖励。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 达到可解锁状态所需的进度分（0..=100）
    pub threshold_score: f64,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// 必须已持有的成就 id
    #[serde(default)]
    pub prerequisites: BTreeSet<String>,
    /// 持有即取消资格的成就 id
    #[serde(default)]
    pub exclusions: BTreeSet<String>,
    /// 等级表，按 threshold 升序；为空表示单级成就
    #[serde(default)]
    pub levels: Vec<AchievementLevel>,
    /// 单级成就的固定积分奖励
    #[serde(default)]
    pub points_reward: u64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl AchievementDefinition {
    /// 加载期校验
    ///
    /// 校验阈值范围、条件合法性和等级表有序性。
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(CriteriaError::InvalidDefinition {
                id: self.id.clone(),
                reason: "成就 id 不能为空".to_string(),
            });
        }

        if !(0.0..=100.0).contains(&self.threshold_score) {
            return Err(CriteriaError::InvalidDefinition {
                id: self.id.clone(),
                reason: format!("阈值超出 0..=100: {}", self.threshold_score),
            });
        }

        for condition in &self.conditions {
            condition.validate()?;
        }

        for window in self.levels.windows(2) {
            if window[0].threshold >= window[1].threshold {
                return Err(CriteriaError::InvalidDefinition {
                    id: self.id.clone(),
                    reason: format!(
                        "等级表必须按阈值严格升序: {} >= {}",
                        window[0].threshold, window[1].threshold
                    ),
                });
            }
        }

        if let Some(level) = self
            .levels
            .iter()
            .find(|l| !(0.0..=100.0).contains(&l.threshold))
        {
            return Err(CriteriaError::InvalidDefinition {
                id: self.id.clone(),
                reason: format!("等级阈值超出 0..=100: {}", level.threshold),
            });
        }

        Ok(())
    }

    /// 按进度分匹配等级
    ///
    /// 返回阈值不超过 score 的最高等级；全部不匹配时回落到最低等级。
    /// 单级成就（等级表为空）返回 None。
    pub fn level_for_score(&self, score: f64) -> Option<&AchievementLevel> {
        if self.levels.is_empty() {
            return None;
        }
        self.levels
            .iter()
            .rev()
            .find(|level| level.threshold <= score)
            .or_else(|| self.levels.first())
    }
}

/// 评估上下文 - 提供给评估器的账户/进度快照
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    data: Value,
}

impl EvaluationContext {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// 获取字段值（支持点号分隔的路径，如 "progress.perfectScores"）
    pub fn get_field(&self, path: &str) -> Option<&Value> {
        let mut current = &self.data;

        for part in path.split('.') {
            match current {
                Value::Object(map) => {
                    current = map.get(part)?;
                }
                Value::Array(arr) => {
                    // 支持数组索引访问，如 "progress.recentScores.0"
                    let index: usize = part.parse().ok()?;
                    current = arr.get(index)?;
                }
                _ => return None,
            }
        }

        Some(current)
    }

    /// 获取字段的数值视图
    ///
    /// 缺失或不可读的字段一律退化为 0，评估永不失败。
    pub fn get_numeric(&self, path: &str) -> f64 {
        self.get_field(path).and_then(as_f64).unwrap_or(0.0)
    }

    /// 获取底层数据
    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// 尝试将 Value 转换为 f64
pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// 不可解锁的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibilityReason {
    /// 已持有该成就的最高等级
    MaxLevelHeld,
    /// 缺少前置成就
    MissingPrerequisite(String),
    /// 持有互斥成就
    ExclusionHeld(String),
    /// 进度分未达到阈值
    BelowThreshold,
}

impl std::fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MaxLevelHeld => write!(f, "已持有最高等级"),
            Self::MissingPrerequisite(id) => write!(f, "缺少前置成就: {}", id),
            Self::ExclusionHeld(id) => write!(f, "持有互斥成就: {}", id),
            Self::BelowThreshold => write!(f, "进度未达到阈值"),
        }
    }
}

/// 评估结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    pub eligible: bool,
    /// 0..=100 的进度分
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<IneligibilityReason>,
    /// 可解锁时匹配到的等级（单级成就为 None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_level: Option<AchievementLevel>,
}

impl EvaluationOutcome {
    pub fn ineligible(progress: f64, reason: IneligibilityReason) -> Self {
        Self {
            eligible: false,
            progress,
            reason: Some(reason),
            matched_level: None,
        }
    }
}
