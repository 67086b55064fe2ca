//! 成就评估引擎
//!
//! 提供可复用的成就进度评估能力，支持：
//! - JSON 成就定义的解析与加载期校验
//! - 封闭的带类型操作数比较变体
//! - 加权多条件评分与数值目标的部分学分
//! - 前置/互斥成就门控与多级成就匹配

pub mod error;
pub mod evaluator;
pub mod loader;
pub mod models;
pub mod operators;

pub use error::{CriteriaError, Result};
pub use evaluator::CriteriaEvaluator;
pub use loader::load_definitions;
pub use models::{
    AchievementDefinition, AchievementLevel, Condition, EvaluationContext, EvaluationOutcome,
    IneligibilityReason,
};
pub use operators::Comparison;
