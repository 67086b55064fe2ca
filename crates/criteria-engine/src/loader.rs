//! 成就定义加载器
//!
//! 从 JSON 文档解析成就定义并执行加载期校验。
//! 非法定义（未知操作符、类型不符的操作数、无序等级表）在此处被拒绝，
//! 保证进入评估器的定义全部结构合法。

use crate::error::{CriteriaError, Result};
use crate::models::AchievementDefinition;

/// 解析并校验一组成就定义
///
/// 任何一条定义非法都会使整批加载失败，避免部分生效的定义集。
/// 同时拒绝重复的成就 id。
pub fn load_definitions(json: &str) -> Result<Vec<AchievementDefinition>> {
    let definitions: Vec<AchievementDefinition> = serde_json::from_str(json)
        .map_err(|e| CriteriaError::ParseError(e.to_string()))?;

    let mut seen = std::collections::BTreeSet::new();
    for definition in &definitions {
        definition.validate()?;
        if !seen.insert(definition.id.clone()) {
            return Err(CriteriaError::InvalidDefinition {
                id: definition.id.clone(),
                reason: "成就 id 重复".to_string(),
            });
        }
    }

    Ok(definitions)
}

/// 解析并校验单条成就定义
pub fn load_definition(json: &str) -> Result<AchievementDefinition> {
    let definition: AchievementDefinition = serde_json::from_str(json)
        .map_err(|e| CriteriaError::ParseError(e.to_string()))?;
    definition.validate()?;
    Ok(definition)
}
