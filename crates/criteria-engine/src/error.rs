//! 评估引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("成就定义解析失败: {0}")]
    ParseError(String),

    #[error("成就定义无效: id={id}, 原因: {reason}")]
    InvalidDefinition { id: String, reason: String },

    #[error("条件无效: field={field}, 原因: {reason}")]
    InvalidCondition { field: String, reason: String },

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CriteriaError>;
