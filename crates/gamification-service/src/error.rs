//! 游戏化服务错误类型
//!
//! 定义服务层的业务错误和系统错误。所有错误以类型化结果返回给调用方
//! （API 层），绝不静默吞掉。

use thiserror::Error;

use crate::models::RedemptionStatus;

/// 游戏化服务错误类型
#[derive(Debug, Error)]
pub enum GamifyError {
    // === 校验错误 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 未找到 ===
    #[error("账户不存在: {0}")]
    AccountNotFound(String),

    #[error("奖励项不存在或已下线: {0}")]
    RewardItemNotFound(String),

    #[error("兑换请求不存在: {0}")]
    RequestNotFound(String),

    // === 兑换相关错误 ===
    #[error("可用积分不足: 需要 {required}, 可用 {available}")]
    InsufficientPoints { required: u64, available: u64 },

    #[error("兑换请求已处理: request_id={request_id}, status={status}")]
    AlreadyProcessed {
        request_id: String,
        status: RedemptionStatus,
    },

    // === 并发 ===
    #[error("并发冲突，请重试: {resource}")]
    ConcurrencyConflict { resource: String },
}

/// 游戏化服务 Result 类型别名
pub type Result<T> = std::result::Result<T, GamifyError>;

impl GamifyError {
    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }

    /// 检查是否为业务错误（非系统错误）
    ///
    /// 积分不足和重复处理是预期内的非致命条件，
    /// 以被拒绝的请求形式呈现给用户。
    pub fn is_business_error(&self) -> bool {
        !matches!(self, Self::ConcurrencyConflict { .. })
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::RewardItemNotFound(_) => "REWARD_ITEM_NOT_FOUND",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            Self::AlreadyProcessed { .. } => "ALREADY_PROCESSED",
            Self::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
        }
    }
}
