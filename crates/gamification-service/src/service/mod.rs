//! 业务服务层

mod accrual_service;
mod dto;
mod query_service;
mod redemption_service;

pub use accrual_service::AccrualService;
pub use dto::{AchievementProgress, CompletionEvent, CompletionOutcome};
pub use query_service::QueryService;
pub use redemption_service::RedemptionService;
