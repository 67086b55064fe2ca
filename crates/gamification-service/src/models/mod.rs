//! 领域模型
//!
//! 包含账户、奖励项、兑换请求等实体定义

mod account;
mod enums;
mod redemption;
mod reward;

pub use account::Account;
pub use enums::{RedemptionStatus, Tier};
pub use redemption::RedemptionRequest;
pub use reward::RewardItem;
