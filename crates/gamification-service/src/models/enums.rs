//! 枚举类型定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 白金等级积分门槛
pub const PLATINUM_THRESHOLD: u64 = 600;
/// 黄金等级积分门槛
pub const GOLD_THRESHOLD: u64 = 300;
/// 白银等级积分门槛
pub const SILVER_THRESHOLD: u64 = 100;

/// 账户等级
///
/// 由累计积分派生的粗粒度声望档位。每次积分入账后都从
/// totalPoints 重新判定（幂等，而非增量），本子系统中
/// totalPoints 单调不减，因此等级不会自行下降。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    /// 从累计积分判定等级
    pub fn classify(total_points: u64) -> Self {
        if total_points >= PLATINUM_THRESHOLD {
            Self::Platinum
        } else if total_points >= GOLD_THRESHOLD {
            Self::Gold
        } else if total_points >= SILVER_THRESHOLD {
            Self::Silver
        } else {
            Self::Bronze
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
        };
        write!(f, "{}", s)
    }
}

/// 兑换请求状态
///
/// pending -> {approved, denied}，终态后不可再变更
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedemptionStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl RedemptionStatus {
    /// 是否已到达终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Denied)
    }
}

impl fmt::Display for RedemptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Denied => "DENIED",
        };
        write!(f, "{}", s)
    }
}
