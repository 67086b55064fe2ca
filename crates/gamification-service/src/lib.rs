//! 游戏化账本与成就服务
//!
//! 将活动完成事件转化为积分、连续天数、等级、成就解锁和可消费的
//! 奖励兑换。核心流程：
//!
//! 1. 活动完成事件进入 [`service::AccrualService`]
//! 2. 连续天数更新（[`streak`]）-> 积分记账（[`ledger`]）-> 等级重判定
//! 3. 成就扫描：全部定义基于同一份通过前快照评估并发放
//! 4. 兑换请求独立进入 [`service::RedemptionService`]，
//!    与积分累积共享同一把每账户锁
//!
//! 账本变更（读余额 -> 计算 -> 写余额）是临界区，
//! 由 [`lock::AccountLockManager`] 按账户串行化。

pub mod error;
pub mod ledger;
pub mod lock;
pub mod models;
pub mod service;
pub mod store;
pub mod streak;

pub use error::{GamifyError, Result};
pub use models::{Account, RedemptionRequest, RedemptionStatus, RewardItem, Tier};
pub use service::{AccrualService, QueryService, RedemptionService};
pub use store::{GamificationStore, MemoryStore};
