//! 账户级互斥锁

mod lock_manager;

pub use lock_manager::{AccountLockManager, LockConfig};
