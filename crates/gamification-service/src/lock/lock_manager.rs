//! 账户锁管理器
//!
//! 进程内的账户级互斥：同一账户的积分变更操作串行执行，
//! 不同账户的操作互不阻塞。

use dashmap::DashMap;
use gamify_shared::config::LockOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};

use crate::error::{GamifyError, Result};

/// 锁配置
#[derive(Debug, Clone)]
pub struct LockConfig {
    /// 获取锁重试次数
    pub retry_count: u32,
    /// 重试间隔
    pub retry_delay: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            retry_count: 20,
            retry_delay: Duration::from_millis(25),
        }
    }
}

impl From<&LockOptions> for LockConfig {
    fn from(options: &LockOptions) -> Self {
        Self {
            retry_count: options.retry_count,
            retry_delay: options.retry_delay(),
        }
    }
}

/// 账户锁管理器
///
/// 每个账户 id 对应一把互斥锁，按需创建并长期驻留。
/// 在重试次数内无法获取锁时返回 `ConcurrencyConflict`（可重试）。
pub struct AccountLockManager {
    locks: DashMap<String, Arc<Mutex<()>>>,
    config: LockConfig,
}

impl AccountLockManager {
    pub fn new(config: LockConfig) -> Self {
        Self {
            locks: DashMap::new(),
            config,
        }
    }

    /// 使用默认配置创建锁管理器
    pub fn with_defaults() -> Self {
        Self::new(LockConfig::default())
    }

    /// 获取某账户的互斥锁
    ///
    /// 返回的守卫在 drop 时自动释放锁。
    #[instrument(skip(self))]
    pub async fn acquire(&self, account_id: &str) -> Result<OwnedMutexGuard<()>> {
        let lock = self.lock_for(account_id);

        for attempt in 0..=self.config.retry_count {
            match lock.clone().try_lock_owned() {
                Ok(guard) => {
                    debug!(account_id = %account_id, attempt = attempt, "account lock acquired");
                    return Ok(guard);
                }
                Err(_) => {
                    if attempt < self.config.retry_count {
                        debug!(
                            account_id = %account_id,
                            attempt = attempt,
                            retry_delay_ms = self.config.retry_delay.as_millis(),
                            "account lock busy, retrying"
                        );
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        Err(GamifyError::ConcurrencyConflict {
            resource: format!("account:{}", account_id),
        })
    }

    /// 取出账户对应的锁，必要时创建
    ///
    /// 在返回前结束对 DashMap 分片的借用，避免跨 await 持有分片锁。
    fn lock_for(&self, account_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_config_default() {
        let config = LockConfig::default();
        assert_eq!(config.retry_count, 20);
        assert_eq!(config.retry_delay, Duration::from_millis(25));
    }

    #[test]
    fn test_lock_config_from_options() {
        let options = LockOptions {
            retry_count: 5,
            retry_delay_ms: 100,
        };
        let config = LockConfig::from(&options);

        assert_eq!(config.retry_count, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let manager = AccountLockManager::with_defaults();

        let guard = manager.acquire("user-1").await.unwrap();
        drop(guard);

        // 释放后可再次获取
        let _guard = manager.acquire("user-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_different_accounts_do_not_block() {
        let manager = AccountLockManager::with_defaults();

        let _guard_a = manager.acquire("user-a").await.unwrap();
        let _guard_b = manager.acquire("user-b").await.unwrap();
    }

    #[tokio::test]
    async fn test_conflict_after_retries_exhausted() {
        let manager = AccountLockManager::new(LockConfig {
            retry_count: 2,
            retry_delay: Duration::from_millis(1),
        });

        let _held = manager.acquire("user-1").await.unwrap();
        let err = manager.acquire("user-1").await.unwrap_err();

        assert!(matches!(err, GamifyError::ConcurrencyConflict { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_waiter_succeeds_once_holder_releases() {
        let manager = Arc::new(AccountLockManager::new(LockConfig {
            retry_count: 50,
            retry_delay: Duration::from_millis(5),
        }));

        let guard = manager.acquire("user-1").await.unwrap();

        let waiter = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.acquire("user-1").await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);

        let result = waiter.await.unwrap();
        assert!(result.is_ok());
    }
}
