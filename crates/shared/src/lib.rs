//! 共享库
//!
//! 包含各业务 crate 共用的配置加载、日志初始化和重试执行器。

pub mod config;
pub mod observability;
pub mod retry;
