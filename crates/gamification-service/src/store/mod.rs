//! 存储抽象与内存实现

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::GamificationStore;

#[cfg(test)]
pub use traits::MockGamificationStore;
