//! 文件块缓存模块
//!
//! 这个模块把对大文件的随机字节读取转换为固定内存预算下的按块分页。
//!
//! # 主要组件
//!
//! - [`FileCache`] - 缓存入口：open/seek/read/close 与状态标志
//! - [`CacheConfig`] / [`CacheGeometry`] - 配置和按文件大小算出的几何参数
//! - [`BlockTable`] - 每个文件块一项的缺页索引，管理槽位和驱逐
//! - [`LruChain`] - 以块号为链接的 LRU 链
//! - [`SlotPool`] - 把一整块缓存划分为等大的槽位
//! - [`ReaderStatus`] / [`CacheStats`] - 状态标志与统计
//!
//! # 设计原理
//!
//! LRU 链直接嵌在文件块索引项里（`prev`/`next` 为块号），不使用
//! HashMap + 队列：
//!
//! 1. **O(1)**：命中时移到 MRU、缺页时摘下 LRU，都只改几个索引
//! 2. **零分配**：索引、槽位、空闲列表在 open 时一次分配，之后不再增长
//! 3. **无扫描**：查找驻留块就是按块号取索引项
//!
//! # 驱逐策略
//!
//! 严格 LRU，以整块为单位；只读，无脏块、无写回、无预取。
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use largefile_core::cache::{CacheConfig, FileCache};
//! use largefile_core::Whence;
//!
//! let mut cache: FileCache = FileCache::new();
//! cache.open_with_config("big.log", CacheConfig::default().with_block_size(4096))?;
//!
//! cache.seek(-100, Whence::End)?;
//! let mut tail = [0u8; 100];
//! cache.read(&mut tail)?;
//!
//! let stats = cache.stats();
//! println!("{} hits, {} misses", stats.hits, stats.misses);
//! ```

mod config;
mod entry;
mod file_cache;
mod lru;
mod slots;
mod status;
mod table;

pub use config::{CacheConfig, CacheGeometry};
pub use entry::FileBlockEntry;
pub use file_cache::{FileCache, Whence};
pub use lru::LruChain;
pub use slots::SlotPool;
pub use status::{CacheStats, ReaderStatus};
pub use table::{BlockTable, FaultIn};
