//! largefile_core: 大文件块缓存与行索引
//!
//! 在固定内存预算下随机读取任意大小的文件：
//! - **块缓存**：按块分页、严格 LRU 驱逐，open/seek/read/close 接口
//! - **行索引**：一次顺序扫描，记录每一行的偏移和长度
//! - **分块数组**：只追加分块、元素地址稳定的增长数组
//!
//! # 示例
//!
//! ```rust,ignore
//! use largefile_core::{CacheConfig, FileCache, LineIndexer, Result, Whence};
//!
//! fn main() -> Result<()> {
//!     let mut reader: FileCache = FileCache::new();
//!     reader.open_with_config(
//!         "access.log",
//!         CacheConfig::default().with_cache_max_size(1 << 20),
//!     )?;
//!
//!     // 建立行索引
//!     let mut indexer = LineIndexer::new()?;
//!     let lines = indexer.index_lines(&mut reader)?;
//!
//!     // 读取最后一行
//!     let mut line = Vec::new();
//!     indexer.read_line(&mut reader, lines - 1, &mut line)?;
//!
//!     // 直接按字节读取
//!     reader.seek(0, Whence::Set)?;
//!     let mut head = [0u8; 64];
//!     reader.read(&mut head)?;
//!
//!     reader.close();
//!     Ok(())
//! }
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`consts`] - 常量定义
//! - [`device`] - 数据源抽象
//! - [`array`] - 分块数组
//! - [`cache`] - 文件块缓存
//! - [`index`] - 行索引

#![deny(unsafe_code)]
#![warn(missing_docs)]

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 常量定义
pub mod consts;

/// 数据源抽象
pub mod device;

/// 分块数组
pub mod array;

/// 文件块缓存
pub mod cache;

/// 行索引
pub mod index;

#[cfg(test)]
pub(crate) mod test_utils;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, Result};

// 数据源
pub use device::{FileDevice, SourceDevice};

// 分块数组
pub use array::BlockArray;

// Cache
pub use cache::{CacheConfig, CacheStats, FileCache, ReaderStatus, Whence};

// 行索引
pub use index::{LineIndexEntry, LineIndexer, LineIndexerConfig};
