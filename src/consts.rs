//! 常量定义
//!
//! 文件缓存、行索引器和分块数组的默认参数。

//=============================================================================
// 文件缓存
//=============================================================================

/// 默认缓存上限（2 MiB）
pub const DEFAULT_CACHE_MAX_SIZE: usize = 2_097_152;

/// 默认缓存块大小（64 KiB）
pub const DEFAULT_BLOCK_SIZE: usize = 65_536;

//=============================================================================
// 分块数组
//=============================================================================

/// 每个分块（chunk）容纳的元素个数
pub const CHUNK_CAPACITY: usize = 16_384;

//=============================================================================
// 行索引
//=============================================================================

/// 默认行边界字节
pub const DEFAULT_LINE_BOUNDARY: u8 = b'\n';

/// 默认最大行长度（字节），超过后强制截断
pub const DEFAULT_MAX_LINE_LENGTH: usize = 2048;

/// 行索引滑动缓冲区包含的缓存块数
pub const INDEX_WINDOW_BLOCKS: usize = 2;

//=============================================================================
// seek 的 whence 原始值（与 libc 一致）
//=============================================================================

/// SEEK_SET
pub const SEEK_SET: i32 = 0;

/// SEEK_CUR
pub const SEEK_CUR: i32 = 1;

/// SEEK_END
pub const SEEK_END: i32 = 2;
