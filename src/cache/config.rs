//! 缓存配置与几何参数

use crate::{
    consts::{DEFAULT_BLOCK_SIZE, DEFAULT_CACHE_MAX_SIZE},
    error::{Error, ErrorKind, Result},
};

/// 文件缓存配置
///
/// 字段为 0 表示使用默认值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// 缓存上限（字节），实际缓存可能更小
    pub cache_max_size: usize,
    /// 缓存块大小（字节）
    pub block_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_max_size: DEFAULT_CACHE_MAX_SIZE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl CacheConfig {
    /// 设置缓存上限
    pub fn with_cache_max_size(mut self, cache_max_size: usize) -> Self {
        self.cache_max_size = cache_max_size;
        self
    }

    /// 设置缓存块大小
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// 将为 0 的字段替换为默认值
    pub fn resolved(self) -> Self {
        Self {
            cache_max_size: if self.cache_max_size == 0 {
                DEFAULT_CACHE_MAX_SIZE
            } else {
                self.cache_max_size
            },
            block_size: if self.block_size == 0 {
                DEFAULT_BLOCK_SIZE
            } else {
                self.block_size
            },
        }
    }

    /// 检查配置
    ///
    /// 块大小大于缓存上限时返回 [`ErrorKind::Config`]
    pub fn validate(&self) -> Result<()> {
        let config = self.resolved();
        if config.block_size > config.cache_max_size {
            return Err(Error::new(
                ErrorKind::Config,
                "Cache block size must not exceed cache max size",
            ));
        }
        Ok(())
    }
}

/// 针对某个文件计算出的缓存几何参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    /// 缓存块大小（字节）
    pub block_size: usize,
    /// 请求的缓存上限（字节）
    pub cache_max_size: usize,
    /// 实际分配的缓存大小（字节），总是 `block_size` 的整数倍
    pub cache_actual_size: usize,
    /// 最多同时驻留的块数
    pub max_cached_blocks: usize,
    /// 覆盖整个文件所需的块数
    pub total_file_blocks: usize,
}

impl CacheGeometry {
    /// 计算几何参数
    ///
    /// 文件小于缓存上限时，缓存收缩为恰好容纳整个文件的块数（可能因末块
    /// 向上取整而略大于上限）；否则取上限内能放下的最多整块。
    pub fn compute(file_size: u64, config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        let config = config.resolved();
        let block_size = config.block_size;

        let total_file_blocks = usize::try_from(file_size.div_ceil(block_size as u64))
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "File too large to index"))?;
        let max_cached_blocks = if file_size < config.cache_max_size as u64 {
            // 整个文件都能放下，末块不满时向上取整
            total_file_blocks
        } else {
            config.cache_max_size / block_size
        };

        Ok(Self {
            block_size,
            cache_max_size: config.cache_max_size,
            cache_actual_size: max_cached_blocks * block_size,
            max_cached_blocks,
            total_file_blocks,
        })
    }

    /// 第 `block` 块在文件中的起始偏移
    pub fn block_start(&self, block: usize) -> u64 {
        block as u64 * self.block_size as u64
    }

    /// 覆盖偏移 `offset` 的块号
    pub fn block_of(&self, offset: u64) -> usize {
        (offset / self.block_size as u64) as usize
    }
}
