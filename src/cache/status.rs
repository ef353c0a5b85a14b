//! 读取器状态标志与缓存统计

use bitflags::bitflags;

bitflags! {
    /// 读取器状态标志
    ///
    /// 除 `OPEN` 外，每次 seek/read 开始时清除并重新计算。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ReaderStatus: u8 {
        /// 文件已打开
        const OPEN = 0x01;
        /// 游标到达文件末尾
        const EOF  = 0x02;
        /// 上一次操作失败
        const FAIL = 0x04;
        /// 底层数据与打开时不一致（文件被截断）
        const BAD  = 0x08;
    }
}

impl ReaderStatus {
    /// 每次 seek/read 开始时清除的标志
    pub const TRANSIENT: Self = Self::EOF.union(Self::FAIL).union(Self::BAD);
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// 总块访问次数
    pub total_accesses: u64,
    /// 缓存命中次数
    pub hits: u64,
    /// 缓存未命中次数
    pub misses: u64,
    /// 驱逐次数
    pub evictions: u64,
    /// 成功的物理读取次数
    pub physical_reads: u64,
    /// 返回给调用方的总字节数
    pub bytes_read: u64,
}

impl CacheStats {
    /// 计算命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total_accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_accesses as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_flags() {
        let mut status = ReaderStatus::OPEN | ReaderStatus::EOF | ReaderStatus::FAIL;
        status.remove(ReaderStatus::TRANSIENT);
        assert_eq!(status, ReaderStatus::OPEN);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);

        stats.total_accesses = 4;
        stats.hits = 3;
        assert_eq!(stats.hit_rate(), 0.75);
    }
}
