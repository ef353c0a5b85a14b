//! 行扫描滑动窗口

use crate::{cache::FileCache, device::SourceDevice, error::Result};

/// 滑动窗口
///
/// 缓冲区中保存文件区间 `[start, start + len)` 的数据。补充数据时丢弃
/// 已经扫描过的前缀，把剩余部分移到开头，再从 [`FileCache`] 顺序读入。
/// 读入的位置总是紧接窗口末尾，调用方不能在扫描期间移动缓存游标。
#[derive(Debug)]
pub struct ScanWindow {
    buf: Vec<u8>,
    start: u64,
    len: usize,
}

impl ScanWindow {
    /// 分配容量为 `capacity` 字节的窗口，从文件偏移 0 开始
    pub fn new(capacity: usize) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)?;
        buf.resize(capacity, 0);
        Ok(Self { buf, start: 0, len: 0 })
    }

    /// 窗口末尾对应的文件偏移
    pub fn end(&self) -> u64 {
        self.start + self.len as u64
    }

    /// 文件区间 `[from, to)` 的数据，区间必须位于窗口内
    pub fn range(&self, from: u64, to: u64) -> &[u8] {
        debug_assert!(self.start <= from && from <= to && to <= self.end());
        let lo = (from - self.start) as usize;
        let hi = (to - self.start) as usize;
        &self.buf[lo..hi]
    }

    /// 丢弃 `consumed` 之前的数据并补充读入
    ///
    /// # 返回
    ///
    /// 新读入的字节数，0 表示文件已读完
    pub fn refill<S: SourceDevice>(
        &mut self,
        reader: &mut FileCache<S>,
        consumed: u64,
    ) -> Result<usize> {
        debug_assert!(self.start <= consumed && consumed <= self.end());
        let drop = (consumed - self.start) as usize;
        if drop > 0 {
            self.buf.copy_within(drop..self.len, 0);
            self.len -= drop;
            self.start = consumed;
        }

        let n = reader.read(&mut self.buf[self.len..])?;
        self.len += n;
        log::trace!(
            "[INDEX] window refilled: [{}, {}), {} new bytes",
            self.start,
            self.end(),
            n
        );
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, Whence};
    use crate::test_utils::MockDevice;

    #[test]
    fn test_refill_slides_forward() {
        let mut reader = FileCache::new();
        reader
            .open_device(
                MockDevice::sequential(40),
                CacheConfig::default().with_cache_max_size(32).with_block_size(16),
            )
            .unwrap();
        reader.seek(0, Whence::Set).unwrap();

        let mut window = ScanWindow::new(16).unwrap();
        assert_eq!(window.refill(&mut reader, 0).unwrap(), 16);
        assert_eq!(window.end(), 16);
        assert_eq!(window.range(3, 6), &[3u8, 4, 5]);

        // 保留 [10, 16)，补满到 26
        assert_eq!(window.refill(&mut reader, 10).unwrap(), 10);
        assert_eq!(window.range(10, 26), &(10..26).collect::<Vec<u8>>()[..]);

        assert_eq!(window.refill(&mut reader, 26).unwrap(), 14);
        assert_eq!(window.end(), 40);
        assert_eq!(window.refill(&mut reader, 40).unwrap(), 0);
    }
}
