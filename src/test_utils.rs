//! 测试辅助：内存数据源

use crate::{
    device::SourceDevice,
    error::{Error, ErrorKind, Result},
};

/// 内存数据源，可注入读取错误或模拟文件被截断
pub struct MockDevice {
    data: Vec<u8>,
    size: u64,
    fail_reads: bool,
    failures_left: usize,
}

impl MockDevice {
    pub fn new(data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self {
            data,
            size,
            fail_reads: false,
            failures_left: 0,
        }
    }

    /// 内容为 `i % 251` 的数据，相邻块内容互不相同
    pub fn sequential(len: usize) -> Self {
        Self::new((0..len).map(|i| (i % 251) as u8).collect())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// 接下来的 `count` 次读取失败，之后恢复正常
    pub fn fail_next_reads(&mut self, count: usize) {
        self.failures_left = count;
    }

    /// 截断底层数据，但 `size()` 仍报告原长度
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }
}

impl SourceDevice for MockDevice {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if self.fail_reads {
            return Err(Error::new(ErrorKind::Io, "injected read failure"));
        }
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(Error::new(ErrorKind::Io, "injected read failure"));
        }

        let start = (offset as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }
}
