//! 缓存槽位池

use crate::error::Result;

/// 缓存槽位池
///
/// 一整块缓存缓冲区按 `block_size` 划分成 `max_slots` 个槽位。
/// 槽位先按顺序逐个启用，之后只通过空闲列表复用。
#[derive(Debug)]
pub struct SlotPool {
    buffer: Vec<u8>,
    block_size: usize,
    max_slots: usize,
    next_unused: usize,
    free: Vec<usize>,
}

impl SlotPool {
    /// 分配 `max_slots * block_size` 字节的缓存
    pub fn allocate(block_size: usize, max_slots: usize) -> Result<Self> {
        let size = block_size * max_slots;
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(size)?;
        buffer.resize(size, 0);

        let mut free = Vec::new();
        free.try_reserve_exact(max_slots)?;

        Ok(Self {
            buffer,
            block_size,
            max_slots,
            next_unused: 0,
            free,
        })
    }

    /// 取一个空闲槽位，已全部占用时返回 `None`
    pub fn take_free(&mut self) -> Option<usize> {
        if let Some(slot) = self.free.pop() {
            return Some(slot);
        }
        if self.next_unused < self.max_slots {
            self.next_unused += 1;
            return Some(self.next_unused - 1);
        }
        None
    }

    /// 归还槽位
    pub fn release(&mut self, slot: usize) {
        debug_assert!(slot < self.next_unused);
        self.free.push(slot);
    }

    /// 槽位数据
    pub fn slot(&self, slot: usize) -> &[u8] {
        let start = slot * self.block_size;
        &self.buffer[start..start + self.block_size]
    }

    /// 槽位数据（可变）
    pub fn slot_mut(&mut self, slot: usize) -> &mut [u8] {
        let start = slot * self.block_size;
        &mut self.buffer[start..start + self.block_size]
    }

    /// 槽位总数
    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    /// 缓存缓冲区总字节数
    pub fn byte_size(&self) -> usize {
        self.buffer.len()
    }
}
