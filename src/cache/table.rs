//! 文件块表：缺页索引 + 槽位池 + LRU 链

use super::{config::CacheGeometry, entry::FileBlockEntry, lru::LruChain, slots::SlotPool};
use crate::{
    device::SourceDevice,
    error::{Error, ErrorKind, Result},
};

/// 一次缺页处理的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultIn {
    /// 新绑定的槽位
    pub slot: usize,
    /// 被驱逐的块
    pub evicted: Option<usize>,
}

/// 文件块表
///
/// 为文件的每个块保存一项 [`FileBlockEntry`]，并管理槽位分配和 LRU 驱逐。
#[derive(Debug)]
pub struct BlockTable {
    geometry: CacheGeometry,
    entries: Vec<FileBlockEntry>,
    slots: SlotPool,
    chain: LruChain,
}

impl BlockTable {
    /// 按几何参数分配缓存和索引，所有块初始为缺页
    pub fn allocate(geometry: CacheGeometry) -> Result<Self> {
        let slots = SlotPool::allocate(geometry.block_size, geometry.max_cached_blocks)?;

        let mut entries = Vec::new();
        entries.try_reserve_exact(geometry.total_file_blocks)?;
        entries.resize(geometry.total_file_blocks, FileBlockEntry::default());

        Ok(Self {
            geometry,
            entries,
            slots,
            chain: LruChain::default(),
        })
    }

    /// 几何参数
    pub fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// 块是否驻留
    pub fn is_resident(&self, block: usize) -> bool {
        self.entries.get(block).is_some_and(|e| !e.is_fault())
    }

    /// 当前驻留块数
    pub fn resident_count(&self) -> usize {
        self.chain.len()
    }

    /// 按 LRU → MRU 顺序返回驻留块
    pub fn lru_order(&self) -> Vec<usize> {
        self.chain.order(&self.entries)
    }

    /// 命中时把块移到 MRU 端
    pub fn touch(&mut self, block: usize) {
        self.chain.touch(&mut self.entries, block);
    }

    /// 驻留块的有效数据（文件尾块可能短于 `block_size`）
    pub fn block_data(&self, block: usize, file_size: u64) -> Result<&[u8]> {
        let slot = self
            .entries
            .get(block)
            .and_then(|e| e.slot)
            .ok_or(Error::new(ErrorKind::InvalidInput, "Block is not resident"))?;
        let len = self.block_len(block, file_size);
        Ok(&self.slots.slot(slot)[..len])
    }

    /// 第 `block` 块的有效长度
    fn block_len(&self, block: usize, file_size: u64) -> usize {
        let start = self.geometry.block_start(block);
        file_size
            .saturating_sub(start)
            .min(self.geometry.block_size as u64) as usize
    }

    /// 处理缺页：为 `block` 找一个槽位并从设备读入数据
    ///
    /// 有空闲槽位时直接使用；否则驱逐 LRU 块并复用其槽位。读取失败时
    /// 槽位归还到空闲列表，`block` 保持缺页，之后可以重试。
    pub fn fault_in<S: SourceDevice>(
        &mut self,
        block: usize,
        device: &mut S,
        file_size: u64,
    ) -> Result<FaultIn> {
        debug_assert!(self.entries[block].is_fault());

        let (slot, evicted) = match self.slots.take_free() {
            Some(slot) => (slot, None),
            None => {
                let victim = self
                    .chain
                    .pop_lru(&mut self.entries)
                    .ok_or(Error::new(ErrorKind::Config, "Cache has no slots"))?;
                let slot = self.entries[victim]
                    .fault()
                    .ok_or(Error::new(ErrorKind::InvalidInput, "LRU block had no slot"))?;
                log::debug!(
                    "[CACHE] evict block {} from slot {} for block {}",
                    victim,
                    slot,
                    block
                );
                (slot, Some(victim))
            }
        };

        let start = self.geometry.block_start(block);
        let expected = self.block_len(block, file_size);
        let result = device.read_at(start, &mut self.slots.slot_mut(slot)[..expected]);

        match result {
            Ok(n) if n == expected => {
                self.entries[block].slot = Some(slot);
                self.chain.push_mru(&mut self.entries, block);
                Ok(FaultIn { slot, evicted })
            }
            Ok(n) => {
                self.slots.release(slot);
                log::error!(
                    "[CACHE] short read for block {}: expected {} bytes, got {}",
                    block,
                    expected,
                    n
                );
                Err(Error::new(ErrorKind::ShortRead, "Source returned fewer bytes than expected"))
            }
            Err(e) => {
                self.slots.release(slot);
                Err(e)
            }
        }
    }
}
