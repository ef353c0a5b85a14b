//! 基于索引的 LRU 链
//!
//! 链表节点就是 [`FileBlockEntry`] 本身，`prev`/`next` 存放块号。
//! 所有操作都是 O(1)，不扫描数组，初始化之后也不再分配内存。

use super::entry::FileBlockEntry;

/// LRU 链
///
/// 链上恰好是所有驻留块，按最久未使用 → 最近使用排列。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LruChain {
    lru: Option<usize>,
    mru: Option<usize>,
    len: usize,
}

impl LruChain {
    /// 最久未使用的块
    pub fn lru(&self) -> Option<usize> {
        self.lru
    }

    /// 最近使用的块
    pub fn mru(&self) -> Option<usize> {
        self.mru
    }

    /// 链上的块数
    pub fn len(&self) -> usize {
        self.len
    }

    /// 链是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 将 `block` 追加为 MRU，调用方保证它当前不在链上
    pub fn push_mru(&mut self, entries: &mut [FileBlockEntry], block: usize) {
        entries[block].prev = self.mru;
        entries[block].next = None;

        match self.mru {
            Some(mru) => entries[mru].next = Some(block),
            // 链为空时，第一个块同时是 LRU 和 MRU
            None => self.lru = Some(block),
        }

        self.mru = Some(block);
        self.len += 1;
    }

    /// 从链上摘下 `block`
    pub fn unlink(&mut self, entries: &mut [FileBlockEntry], block: usize) {
        let prev = entries[block].prev.take();
        let next = entries[block].next.take();

        match prev {
            Some(p) => entries[p].next = next,
            None => self.lru = next,
        }
        match next {
            Some(n) => entries[n].prev = prev,
            None => self.mru = prev,
        }

        self.len -= 1;
    }

    /// 命中后将 `block` 移到 MRU 端
    pub fn touch(&mut self, entries: &mut [FileBlockEntry], block: usize) {
        if self.mru == Some(block) {
            return;
        }
        self.unlink(entries, block);
        self.push_mru(entries, block);
    }

    /// 摘下 LRU 块并返回其块号，原第二久未使用的块成为新的 LRU
    pub fn pop_lru(&mut self, entries: &mut [FileBlockEntry]) -> Option<usize> {
        let victim = self.lru?;
        self.unlink(entries, victim);
        Some(victim)
    }

    /// 按 LRU → MRU 顺序收集块号
    pub fn order(&self, entries: &[FileBlockEntry]) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.len);
        let mut current = self.lru;
        while let Some(block) = current {
            order.push(block);
            current = entries[block].next;
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<FileBlockEntry> {
        vec![FileBlockEntry::default(); n]
    }

    #[test]
    fn test_first_push_is_lru_and_mru() {
        let mut entries = entries(4);
        let mut chain = LruChain::default();

        chain.push_mru(&mut entries, 2);
        assert_eq!(chain.lru(), Some(2));
        assert_eq!(chain.mru(), Some(2));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_touch_moves_to_mru() {
        let mut entries = entries(8);
        let mut chain = LruChain::default();

        for block in [0, 1, 2] {
            chain.push_mru(&mut entries, block);
        }
        chain.touch(&mut entries, 0);
        assert_eq!(chain.order(&entries), vec![1, 2, 0]);

        chain.touch(&mut entries, 2);
        assert_eq!(chain.order(&entries), vec![1, 0, 2]);

        // 已经是 MRU 时不变
        chain.touch(&mut entries, 2);
        assert_eq!(chain.order(&entries), vec![1, 0, 2]);
    }

    #[test]
    fn test_pop_lru() {
        let mut entries = entries(8);
        let mut chain = LruChain::default();

        for block in [5, 3, 7] {
            chain.push_mru(&mut entries, block);
        }
        assert_eq!(chain.pop_lru(&mut entries), Some(5));
        assert_eq!(chain.lru(), Some(3));
        assert_eq!(entries[3].prev, None);
        assert_eq!(chain.len(), 2);

        assert_eq!(chain.pop_lru(&mut entries), Some(3));
        assert_eq!(chain.pop_lru(&mut entries), Some(7));
        assert_eq!(chain.pop_lru(&mut entries), None);
        assert!(chain.is_empty());
        assert_eq!(chain.mru(), None);
    }

    #[test]
    fn test_unlink_middle() {
        let mut entries = entries(4);
        let mut chain = LruChain::default();

        for block in [0, 1, 2, 3] {
            chain.push_mru(&mut entries, block);
        }
        chain.unlink(&mut entries, 2);
        assert_eq!(chain.order(&entries), vec![0, 1, 3]);
        assert_eq!(entries[1].next, Some(3));
        assert_eq!(entries[3].prev, Some(1));
    }
}
