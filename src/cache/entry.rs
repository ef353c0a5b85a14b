//! 文件块索引项

/// 文件块索引项
///
/// 文件的每个块对应一项。块驻留时 `slot` 指向缓存槽位，并通过
/// `prev`/`next` 挂在 LRU 链上；缺页（fault）时三者均为 `None`。
///
/// - `prev`: 比本块更早使用的块（靠近 LRU 端）
/// - `next`: 比本块更晚使用的块（靠近 MRU 端）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileBlockEntry {
    /// 绑定的缓存槽位
    pub slot: Option<usize>,
    /// 前一个（更久未使用的）块
    pub prev: Option<usize>,
    /// 后一个（更近使用的）块
    pub next: Option<usize>,
}

impl FileBlockEntry {
    /// 检查是否缺页
    pub fn is_fault(&self) -> bool {
        self.slot.is_none()
    }

    /// 标记为缺页，解除槽位绑定和链接
    pub fn fault(&mut self) -> Option<usize> {
        self.prev = None;
        self.next = None;
        self.slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_fault() {
        let entry = FileBlockEntry::default();
        assert!(entry.is_fault());
        assert_eq!(entry.prev, None);
        assert_eq!(entry.next, None);
    }

    #[test]
    fn test_fault_releases_slot() {
        let mut entry = FileBlockEntry {
            slot: Some(3),
            prev: Some(1),
            next: Some(7),
        };
        assert!(!entry.is_fault());

        assert_eq!(entry.fault(), Some(3));
        assert!(entry.is_fault());
        assert_eq!(entry, FileBlockEntry::default());
    }
}
