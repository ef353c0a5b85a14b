//! 行索引器

use super::window::ScanWindow;
use crate::{
    array::BlockArray,
    cache::{FileCache, Whence},
    consts::{DEFAULT_LINE_BOUNDARY, DEFAULT_MAX_LINE_LENGTH, INDEX_WINDOW_BLOCKS},
    device::SourceDevice,
    error::{Error, ErrorKind, Result},
};

/// 行索引项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineIndexEntry {
    /// 行首在文件中的字节偏移
    pub offset: u64,
    /// 行长度（不含边界字节）
    pub length: usize,
}

/// 行索引器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineIndexerConfig {
    /// 行边界字节
    pub boundary: u8,
    /// 最大行长度，超过后在此处截断，不消耗边界字节
    pub max_line_length: usize,
}

impl Default for LineIndexerConfig {
    fn default() -> Self {
        Self {
            boundary: DEFAULT_LINE_BOUNDARY,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl LineIndexerConfig {
    /// 设置行边界字节
    pub fn with_boundary(mut self, boundary: u8) -> Self {
        self.boundary = boundary;
        self
    }

    /// 设置最大行长度
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// 检查配置，`max_line_length` 必须大于 0
    pub fn validate(&self) -> Result<()> {
        if self.max_line_length == 0 {
            return Err(Error::new(
                ErrorKind::Config,
                "Maximum line length must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// 行索引器
///
/// 对一个已打开的 [`FileCache`] 从头到尾扫描一次，为每一行记录
/// [`LineIndexEntry`]。索引器只借用缓存，结果存放在自己独占的
/// [`BlockArray`] 中。
///
/// # 示例
///
/// ```rust,no_run
/// use largefile_core::{FileCache, LineIndexer};
///
/// let mut reader: FileCache = FileCache::new();
/// reader.open("/var/log/system.log")?;
///
/// let mut indexer = LineIndexer::new()?;
/// let lines = indexer.index_lines(&mut reader)?;
///
/// let mut line = Vec::new();
/// indexer.read_line(&mut reader, lines / 2, &mut line)?;
/// # Ok::<(), largefile_core::Error>(())
/// ```
pub struct LineIndexer {
    config: LineIndexerConfig,
    lines: BlockArray<LineIndexEntry>,
    number_of_lines: usize,
}

impl LineIndexer {
    /// 使用默认配置（`\n`，2048 字节）创建
    pub fn new() -> Result<Self> {
        Self::with_config(LineIndexerConfig::default())
    }

    /// 使用指定配置创建
    pub fn with_config(config: LineIndexerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            lines: BlockArray::new()?,
            number_of_lines: 0,
        })
    }

    /// 配置
    pub fn config(&self) -> &LineIndexerConfig {
        &self.config
    }

    /// 索引整个文件
    ///
    /// 从偏移 0 开始顺序读取，每遇到边界字节或行长达到上限就记录一行。
    /// 最后一行没有结尾边界时同样记录。重复调用会覆盖上一次的结果。
    ///
    /// # 返回
    ///
    /// 行数。缓存未打开时返回 [`ErrorKind::NotOpen`]，读取失败时返回
    /// 缓存的错误。
    pub fn index_lines<S: SourceDevice>(&mut self, reader: &mut FileCache<S>) -> Result<usize> {
        if !reader.is_open() {
            return Err(Error::new(ErrorKind::NotOpen, "Reader is not open"));
        }
        self.number_of_lines = 0;

        let boundary = self.config.boundary;
        let max_len = self.config.max_line_length as u64;

        reader.seek(0, Whence::Set)?;
        let capacity = reader
            .block_size()
            .checked_mul(INDEX_WINDOW_BLOCKS)
            .ok_or(Error::new(ErrorKind::OutOfMemory, "Scan window size overflow"))?;
        let mut window = ScanWindow::new(capacity)?;

        let mut count = 0;
        let mut line_start = 0u64;
        let mut search = 0u64;

        loop {
            if search == window.end() {
                // 窗口已扫完：丢弃已扫描部分并补充，读不到数据说明文件结束
                if window.refill(reader, search)? == 0 {
                    break;
                }
                continue;
            }

            // 行首起第 max_len 个字节本身是边界时仍按正常行结束处理。
            // max_len 可以是 usize::MAX（不限行长），此时 limit 饱和
            let limit = line_start.saturating_add(max_len);
            let span_end = window.end().min(limit.saturating_add(1));
            let span = window.range(search, span_end);

            match span.iter().position(|&b| b == boundary) {
                Some(pos) => {
                    let end = search + pos as u64;
                    self.push(count, line_start, end - line_start)?;
                    count += 1;
                    search = end + 1;
                    line_start = search;
                }
                None if span_end == limit.saturating_add(1) => {
                    // 超长行：在 max_len 处截断，不消耗字节
                    self.push(count, line_start, max_len)?;
                    count += 1;
                    line_start = limit;
                    search = limit;
                }
                None => search = span_end,
            }
        }

        if search > line_start {
            self.push(count, line_start, search - line_start)?;
            count += 1;
        }

        self.number_of_lines = count;
        log::debug!(
            "[INDEX] indexed {} lines over {} bytes ({} chunks)",
            count,
            reader.file_size(),
            self.lines.chunk_count()
        );
        Ok(count)
    }

    fn push(&mut self, index: usize, offset: u64, length: u64) -> Result<()> {
        self.lines.set(
            index,
            LineIndexEntry {
                offset,
                length: length as usize,
            },
        )
    }

    /// 上次索引得到的行数
    pub fn number_of_lines(&self) -> usize {
        self.number_of_lines
    }

    /// 第 `line` 行的索引项
    pub fn entry(&self, line: usize) -> Option<LineIndexEntry> {
        if line >= self.number_of_lines {
            return None;
        }
        self.lines.get(line).ok().copied()
    }

    /// 按顺序遍历所有索引项
    pub fn entries(&self) -> impl Iterator<Item = LineIndexEntry> + '_ {
        self.lines.iter().take(self.number_of_lines).copied()
    }

    /// 读取第 `line` 行的内容（不含边界字节）到 `out`
    ///
    /// # 返回
    ///
    /// 行长度。行号越界时返回 [`ErrorKind::OutOfRange`]。
    pub fn read_line<S: SourceDevice>(
        &self,
        reader: &mut FileCache<S>,
        line: usize,
        out: &mut Vec<u8>,
    ) -> Result<usize> {
        let entry = self
            .entry(line)
            .ok_or(Error::new(ErrorKind::OutOfRange, "Line number out of range"))?;
        let offset = i64::try_from(entry.offset)
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "Line offset overflow"))?;

        out.clear();
        out.try_reserve(entry.length)?;
        out.resize(entry.length, 0);

        reader.seek(offset, Whence::Set)?;
        let mut filled = 0;
        while filled < entry.length {
            let n = reader.read(&mut out[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        out.truncate(filled);
        Ok(filled)
    }
}

impl core::fmt::Debug for LineIndexer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineIndexer")
            .field("config", &self.config)
            .field("number_of_lines", &self.number_of_lines)
            .field("lines", &self.lines)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::consts::CHUNK_CAPACITY;
    use crate::test_utils::MockDevice;

    fn reader_for(data: &[u8], block_size: usize) -> FileCache<MockDevice> {
        let mut reader = FileCache::new();
        reader
            .open_device(
                MockDevice::new(data.to_vec()),
                CacheConfig::default()
                    .with_cache_max_size(block_size * 2)
                    .with_block_size(block_size),
            )
            .unwrap();
        reader
    }

    fn index(data: &[u8], block_size: usize, config: LineIndexerConfig) -> Vec<(u64, usize)> {
        let mut reader = reader_for(data, block_size);
        let mut indexer = LineIndexer::with_config(config).unwrap();
        let n = indexer.index_lines(&mut reader).unwrap();
        assert_eq!(n, indexer.number_of_lines());
        indexer.entries().map(|e| (e.offset, e.length)).collect()
    }

    /// 用 split 计算期望结果，用于和滑动窗口的结果对照
    fn reference_index(data: &[u8], boundary: u8, max_len: usize) -> Vec<(u64, usize)> {
        let mut out = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < data.len() {
            if data[i] == boundary {
                out.push((start as u64, i - start));
                i += 1;
                start = i;
            } else if i - start == max_len {
                out.push((start as u64, max_len));
                start = i;
            } else {
                i += 1;
            }
        }
        if i > start {
            out.push((start as u64, i - start));
        }
        out
    }

    #[test]
    fn test_basic_lines_without_trailing_boundary() {
        let lines = index(b"a\nbb\n\nccc", 4, LineIndexerConfig::default());
        assert_eq!(lines, vec![(0, 1), (2, 2), (5, 0), (6, 3)]);
    }

    #[test]
    fn test_trailing_boundary_adds_no_empty_line() {
        let lines = index(b"one\ntwo\n", 16, LineIndexerConfig::default());
        assert_eq!(lines, vec![(0, 3), (4, 3)]);
    }

    #[test]
    fn test_empty_file() {
        let lines = index(b"", 16, LineIndexerConfig::default());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_overlong_line_is_split_at_max_length() {
        let config = LineIndexerConfig::default().with_max_line_length(4);
        let lines = index(b"abcdefghij\nxy", 8, config);
        assert_eq!(lines, vec![(0, 4), (4, 4), (8, 2), (11, 2)]);
    }

    #[test]
    fn test_boundary_exactly_at_max_length() {
        let config = LineIndexerConfig::default().with_max_line_length(4);
        let lines = index(b"abcd\nef", 8, config);
        assert_eq!(lines, vec![(0, 4), (5, 2)]);
    }

    #[test]
    fn test_unbounded_max_line_length() {
        let config = LineIndexerConfig::default().with_max_line_length(usize::MAX);
        let lines = index(b"a\nbb\n\nccc", 4, config);
        assert_eq!(lines, vec![(0, 1), (2, 2), (5, 0), (6, 3)]);

        // 无边界的长数据只产生一行
        let data = vec![b'x'; 100];
        assert_eq!(index(&data, 4, config), vec![(0, 100)]);
    }

    #[test]
    fn test_custom_boundary() {
        let config = LineIndexerConfig::default().with_boundary(b';');
        let lines = index(b"k=v;x=1\n;", 8, config);
        assert_eq!(lines, vec![(0, 3), (4, 4)]);
    }

    #[test]
    fn test_lines_spanning_window_refills() {
        // 窗口只有 2 * 4 字节，行跨越多次补充
        let data = b"first line\nsecond\n\nthe third line is long\nend";
        let lines = index(data, 4, LineIndexerConfig::default());
        assert_eq!(lines, reference_index(data, b'\n', 2048));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_max_length_larger_than_window() {
        let data = vec![b'x'; 100];
        let config = LineIndexerConfig::default().with_max_line_length(30);
        let lines = index(&data, 4, config);
        assert_eq!(lines, vec![(0, 30), (30, 30), (60, 30), (90, 10)]);
    }

    #[test]
    fn test_many_lines_cross_chunk_boundary() {
        let count = CHUNK_CAPACITY + 10;
        let data = b"xy\n".repeat(count);
        let lines = index(&data, 1024, LineIndexerConfig::default());

        assert_eq!(lines.len(), count);
        assert_eq!(lines[CHUNK_CAPACITY], ((CHUNK_CAPACITY * 3) as u64, 2));
        assert_eq!(lines[count - 1], (((count - 1) * 3) as u64, 2));
    }

    #[test]
    fn test_closed_reader_is_rejected() {
        let mut reader: FileCache = FileCache::new();
        let mut indexer = LineIndexer::new().unwrap();
        let err = indexer.index_lines(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotOpen);
        assert_eq!(indexer.number_of_lines(), 0);
    }

    #[test]
    fn test_oversized_window_is_reported() {
        // 空文件不分配缓存槽位，块大小可以大到窗口容量溢出
        let mut reader = FileCache::new();
        reader
            .open_device(
                MockDevice::new(Vec::new()),
                CacheConfig::default()
                    .with_cache_max_size(usize::MAX)
                    .with_block_size(usize::MAX / 2 + 1),
            )
            .unwrap();

        let mut indexer = LineIndexer::new().unwrap();
        let err = indexer.index_lines(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfMemory);
    }

    #[test]
    fn test_zero_max_line_length_is_rejected() {
        let config = LineIndexerConfig::default().with_max_line_length(0);
        assert_eq!(
            LineIndexer::with_config(config).unwrap_err().kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_read_failure_is_propagated() {
        let mut device = MockDevice::new(b"abc\ndef\n".repeat(10));
        device.fail_reads(true);
        let mut reader = FileCache::new();
        reader
            .open_device(device, CacheConfig::default().with_cache_max_size(16).with_block_size(8))
            .unwrap();

        let mut indexer = LineIndexer::new().unwrap();
        assert_eq!(indexer.index_lines(&mut reader).unwrap_err().kind(), ErrorKind::Io);
        assert!(reader.is_fail());
    }

    #[test]
    fn test_read_line_and_reindex() {
        let data = b"alpha\nbeta\ngamma";
        let mut reader = reader_for(data, 4);
        let mut indexer = LineIndexer::new().unwrap();
        assert_eq!(indexer.index_lines(&mut reader).unwrap(), 3);

        let mut line = Vec::new();
        assert_eq!(indexer.read_line(&mut reader, 1, &mut line).unwrap(), 4);
        assert_eq!(line, b"beta");
        assert_eq!(indexer.read_line(&mut reader, 2, &mut line).unwrap(), 5);
        assert_eq!(line, b"gamma");
        assert_eq!(
            indexer.read_line(&mut reader, 3, &mut line).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(indexer.entry(3), None);

        // 重新索引得到相同结果
        assert_eq!(indexer.index_lines(&mut reader).unwrap(), 3);
        assert_eq!(indexer.entry(0), Some(LineIndexEntry { offset: 0, length: 5 }));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// 滑动窗口的结果与一次性扫描整个缓冲区一致
            #[test]
            fn window_matches_reference_scan(
                data in prop::collection::vec(prop_oneof![Just(b'\n'), Just(b'a'), Just(b'b')], 0..600),
                block_size in 1usize..32,
                max_len in 1usize..40,
            ) {
                let config = LineIndexerConfig::default().with_max_line_length(max_len);
                let lines = index(&data, block_size, config);
                prop_assert_eq!(lines, reference_index(&data, b'\n', max_len));
            }
        }
    }
}
