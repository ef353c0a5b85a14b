//! 文件块缓存
//!
//! 把任意字节范围的随机读取转换为按块分页的读取，内存占用以配置的
//! 缓存上限为界（小文件按整块向上取整）。读取游标是虚拟的：seek 只修改游标，read 从缓存复制数据，
//! 缺页时才对底层设备做一次物理读取。

use super::{
    config::{CacheConfig, CacheGeometry},
    status::{CacheStats, ReaderStatus},
    table::BlockTable,
};
use crate::{
    consts::{SEEK_CUR, SEEK_END, SEEK_SET},
    device::{FileDevice, SourceDevice},
    error::{Error, ErrorKind, Result},
};
use std::io;
use std::path::{Path, PathBuf};

/// seek 的基准位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// 相对文件开头
    Set,
    /// 相对当前游标
    Cur,
    /// 相对文件末尾
    End,
}

impl TryFrom<i32> for Whence {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self> {
        match raw {
            SEEK_SET => Ok(Whence::Set),
            SEEK_CUR => Ok(Whence::Cur),
            SEEK_END => Ok(Whence::End),
            _ => Err(Error::new(ErrorKind::InvalidInput, "Unsupported whence")),
        }
    }
}

/// 打开期间的全部状态，关闭时整体释放
struct OpenState<S> {
    device: S,
    path: Option<PathBuf>,
    file_size: u64,
    table: BlockTable,
    cursor: u64,
}

/// 文件块缓存
///
/// 状态：Closed → Open（`open` 成功）→ Closed（`close`）。同一个实例可以
/// 反复打开、关闭。关闭状态下 seek/read 返回 [`ErrorKind::NotOpen`]。
///
/// # 示例
///
/// ```rust,no_run
/// use largefile_core::{FileCache, Whence};
///
/// let mut cache: FileCache = FileCache::new();
/// cache.open("/var/log/system.log")?;
///
/// let mut buf = [0u8; 15];
/// cache.seek(60, Whence::Set)?;
/// let n = cache.read(&mut buf)?;
/// println!("{:?} eof={}", &buf[..n], cache.is_eof());
///
/// cache.close();
/// # Ok::<(), largefile_core::Error>(())
/// ```
pub struct FileCache<S: SourceDevice = FileDevice> {
    state: Option<OpenState<S>>,
    status: ReaderStatus,
    stats: CacheStats,
}

impl<S: SourceDevice> Default for FileCache<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl FileCache<FileDevice> {
    /// 使用默认配置打开文件
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.open_with_config(path, CacheConfig::default())
    }

    /// 使用指定配置打开文件
    ///
    /// # 错误
    ///
    /// - [`ErrorKind::AlreadyOpen`]: 已经打开，状态不变
    /// - [`ErrorKind::NotFound`] / [`ErrorKind::Io`]: 无法 stat 或打开路径
    /// - [`ErrorKind::Config`]: 块大小大于缓存上限
    /// - [`ErrorKind::OutOfMemory`]: 无法分配缓存或索引
    ///
    /// 失败时不保留任何部分状态。
    pub fn open_with_config(&mut self, path: impl AsRef<Path>, config: CacheConfig) -> Result<()> {
        let path = path.as_ref();
        if self.is_open() {
            return Err(Error::new(ErrorKind::AlreadyOpen, "File cache is already open"));
        }

        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::with_cause(ErrorKind::NotFound, "Cannot stat path", e),
            _ => Error::with_cause(ErrorKind::Io, "Cannot stat path", e),
        })?;
        let file_size = metadata.len();

        let geometry = CacheGeometry::compute(file_size, &config)?;
        let table = BlockTable::allocate(geometry)?;

        // 打开失败时 table 随之释放
        let device = FileDevice::open(path)?;
        if device.size() != file_size {
            log::warn!(
                "[CACHE] {} changed size between stat and open ({} -> {})",
                path.display(),
                file_size,
                device.size()
            );
        }

        self.install(device, Some(path.to_path_buf()), file_size, table);
        Ok(())
    }
}

impl<S: SourceDevice> FileCache<S> {
    /// 创建处于关闭状态的缓存
    pub fn new() -> Self {
        Self {
            state: None,
            status: ReaderStatus::empty(),
            stats: CacheStats::default(),
        }
    }

    /// 在任意数据源上打开缓存
    pub fn open_device(&mut self, device: S, config: CacheConfig) -> Result<()> {
        if self.is_open() {
            return Err(Error::new(ErrorKind::AlreadyOpen, "File cache is already open"));
        }

        let file_size = device.size();
        let geometry = CacheGeometry::compute(file_size, &config)?;
        let table = BlockTable::allocate(geometry)?;

        self.install(device, None, file_size, table);
        Ok(())
    }

    fn install(&mut self, device: S, path: Option<PathBuf>, file_size: u64, table: BlockTable) {
        let geometry = *table.geometry();
        log::debug!(
            "[CACHE] open {:?}: size={} block_size={} cache={}/{} bytes, {} slots, {} file blocks",
            path,
            file_size,
            geometry.block_size,
            geometry.cache_actual_size,
            geometry.cache_max_size,
            geometry.max_cached_blocks,
            geometry.total_file_blocks
        );

        self.state = Some(OpenState {
            device,
            path,
            file_size,
            table,
            cursor: 0,
        });
        self.status = ReaderStatus::OPEN;
        self.stats = CacheStats::default();
    }

    /// 关闭：释放缓存和索引，关闭文件，清除状态标志
    ///
    /// 已关闭时调用无任何效果。
    pub fn close(&mut self) {
        if let Some(state) = self.state.take() {
            log::debug!(
                "[CACHE] close {:?}: {} accesses, hit rate {:.2}, {} evictions",
                state.path,
                self.stats.total_accesses,
                self.stats.hit_rate(),
                self.stats.evictions
            );
        }
        self.status = ReaderStatus::empty();
    }

    /// 移动游标
    ///
    /// 目标位置大于等于文件大小时，游标被钳制到文件大小并设置 EOF；
    /// 这与传统 lseek 不同，不允许越过文件末尾。
    ///
    /// # 返回
    ///
    /// 移动后的游标位置
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let Some(state) = self.state.as_mut() else {
            return Err(Error::new(ErrorKind::NotOpen, "File cache is not open"));
        };
        self.status.remove(ReaderStatus::TRANSIENT);

        let base = match whence {
            Whence::Set => 0,
            Whence::Cur => state.cursor as i128,
            Whence::End => state.file_size as i128,
        };
        let target = base + offset as i128;

        if target < 0 {
            self.status.insert(ReaderStatus::FAIL);
            return Err(Error::new(ErrorKind::InvalidInput, "Seek before start of file"));
        }

        if target >= state.file_size as i128 {
            state.cursor = state.file_size;
            self.status.insert(ReaderStatus::EOF);
        } else {
            state.cursor = target as u64;
        }
        Ok(state.cursor)
    }

    /// 游标回到文件开头
    pub fn rewind(&mut self) -> Result<()> {
        self.seek(0, Whence::Set).map(|_| ())
    }

    /// 从游标处读取最多 `buf.len()` 字节
    ///
    /// 请求越过文件末尾时先截短并设置 EOF。数据不在缓存中时同步读入，
    /// 缓存满则驱逐最久未使用的块。
    ///
    /// # 返回
    ///
    /// 实际复制的字节数。缺页读取失败时返回错误并设置 FAIL，游标保持
    /// 调用前的位置。
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(state) = self.state.as_mut() else {
            return Err(Error::new(ErrorKind::NotOpen, "File cache is not open"));
        };
        self.status.remove(ReaderStatus::TRANSIENT);

        let remaining = state.file_size - state.cursor;
        let mut wanted = buf.len();
        if wanted as u64 > remaining {
            wanted = remaining as usize;
            self.status.insert(ReaderStatus::EOF);
            if wanted == 0 {
                return Ok(0);
            }
        }

        let start_cursor = state.cursor;
        let geometry = *state.table.geometry();
        let mut total = 0;

        while total < wanted {
            let block = geometry.block_of(state.cursor);
            self.stats.total_accesses += 1;

            if state.table.is_resident(block) {
                self.stats.hits += 1;
                state.table.touch(block);
                log::trace!("[CACHE] block {} HIT", block);
            } else {
                self.stats.misses += 1;
                log::trace!(
                    "[CACHE] block {} MISS, resident={}/{}",
                    block,
                    state.table.resident_count(),
                    geometry.max_cached_blocks
                );
                match state.table.fault_in(block, &mut state.device, state.file_size) {
                    Ok(outcome) => {
                        self.stats.physical_reads += 1;
                        if outcome.evicted.is_some() {
                            self.stats.evictions += 1;
                        }
                    }
                    Err(e) => {
                        log::warn!("[CACHE] fault-in of block {} failed: {}", block, e);
                        self.status.insert(ReaderStatus::FAIL);
                        if e.kind() == ErrorKind::ShortRead {
                            self.status.insert(ReaderStatus::BAD);
                        }
                        state.cursor = start_cursor;
                        return Err(e);
                    }
                }
            }

            let data = state.table.block_data(block, state.file_size)?;
            let offset_in_block = (state.cursor - geometry.block_start(block)) as usize;
            let len = (data.len() - offset_in_block).min(wanted - total);

            buf[total..total + len].copy_from_slice(&data[offset_in_block..offset_in_block + len]);
            state.cursor += len as u64;
            total += len;
        }

        if state.cursor >= state.file_size {
            self.status.insert(ReaderStatus::EOF);
        }
        self.stats.bytes_read += total as u64;
        Ok(total)
    }

    // ===== 状态查询 =====

    /// 状态标志
    pub fn status(&self) -> ReaderStatus {
        self.status
    }

    /// 是否已打开
    pub fn is_open(&self) -> bool {
        self.status.contains(ReaderStatus::OPEN)
    }

    /// 游标是否位于文件末尾
    pub fn is_eof(&self) -> bool {
        self.status.contains(ReaderStatus::EOF)
    }

    /// 上一次操作是否失败
    pub fn is_fail(&self) -> bool {
        self.status.contains(ReaderStatus::FAIL)
    }

    /// 底层文件是否与打开时不一致
    pub fn is_bad(&self) -> bool {
        self.status.contains(ReaderStatus::BAD)
    }

    /// 缓存统计
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// 打开时计算出的几何参数
    pub fn geometry(&self) -> Option<&CacheGeometry> {
        self.state.as_ref().map(|s| s.table.geometry())
    }

    /// 缓存块大小，关闭时为 0
    pub fn block_size(&self) -> usize {
        self.geometry().map_or(0, |g| g.block_size)
    }

    /// 请求的缓存上限，关闭时为 0
    pub fn cache_max_size(&self) -> usize {
        self.geometry().map_or(0, |g| g.cache_max_size)
    }

    /// 实际缓存大小，关闭时为 0
    pub fn cache_actual_size(&self) -> usize {
        self.geometry().map_or(0, |g| g.cache_actual_size)
    }

    /// 最多驻留块数
    pub fn max_cached_blocks(&self) -> usize {
        self.geometry().map_or(0, |g| g.max_cached_blocks)
    }

    /// 文件块总数
    pub fn total_file_blocks(&self) -> usize {
        self.geometry().map_or(0, |g| g.total_file_blocks)
    }

    /// 当前驻留块数
    pub fn cached_blocks(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.table.resident_count())
    }

    /// 块是否驻留
    pub fn is_block_resident(&self, block: usize) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.table.is_resident(block))
    }

    /// 驻留块，按最久未使用 → 最近使用排列
    pub fn lru_order(&self) -> Vec<usize> {
        self.state
            .as_ref()
            .map_or_else(Vec::new, |s| s.table.lru_order())
    }

    /// 文件大小，关闭时为 0
    pub fn file_size(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.file_size)
    }

    /// 当前游标，关闭时为 0
    pub fn position(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.cursor)
    }

    /// 打开的文件路径（通过 `open_device` 打开时为 `None`）
    pub fn path(&self) -> Option<&Path> {
        self.state.as_ref().and_then(|s| s.path.as_deref())
    }
}

impl<S: SourceDevice> core::fmt::Debug for FileCache<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FileCache")
            .field("status", &self.status)
            .field("path", &self.path())
            .field("position", &self.position())
            .field("geometry", &self.geometry())
            .field("cached_blocks", &self.cached_blocks())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<S: SourceDevice> io::Read for FileCache<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        FileCache::<S>::read(self, buf).map_err(io::Error::from)
    }
}

impl<S: SourceDevice> io::Seek for FileCache<S> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            io::SeekFrom::Start(n) => (
                i64::try_from(n).map_err(|_| {
                    io::Error::from(Error::new(ErrorKind::InvalidInput, "Seek offset overflow"))
                })?,
                Whence::Set,
            ),
            io::SeekFrom::Current(n) => (n, Whence::Cur),
            io::SeekFrom::End(n) => (n, Whence::End),
        };
        FileCache::<S>::seek(self, offset, whence).map_err(io::Error::from)
    }
}
