//! 数据源接口与文件实现

use crate::error::{Error, ErrorKind, Result};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// 数据源接口
///
/// 实现此 trait 以向 [`FileCache`](crate::FileCache) 提供原始数据。
///
/// # 示例
///
/// ```rust,ignore
/// use largefile_core::{SourceDevice, Result};
///
/// struct MemDevice(Vec<u8>);
///
/// impl SourceDevice for MemDevice {
///     fn size(&self) -> u64 {
///         self.0.len() as u64
///     }
///
///     fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
///         let start = offset as usize;
///         let n = buf.len().min(self.0.len() - start);
///         buf[..n].copy_from_slice(&self.0[start..start + n]);
///         Ok(n)
///     }
/// }
/// ```
pub trait SourceDevice {
    /// 数据总长度（字节）
    fn size(&self) -> u64;

    /// 从 `offset` 处读取数据填满 `buf`
    ///
    /// # 返回
    ///
    /// 实际读取的字节数。只有到达数据末尾时才允许少于 `buf.len()`。
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;
}

/// 只读文件数据源
#[derive(Debug)]
pub struct FileDevice {
    file: File,
    size: u64,
}

impl FileDevice {
    /// 以只读方式打开文件
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| open_error(&e))?;
        let size = file
            .metadata()
            .map_err(|e| Error::with_cause(ErrorKind::Io, "Failed to stat open file", e))?
            .len();
        Ok(Self { file, size })
    }
}

fn open_error(err: &io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound => Error::with_cause(ErrorKind::NotFound, "File not found", err),
        _ => Error::with_cause(ErrorKind::Io, "Failed to open file", err),
    }
}

impl SourceDevice for FileDevice {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| Error::with_cause(ErrorKind::Io, "Failed to seek file", e))?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::with_cause(ErrorKind::Io, "Failed to read file", e)),
            }
        }
        Ok(filled)
    }
}
