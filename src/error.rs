//! 错误类型定义
//!
//! 提供文件缓存、行索引和分块数组操作的错误类型。

use core::fmt;

/// 操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// I/O 错误（物理读取失败）
    Io,
    /// 无效参数
    InvalidInput,
    /// 配置错误（块大小大于缓存上限等），可以修正参数后重试
    Config,
    /// 路径不存在或无法 stat
    NotFound,
    /// 已经打开
    AlreadyOpen,
    /// 未打开（对已关闭的缓存进行操作）
    NotOpen,
    /// 只读访问越过已分配范围
    OutOfRange,
    /// 内存分配失败
    OutOfMemory,
    /// 物理读取返回的数据少于块应有的长度（文件在打开期间被截断）
    ShortRead,
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// 创建带原因的错误
    ///
    /// 原因只写入日志，不随错误保存
    pub fn with_cause(kind: ErrorKind, message: &'static str, cause: impl fmt::Debug) -> Self {
        log::debug!("{:?}: {} (cause: {:?})", kind, message, cause);
        Self { kind, message }
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Error::with_cause(ErrorKind::OutOfMemory, "Failed to allocate storage", err)
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind as IoKind;
        let kind = match err.kind {
            ErrorKind::InvalidInput | ErrorKind::Config | ErrorKind::OutOfRange => {
                IoKind::InvalidInput
            }
            ErrorKind::NotFound => IoKind::NotFound,
            ErrorKind::AlreadyOpen => IoKind::AlreadyExists,
            ErrorKind::NotOpen => IoKind::NotConnected,
            ErrorKind::OutOfMemory => IoKind::OutOfMemory,
            ErrorKind::ShortRead => IoKind::UnexpectedEof,
            ErrorKind::Io => IoKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;
