//! 行索引模块
//!
//! [`LineIndexer`] 借用一个已打开的 [`FileCache`](crate::cache::FileCache)，
//! 顺序扫描整个文件，为每一行记录起始偏移和长度，结果存放在
//! [`BlockArray`](crate::array::BlockArray) 中。
//!
//! # 行的定义
//!
//! - 行由边界字节（默认 `\n`）结束，边界字节不计入长度，也不属于下一行
//! - 行长度达到上限（默认 2048）时在此处截断，剩余部分作为新的一行，
//!   截断处不消耗任何字节
//! - 文件末尾没有边界字节时，最后一段数据仍算作一行；以边界字节结尾时
//!   不会多出一个空行
//!
//! # 扫描方式
//!
//! 扫描使用大小为两个缓存块的 [`ScanWindow`]。窗口扫完后丢弃已扫描部分、
//! 把未结束的行移到开头，再从缓存继续读入，因此任意长度的文件只需要
//! 固定大小的扫描缓冲区。

mod line_indexer;
mod window;

pub use line_indexer::{LineIndexEntry, LineIndexer, LineIndexerConfig};
pub use window::ScanWindow;
