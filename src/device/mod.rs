//! 数据源抽象
//!
//! [`SourceDevice`] 是文件缓存的物理读取接口，[`FileDevice`] 基于
//! `std::fs::File` 实现它。缓存只通过这个接口访问底层数据，
//! 测试中可以替换为内存数据源或注入读取错误。

mod source;

pub use source::{FileDevice, SourceDevice};
