//! 分块数组模块
//!
//! 提供按固定大小分块增长的数组 [`BlockArray`]。元素存放在固定容量的
//! [`Chunk`] 中，分块之间以前后索引串成链表。增长时只追加新分块，
//! 已有元素既不会被复制也不会移动地址。
//!
//! # 取舍
//!
//! 访问第 `b` 个分块需要从链表头遍历 `b` 次，随机访问越靠后越慢；
//! 换来的是增长时无 realloc、无拷贝，且所有分块大小相同，不产生堆碎片。

mod block_array;

pub use block_array::{BlockArray, Chunk, Iter};
