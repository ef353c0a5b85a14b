//! 分块数组实现

use crate::{
    consts::CHUNK_CAPACITY,
    error::{Error, ErrorKind, Result},
};

/// 分块
///
/// 固定容纳 [`CHUNK_CAPACITY`] 个元素，`prev`/`next` 是相邻分块在
/// [`BlockArray`] 中的索引。
pub struct Chunk<T> {
    data: Box<[T]>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<T: Default> Chunk<T> {
    /// 分配一个元素全部为默认值的分块
    fn alloc(prev: Option<usize>) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(CHUNK_CAPACITY)?;
        data.resize_with(CHUNK_CAPACITY, T::default);
        Ok(Self {
            data: data.into_boxed_slice(),
            prev,
            next: None,
        })
    }
}

impl<T> Chunk<T> {
    /// 前一个分块的索引
    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    /// 后一个分块的索引
    pub fn next(&self) -> Option<usize> {
        self.next
    }

    /// 分块内的元素
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// 分块数组
///
/// 分块从位置 0 开始连续存在，只增不减。可变访问下标 `i` 时会按需追加
/// 分块直到 `i / CHUNK_CAPACITY` 存在；只读访问绝不分配，越界返回
/// [`ErrorKind::OutOfRange`]。
///
/// # 示例
///
/// ```rust
/// use largefile_core::BlockArray;
///
/// let mut array: BlockArray<u64> = BlockArray::new()?;
/// array.set(40_000, 7)?;
/// assert_eq!(*array.get(40_000)?, 7);
/// assert_eq!(array.chunk_count(), 3);
/// # Ok::<(), largefile_core::Error>(())
/// ```
pub struct BlockArray<T> {
    chunks: Vec<Chunk<T>>,
    head: usize,
    tail: usize,
}

impl<T: Default> BlockArray<T> {
    /// 创建分块数组，预分配第一个分块
    ///
    /// 内存不足时返回 [`ErrorKind::OutOfMemory`]
    pub fn new() -> Result<Self> {
        let mut chunks = Vec::new();
        chunks.try_reserve(1)?;
        chunks.push(Chunk::alloc(None)?);
        Ok(Self {
            chunks,
            head: 0,
            tail: 0,
        })
    }

    /// 可变访问，必要时追加分块
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let block = index / CHUNK_CAPACITY;
        let offset = index % CHUNK_CAPACITY;

        let chunk = if block >= self.chunks.len() {
            self.grow_to(block)?;
            // 新追加的尾部分块正是目标分块，无需遍历
            self.tail
        } else {
            self.walk(block)
        };

        Ok(&mut self.chunks[chunk].data[offset])
    }

    /// 写入下标 `index` 处的元素
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// 从尾部追加分块直到第 `block` 个分块存在
    fn grow_to(&mut self, block: usize) -> Result<()> {
        let needed = block + 1 - self.chunks.len();
        self.chunks.try_reserve(needed)?;

        while self.chunks.len() <= block {
            let new_index = self.chunks.len();
            let chunk = Chunk::alloc(Some(self.tail))?;
            self.chunks.push(chunk);
            self.chunks[self.tail].next = Some(new_index);
            self.tail = new_index;
        }

        log::trace!("[ARRAY] grown to {} chunks", self.chunks.len());
        Ok(())
    }
}

impl<T> BlockArray<T> {
    /// 只读访问，不分配
    ///
    /// 下标超出已分配范围时返回 [`ErrorKind::OutOfRange`]
    pub fn get(&self, index: usize) -> Result<&T> {
        let block = index / CHUNK_CAPACITY;
        if block >= self.chunks.len() {
            return Err(Error::new(
                ErrorKind::OutOfRange,
                "Index beyond allocated chunks",
            ));
        }
        let chunk = self.walk(block);
        Ok(&self.chunks[chunk].data[index % CHUNK_CAPACITY])
    }

    /// 沿链表从头部走 `block` 步，调用方保证 `block` 在范围内
    fn walk(&self, block: usize) -> usize {
        if block + 1 == self.chunks.len() {
            return self.tail;
        }

        let mut current = self.head;
        for _ in 0..block {
            match self.chunks[current].next {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// 第 `block` 个分块
    pub fn chunk(&self, block: usize) -> Option<&Chunk<T>> {
        if block >= self.chunks.len() {
            return None;
        }
        Some(&self.chunks[self.walk(block)])
    }

    /// 已分配的分块数
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// 不分配即可访问的元素个数
    pub fn capacity(&self) -> usize {
        self.chunks.len() * CHUNK_CAPACITY
    }

    /// 按下标顺序遍历所有已分配的元素
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            array: self,
            chunk: Some(self.head),
            offset: 0,
        }
    }
}

impl<T> core::fmt::Debug for BlockArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockArray")
            .field("chunk_count", &self.chunks.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// [`BlockArray::iter`] 返回的迭代器
pub struct Iter<'a, T> {
    array: &'a BlockArray<T>,
    chunk: Option<usize>,
    offset: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.chunk?;
        let array = self.array;
        let chunk = &array.chunks[current];
        let item = &chunk.data[self.offset];

        self.offset += 1;
        if self.offset == CHUNK_CAPACITY {
            self.offset = 0;
            self.chunk = chunk.next;
        }
        Some(item)
    }
}
